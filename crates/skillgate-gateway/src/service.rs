use crate::config::Config;
use anyhow::Result;
use serde_json::Value;
use skillgate_persistence::PersistenceService;
use skillgate_skills::{default_registry, SkillRegistry};
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Gateway service - host adapter around the skill registry
pub struct GatewayService {
    registry: SkillRegistry,
    persistence: PersistenceService,
}

impl GatewayService {
    /// Initialize logging, open the todo store and build the registry once
    pub async fn start(config: &Config) -> Result<Self> {
        skillgate_logging::init_logging(&config.logging.level, config.logging.format)?;
        info!("Starting SkillGate gateway");

        let persistence = PersistenceService::new(&config.database.path).await?;

        // One pooled client shared by every remote skill
        let client = reqwest::Client::builder().build()?;

        let options = config.skill_options();
        info!(
            "Skill config: endpoint={}, timeout={:?}, model={:?}",
            options.endpoint.url(),
            options.timeout,
            options.model
        );

        let registry = default_registry(client, Arc::new(persistence.clone()), options)?;
        info!("Skill registry initialized with {} skills", registry.len());

        Ok(Self {
            registry,
            persistence,
        })
    }

    /// Skill catalog for the orchestrator
    pub fn catalog(&self) -> String {
        self.registry.generate_catalog()
    }

    /// Invoke one skill; Ctrl+C cancels the in-flight call
    pub async fn invoke(&self, name: &str, argument: Value) -> Result<Value> {
        let cancel = CancellationToken::new();
        let on_signal = cancel.clone();
        let watcher = tokio::spawn(async move {
            if let Err(e) = signal::ctrl_c().await {
                error!("Failed to install Ctrl+C handler: {}", e);
                return;
            }
            info!("Received shutdown signal, cancelling invocation");
            on_signal.cancel();
        });

        let result = self
            .registry
            .invoke_with_cancel(name, argument, &cancel)
            .await;
        watcher.abort();

        Ok(result?)
    }

    /// Seed the local todo store
    pub async fn add_todo(&self, title: &str) -> Result<Value> {
        let item = self.persistence.add_todo(title).await?;
        Ok(serde_json::to_value(item)?)
    }

    /// Mark a stored task as done
    pub async fn complete_todo(&self, id: &str) -> Result<()> {
        if !self.persistence.set_completed(id, true).await? {
            anyhow::bail!("No todo with id '{id}'");
        }
        Ok(())
    }
}

/// Interpret a command-line argument as JSON, falling back to a plain string
pub fn parse_argument(raw: Option<&str>) -> Value {
    match raw {
        None => Value::Null,
        Some(raw) => serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())),
    }
}
