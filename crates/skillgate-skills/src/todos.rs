//! Local data skill listing todo tasks from an injected store

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use skillgate_types::TodoItem;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::{Result, SkillError};
use crate::skill::SkillHandler;

/// Read-only access to previously created todo tasks
#[async_trait]
pub trait TodoSource: Send + Sync {
    /// All tasks, in the store's order
    async fn get_items(&self) -> anyhow::Result<Vec<TodoItem>>;
}

/// Skill returning whatever the injected [`TodoSource`] holds
#[derive(Clone)]
pub struct LocalDataSkill {
    source: Arc<dyn TodoSource>,
}

impl LocalDataSkill {
    /// Create the skill over `source`
    pub fn new(source: Arc<dyn TodoSource>) -> Self {
        Self { source }
    }

    /// Fetch the list of previously created todo tasks
    pub async fn list_items(&self) -> Result<Vec<TodoItem>> {
        info!("Fetching list of todos");
        self.source.get_items().await.map_err(SkillError::Collaborator)
    }
}

impl fmt::Debug for LocalDataSkill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalDataSkill").finish_non_exhaustive()
    }
}

#[async_trait]
impl SkillHandler for LocalDataSkill {
    // The argument only exists for protocol uniformity
    async fn call(&self, _argument: Value, _cancel: &CancellationToken) -> Result<Value> {
        let items = self.list_items().await?;
        Ok(serde_json::to_value(items)?)
    }
}
