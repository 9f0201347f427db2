//! Built-in skills exposed to the assistant

use std::sync::Arc;
use std::time::Duration;

use skillgate_types::{GET_BASEBALL_STATS, GET_TODOS};

use crate::error::Result;
use crate::inference::{EndpointConfig, RemoteInferenceSkill, DEFAULT_TIMEOUT};
use crate::registry::SkillRegistry;
use crate::skill::SkillDescriptor;
use crate::todos::{LocalDataSkill, TodoSource};

const BASEBALL_STATS_DESCRIPTION: &str =
    "Answer any baseball question, e.g. which players were born in 1800s?";
const TODOS_DESCRIPTION: &str = "Fetch the list of previously created todo tasks";

/// Settings for the built-in skills, resolved once at startup
#[derive(Debug, Clone)]
pub struct SkillOptions {
    /// Sports service endpoint
    pub endpoint: EndpointConfig,
    /// Per-request timeout for the sports service
    pub timeout: Duration,
    /// Chat model deployment attached to every descriptor
    pub model: Option<String>,
}

impl Default for SkillOptions {
    fn default() -> Self {
        Self {
            endpoint: EndpointConfig::default(),
            timeout: DEFAULT_TIMEOUT,
            model: None,
        }
    }
}

/// Build the registry with `GetBaseballStats` and `GetTodos`
pub fn default_registry(
    client: reqwest::Client,
    todos: Arc<dyn TodoSource>,
    options: SkillOptions,
) -> Result<SkillRegistry> {
    let stats = RemoteInferenceSkill::new(client, options.endpoint).with_timeout(options.timeout);
    let todos = LocalDataSkill::new(todos);

    let with_model = |descriptor: SkillDescriptor| match &options.model {
        Some(model) => descriptor.with_model(model.clone()),
        None => descriptor,
    };

    SkillRegistry::new()
        .with_skill(with_model(SkillDescriptor::new(
            GET_BASEBALL_STATS,
            BASEBALL_STATS_DESCRIPTION,
            Arc::new(stats),
        )))?
        .with_skill(with_model(SkillDescriptor::new(
            GET_TODOS,
            TODOS_DESCRIPTION,
            Arc::new(todos),
        )))
}
