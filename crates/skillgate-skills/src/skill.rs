//! Skill definition and the uniform handler interface
//!
//! A skill is a name, a natural-language trigger description the
//! orchestrator matches against, and a handler that runs on invocation.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::error::{Result, SkillError};

/// Maximum allowed name length (function-calling limit)
const MAX_NAME_LENGTH: usize = 64;
/// Descriptions above this length still register but may be truncated by the orchestrator
const MAX_DESCRIPTION_LENGTH: usize = 1024;

/// Uniform invocation interface every skill implements
#[async_trait]
pub trait SkillHandler: Send + Sync {
    /// Run the skill with the orchestrator-supplied argument
    ///
    /// Long-running handlers must stop and fail with
    /// [`SkillError::Transport`] once `cancel` fires.
    async fn call(&self, argument: Value, cancel: &CancellationToken) -> Result<Value>;
}

/// A registered skill. Immutable once built.
#[derive(Clone)]
pub struct SkillDescriptor {
    name: String,
    description: String,
    model: Option<String>,
    handler: Arc<dyn SkillHandler>,
}

impl SkillDescriptor {
    /// Create a descriptor for `handler`
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        handler: Arc<dyn SkillHandler>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            model: None,
            handler,
        }
    }

    /// Chat model deployment the host should use when triggering this skill
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Skill name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Trigger description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Chat model deployment name, if one was configured
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub(crate) fn handler(&self) -> &Arc<dyn SkillHandler> {
        &self.handler
    }

    /// Format: "- {name}: {description}"
    pub fn to_summary(&self) -> String {
        format!("- {}: {}", self.name, self.description)
    }
}

impl fmt::Debug for SkillDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkillDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

/// Validate a descriptor before it enters a registry
pub(crate) fn validate_descriptor(descriptor: &SkillDescriptor) -> Result<()> {
    let name = descriptor.name();
    let invalid = |reason: &str| SkillError::InvalidSkillName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("name cannot be empty"));
    }

    if name.len() > MAX_NAME_LENGTH {
        return Err(invalid(&format!(
            "name exceeds {MAX_NAME_LENGTH} characters (was {})",
            name.len()
        )));
    }

    let name_re = Regex::new(r"^[A-Za-z0-9_-]+$")
        .map_err(|e| invalid(&format!("failed to compile name validation regex: {e}")))?;

    if !name_re.is_match(name) {
        return Err(invalid(
            "name must contain only letters, numbers, underscores and hyphens",
        ));
    }

    if descriptor.description().len() > MAX_DESCRIPTION_LENGTH {
        warn!(
            "Skill '{}' description exceeds {} characters (was {}), may be truncated",
            name,
            MAX_DESCRIPTION_LENGTH,
            descriptor.description().len()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl SkillHandler for Echo {
        async fn call(&self, argument: Value, _cancel: &CancellationToken) -> Result<Value> {
            Ok(argument)
        }
    }

    fn descriptor(name: &str) -> SkillDescriptor {
        SkillDescriptor::new(name, "Echo the argument back", Arc::new(Echo))
    }

    #[test]
    fn test_validate_descriptor() {
        assert!(validate_descriptor(&descriptor("GetBaseballStats")).is_ok());
        assert!(validate_descriptor(&descriptor("get-todos_v2")).is_ok());

        let too_long = "x".repeat(65);
        for bad in ["", "Get Todos", "get.todos", too_long.as_str()] {
            let err = validate_descriptor(&descriptor(bad)).unwrap_err();
            assert!(matches!(err, SkillError::InvalidSkillName { .. }), "{bad:?}");
        }
    }

    #[test]
    fn test_long_description_is_accepted() {
        let long = SkillDescriptor::new("Echo", "d".repeat(2000), Arc::new(Echo));
        assert!(validate_descriptor(&long).is_ok());
    }

    #[test]
    fn test_summary_and_model() {
        let d = descriptor("Echo").with_model("gpt-4o-mini");
        assert_eq!(d.to_summary(), "- Echo: Echo the argument back");
        assert_eq!(d.model(), Some("gpt-4o-mini"));
        assert_eq!(descriptor("Echo").model(), None);
    }

    #[tokio::test]
    async fn test_handler_receives_argument() {
        let d = descriptor("Echo");
        let out = d
            .handler()
            .call(Value::from("hello"), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(out, Value::from("hello"));
    }
}
