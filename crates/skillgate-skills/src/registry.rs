//! Skills registry mapping names to handlers
//!
//! The registry is filled once at startup and only read afterwards, so it
//! can be shared across concurrent invocations without locking.

use std::collections::HashMap;

use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{Result, SkillError};
use crate::skill::{validate_descriptor, SkillDescriptor};

/// Skills registry holding all invocable skills
#[derive(Debug, Default)]
pub struct SkillRegistry {
    skills: HashMap<String, SkillDescriptor>,
}

impl SkillRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a skill, failing on an invalid or already taken name
    pub fn register(&mut self, descriptor: SkillDescriptor) -> Result<()> {
        validate_descriptor(&descriptor)?;

        if self.skills.contains_key(descriptor.name()) {
            return Err(SkillError::DuplicateSkill {
                name: descriptor.name().to_string(),
            });
        }

        debug!("Registered skill: {}", descriptor.name());
        self.skills.insert(descriptor.name().to_string(), descriptor);
        Ok(())
    }

    /// Builder-style [`register`](Self::register)
    pub fn with_skill(mut self, descriptor: SkillDescriptor) -> Result<Self> {
        self.register(descriptor)?;
        Ok(self)
    }

    /// Invoke the skill registered under `name`
    pub async fn invoke(&self, name: &str, argument: Value) -> Result<Value> {
        self.invoke_with_cancel(name, argument, &CancellationToken::new())
            .await
    }

    /// Invoke the skill registered under `name`, handing `cancel` to the handler
    pub async fn invoke_with_cancel(
        &self,
        name: &str,
        argument: Value,
        cancel: &CancellationToken,
    ) -> Result<Value> {
        let skill = self.get(name).ok_or_else(|| SkillError::UnknownSkill {
            name: name.to_string(),
        })?;

        skill.handler().call(argument, cancel).await
    }

    /// Get a skill by name
    pub fn get(&self, name: &str) -> Option<&SkillDescriptor> {
        self.skills.get(name)
    }

    /// All skill names, sorted
    pub fn skill_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.skills.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// All descriptors, sorted by name
    pub fn descriptors(&self) -> Vec<&SkillDescriptor> {
        let mut descriptors: Vec<_> = self.skills.values().collect();
        descriptors.sort_by_key(|d| d.name());
        descriptors
    }

    /// Get number of skills
    pub fn len(&self) -> usize {
        self.skills.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Generate the skill catalog handed to the orchestrator
    /// Format:
    /// - GetBaseballStats: Answer any baseball question, ...
    /// - GetTodos: Fetch the list of previously created todo tasks
    pub fn generate_catalog(&self) -> String {
        if self.skills.is_empty() {
            return "No skills available".to_string();
        }

        self.descriptors()
            .iter()
            .map(|d| d.to_summary())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
