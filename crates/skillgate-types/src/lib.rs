//! SkillGate Types - Core types shared by the skill dispatch crates
//!
//! This module defines the plain data types that cross crate boundaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of the skill answering baseball questions through the sports service
pub const GET_BASEBALL_STATS: &str = "GetBaseballStats";

/// Name of the skill listing previously created todo tasks
pub const GET_TODOS: &str = "GetTodos";

/// A todo task owned by the task store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl TodoItem {
    /// Create a new, not yet completed task with a fresh id
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            completed: false,
            created_at: Utc::now(),
        }
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}

/// Request body posted to the sports inference service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceRequest {
    pub query: String,
}

impl InferenceRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}
