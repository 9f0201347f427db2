//! Error types for skill registration and invocation

use thiserror::Error;

/// Skill registration and invocation errors
#[derive(Debug, Error)]
pub enum SkillError {
    /// No skill is registered under the requested name
    #[error("Skill '{name}' not found")]
    UnknownSkill {
        /// Requested skill name
        name: String,
    },

    /// A skill with the same name is already registered
    #[error("Skill '{name}' is already registered")]
    DuplicateSkill {
        /// Conflicting skill name
        name: String,
    },

    /// Skill name rejected at registration
    #[error("Invalid skill name '{name}': {reason}")]
    InvalidSkillName {
        /// Rejected name
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// Argument payload could not be interpreted by the skill
    #[error("Invalid argument for skill '{skill}': {reason}")]
    InvalidArgument {
        /// Skill that rejected the argument
        skill: String,
        /// What was wrong with it
        reason: String,
    },

    /// Upstream service answered with a non-success status
    #[error("Upstream service returned status {status}")]
    Upstream {
        /// HTTP status code
        status: u16,
    },

    /// Request could not complete (connection, DNS, timeout, cancellation)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Injected collaborator failed; passed through untouched
    #[error(transparent)]
    Collaborator(anyhow::Error),

    /// Handler result could not be converted to JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SkillError {
    /// Classify a `reqwest` failure that happened before a status was received
    pub(crate) fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Transport(format!("request timed out: {err}"))
        } else if err.is_connect() {
            Self::Transport(format!("connection failed: {err}"))
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, SkillError>;
