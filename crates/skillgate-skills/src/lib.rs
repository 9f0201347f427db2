//! `SkillGate` Skills
//!
//! Named, independently invocable skills an LLM orchestrator calls by name.
//!
//! ## Features
//!
//! - Explicit registry built once at startup, fail-fast on duplicate names
//! - Uniform async handler interface with per-call cancellation
//! - Remote inference skill posting questions to an HTTP service
//! - Local data skill delegating to an injected todo store
//!
//! Every failure reaches the caller. Nothing here retries or swallows errors.

#![deny(unsafe_code, dead_code, unused_imports, unused_variables, missing_docs)]

pub mod defaults;
pub mod error;
pub mod inference;
pub mod registry;
pub mod skill;
pub mod todos;

pub use defaults::{default_registry, SkillOptions};
pub use error::SkillError;
pub use inference::{EndpointConfig, RemoteInferenceSkill};
pub use registry::SkillRegistry;
pub use skill::{SkillDescriptor, SkillHandler};
pub use todos::{LocalDataSkill, TodoSource};
