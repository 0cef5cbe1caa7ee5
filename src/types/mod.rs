//! Shared types for Keyward

pub mod error;

pub use error::{EngineError, Result};
