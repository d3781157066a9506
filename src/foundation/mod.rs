//! Foundation - error type and log sink shared by every layer

pub mod error;
pub mod logging;

pub use error::{EngineError, EngineResult};
