// Public modules
pub mod console;
pub mod defaults;
pub mod error;
pub mod executor;
pub mod options;
pub mod plan;
pub mod probe;
pub mod release;
pub mod report;
pub mod selector;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
