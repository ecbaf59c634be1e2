pub mod error;
pub mod result;
pub mod engine;
pub mod parser;

pub use error::CommandError;
pub use result::CommandResult;
pub use engine::CommandEngine;
