pub mod tokenizer;
pub mod command;
pub mod target;

pub use tokenizer::split_arguments;
pub use command::CommandLine;
pub use target::TargetParser;
