pub mod args;
pub mod display;
pub mod interface;

pub use args::Args;
pub use interface::CLI;
