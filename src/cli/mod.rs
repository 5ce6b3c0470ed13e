pub mod args;
pub mod commands;
pub mod render;

pub use args::{Cli, Commands, OutputFormat};
pub use commands::run;
pub use render::CommandOutput;
