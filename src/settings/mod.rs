mod cli;
mod settings;

pub use cli::*;
pub use settings::*;

pub use clap::Parser;
