//! Command-line interface module.

mod commands;
mod inspect;
mod simulate;

pub use commands::{Cli, Commands};
pub use inspect::{moderate_text, print_config, print_packages};
pub use simulate::simulate;
