//! Output formatting module for CLI

mod terminal;

pub use terminal::TerminalOutput;
