pub mod cli;
pub mod commands;
pub mod mlva;
pub mod utils;
