mod readers;
mod util;

pub use readers::open_hits_reader;
pub use util::{handle_error_and_exit, Result};
