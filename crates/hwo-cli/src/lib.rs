//! Library side of the `hwo` command: input parsing and logging setup.

pub mod input;
pub mod logging;
