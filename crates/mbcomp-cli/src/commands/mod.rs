//! CLI command implementations.

pub mod init_state;
pub mod params;
pub mod process;
pub mod states;
