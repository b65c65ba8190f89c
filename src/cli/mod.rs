//! CLI command handling

pub mod output;
pub mod send;
pub mod serve;

pub use output::*;
pub use send::*;
pub use serve::*;
