//! Remote probes: the command lines run on the monitored host and the
//! parsers that turn their output into typed fields.

pub mod commands;
pub mod parser;
pub mod system;

pub use parser::ParseError;
pub use system::CollectError;
