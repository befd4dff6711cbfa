// Path: crates/cli/src/providers/mod.rs
//! The network and terminal implementations of the execution collaborators.

mod http;

pub mod gateway;
pub mod lcd;
pub mod terminal;

pub use gateway::GatewaySubmitter;
pub use lcd::LcdQuerier;
pub use terminal::TerminalConfirmer;
