//! Tracing setup shared by every binary in the workspace

pub mod config;
pub mod init;

pub use config::InstrumentationConfig;
pub use init::init_tracing;
