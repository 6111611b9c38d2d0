pub mod config;
pub mod engine;
pub mod format;
pub mod metrics;
pub mod poller;
pub mod server;
pub mod system;
