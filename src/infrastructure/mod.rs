//! Infrastructure layer
//!
//! Configuration, logging and access to the process environment.

mod config;
mod environment;
mod logging;

pub use config::Config;
pub use environment::{EnvProvider, MapEnv, ProcessEnv};
pub use logging::init_logging;
