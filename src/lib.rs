pub mod config;
pub mod error;
pub mod logging;
pub mod mcp;
pub mod monobank;

pub use config::Config;
pub use error::Error;
