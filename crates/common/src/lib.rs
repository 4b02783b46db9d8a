use thiserror::Error;

pub mod env;
pub mod fetch;
pub mod types;
pub mod utils;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("network error: {0}")]
    Network(String),
    #[error("upstream responded with status {0}")]
    Status(u16),
    #[error("parse error: {0}")]
    Parse(String),
}
