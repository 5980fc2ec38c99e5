pub mod analyzer;
pub mod config;
pub mod fetch;
pub mod probe;

use thiserror::Error;

pub use analyzer::{validate_url, AuditReport, Auditor};
pub use config::{AuditConfig, ConfigError};
pub use fetch::{FetchedPage, PageFetcher};
pub use probe::ReqwestProbe;
pub use seo_audit;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Failed to fetch URL: {0}")]
    FetchError(String),
    #[error("Received HTTP {0} from the server")]
    HttpStatus(u16),
    #[error("Failed to build HTTP client: {0}")]
    ClientError(String),
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),
}
