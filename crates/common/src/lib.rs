pub mod config;
pub mod error;
pub mod logger;
pub mod text;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::RfqMatchError;
pub use text::normalize;
pub type Result<T> = std::result::Result<T, RfqMatchError>;
