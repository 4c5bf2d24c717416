pub mod config;
pub mod error;
pub mod logging;
pub mod student;

pub use config::{Config, DEFAULT_CAPACITY, DEFAULT_DATA_FILE, FileLoggingConfig, LoggingConfig};
pub use error::{Error, Result};
pub use logging::{LogFormat, init_logging};
pub use student::{MAX_TEXT_LEN, Student, validate_text};
