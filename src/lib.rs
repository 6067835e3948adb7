pub mod collection;
pub mod config;
pub mod converter;
pub mod curl;
pub mod error;
pub mod logger;
pub mod parser;
pub mod utils;
pub mod variable;

// Re-export commonly used types
pub use collection::{Collection, ConvertOptions};
pub use converter::{convert, convert_file, validate_structure};
pub use error::{MdpostError, Result};
pub use parser::ValidationReport;
