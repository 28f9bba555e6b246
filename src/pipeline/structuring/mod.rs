pub mod builder;
pub mod field;
pub mod form_config;
pub mod normalize;
pub mod ocr_tolerance;
pub mod section;
pub mod vocabulary;


pub use builder::*;
pub use field::*;
pub use form_config::*;
pub use normalize::*;
pub use section::*;
pub use vocabulary::*;

use thiserror::Error;

/// Raised while building a `FormStructurer`; structuring itself never fails.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid pattern for field {name}: {source}")]
    InvalidPattern { name: String, source: regex::Error },

    #[error("Unknown field in pattern overrides: {0}")]
    UnknownField(String),

    #[error("Vocabulary table must not be empty: {0}")]
    EmptyVocabulary(&'static str),

    #[error("Configuration parsing error: {0}")]
    Parse(#[from] serde_json::Error),
}
