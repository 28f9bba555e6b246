pub mod enums;
pub mod record;

pub use enums::*;
pub use record::*;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ModelError {
    #[error("Invalid value for {field}: {value}")]
    InvalidEnum { field: String, value: String },
}
