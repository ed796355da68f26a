use std::path::PathBuf;
use thiserror::Error;

pub type VexResult<T> = std::result::Result<T, VexError>;

#[derive(Debug, Error)]
pub enum VexError {
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("VCF stream does not declare a CSQ format in its header")]
    MissingCsqFormat,
    #[error("VCF stream has no column header line (#CHROM POS etc.)")]
    MissingColumnHeader,
    #[error("Column '{name}' missing from the #CHROM header line")]
    MissingColumn { name: String },
    #[error("Invalid gzip header: {}", path.display())]
    InvalidGzipHeader { path: PathBuf },
}

impl VexError {
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

#[macro_export]
macro_rules! vex_error {
    ($($arg:tt)*) => {
        $crate::error::VexError::message(format!($($arg)*))
    };
}
