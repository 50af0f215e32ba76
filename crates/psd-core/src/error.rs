//! Error types for PSD/PSB operations

use thiserror::Error;

use crate::ChannelId;

/// Result type for PSD/PSB operations
pub type PsdResult<T> = Result<T, PsdError>;

/// Errors that can occur while reading or querying a layered document
#[derive(Error, Debug)]
pub enum PsdError {
    #[error("Not a Photoshop file (missing 8BPS signature)")]
    NotAPhotoshopFile,

    #[error("Unsupported version: {0}")]
    UnsupportedVersion(u16),

    #[error("Unsupported bit depth: {0}")]
    UnsupportedBitDepth(u16),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Unexpected end of data at offset {offset}: needed {needed} bytes, {available} available")]
    UnexpectedEndOfData {
        offset: u64,
        needed: u64,
        available: u64,
    },

    #[error("{dimension} of {value} exceeds the maximum of {max}")]
    DimensionOutOfRange {
        dimension: &'static str,
        value: u32,
        max: u32,
    },

    #[error("Corrupt layer record at offset {offset}: {reason}")]
    CorruptLayerRecord { offset: u64, reason: String },

    #[error("Corrupt group structure: {0}")]
    CorruptGroupStructure(String),

    #[error("Corrupt channel data: {0}")]
    CorruptChannelData(String),

    #[error("Unsupported compression: {0}")]
    UnsupportedCompression(u16),

    #[error("Layer not found: {0}")]
    LayerNotFound(String),

    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Channel not found: {0:?}")]
    ChannelNotFound(ChannelId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PsdError {
    /// Shorthand for a layer record error at a given file offset
    pub fn corrupt_record(offset: u64, reason: impl Into<String>) -> Self {
        PsdError::CorruptLayerRecord {
            offset,
            reason: reason.into(),
        }
    }

    /// True for errors raised by the lookup layer rather than the parser
    pub fn is_query_error(&self) -> bool {
        matches!(
            self,
            PsdError::LayerNotFound(_)
                | PsdError::TypeMismatch { .. }
                | PsdError::ChannelNotFound(_)
        )
    }
}
