//! Error types for WMF decoding and playback
//!
//! Truncated reads and declared/consumed size mismatches are the only real
//! failures; everything else (unknown records, degenerate geometry) is
//! handled in-band.

use thiserror::Error;

use crate::record::RecordType;

/// Error type for WMF operations
#[derive(Error, Debug)]
pub enum WmfError {
    #[error("truncated {record:?} record at offset {offset}: {needed} more byte(s) required")]
    Truncated {
        record: RecordType,
        offset: usize,
        needed: usize,
    },

    #[error("{record:?} record at offset {offset} declares {declared} body byte(s) but decoded {consumed}")]
    SizeMismatch {
        record: RecordType,
        offset: usize,
        declared: usize,
        consumed: usize,
    },

    #[error("invalid record size {size} (words) at offset {offset}")]
    InvalidRecordSize { offset: usize, size: u32 },

    #[error("invalid WMF format: {0}")]
    InvalidFormat(String),

    #[error("playback cancelled after {records} record(s)")]
    Cancelled { records: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for WMF operations
pub type WmfResult<T> = Result<T, WmfError>;

#[cfg(feature = "python")]
impl From<WmfError> for pyo3::PyErr {
    fn from(err: WmfError) -> Self {
        pyo3::PyErr::new::<pyo3::exceptions::PyValueError, _>(err.to_string())
    }
}
