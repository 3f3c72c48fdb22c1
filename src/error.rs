use thiserror::Error;

/// The closed set of failures the decoder can report.
///
/// Every offset-bearing variant carries the byte offset at which the
/// decoder was positioned when the failure occurred, so a caller can
/// correlate a failure with a location in the block-log file.
#[derive(Error, Debug)]
pub enum Error {
    #[error("truncated read at offset {offset} (wanted {wanted} bytes, {available} available)")]
    Truncated {
        offset: usize,
        wanted: usize,
        available: usize,
    },

    #[error("invalid utf-8 string at offset {offset}")]
    Encoding { offset: usize },

    #[error("varint overflow at offset {offset}")]
    Overflow { offset: usize },

    #[error("unknown operation id {op_id} at offset {offset}")]
    UnknownOperation { op_id: u8, offset: usize },

    #[error("unknown tag {tag} for {what} at offset {offset}")]
    UnknownTag {
        what: &'static str,
        tag: u8,
        offset: usize,
    },

    #[error("block_at_number requires an index_log file, none was found")]
    IndexMissing,

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid render configuration: {0}")]
    ConfigInvalid(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
