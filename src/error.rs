//! Run-fatal error taxonomy. Recoverable geometry conditions are
//! logged and counted by the extractor instead of surfacing here.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("i/o failure on extract stream: {0}")]
    Io(#[from] io::Error),

    #[error("malformed protobuf data: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("extract truncated mid-blob")]
    Truncated,

    #[error("blob of {0} bytes exceeds the format's size bound")]
    OversizedBlob(usize),

    #[error("blob carries an unsupported compression scheme")]
    UnsupportedCompression,

    #[error("extract requires unknown feature: {0}")]
    UnknownRequiredFeature(String),

    #[error("relation {relation} member has unrecognized kind {kind}")]
    UnknownMemberKind { relation: i64, kind: i32 },
}
