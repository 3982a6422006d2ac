//! Binary document decoding: PDF and DOCX bytes in, plain text out.
//!
//! The import pipeline only sees the `DocumentDecoder` trait, carried as
//! `Arc<dyn DocumentDecoder>` in `AppState`. `LocalDecoder` runs the format
//! libraries in-process; `RemoteDecoder` hands the bytes to an HTTP service.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub mod docx;
pub mod local;
pub mod remote;

pub use local::LocalDecoder;
pub use remote::RemoteDecoder;

/// Upper bound on decompressed document content and on decoded text received
/// from a remote service. Uploads are capped compressed; this caps what they
/// may expand to.
pub const MAX_EXPANDED_BYTES: usize = 64 * 1024 * 1024;

/// Formats that need a real decoder. Plain text never reaches one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryFormat {
    Pdf,
    Docx,
}

impl BinaryFormat {
    pub fn mime(&self) -> &'static str {
        match self {
            BinaryFormat::Pdf => "application/pdf",
            BinaryFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    /// The bytes could not be decoded: malformed, encrypted, or the wrong format.
    #[error("{0}")]
    Malformed(String),

    /// The decoder itself could not be reached or gave up.
    #[error("{0}")]
    Unavailable(String),
}

#[async_trait]
pub trait DocumentDecoder: Send + Sync {
    async fn decode(&self, format: BinaryFormat, data: Bytes) -> Result<String, DecodeError>;
}
