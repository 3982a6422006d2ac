use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::decode::{docx, BinaryFormat, DecodeError, DocumentDecoder};

/// In-process decoder: `pdf-extract` for PDF, `zip` + `quick-xml` for DOCX.
/// Decoding is CPU-bound and runs inside `spawn_blocking`.
#[derive(Debug, Clone, Default)]
pub struct LocalDecoder;

fn decode_blocking(format: BinaryFormat, data: &[u8]) -> Result<String, DecodeError> {
    match format {
        BinaryFormat::Pdf => pdf_extract::extract_text_from_mem(data)
            .map_err(|e| DecodeError::Malformed(format!("Failed to parse PDF: {e}"))),
        BinaryFormat::Docx => docx::extract_text(data),
    }
}

#[async_trait]
impl DocumentDecoder for LocalDecoder {
    async fn decode(&self, format: BinaryFormat, data: Bytes) -> Result<String, DecodeError> {
        debug!(?format, bytes = data.len(), "decoding locally");
        // pdf-extract panics on some malformed files; a panicked task is a bad document.
        tokio::task::spawn_blocking(move || decode_blocking(format, &data))
            .await
            .map_err(|e| DecodeError::Malformed(format!("Decoder crashed: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_garbage_pdf_is_malformed() {
        let err = LocalDecoder
            .decode(BinaryFormat::Pdf, Bytes::from_static(b"definitely not a pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, DecodeError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_docx_round_trip_through_trait() {
        let bytes = docx::tests::build_docx(&["Jane Doe", "Skills"]);
        let text = LocalDecoder
            .decode(BinaryFormat::Docx, Bytes::from(bytes))
            .await
            .unwrap();
        assert_eq!(text.trim_end(), "Jane Doe\nSkills");
    }
}
