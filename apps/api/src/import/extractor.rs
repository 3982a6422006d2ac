use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::decode::{DecodeError, DocumentDecoder};
use crate::import::error::ImportError;
use crate::import::media::RawDocument;

const UTF8_BOM: char = '\u{feff}';

/// Limits applied to every extraction.
#[derive(Debug, Clone, Copy)]
pub struct ExtractorLimits {
    pub max_bytes: usize,
    pub decode_timeout: Duration,
    pub low_confidence_chars: usize,
}

/// Plain text pulled out of an uploaded file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedText {
    pub text: String,
    pub character_count: usize,
    pub low_confidence: bool,
}

/// Turns a `RawDocument` into plain text. TXT is decoded here; PDF and DOCX
/// go through the injected `DocumentDecoder` under a timeout.
#[derive(Clone)]
pub struct TextExtractor {
    decoder: Arc<dyn DocumentDecoder>,
    limits: ExtractorLimits,
}

impl TextExtractor {
    pub fn new(decoder: Arc<dyn DocumentDecoder>, limits: ExtractorLimits) -> Self {
        Self { decoder, limits }
    }

    pub fn limits(&self) -> &ExtractorLimits {
        &self.limits
    }

    pub async fn extract(&self, doc: &RawDocument) -> Result<ExtractedText, ImportError> {
        let size = doc.data.len();
        if size > self.limits.max_bytes {
            return Err(ImportError::FileTooLarge {
                size,
                limit: self.limits.max_bytes,
            });
        }

        let media_type = doc.media_type()?;

        let text = match media_type.binary_format() {
            None => decode_plain_text(&doc.data),
            Some(format) => {
                let decode = self.decoder.decode(format, doc.data.clone());
                match tokio::time::timeout(self.limits.decode_timeout, decode).await {
                    Ok(Ok(text)) => text,
                    Ok(Err(DecodeError::Malformed(msg))) => {
                        error!(?media_type, "document could not be decoded: {msg}");
                        return Err(ImportError::CorruptDocument(msg));
                    }
                    Ok(Err(DecodeError::Unavailable(msg))) => {
                        error!(?media_type, "decoder unavailable: {msg}");
                        return Err(ImportError::ServiceUnavailable(msg));
                    }
                    Err(_) => {
                        error!(
                            ?media_type,
                            timeout_secs = self.limits.decode_timeout.as_secs(),
                            "decode timed out"
                        );
                        return Err(ImportError::ServiceUnavailable(
                            "Document processing timed out".to_string(),
                        ));
                    }
                }
            }
        };

        let trimmed_chars = text.trim().chars().count();
        if trimmed_chars == 0 {
            return Err(ImportError::EmptyContent);
        }

        let low_confidence = trimmed_chars < self.limits.low_confidence_chars;
        if low_confidence {
            warn!(
                chars = trimmed_chars,
                threshold = self.limits.low_confidence_chars,
                "very little text extracted, the document may be image-based"
            );
        }
        info!(chars = trimmed_chars, "text extracted");

        Ok(ExtractedText {
            character_count: text.chars().count(),
            text,
            low_confidence,
        })
    }
}

/// UTF-8 with invalid sequences replaced; a leading BOM is dropped.
fn decode_plain_text(data: &[u8]) -> String {
    let text = String::from_utf8_lossy(data);
    text.strip_prefix(UTF8_BOM).unwrap_or(text.as_ref()).to_string()
}
