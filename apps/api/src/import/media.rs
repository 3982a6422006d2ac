use bytes::Bytes;
use serde::Serialize;

use crate::decode::BinaryFormat;
use crate::import::error::ImportError;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MIME_DOC: &str = "application/msword";
pub const MIME_TXT: &str = "text/plain";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Pdf,
    Docx,
    Txt,
}

impl MediaType {
    /// Maps a declared MIME type, ignoring parameters such as `; charset=utf-8`.
    /// Legacy `application/msword` goes to the DOCX decoder.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        match essence.as_str() {
            MIME_PDF => Some(MediaType::Pdf),
            MIME_DOCX | MIME_DOC => Some(MediaType::Docx),
            MIME_TXT => Some(MediaType::Txt),
            _ => None,
        }
    }

    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = name.rsplit_once('.')?.1.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(MediaType::Pdf),
            "docx" | "doc" => Some(MediaType::Docx),
            "txt" => Some(MediaType::Txt),
            _ => None,
        }
    }

    pub fn binary_format(&self) -> Option<BinaryFormat> {
        match self {
            MediaType::Pdf => Some(BinaryFormat::Pdf),
            MediaType::Docx => Some(BinaryFormat::Docx),
            MediaType::Txt => None,
        }
    }
}

/// An uploaded file as received: bytes plus what the client said it was.
/// Consumed once by the text extractor.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub data: Bytes,
    pub declared_type: Option<String>,
    pub file_name: Option<String>,
}

impl RawDocument {
    pub fn new(data: impl Into<Bytes>, declared_type: Option<&str>, file_name: Option<&str>) -> Self {
        Self {
            data: data.into(),
            declared_type: declared_type.map(str::to_string),
            file_name: file_name.map(str::to_string),
        }
    }

    /// Resolves the media type from the declared type. A missing or generic
    /// `application/octet-stream` type falls back to the file extension.
    pub fn media_type(&self) -> Result<MediaType, ImportError> {
        let declared = self.declared_type.as_deref().map(str::trim).unwrap_or("");
        let generic = declared.is_empty() || declared.eq_ignore_ascii_case("application/octet-stream");

        let resolved = if generic {
            self.file_name.as_deref().and_then(MediaType::from_file_name)
        } else {
            MediaType::from_mime(declared)
        };

        resolved.ok_or_else(|| {
            let shown = if declared.is_empty() { "unknown" } else { declared };
            ImportError::UnsupportedFormat(shown.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_mimes() {
        assert_eq!(MediaType::from_mime(MIME_PDF), Some(MediaType::Pdf));
        assert_eq!(MediaType::from_mime(MIME_DOCX), Some(MediaType::Docx));
        assert_eq!(MediaType::from_mime(MIME_DOC), Some(MediaType::Docx));
        assert_eq!(MediaType::from_mime("text/plain; charset=utf-8"), Some(MediaType::Txt));
        assert_eq!(MediaType::from_mime("Application/PDF"), Some(MediaType::Pdf));
    }

    #[test]
    fn test_image_is_unsupported() {
        let doc = RawDocument::new(vec![0u8; 4], Some("image/png"), Some("resume.pdf"));
        match doc.media_type() {
            Err(ImportError::UnsupportedFormat(t)) => assert_eq!(t, "image/png"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_octet_stream_falls_back_to_extension() {
        let doc = RawDocument::new(vec![], Some("application/octet-stream"), Some("CV.DOCX"));
        assert_eq!(doc.media_type().unwrap(), MediaType::Docx);
        let doc = RawDocument::new(vec![], None, Some("notes.txt"));
        assert_eq!(doc.media_type().unwrap(), MediaType::Txt);
    }

    #[test]
    fn test_no_type_and_unknown_extension() {
        let doc = RawDocument::new(vec![], None, Some("photo.jpeg"));
        assert!(matches!(doc.media_type(), Err(ImportError::UnsupportedFormat(t)) if t == "unknown"));
        let doc = RawDocument::new(vec![], None, None);
        assert!(doc.media_type().is_err());
    }
}
