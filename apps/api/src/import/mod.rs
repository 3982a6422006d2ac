// Resume import pipeline.
// Raw upload → text extraction (decoder capability) → heuristic parser → record + report.
// Extraction failures are fatal; parsing never fails.

pub mod error;
pub mod extractor;
pub mod media;

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::models::resume::ParsedResumeRecord;
use crate::parser::{ExtractionReport, ResumeParser};

pub use error::ImportError;
pub use extractor::{ExtractedText, ExtractorLimits, TextExtractor};
pub use media::RawDocument;

/// Result of a successful import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportOutcome {
    pub resume: ParsedResumeRecord,
    pub report: ExtractionReport,
}

/// Extractor plus parser. Stateless between imports; safe to share across tasks.
#[derive(Clone)]
pub struct Importer {
    extractor: TextExtractor,
    parser: Arc<ResumeParser>,
}

impl Importer {
    pub fn new(extractor: TextExtractor, parser: Arc<ResumeParser>) -> Self {
        Self { extractor, parser }
    }

    /// Extracts text only. The caller is expected to parse it separately.
    pub async fn extract_text(&self, doc: RawDocument) -> Result<ExtractedText, ImportError> {
        let span = import_span(&doc);
        async move {
            info!(file_name = ?doc.file_name, "file received");
            self.extractor.extract(&doc).await
        }
        .instrument(span)
        .await
    }

    /// Full pipeline: extract, then parse.
    pub async fn import(&self, doc: RawDocument) -> Result<ImportOutcome, ImportError> {
        let span = import_span(&doc);
        async move {
            info!(file_name = ?doc.file_name, "file received");
            let extracted = self.extractor.extract(&doc).await?;
            Ok(self.parse_text(&extracted.text))
        }
        .instrument(span)
        .await
    }

    /// Parses text that is already plain. Never fails.
    pub fn parse_text(&self, text: &str) -> ImportOutcome {
        let low_confidence_chars = self.extractor.limits().low_confidence_chars;
        let (resume, report) = self.parser.parse(text, low_confidence_chars);
        info!(
            chars = report.character_count,
            sections = report.sections_found.len(),
            experience = resume.experience.len(),
            education = resume.education.len(),
            skills = resume.skills.len(),
            "resume parsed"
        );
        ImportOutcome { resume, report }
    }
}

fn import_span(doc: &RawDocument) -> tracing::Span {
    info_span!(
        "import",
        import_id = %Uuid::new_v4(),
        media_type = doc.declared_type.as_deref().unwrap_or("unknown"),
        size = doc.data.len()
    )
}
