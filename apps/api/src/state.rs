use std::sync::Arc;

use crate::config::Config;
use crate::decode::DocumentDecoder;
use crate::import::{ExtractorLimits, Importer, TextExtractor};
use crate::parser::ResumeParser;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Extractor and compiled heuristic parser, shared by every request.
    pub importer: Importer,
}

impl AppState {
    /// Wires the decoder capability and parser into the import pipeline.
    /// Default decoder: `LocalDecoder`. `RemoteDecoder` when `DECODER_URL` is set.
    pub fn new(config: Config, parser: ResumeParser, decoder: Arc<dyn DocumentDecoder>) -> Self {
        let limits = ExtractorLimits {
            max_bytes: config.max_upload_bytes,
            decode_timeout: config.decoder_timeout,
            low_confidence_chars: config.low_confidence_chars,
        };
        let importer = Importer::new(TextExtractor::new(decoder, limits), Arc::new(parser));

        Self { config, importer }
    }
}
