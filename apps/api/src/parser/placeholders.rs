//! Sections the heuristic pipeline recognises but does not extract yet.
//! Each always yields an empty list; a real implementation replaces the
//! body of `extract` without changing the pipeline.

use crate::models::resume::{Certification, Language, Project};
use crate::parser::{ExtractionReport, ParseContext, SectionExtractor};

pub struct CertificationsExtractor;

pub struct ProjectsExtractor;

pub struct LanguagesExtractor;

impl SectionExtractor for CertificationsExtractor {
    type Output = Vec<Certification>;

    fn extract(&self, _ctx: &ParseContext<'_>, _report: &mut ExtractionReport) -> Self::Output {
        Vec::new()
    }
}

impl SectionExtractor for ProjectsExtractor {
    type Output = Vec<Project>;

    fn extract(&self, _ctx: &ParseContext<'_>, _report: &mut ExtractionReport) -> Self::Output {
        Vec::new()
    }
}

impl SectionExtractor for LanguagesExtractor {
    type Output = Vec<Language>;

    fn extract(&self, _ctx: &ParseContext<'_>, _report: &mut ExtractionReport) -> Self::Output {
        Vec::new()
    }
}
