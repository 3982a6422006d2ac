// Heuristic resume parser.
// Pipeline: normalize → locate sections → per-section extractors → assemble.
// Pure and synchronous; every input yields a fully shaped record.

pub mod education;
pub mod experience;
pub mod normalize;
pub mod personal;
pub mod placeholders;
pub mod sections;
pub mod skills;
pub mod tables;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::resume::ParsedResumeRecord;
use crate::parser::education::EducationExtractor;
use crate::parser::experience::ExperienceExtractor;
use crate::parser::normalize::{normalize, NormalizedText};
use crate::parser::personal::PersonalInfoExtractor;
use crate::parser::placeholders::{
    CertificationsExtractor, LanguagesExtractor, ProjectsExtractor,
};
use crate::parser::sections::{locate_section, SectionKind, SectionSpan};
use crate::parser::skills::SkillsExtractor;
use crate::parser::tables::{HeuristicTables, Heuristics, TableError};

/// Diagnostics gathered while parsing. Travels next to the record, never inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionReport {
    pub character_count: usize,
    pub low_confidence: bool,
    pub sections_found: Vec<SectionKind>,
    pub dropped_experience_entries: usize,
    pub dropped_education_entries: usize,
}

/// A normalized document split into lines, with its sections located once.
pub struct ParseContext<'a> {
    pub text: &'a NormalizedText,
    pub lines: Vec<&'a str>,
    spans: BTreeMap<SectionKind, SectionSpan>,
}

impl<'a> ParseContext<'a> {
    pub fn new(text: &'a NormalizedText, tables: &HeuristicTables) -> Self {
        let lines = text.lines();
        let rules = [
            (SectionKind::Summary, &tables.sections.summary),
            (SectionKind::Experience, &tables.sections.experience),
            (SectionKind::Education, &tables.sections.education),
            (SectionKind::Skills, &tables.sections.skills),
        ];

        let mut spans = BTreeMap::new();
        for (kind, rule) in rules {
            if let Some(span) = locate_section(&lines, kind, rule, tables.header_max_len) {
                debug!(
                    ?kind,
                    start = span.start,
                    end = span.end,
                    empty = span.is_empty(),
                    "section located"
                );
                spans.insert(kind, span);
            }
        }

        Self { text, lines, spans }
    }

    /// Body lines of a section; empty when the section was not found.
    pub fn section_lines(&self, kind: SectionKind) -> &[&'a str] {
        match self.spans.get(&kind) {
            Some(span) => span.body(&self.lines),
            None => &[],
        }
    }

    pub fn sections_found(&self) -> Vec<SectionKind> {
        self.spans.keys().copied().collect()
    }
}

/// One extractor per part of the record. Extractors never fail: a pattern
/// that does not match yields an empty value.
pub trait SectionExtractor {
    type Output;

    fn extract(&self, ctx: &ParseContext<'_>, report: &mut ExtractionReport) -> Self::Output;
}

/// Compiled heuristic parser. Cheap to share behind `Arc`; holds no mutable state.
#[derive(Debug, Clone)]
pub struct ResumeParser {
    heuristics: Heuristics,
}

impl ResumeParser {
    pub fn new(tables: HeuristicTables) -> Result<Self, TableError> {
        Ok(Self {
            heuristics: Heuristics::compile(tables)?,
        })
    }

    /// Parses raw extracted text. `low_confidence_chars` sets the length under
    /// which the report is flagged low-confidence.
    pub fn parse(
        &self,
        raw_text: &str,
        low_confidence_chars: usize,
    ) -> (ParsedResumeRecord, ExtractionReport) {
        let text = normalize(raw_text);
        if text.is_empty() {
            debug!("nothing left after normalization");
        }
        let ctx = ParseContext::new(&text, &self.heuristics.tables);

        let mut report = ExtractionReport {
            character_count: text.char_count(),
            low_confidence: text.char_count() < low_confidence_chars,
            sections_found: ctx.sections_found(),
            ..Default::default()
        };

        let record = self.assemble(&ctx, &mut report);

        if report.dropped_experience_entries > 0 || report.dropped_education_entries > 0 {
            warn!(
                experience = report.dropped_experience_entries,
                education = report.dropped_education_entries,
                "incomplete entries dropped"
            );
        }

        (record, report)
    }

    fn assemble(&self, ctx: &ParseContext<'_>, report: &mut ExtractionReport) -> ParsedResumeRecord {
        let h = &self.heuristics;
        ParsedResumeRecord {
            personal_info: PersonalInfoExtractor::new(h).extract(ctx, report),
            experience: ExperienceExtractor::new(h).extract(ctx, report),
            education: EducationExtractor::new(h).extract(ctx, report),
            skills: SkillsExtractor::new(h).extract(ctx, report),
            certifications: CertificationsExtractor.extract(ctx, report),
            projects: ProjectsExtractor.extract(ctx, report),
            languages: LanguagesExtractor.extract(ctx, report),
        }
    }
}

#[cfg(test)]
impl Default for ResumeParser {
    fn default() -> Self {
        Self::new(HeuristicTables::default()).expect("built-in heuristic tables must compile")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO_A: &str =
        "Jane Doe\njane.doe@example.com\n(415) 555-2671\nSan Francisco, CA\n\nSKILLS\nPython, SQL, Excel\n";

    const FULL_RESUME: &str = "\
RESUME
John Smith
john.smith@mail.io | +1 212.555.0199 | Brooklyn, NY 11201
linkedin.com/in/john-smith-42
https://johnsmith.dev

Professional Summary
Backend developer focused on reliable systems.
Enjoys teaching.

Work Experience
Senior Software Engineer
Globex Inc, Jan 2020 - Present
Designed the billing pipeline handling 2M invoices a month.

Software Developer
Initech 2016 - 2019
Maintained legacy reporting services.

Education
Bachelor of Science in Computer Science
State University 2015

Skills
Rust • Go • PostgreSQL, Kubernetes
";

    #[test]
    fn test_scenario_a_personal_info_and_skills() {
        let parser = ResumeParser::default();
        let (record, report) = parser.parse(SCENARIO_A, 50);

        let p = &record.personal_info;
        assert_eq!(p.full_name, "Jane Doe");
        assert_eq!(p.email, "jane.doe@example.com");
        assert_eq!(p.phone, "(415) 555-2671");
        assert_eq!(p.location, "San Francisco, CA");
        assert_eq!(record.skills, vec!["Python", "SQL", "Excel"]);
        assert_eq!(report.sections_found, vec![SectionKind::Skills]);
        assert!(!report.low_confidence);
    }

    #[test]
    fn test_full_resume() {
        let parser = ResumeParser::default();
        let (record, report) = parser.parse(FULL_RESUME, 50);

        let p = &record.personal_info;
        assert_eq!(p.full_name, "John Smith");
        assert_eq!(p.email, "john.smith@mail.io");
        assert_eq!(p.phone, "+1 212.555.0199");
        assert_eq!(p.location, "Brooklyn, NY 11201");
        assert_eq!(p.linkedin, "linkedin.com/in/john-smith-42");
        assert_eq!(p.website, "https://johnsmith.dev");
        assert_eq!(
            p.summary,
            "Backend developer focused on reliable systems. Enjoys teaching."
        );

        assert_eq!(record.experience.len(), 2);
        assert_eq!(record.experience[0].id, "exp-1");
        assert_eq!(record.experience[0].title, "Senior Software Engineer");
        assert_eq!(record.experience[0].company, "Globex Inc");
        assert_eq!(record.experience[0].duration, "Jan 2020 - Present");
        assert!(record.experience[0].description.contains("billing pipeline"));
        assert_eq!(record.experience[1].id, "exp-2");
        assert_eq!(record.experience[1].company, "Initech");
        assert_eq!(record.experience[1].duration, "2016 - 2019");

        assert_eq!(record.education.len(), 1);
        assert_eq!(record.education[0].school, "State University");
        assert_eq!(record.education[0].year, "2015");

        assert_eq!(record.skills, vec!["Rust", "Go", "PostgreSQL", "Kubernetes"]);
        assert_eq!(
            report.sections_found,
            vec![
                SectionKind::Summary,
                SectionKind::Experience,
                SectionKind::Education,
                SectionKind::Skills
            ]
        );
        assert_eq!(report.dropped_experience_entries, 0);
    }

    #[test]
    fn test_empty_input_yields_fully_shaped_record() {
        let parser = ResumeParser::default();
        let (record, report) = parser.parse("", 50);
        assert_eq!(record, ParsedResumeRecord::default());
        assert!(report.low_confidence);
        assert!(report.sections_found.is_empty());
    }

    #[test]
    fn test_parse_is_deterministic() {
        let parser = ResumeParser::default();
        let a = serde_json::to_string(&parser.parse(FULL_RESUME, 50).0).unwrap();
        let b = serde_json::to_string(&parser.parse(FULL_RESUME, 50).0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_placeholder_sections_always_empty() {
        let parser = ResumeParser::default();
        let text = "Certifications\nAWS Solutions Architect 2021\nProjects\nTimetable solver\nLanguages\nSpanish";
        let (record, _) = parser.parse(text, 50);
        assert!(record.certifications.is_empty());
        assert!(record.projects.is_empty());
        assert!(record.languages.is_empty());
    }

    #[test]
    fn test_short_text_flagged_low_confidence() {
        let parser = ResumeParser::default();
        let (_, report) = parser.parse("Jane Doe", 50);
        assert!(report.low_confidence);
        assert_eq!(report.character_count, 8);
    }

    #[test]
    fn test_invalid_table_pattern_rejected() {
        let tables = HeuristicTables {
            date_range_patterns: vec!["(unclosed".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            ResumeParser::new(tables),
            Err(TableError::Pattern { .. })
        ));
    }
}
