//! Heuristic tables: every keyword list and date pattern the parser relies on.
//!
//! Kept as data so accuracy can be tuned without touching control flow. The
//! `Default` impl carries the built-in tables; `HeuristicTables::load` reads a
//! JSON override where any omitted field falls back to its default.

use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Failed to read heuristics file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid heuristics JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// How to find one section: what opens it, what closes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionRule {
    /// Lowercase keywords; a short line containing any of them opens the section.
    pub headers: Vec<String>,
    /// Lowercase keywords of the sections that may follow this one.
    pub terminators: Vec<String>,
    /// Whether a blank line ends the section.
    pub stop_at_blank: bool,
    /// Length of the section when no end boundary is found. `None` = document end.
    pub fallback_line_cap: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionRules {
    pub summary: SectionRule,
    pub experience: SectionRule,
    pub education: SectionRule,
    pub skills: SectionRule,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicTables {
    pub sections: SectionRules,
    /// Header and terminator lines must be shorter than this (in characters).
    pub header_max_len: usize,
    /// Whole-word titles that are never a person's name.
    pub document_headers: Vec<String>,
    pub job_title_keywords: Vec<String>,
    /// Title lines must be shorter than this.
    pub job_title_max_len: usize,
    pub degree_keywords: Vec<String>,
    /// Tried in order against a company/dates line; first match wins.
    pub date_range_patterns: Vec<String>,
    /// Experience/education lines must be longer than this to count as description.
    pub description_min_len: usize,
    pub skill_delimiters: Vec<char>,
    /// Skill tokens must be strictly longer than `skill_min_len`
    /// and strictly shorter than `skill_max_len`.
    pub skill_min_len: usize,
    pub skill_max_len: usize,
    pub max_skills: usize,
}

const MONTH: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\b\.?";
const YEAR: &str = r"(?:19|20)\d{2}";
const DASH: &str = r"\s*[-–—]\s*";

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for SectionRules {
    fn default() -> Self {
        Self {
            summary: SectionRule {
                headers: words(&[
                    "summary",
                    "professional summary",
                    "profile",
                    "objective",
                    "career objective",
                    "about",
                    "overview",
                    "bio",
                    "biography",
                ]),
                terminators: words(&[
                    "experience",
                    "employment",
                    "work history",
                    "education",
                    "skills",
                    "certifications",
                    "projects",
                    "achievements",
                    "accomplishments",
                ]),
                stop_at_blank: true,
                fallback_line_cap: Some(5),
            },
            experience: SectionRule {
                headers: words(&[
                    "experience",
                    "employment",
                    "work history",
                    "professional experience",
                    "career history",
                    "work experience",
                    "employment history",
                ]),
                terminators: words(&["education", "skills", "certifications", "projects"]),
                stop_at_blank: false,
                fallback_line_cap: None,
            },
            education: SectionRule {
                headers: words(&["education", "academic background", "qualifications"]),
                terminators: words(&["skills", "certifications", "projects", "experience"]),
                stop_at_blank: false,
                fallback_line_cap: None,
            },
            skills: SectionRule {
                headers: words(&[
                    "skills",
                    "technical skills",
                    "core competencies",
                    "technologies",
                    "expertise",
                ]),
                terminators: words(&[
                    "certifications",
                    "projects",
                    "education",
                    "experience",
                    "languages",
                ]),
                stop_at_blank: false,
                fallback_line_cap: None,
            },
        }
    }
}

impl Default for HeuristicTables {
    fn default() -> Self {
        Self {
            sections: SectionRules::default(),
            header_max_len: 50,
            document_headers: words(&["resume", "résumé", "cv", "curriculum vitae"]),
            job_title_keywords: words(&[
                "engineer",
                "developer",
                "manager",
                "analyst",
                "specialist",
                "coordinator",
                "director",
                "lead",
                "senior",
                "junior",
                "associate",
                "assistant",
                "consultant",
            ]),
            job_title_max_len: 100,
            degree_keywords: words(&[
                "bachelor",
                "master",
                "phd",
                "doctorate",
                "associate",
                "certificate",
                "diploma",
            ]),
            date_range_patterns: vec![
                // Year-first ranges take a directly preceding month along with them.
                format!(r"(?i)\b(?:{MONTH}\s+)?{YEAR}{DASH}{YEAR}\b"),
                format!(r"(?i)\b(?:{MONTH}\s+)?{YEAR}{DASH}present\b"),
                format!(r"(?i)\b{MONTH}\s+{YEAR}{DASH}{MONTH}\s+{YEAR}\b"),
                format!(r"(?i)\b{MONTH}\s+{YEAR}{DASH}present\b"),
            ],
            description_min_len: 10,
            skill_delimiters: vec![',', '•', '·', '\n'],
            skill_min_len: 1,
            skill_max_len: 50,
            max_skills: 20,
        }
    }
}

impl HeuristicTables {
    /// Reads a JSON override file. Fields missing from the file keep their defaults.
    pub fn load(path: &Path) -> Result<Self, TableError> {
        let raw = std::fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Pattern that recognises a month token on its own, used to classify
/// company/dates lines.
pub(crate) fn month_token_pattern() -> String {
    format!(r"(?i)\b{MONTH}")
}

/// Pattern that recognises a plausible four-digit year.
pub(crate) fn year_pattern() -> String {
    format!(r"\b{YEAR}\b")
}

/// Tables plus their compiled patterns, built once at startup and shared.
#[derive(Debug, Clone)]
pub struct Heuristics {
    pub tables: HeuristicTables,
    pub date_ranges: Vec<Regex>,
    pub month_token: Regex,
    pub year: Regex,
    pub document_header: Regex,
}

fn compile(pattern: &str) -> Result<Regex, TableError> {
    Regex::new(pattern).map_err(|source| TableError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

impl Heuristics {
    pub fn compile(tables: HeuristicTables) -> Result<Self, TableError> {
        let date_ranges = tables
            .date_range_patterns
            .iter()
            .map(|p| compile(p))
            .collect::<Result<Vec<_>, _>>()?;

        let headers = tables
            .document_headers
            .iter()
            .map(|h| regex::escape(h))
            .collect::<Vec<_>>()
            .join("|");
        // An empty table must match nothing, not everything.
        let document_header = if headers.is_empty() {
            compile(r"[^\s\S]")?
        } else {
            compile(&format!(r"(?i)(?:^|[^\w])(?:{headers})(?:$|[^\w])"))?
        };

        Ok(Self {
            date_ranges,
            month_token: compile(&month_token_pattern())?,
            year: compile(&year_pattern())?,
            document_header,
            tables,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_date_patterns_compile() {
        for p in HeuristicTables::default().date_range_patterns {
            assert!(Regex::new(&p).is_ok(), "pattern failed to compile: {p}");
        }
    }

    #[test]
    fn test_default_date_patterns_order() {
        let tables = HeuristicTables::default();
        let res: Vec<Regex> = tables
            .date_range_patterns
            .iter()
            .map(|p| Regex::new(p).unwrap())
            .collect();
        assert!(res[0].is_match("2019 - 2022"));
        assert!(res[1].is_match("2019 – Present"));
        assert!(res[2].is_match("Jan 2019 - Mar 2022"));
        assert!(res[2].is_match("January 2019 — March 2022"));
        assert!(res[3].is_match("Sept. 2020 - present"));
        assert!(!res[0].is_match("2019 - Present"));
        assert_eq!(
            res[1].find("Globex, Jan 2020 - Present").unwrap().as_str(),
            "Jan 2020 - Present"
        );
    }

    #[test]
    fn test_month_pattern_ignores_embedded_words() {
        let re = Regex::new(&month_token_pattern()).unwrap();
        assert!(re.is_match("Started Jan 2020"));
        assert!(re.is_match("DECEMBER"));
        assert!(!re.is_match("Decreased costs"));
        assert!(!re.is_match("Summary of marketing"));
    }

    #[test]
    fn test_load_partial_override_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "max_skills": 5, "skill_delimiters": [",", ";"] }}"#).unwrap();

        let tables = HeuristicTables::load(file.path()).unwrap();
        assert_eq!(tables.max_skills, 5);
        assert_eq!(tables.skill_delimiters, vec![',', ';']);
        assert_eq!(tables.header_max_len, 50);
        assert_eq!(tables.sections, SectionRules::default());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = HeuristicTables::load(Path::new("/nonexistent/heuristics.json")).unwrap_err();
        assert!(matches!(err, TableError::Io { .. }));
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = HeuristicTables::load(file.path()).unwrap_err();
        assert!(matches!(err, TableError::Json(_)));
    }
}
