//! Contact details and summary.
//!
//! Patterns run over the whole document; the first hit wins. Phone matching is
//! North-American only (3-3-4 grouping, optional `+1`).

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::resume::PersonalInfo;
use crate::parser::sections::SectionKind;
use crate::parser::tables::Heuristics;
use crate::parser::{ExtractionReport, ParseContext, SectionExtractor};

lazy_static! {
    static ref RE_EMAIL: Regex =
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap();

    static ref RE_PHONE: Regex =
        Regex::new(r"(?:\+?1[-.\s]?)?\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}").unwrap();

    /// `City, ST` with an optional ZIP. City words are letters joined by a single
    /// space, apostrophe or hyphen, so neighbouring tokens and separators stay out.
    static ref RE_LOCATION: Regex =
        Regex::new(r"\b[A-Za-z]+(?:[ '-][A-Za-z]+)*,[ \t]*[A-Z]{2}\b(?:[ \t]+\d{5})?").unwrap();

    static ref RE_LINKEDIN: Regex = Regex::new(
        r"(?i)(?:https?://)?(?:www\.)?linkedin\.com/(?:in/|profile/view\?id=)[A-Za-z0-9_-]+"
    )
    .unwrap();

    static ref RE_URL: Regex =
        Regex::new(r"(?:https?://)?(?:www\.)?[A-Za-z0-9-]+(?:\.[A-Za-z]{2,})+(?:/\S*)?").unwrap();
}

pub struct PersonalInfoExtractor<'h> {
    heuristics: &'h Heuristics,
}

impl<'h> PersonalInfoExtractor<'h> {
    pub fn new(heuristics: &'h Heuristics) -> Self {
        Self { heuristics }
    }

    fn is_contact_info(line: &str) -> bool {
        RE_EMAIL.is_match(line)
            || RE_PHONE.is_match(line)
            || RE_LINKEDIN.is_match(line)
            || line.contains("http://")
            || line.contains("https://")
            || line.contains("www.")
    }

    fn full_name(&self, lines: &[&str]) -> String {
        lines
            .iter()
            .map(|l| l.trim())
            .find(|l| {
                !l.is_empty()
                    && !Self::is_contact_info(l)
                    && !self.heuristics.document_header.is_match(l)
            })
            .unwrap_or_default()
            .to_string()
    }
}

fn first_match(re: &Regex, text: &str) -> String {
    re.find(text)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Endings that mark a bare `word.ext` token as a technology or file name
/// ("Node.js", "ASP.NET", "setup.py") rather than a site.
const NON_SITE_SUFFIXES: &[&str] = &[
    "js", "ts", "jsx", "tsx", "py", "rb", "rs", "go", "java", "net", "php", "sh", "md",
    "txt", "pdf", "doc", "docx", "json", "yaml", "yml", "xml", "html", "css", "exe",
];

/// First URL-shaped token that is not LinkedIn, not a `mailto:` link, and not
/// part of an email address. A token with a scheme or `www.` wins over a bare
/// domain; bare domains ending in a known file/tech suffix are skipped.
fn website(text: &str) -> String {
    let candidates: Vec<&str> = RE_URL
        .find_iter(text)
        .filter(|m| {
            let before = text[..m.start()].chars().next_back();
            let after = text[m.end()..].chars().next();
            let url = m.as_str().to_lowercase();
            before != Some('@')
                && after != Some('@')
                && !url.contains("linkedin.com")
                && !url.starts_with("mailto")
        })
        .map(|m| m.as_str())
        .collect();

    let explicit = candidates.iter().find(|url| {
        let lower = url.to_lowercase();
        lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("www.")
    });

    explicit
        .or_else(|| candidates.iter().find(|url| !has_non_site_suffix(url)))
        .map(|url| url.to_string())
        .unwrap_or_default()
}

fn has_non_site_suffix(url: &str) -> bool {
    let host = url.split('/').next().unwrap_or(url);
    host.rsplit('.')
        .next()
        .map(|tld| NON_SITE_SUFFIXES.contains(&tld.to_lowercase().as_str()))
        .unwrap_or(false)
}

impl SectionExtractor for PersonalInfoExtractor<'_> {
    type Output = PersonalInfo;

    fn extract(&self, ctx: &ParseContext<'_>, _report: &mut ExtractionReport) -> PersonalInfo {
        let text = ctx.text.as_str();

        PersonalInfo {
            full_name: self.full_name(&ctx.lines),
            email: first_match(&RE_EMAIL, text),
            phone: first_match(&RE_PHONE, text),
            location: first_match(&RE_LOCATION, text),
            linkedin: first_match(&RE_LINKEDIN, text),
            website: website(text),
            summary: ctx.section_lines(SectionKind::Summary).join(" ").trim().to_string(),
        }
    }
}
