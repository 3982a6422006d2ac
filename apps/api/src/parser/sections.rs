use serde::{Deserialize, Serialize};

use crate::parser::tables::SectionRule;

/// Resume sections the parser knows about, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Summary,
    Experience,
    Education,
    Skills,
    Certifications,
    Projects,
    Languages,
}

/// Half-open line range `[start, end)` holding a section's body.
/// `start` is the line after the header, so the header is never part of the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSpan {
    pub kind: SectionKind,
    pub start: usize,
    pub end: usize,
}

impl SectionSpan {
    pub fn body<'l, 'a>(&self, lines: &'l [&'a str]) -> &'l [&'a str] {
        &lines[self.start..self.end]
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

fn is_short(line: &str, max_len: usize) -> bool {
    line.chars().count() < max_len
}

fn contains_any(line_lower: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| line_lower.contains(k.as_str()))
}

/// Finds the first section of `kind` in `lines`.
///
/// The header is the first line shorter than `header_max_len` containing one
/// of the rule's header keywords (case-insensitive substring). The body ends
/// at the first later line that is blank (when the rule says so) or is a short
/// line naming one of the terminator sections. Without an end boundary the
/// body runs to `fallback_line_cap` lines, or to the document end.
pub fn locate_section(
    lines: &[&str],
    kind: SectionKind,
    rule: &SectionRule,
    header_max_len: usize,
) -> Option<SectionSpan> {
    let header_idx = lines.iter().position(|line| {
        let lower = line.trim().to_lowercase();
        is_short(&lower, header_max_len) && contains_any(&lower, &rule.headers)
    })?;
    let start = header_idx + 1;

    let boundary = lines[start..].iter().position(|line| {
        let lower = line.trim().to_lowercase();
        (rule.stop_at_blank && lower.is_empty())
            || (is_short(&lower, header_max_len) && contains_any(&lower, &rule.terminators))
    });

    let end = match (boundary, rule.fallback_line_cap) {
        (Some(offset), _) => start + offset,
        (None, Some(cap)) => (start + cap).min(lines.len()),
        (None, None) => lines.len(),
    };

    Some(SectionSpan { kind, start, end })
}
