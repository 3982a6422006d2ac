use crate::models::resume::ExperienceEntry;
use crate::parser::sections::SectionKind;
use crate::parser::tables::Heuristics;
use crate::parser::{ExtractionReport, ParseContext, SectionExtractor};

/// Characters left dangling at the edges of a company name once the dates are cut out.
pub(crate) const SEPARATOR_DEBRIS: &[char] = &[',', '|', '-', '–', '—', '@', ' '];

/// Classification of one non-blank line inside the experience section.
#[derive(Debug, PartialEq, Eq)]
enum LineKind {
    Title,
    CompanyDates,
    Description,
    Noise,
}

#[derive(Default)]
struct PendingEntry {
    title: String,
    company: String,
    duration: String,
    description: Vec<String>,
}

pub struct ExperienceExtractor<'h> {
    heuristics: &'h Heuristics,
}

impl<'h> ExperienceExtractor<'h> {
    pub fn new(heuristics: &'h Heuristics) -> Self {
        Self { heuristics }
    }

    fn classify(&self, line: &str) -> LineKind {
        let t = &self.heuristics.tables;
        let lower = line.to_lowercase();
        let len = line.chars().count();

        if len < t.job_title_max_len && t.job_title_keywords.iter().any(|k| lower.contains(k.as_str())) {
            LineKind::Title
        } else if self.heuristics.year.is_match(line)
            || self.heuristics.month_token.is_match(line)
            || lower.split(|c: char| !c.is_alphanumeric()).any(|w| w == "present")
        {
            LineKind::CompanyDates
        } else if len > t.description_min_len {
            LineKind::Description
        } else {
            LineKind::Noise
        }
    }

    /// Splits a company/dates line with the first date-range pattern that matches.
    /// Without a match the whole line is the company and the duration is empty.
    pub fn split_company_and_dates(&self, line: &str) -> (String, String) {
        for re in &self.heuristics.date_ranges {
            if let Some(m) = re.find(line) {
                let duration = m.as_str().trim().to_string();
                let company = format!("{} {}", &line[..m.start()], &line[m.end()..]);
                let company = company.split_whitespace().collect::<Vec<_>>().join(" ");
                return (company.trim_matches(SEPARATOR_DEBRIS).to_string(), duration);
            }
        }
        (line.trim().to_string(), String::new())
    }

    /// Parses the body lines of an experience section, top to bottom.
    /// Returns the complete entries and how many incomplete ones were dropped.
    pub fn parse_entries(&self, lines: &[&str]) -> (Vec<ExperienceEntry>, usize) {
        let mut entries: Vec<ExperienceEntry> = Vec::new();
        let mut dropped = 0;
        let mut current = PendingEntry::default();

        let mut flush = |pending: PendingEntry, entries: &mut Vec<ExperienceEntry>| {
            if pending.title.is_empty() && pending.company.is_empty() {
                return;
            }
            if pending.title.is_empty() || pending.company.is_empty() {
                dropped += 1;
                return;
            }
            entries.push(ExperienceEntry {
                id: format!("exp-{}", entries.len() + 1),
                title: pending.title,
                company: pending.company,
                duration: pending.duration,
                description: pending.description.join(" ").trim().to_string(),
            });
        };

        for line in lines.iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
            match self.classify(line) {
                LineKind::Title => {
                    flush(std::mem::take(&mut current), &mut entries);
                    current.title = line.to_string();
                }
                LineKind::CompanyDates => {
                    let (company, duration) = self.split_company_and_dates(line);
                    current.company = company;
                    current.duration = duration;
                }
                LineKind::Description => current.description.push(line.to_string()),
                LineKind::Noise => {}
            }
        }
        flush(current, &mut entries);

        (entries, dropped)
    }
}

impl SectionExtractor for ExperienceExtractor<'_> {
    type Output = Vec<ExperienceEntry>;

    fn extract(&self, ctx: &ParseContext<'_>, report: &mut ExtractionReport) -> Self::Output {
        let (entries, dropped) = self.parse_entries(ctx.section_lines(SectionKind::Experience));
        report.dropped_experience_entries += dropped;
        entries
    }
}
