use crate::models::resume::EducationEntry;
use crate::parser::experience::SEPARATOR_DEBRIS;
use crate::parser::sections::SectionKind;
use crate::parser::tables::Heuristics;
use crate::parser::{ExtractionReport, ParseContext, SectionExtractor};

#[derive(Default)]
struct PendingDegree {
    degree: String,
    school: String,
    year: String,
    description: Vec<String>,
}

pub struct EducationExtractor<'h> {
    heuristics: &'h Heuristics,
}

impl<'h> EducationExtractor<'h> {
    pub fn new(heuristics: &'h Heuristics) -> Self {
        Self { heuristics }
    }

    fn is_degree_line(&self, line: &str) -> bool {
        let lower = line.to_lowercase();
        self.heuristics
            .tables
            .degree_keywords
            .iter()
            .any(|k| lower.contains(k.as_str()))
    }

    /// Parses the body lines of an education section into degree/school/year triples.
    /// Returns the complete entries and how many incomplete ones were dropped.
    pub fn parse_entries(&self, lines: &[&str]) -> (Vec<EducationEntry>, usize) {
        let year_re = &self.heuristics.year;
        let min_desc = self.heuristics.tables.description_min_len;

        let mut entries: Vec<EducationEntry> = Vec::new();
        let mut dropped = 0;
        let mut current = PendingDegree::default();

        let mut flush = |pending: PendingDegree, entries: &mut Vec<EducationEntry>| {
            if pending.degree.is_empty() && pending.school.is_empty() {
                return;
            }
            if pending.degree.is_empty() || pending.school.is_empty() {
                dropped += 1;
                return;
            }
            entries.push(EducationEntry {
                id: format!("edu-{}", entries.len() + 1),
                degree: pending.degree,
                school: pending.school,
                year: pending.year,
                description: pending.description.join(" "),
            });
        };

        for line in lines.iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
            if self.is_degree_line(line) {
                flush(std::mem::take(&mut current), &mut entries);
                current.degree = line.to_string();
            } else if let Some(m) = year_re.find(line) {
                if current.year.is_empty() {
                    current.year = m.as_str().to_string();
                }
                if current.school.is_empty() {
                    let rest = year_re.replace_all(line, "");
                    let rest = rest.split_whitespace().collect::<Vec<_>>().join(" ");
                    current.school = rest.trim_matches(SEPARATOR_DEBRIS).to_string();
                }
            } else if current.school.is_empty() {
                current.school = line.to_string();
            } else if line.chars().count() > min_desc {
                current.description.push(line.to_string());
            }
        }
        flush(current, &mut entries);

        (entries, dropped)
    }
}

impl SectionExtractor for EducationExtractor<'_> {
    type Output = Vec<EducationEntry>;

    fn extract(&self, ctx: &ParseContext<'_>, report: &mut ExtractionReport) -> Self::Output {
        let (entries, dropped) = self.parse_entries(ctx.section_lines(SectionKind::Education));
        report.dropped_education_entries += dropped;
        entries
    }
}
