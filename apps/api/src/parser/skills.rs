use crate::parser::sections::SectionKind;
use crate::parser::tables::Heuristics;
use crate::parser::{ExtractionReport, ParseContext, SectionExtractor};

pub struct SkillsExtractor<'h> {
    heuristics: &'h Heuristics,
}

impl<'h> SkillsExtractor<'h> {
    pub fn new(heuristics: &'h Heuristics) -> Self {
        Self { heuristics }
    }

    /// Splits the section body on the delimiter table, keeping tokens of a
    /// sensible length in source order. Duplicates are kept.
    pub fn split_skills(&self, lines: &[&str]) -> Vec<String> {
        let t = &self.heuristics.tables;
        lines
            .join("\n")
            .split(|c: char| t.skill_delimiters.contains(&c))
            .map(str::trim)
            .filter(|s| {
                let len = s.chars().count();
                len > t.skill_min_len && len < t.skill_max_len
            })
            .take(t.max_skills)
            .map(String::from)
            .collect()
    }
}

impl SectionExtractor for SkillsExtractor<'_> {
    type Output = Vec<String>;

    fn extract(&self, ctx: &ParseContext<'_>, _report: &mut ExtractionReport) -> Vec<String> {
        self.split_skills(ctx.section_lines(SectionKind::Skills))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::tables::HeuristicTables;

    fn split(lines: &[&str]) -> Vec<String> {
        let h = Heuristics::compile(HeuristicTables::default()).unwrap();
        SkillsExtractor::new(&h).split_skills(lines)
    }

    #[test]
    fn test_comma_separated() {
        assert_eq!(split(&["Python, SQL, Excel"]), vec!["Python", "SQL", "Excel"]);
    }

    #[test]
    fn test_bullets_and_newlines() {
        assert_eq!(
            split(&["• Rust · Go", "Docker", "Terraform"]),
            vec!["Rust", "Go", "Docker", "Terraform"]
        );
    }

    #[test]
    fn test_length_bounds() {
        let long = "x".repeat(50);
        let lines = ["C, R, Go", long.as_str()];
        assert_eq!(split(&lines), vec!["Go"]);
    }

    #[test]
    fn test_capped_at_twenty_in_order() {
        let line = (1..=30).map(|i| format!("skill{i}")).collect::<Vec<_>>().join(", ");
        let skills = split(&[line.as_str()]);
        assert_eq!(skills.len(), 20);
        assert_eq!(skills[0], "skill1");
        assert_eq!(skills[19], "skill20");
    }

    #[test]
    fn test_duplicates_kept() {
        assert_eq!(split(&["SQL, SQL"]), vec!["SQL", "SQL"]);
    }

    #[test]
    fn test_empty_section() {
        assert!(split(&[]).is_empty());
    }
}
