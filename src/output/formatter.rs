//! Formatters for the four report kinds

use crate::config::OutputFormat;
use crate::error::Result;
use crate::extract::ParsedResume;
use crate::scoring::{AnswerEvaluation, AtsReport, SkillMatchReport, SkillVerdict};
use colored::{ColoredString, Colorize};

pub struct Formatter {
    format: OutputFormat,
    use_colors: bool,
    detailed: bool,
}

impl Formatter {
    pub fn new(format: OutputFormat, use_colors: bool, detailed: bool) -> Self {
        if !use_colors {
            colored::control::set_override(false);
        }
        Self {
            format,
            use_colors,
            detailed,
        }
    }

    pub fn format_extraction(&self, parsed: &ParsedResume) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(parsed)?),
            OutputFormat::Console => Ok(self.extraction_console(parsed)),
        }
    }

    pub fn format_ats(&self, report: &AtsReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Console => Ok(self.ats_console(report)),
        }
    }

    pub fn format_skill_match(&self, report: &SkillMatchReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Console => Ok(self.skill_match_console(report)),
        }
    }

    pub fn format_evaluation(&self, evaluation: &AnswerEvaluation) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(evaluation)?),
            OutputFormat::Console => Ok(self.evaluation_console(evaluation)),
        }
    }

    fn score(&self, value: u8) -> ColoredString {
        let text = value.to_string();
        if !self.use_colors {
            return text.normal();
        }
        if value >= 80 {
            text.green().bold()
        } else if value >= 60 {
            text.yellow().bold()
        } else {
            text.red().bold()
        }
    }

    fn extraction_console(&self, parsed: &ParsedResume) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}\n", "Resume Extraction".bold()));
        out.push_str(&format!(
            "Format: {} (confidence {})\n",
            parsed.format.kind.name(),
            parsed.format.confidence
        ));
        out.push_str(&format!(
            "Overall quality: {}\n\n",
            self.score(parsed.quality.overall())
        ));

        if let Some(name) = &parsed.contact.name {
            out.push_str(&format!("Name: {}\n", name));
        }
        if let Some(email) = &parsed.contact.email {
            out.push_str(&format!("Email: {}\n", email));
        }
        if let Some(phone) = &parsed.contact.phone {
            out.push_str(&format!("Phone: {}\n", phone));
        }
        if let Some(location) = &parsed.contact.location {
            out.push_str(&format!("Location: {}\n", location));
        }

        out.push_str(&format!(
            "\nExperience entries: {} ({} months total)\n",
            parsed.experience.len(),
            parsed.total_experience_months()
        ));
        for exp in &parsed.experience {
            out.push_str(&format!(
                "  - {} at {} ({} months)\n",
                exp.title.as_deref().unwrap_or("?"),
                exp.company.as_deref().unwrap_or("?"),
                exp.duration_months
            ));
            if self.detailed {
                for line in &exp.responsibilities {
                    out.push_str(&format!("      {}\n", line));
                }
            }
        }

        out.push_str(&format!("\nEducation entries: {}\n", parsed.education.len()));
        for edu in &parsed.education {
            out.push_str(&format!(
                "  - {} | {} | {}\n",
                edu.degree.as_deref().unwrap_or("?"),
                edu.institution.as_deref().unwrap_or("?"),
                edu.graduation_year
                    .map(|y| y.to_string())
                    .unwrap_or_else(|| "?".to_string())
            ));
        }

        out.push_str(&format!(
            "\nSkills ({} distinct):\n",
            parsed.skills.distinct_count()
        ));
        for (category, names) in &parsed.skills.by_category {
            out.push_str(&format!("  {}: {}\n", category.name(), names.join(", ")));
        }

        push_warnings(&mut out, &parsed.warnings, &parsed.failed_sections);
        out
    }

    fn ats_console(&self, report: &AtsReport) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}\n", "ATS Score".bold()));
        out.push_str(&format!(
            "Total: {} (role: {})\n\n",
            self.score(report.total),
            report.role.name()
        ));

        out.push_str("Components:\n");
        for (name, value, weight) in [
            ("skills", report.components.skills, report.weights.skills),
            (
                "experience",
                report.components.experience,
                report.weights.experience,
            ),
            (
                "education",
                report.components.education,
                report.weights.education,
            ),
            (
                "structure",
                report.components.structure,
                report.weights.structure,
            ),
            (
                "keywords",
                report.components.keywords,
                report.weights.keywords,
            ),
        ] {
            out.push_str(&format!(
                "  {:<10} {:>3} x {:.2}\n",
                name,
                self.score(value),
                weight
            ));
        }
        out.push_str(&format!(
            "Achievement bonus: +{}  Ordering penalty: -{}\n",
            report.achievement_bonus, report.ordering_penalty
        ));

        if !report.explanation.strengths.is_empty() {
            out.push_str(&format!("\n{}\n", "Strengths".green()));
            for s in &report.explanation.strengths {
                out.push_str(&format!("  - {}\n", s));
            }
        }
        if !report.explanation.weaknesses.is_empty() {
            out.push_str(&format!("\n{}\n", "Weaknesses".red()));
            for w in &report.explanation.weaknesses {
                out.push_str(&format!("  - {}\n", w));
            }
        }
        if !report.explanation.suggestions.is_empty() {
            out.push_str(&format!("\n{}\n", "Suggestions".yellow()));
            for s in &report.explanation.suggestions {
                out.push_str(&format!("  - {}\n", s));
            }
        }

        if self.detailed && !report.keyword_credits.is_empty() {
            out.push_str("\nKeyword credits:\n");
            for credit in &report.keyword_credits {
                out.push_str(&format!(
                    "  {:<20} jd:{:<3} resume:{:<3} credit:{:.2} importance:{:.1}\n",
                    credit.term,
                    credit.jd_frequency,
                    credit.resume_occurrences,
                    credit.credit,
                    credit.importance
                ));
            }
        }

        push_warnings(&mut out, &report.warnings, &report.failed_sections);
        out
    }

    fn skill_match_console(&self, report: &SkillMatchReport) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}\n", "Skill Match".bold()));
        out.push_str(&format!("Score: {}\n\n", self.score(report.score)));

        for m in &report.matches {
            let marker = if m.required { "required" } else { "preferred" };
            let verdict = match &m.verdict {
                SkillVerdict::Exact => "exact".to_string(),
                SkillVerdict::Synonym { canonical } => format!("synonym of {}", canonical),
                SkillVerdict::Transferable { via, coefficient } => {
                    format!("transferable via {} ({:.2})", via, coefficient)
                }
                SkillVerdict::Missing => "missing".to_string(),
            };
            out.push_str(&format!(
                "  {:<20} [{}] {} (credit {:.2})\n",
                m.canonical, marker, verdict, m.credit
            ));
        }

        if !report.learning_paths.is_empty() {
            out.push_str(&format!("\n{}\n", "Learning paths".yellow()));
            for path in &report.learning_paths {
                out.push_str(&format!("  - {}\n", path));
            }
        }

        push_warnings(&mut out, &report.warnings, &[]);
        out
    }

    fn evaluation_console(&self, evaluation: &AnswerEvaluation) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}\n", "Answer Evaluation".bold()));
        out.push_str(&format!(
            "Turn score: {} ({})\n\n",
            self.score(evaluation.turn_score),
            evaluation.interview_type.name()
        ));

        for (name, value) in [
            ("clarity", evaluation.clarity),
            ("accuracy", evaluation.accuracy),
            ("depth", evaluation.depth),
            ("structure", evaluation.structure),
            ("relevance", evaluation.relevance),
        ] {
            out.push_str(&format!("  {:<10} {:>3}\n", name, self.score(value)));
        }

        if !evaluation.covered_points.is_empty() {
            out.push_str(&format!(
                "\nCovered: {}\n",
                evaluation.covered_points.join(", ")
            ));
        }
        if !evaluation.missed_points.is_empty() {
            out.push_str(&format!(
                "Missed: {}\n",
                evaluation.missed_points.join(", ")
            ));
        }
        if evaluation.needs_follow_up {
            out.push_str(&format!(
                "\n{}: {}\n",
                "Follow-up needed".yellow(),
                evaluation
                    .follow_up_reason
                    .as_deref()
                    .unwrap_or("unspecified")
            ));
        }
        for note in &evaluation.notes {
            out.push_str(&format!("Note: {}\n", note));
        }
        out
    }
}

fn push_warnings(out: &mut String, warnings: &[String], failed_sections: &[String]) {
    if !warnings.is_empty() {
        out.push_str(&format!("\n{}\n", "Warnings".yellow()));
        for w in warnings {
            out.push_str(&format!("  - {}\n", w));
        }
    }
    if !failed_sections.is_empty() {
        out.push_str(&format!(
            "Failed sections: {}\n",
            failed_sections.join(", ")
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;

    const RESUME: &str = "Jane Smith\n\
        jane.smith@example.com\n\
        +1 (555) 123-4567\n\
        Austin, Texas\n\
        \n\
        Summary\n\
        Senior engineer with a track record of shipping web products.\n\
        \n\
        Experience\n\
        Senior Software Engineer at Acme Corp\n\
        Jan 2020 - Jan 2024\n\
        - Built React dashboards used by 40,000 users\n\
        \n\
        Education\n\
        B.S. Computer Science, State University, 2016\n\
        \n\
        Skills\n\
        React, Node.js, PostgreSQL, AWS\n";

    fn parsed() -> ParsedResume {
        Engine::new().extract_from_text(RESUME, &[])
    }

    #[test]
    fn test_json_output_is_valid() {
        let formatter = Formatter::new(OutputFormat::Json, false, false);
        let rendered = formatter.format_extraction(&parsed()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert!(value.get("contact").is_some());
    }

    #[test]
    fn test_console_output_mentions_scores() {
        let engine = Engine::new();
        let report = engine
            .ats_score(&parsed(), "Senior Software Engineer with React and AWS", None)
            .unwrap();
        let formatter = Formatter::new(OutputFormat::Console, false, true);
        let rendered = formatter.format_ats(&report).unwrap();
        assert!(rendered.contains("ATS Score"));
        assert!(rendered.contains("skills"));
        assert!(rendered.contains("Achievement bonus"));
    }
}
