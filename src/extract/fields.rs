//! Field-level extraction heuristics shared by every format strategy

use super::resume::{Contact, Education, Experience, Project, SkillSet};
use crate::ontology::SkillOntology;
use chrono::{Datelike, NaiveDate};
use regex::Regex;

pub struct FieldExtractors {
    email: Regex,
    phone_candidate: Regex,
    linkedin: Regex,
    github: Regex,
    location_line: Regex,
    degree: Regex,
    institution: Regex,
    year: Regex,
    date_range: Regex,
    month_year: Regex,
}

impl Default for FieldExtractors {
    fn default() -> Self {
        Self::new()
    }
}

const MONTHS: &str = "jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec";

impl FieldExtractors {
    pub fn new() -> Self {
        let month_year = format!(r"(?:{})[a-z]*\.?\s+\d{{4}}", MONTHS);
        let date_range = format!(
            r"(?i)\b({my}|\d{{4}})\s*(?:-|–|—|to)\s*({my}|\d{{4}}|present|current)\b",
            my = month_year
        );

        Self {
            email: Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}")
                .expect("Invalid email regex"),
            // Spaces but not newlines inside the candidate, so year ranges on
            // adjacent lines never glue into a fake phone number.
            phone_candidate: Regex::new(r"[+(]?\d[\d \t().-]{7,}\d")
                .expect("Invalid phone regex"),
            linkedin: Regex::new(r"(?i)linkedin\.com/in/([A-Za-z0-9_-]+)")
                .expect("Invalid linkedin regex"),
            github: Regex::new(r"(?i)github\.com/([A-Za-z0-9_-]+)")
                .expect("Invalid github regex"),
            location_line: Regex::new(r"(?i)^(?:location|address)\s*:\s*(.+)$|^([A-Z][A-Za-z .]+,\s*[A-Za-z][A-Za-z .]{1,30})$")
                .expect("Invalid location regex"),
            degree: Regex::new(r"(?i)\b(bachelor(?:'?s)?|master(?:'?s)?|ph\.?d|doctorate|mba|b\.?tech|m\.?tech|b\.?sc?|m\.?sc?|b\.?e\.?|m\.?e\.?|b\.?a\.?|m\.?a\.?|b\.?s\.?|m\.?s\.?)\b")
                .expect("Invalid degree regex"),
            institution: Regex::new(r"(?i)\b(university|college|institute|school|academy|polytechnic|iit|nit)\b")
                .expect("Invalid institution regex"),
            year: Regex::new(r"\b(19|20)\d{2}\b").expect("Invalid year regex"),
            date_range: Regex::new(&date_range).expect("Invalid date range regex"),
            month_year: Regex::new(&format!(r"(?i)({})[a-z]*\.?\s+(\d{{4}})", MONTHS))
                .expect("Invalid month-year regex"),
        }
    }

    /// Contact extraction over the full line view. The name is the first
    /// non-blank line unless it parses as an email or phone number.
    pub fn extract_contact(&self, lines: &[String]) -> Contact {
        let mut contact = Contact::default();
        let text = lines.join("\n");

        if let Some(m) = self.email.find(&text) {
            contact.email = Some(m.as_str().to_string());
        }
        contact.phone = self.find_phone(&text);
        if let Some(cap) = self.linkedin.captures(&text) {
            contact.linkedin = cap.get(1).map(|m| m.as_str().to_string());
        }
        if let Some(cap) = self.github.captures(&text) {
            contact.github = cap.get(1).map(|m| m.as_str().to_string());
        }

        if let Some(first) = lines.iter().find(|l| !l.is_empty()) {
            if !self.email.is_match(first) && self.find_phone(first).is_none() {
                contact.name = Some(first.clone());
            }
        }

        // Location: an early short "City, Region" line or an explicit label.
        for line in lines.iter().take(8) {
            if Some(line) == contact.name.as_ref() {
                continue;
            }
            if line.chars().any(|c| c.is_ascii_digit()) || line.contains('@') {
                continue;
            }
            if let Some(cap) = self.location_line.captures(line) {
                let value = cap
                    .get(1)
                    .or_else(|| cap.get(2))
                    .map(|m| m.as_str().trim().to_string());
                if value.is_some() {
                    contact.location = value;
                    break;
                }
            }
        }

        contact
    }

    fn find_phone(&self, text: &str) -> Option<String> {
        for m in self.phone_candidate.find_iter(text) {
            let digits = m.as_str().chars().filter(|c| c.is_ascii_digit()).count();
            // 9 to 13 digits separates phone numbers from years and ranges.
            if (9..=13).contains(&digits) {
                return Some(m.as_str().trim().to_string());
            }
        }
        None
    }

    /// Partition the education slice into entries keyed by degree keywords.
    pub fn extract_education(&self, slice: &str) -> Vec<Education> {
        let mut entries = Vec::new();
        let lines: Vec<&str> = slice.lines().collect();

        for (idx, line) in lines.iter().enumerate() {
            let Some(degree_match) = self.degree.find(line) else {
                continue;
            };

            let degree_text = line[degree_match.start()..]
                .split(&[',', '|', '('][..])
                .next()
                .unwrap_or("")
                .trim()
                .to_string();

            // Institution on the same line, else the next line.
            let institution = if self.institution.is_match(line) {
                Some(self.institution_phrase(line))
            } else {
                lines
                    .get(idx + 1)
                    .filter(|next| self.institution.is_match(next))
                    .map(|next| self.institution_phrase(next))
            };

            let graduation_year = self
                .year
                .find(line)
                .or_else(|| lines.get(idx + 1).and_then(|next| self.year.find(next)))
                .and_then(|m| m.as_str().parse::<i32>().ok());

            entries.push(Education {
                degree: Some(degree_text),
                institution,
                graduation_year,
            });
        }
        entries
    }

    fn institution_phrase(&self, line: &str) -> String {
        // The comma-separated segment holding the institution keyword.
        line.split(&[',', '|'][..])
            .find(|segment| self.institution.is_match(segment))
            .unwrap_or(line)
            .trim()
            .trim_start_matches('-')
            .trim()
            .to_string()
    }

    /// Scan experience slice lines for title / company / date-range triples.
    /// Bullet-prefixed lines under an entry accrue as responsibilities.
    pub fn extract_experience(&self, slice: &str, clock: NaiveDate) -> Vec<Experience> {
        let mut entries: Vec<Experience> = Vec::new();
        let lines: Vec<&str> = slice.lines().collect();

        for (idx, line) in lines.iter().enumerate() {
            if is_bullet(line) {
                if let Some(entry) = entries.last_mut() {
                    entry.responsibilities.push(strip_bullet(line));
                }
                continue;
            }
            let Some(range) = self.date_range.captures(line) else {
                continue;
            };

            let full = range.get(0).unwrap();
            let duration_months =
                self.range_duration_months(&range[1], &range[2], clock);

            // Title and company come from the rest of this line, or from the
            // preceding non-bullet line when the date stands alone.
            let mut remainder = format!(
                "{} {}",
                line[..full.start()].trim(),
                line[full.end()..].trim()
            );
            remainder = remainder
                .trim()
                .trim_matches(&['|', ',', '-', '–', '(', ')'][..])
                .trim()
                .to_string();
            if remainder.is_empty() && idx > 0 {
                let prev = lines[idx - 1].trim();
                if !prev.is_empty() && !is_bullet(prev) && !self.date_range.is_match(prev) {
                    remainder = prev.to_string();
                }
            }

            let (title, company) = split_title_company(&remainder);

            entries.push(Experience {
                title,
                company,
                date_range: Some(full.as_str().to_string()),
                duration_months,
                responsibilities: Vec::new(),
            });
        }
        entries
    }

    /// Duration of a normalized range in whole months, never negative.
    /// Year-only endpoints resolve to January; "present" and "current"
    /// resolve to the normalization clock.
    fn range_duration_months(&self, start: &str, end: &str, clock: NaiveDate) -> u32 {
        let start_idx = match self.month_index(start, clock) {
            Some(v) => v,
            None => return 0,
        };
        let end_idx = match self.month_index(end, clock) {
            Some(v) => v,
            None => return 0,
        };
        end_idx.saturating_sub(start_idx)
    }

    /// Absolute month index (year * 12 + month) of a range endpoint.
    fn month_index(&self, endpoint: &str, clock: NaiveDate) -> Option<u32> {
        let lower = endpoint.trim().to_lowercase();
        if lower == "present" || lower == "current" {
            return Some(clock.year() as u32 * 12 + clock.month() - 1);
        }
        if let Some(cap) = self.month_year.captures(&lower) {
            let month = month_number(&cap[1])?;
            let year: u32 = cap[2].parse().ok()?;
            return Some(year * 12 + month - 1);
        }
        let year: u32 = lower.parse().ok()?;
        Some(year * 12)
    }

    /// Ontology scan over the skills slice (or the whole text when no slice
    /// was found), partitioned by category.
    pub fn extract_skills(&self, text: &str, ontology: &SkillOntology) -> SkillSet {
        let mut skills = SkillSet::default();
        for (canonical, category) in ontology.scan(text) {
            skills.insert(canonical, category);
        }
        skills
    }

    /// Projects: one entry per top-level line, description accrued from its
    /// bullet lines.
    pub fn extract_projects(&self, slice: &str) -> Vec<Project> {
        let mut projects: Vec<Project> = Vec::new();
        for line in slice.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if is_bullet(trimmed) {
                if let Some(project) = projects.last_mut() {
                    if !project.description.is_empty() {
                        project.description.push('\n');
                    }
                    project.description.push_str(&strip_bullet(trimmed));
                }
                continue;
            }
            let (name, description) = match trimmed.split_once(&[':', '-', '–'][..]) {
                Some((n, d)) => (n.trim().to_string(), d.trim().to_string()),
                None => (trimmed.to_string(), String::new()),
            };
            projects.push(Project { name, description });
        }
        projects
    }

    pub fn extract_certifications(&self, slice: &str) -> Vec<String> {
        slice
            .lines()
            .map(|line| strip_bullet(line.trim()))
            .filter(|line| !line.is_empty())
            .collect()
    }
}

fn is_bullet(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with(['-', '•', '*', '●', '▪', '◦', '‣'])
}

fn strip_bullet(line: &str) -> String {
    line.trim_start()
        .trim_start_matches(['-', '•', '*', '●', '▪', '◦', '‣'])
        .trim()
        .to_string()
}

fn split_title_company(remainder: &str) -> (Option<String>, Option<String>) {
    if remainder.is_empty() {
        return (None, None);
    }
    for separator in [" at ", " @ ", " | ", " — ", " – ", " - ", ", "] {
        if let Some((title, company)) = remainder.split_once(separator) {
            let title = title.trim();
            let company = company.trim();
            if !title.is_empty() && !company.is_empty() {
                return (Some(title.to_string()), Some(company.to_string()));
            }
        }
    }
    (Some(remainder.to_string()), None)
}

fn month_number(abbrev: &str) -> Option<u32> {
    let idx = MONTHS.split('|').position(|m| m == &abbrev[..3])?;
    Some(idx as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractors() -> FieldExtractors {
        FieldExtractors::new()
    }

    fn clock() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_contact_extraction() {
        let lines: Vec<String> = vec![
            "Jane Smith".into(),
            "Austin, Texas".into(),
            "jane.smith@example.com | +1 (555) 123-4567".into(),
            "linkedin.com/in/janesmith | github.com/janes".into(),
        ];
        let contact = extractors().extract_contact(&lines);

        assert_eq!(contact.name.as_deref(), Some("Jane Smith"));
        assert_eq!(contact.email.as_deref(), Some("jane.smith@example.com"));
        assert!(contact.phone.is_some());
        assert_eq!(contact.location.as_deref(), Some("Austin, Texas"));
        assert_eq!(contact.linkedin.as_deref(), Some("janesmith"));
        assert_eq!(contact.github.as_deref(), Some("janes"));
        assert_eq!(contact.populated_fields(), 4);
    }

    #[test]
    fn test_name_skipped_when_first_line_is_email() {
        let lines: Vec<String> = vec!["jane@example.com".into(), "Engineer".into()];
        let contact = extractors().extract_contact(&lines);
        assert!(contact.name.is_none());
    }

    #[test]
    fn test_education_entry_with_degree_and_institution() {
        let slice = "B.S. Computer Science, State University, 2016\nMBA\nHarvard Business School, 2020";
        let entries = extractors().extract_education(slice);

        assert_eq!(entries.len(), 2);
        assert!(entries[0].degree.as_deref().unwrap().starts_with("B.S."));
        assert_eq!(entries[0].institution.as_deref(), Some("State University"));
        assert_eq!(entries[0].graduation_year, Some(2016));
        assert_eq!(
            entries[1].institution.as_deref(),
            Some("Harvard Business School")
        );
        assert_eq!(entries[1].graduation_year, Some(2020));
    }

    #[test]
    fn test_experience_with_month_ranges() {
        let slice = "Software Engineer at Acme Corp | Jan 2020 - Mar 2022\n- Built the billing system\n- Led a team of 4 engineers";
        let entries = extractors().extract_experience(slice, clock());

        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.title.as_deref(), Some("Software Engineer"));
        assert_eq!(entry.company.as_deref(), Some("Acme Corp"));
        assert_eq!(entry.duration_months, 26);
        assert_eq!(entry.responsibilities.len(), 2);
    }

    #[test]
    fn test_present_resolves_to_clock() {
        let slice = "Senior Engineer at Example Inc | Jun 2023 - Present";
        let entries = extractors().extract_experience(slice, clock());
        assert_eq!(entries[0].duration_months, 12);
    }

    #[test]
    fn test_year_only_range() {
        let slice = "Developer at Shop | 2018 - 2021";
        let entries = extractors().extract_experience(slice, clock());
        assert_eq!(entries[0].duration_months, 36);
    }

    #[test]
    fn test_inverted_range_clamps_to_zero() {
        let slice = "Developer at Shop | 2021 - 2018";
        let entries = extractors().extract_experience(slice, clock());
        assert_eq!(entries[0].duration_months, 0);
    }

    #[test]
    fn test_title_from_preceding_line() {
        let slice = "Data Analyst, Data Co\n2019 - 2020";
        let entries = extractors().extract_experience(slice, clock());
        assert_eq!(entries[0].title.as_deref(), Some("Data Analyst"));
        assert_eq!(entries[0].company.as_deref(), Some("Data Co"));
    }

    #[test]
    fn test_projects() {
        let slice = "Inventory Tracker: warehouse dashboard\n- Cut stockouts by 30%\nSide Scroller";
        let projects = extractors().extract_projects(slice);

        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].name, "Inventory Tracker");
        assert!(projects[0].description.contains("warehouse dashboard"));
        assert!(projects[0].description.contains("stockouts"));
        assert_eq!(projects[1].name, "Side Scroller");
    }
}
