//! Parsed resume entities
//!
//! Plain serializable records. Every entity is produced once by the
//! extractor and immutable afterwards; quality and parsing problems live on
//! the record as data, never as errors.

use crate::detect::ResumeFormat;
use crate::ontology::SkillCategory;
use crate::processing::SectionKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    /// Captured on Indian-format resumes only.
    pub fathers_name: Option<String>,
}

impl Contact {
    /// Populated count over the four quality-bearing fields.
    pub fn populated_fields(&self) -> u8 {
        [
            self.name.is_some(),
            self.email.is_some(),
            self.phone.is_some(),
            self.location.is_some(),
        ]
        .iter()
        .filter(|p| **p)
        .count() as u8
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub degree: Option<String>,
    pub institution: Option<String>,
    pub graduation_year: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub title: Option<String>,
    pub company: Option<String>,
    /// The date range exactly as written.
    pub date_range: Option<String>,
    /// Computed from the range; zero when the range is absent or inverted.
    pub duration_months: u32,
    pub responsibilities: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub description: String,
}

/// Skills partitioned by category. Canonical names, sorted and distinct
/// within each category; the categories are disjoint by canonical name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillSet {
    pub by_category: BTreeMap<SkillCategory, Vec<String>>,
}

impl SkillSet {
    pub fn insert(&mut self, canonical: String, category: SkillCategory) {
        let bucket = self.by_category.entry(category).or_default();
        if let Err(pos) = bucket.binary_search(&canonical) {
            bucket.insert(pos, canonical);
        }
    }

    pub fn distinct_count(&self) -> usize {
        self.by_category.values().map(|v| v.len()).sum()
    }

    pub fn contains(&self, canonical: &str) -> bool {
        self.by_category.values().any(|v| {
            v.binary_search_by(|name| name.as_str().cmp(canonical)).is_ok()
        })
    }

    /// All canonical names across categories, sorted.
    pub fn all(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .by_category
            .values()
            .flatten()
            .map(|s| s.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}

/// Per-section extraction quality, each in [0, 100]. `None` marks a section
/// that was not present at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionQuality {
    pub contact: Option<u8>,
    pub education: Option<u8>,
    pub experience: Option<u8>,
    pub skills: Option<u8>,
}

impl ExtractionQuality {
    /// Arithmetic mean of present subfield qualities.
    pub fn overall(&self) -> u8 {
        let present: Vec<u8> = [self.contact, self.education, self.experience, self.skills]
            .iter()
            .flatten()
            .copied()
            .collect();
        if present.is_empty() {
            return 0;
        }
        let sum: u32 = present.iter().map(|&q| q as u32).sum();
        (sum / present.len() as u32) as u8
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedResume {
    pub contact: Contact,
    pub education: Vec<Education>,
    pub experience: Vec<Experience>,
    pub skills: SkillSet,
    pub projects: Vec<Project>,
    pub certifications: Vec<String>,
    pub quality: ExtractionQuality,
    /// Section headers in the order they appear in the document.
    pub section_order: Vec<SectionKind>,
    /// Normalized token stream of the whole document, kept for keyword
    /// scoring downstream.
    pub tokens: Vec<String>,
    pub format: ResumeFormat,
    pub warnings: Vec<String>,
    pub failed_sections: Vec<String>,
}

impl ParsedResume {
    pub fn total_experience_months(&self) -> u32 {
        self.experience.iter().map(|e| e.duration_months).sum()
    }

    /// Combined experience and project prose, scanned for quantified
    /// achievements by the ATS scorer.
    pub fn achievement_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        for exp in &self.experience {
            for line in &exp.responsibilities {
                parts.push(line);
            }
        }
        for project in &self.projects {
            parts.push(&project.description);
        }
        parts.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_set_dedupes_within_category() {
        let mut skills = SkillSet::default();
        skills.insert("React".into(), SkillCategory::Frameworks);
        skills.insert("React".into(), SkillCategory::Frameworks);
        skills.insert("Vue".into(), SkillCategory::Frameworks);

        assert_eq!(skills.distinct_count(), 2);
        assert!(skills.contains("React"));
        assert!(!skills.contains("Angular"));
    }

    #[test]
    fn test_quality_mean_over_present_sections() {
        let quality = ExtractionQuality {
            contact: Some(100),
            education: Some(90),
            experience: None,
            skills: Some(50),
        };
        assert_eq!(quality.overall(), 80);

        assert_eq!(ExtractionQuality::default().overall(), 0);
    }

    #[test]
    fn test_contact_populated_count() {
        let contact = Contact {
            name: Some("Jane".into()),
            email: Some("jane@example.com".into()),
            ..Default::default()
        };
        assert_eq!(contact.populated_fields(), 2);
    }
}
