//! Role-weighted composite ATS scoring
//!
//! Every number in the report is derived mechanically from the parsed
//! resume, the job description, and the weight row for the resolved role.
//! Given identical inputs the report is byte-identical.

use super::jd::{self, JobDescription, RoleTag, RoleWeights};
use crate::error::Result;
use crate::extract::ParsedResume;
use crate::ontology::SkillOntology;
use crate::processing::{SectionKind, TextNormalizer};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Distinct canonical skills needed for a full skills component.
const SKILL_SATURATION: usize = 20;
/// Years of experience needed for a full experience component.
const EXPERIENCE_SATURATION_YEARS: f64 = 5.0;
/// Token threshold below which the resume counts as empty.
const EMPTY_TOKEN_THRESHOLD: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub skills: u8,
    pub experience: u8,
    pub education: u8,
    pub structure: u8,
    pub keywords: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Per-term keyword accounting, kept on the report so the total is exactly
/// reproducible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordCredit {
    pub term: String,
    pub jd_frequency: u32,
    pub importance: f64,
    pub resume_occurrences: u32,
    pub credit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsReport {
    /// Total score in [0, 100].
    pub total: u8,
    pub components: ComponentScores,
    /// Achievement bonus in [0, 10].
    pub achievement_bonus: u8,
    /// Ordering penalty in [0, 5].
    pub ordering_penalty: u8,
    pub role: RoleTag,
    pub weights: RoleWeights,
    pub keyword_credits: Vec<KeywordCredit>,
    pub explanation: Explanation,
    pub warnings: Vec<String>,
    pub failed_sections: Vec<String>,
}

pub struct AtsScorer {
    ontology: Arc<SkillOntology>,
    normalizer: TextNormalizer,
    achievement_patterns: Vec<(Regex, u32)>,
}

impl AtsScorer {
    pub fn new(ontology: Arc<SkillOntology>) -> Self {
        let achievement_patterns = vec![
            (
                Regex::new(r"(?i)(\d+)%\s*(increase|improvement|reduction|growth|decrease)")
                    .expect("valid percentage pattern"),
                15,
            ),
            (
                Regex::new(r"(?i)\$\d+(?:,\d{3})*(?:\.\d{2})?\s*(million|billion|k|saved|revenue|budget)")
                    .expect("valid monetary pattern"),
                20,
            ),
            (
                Regex::new(r"(?i)\d+x\s*(faster|improvement|increase|growth)")
                    .expect("valid multiplier pattern"),
                18,
            ),
            (
                Regex::new(r"(?i)(led|managed|built|created|designed|implemented)\s+\d+")
                    .expect("valid quantified action pattern"),
                12,
            ),
            (
                Regex::new(r"(?i)\d+(?:,\d{3})*\s*(users|customers|clients|requests|transactions)")
                    .expect("valid scale pattern"),
                15,
            ),
        ];
        Self {
            ontology,
            normalizer: TextNormalizer::new(),
            achievement_patterns,
        }
    }

    /// Score a parsed resume against a job description.
    ///
    /// An unrecognized `role_hint` fails with a configuration error; every
    /// quality problem short of that lands on the report as a warning.
    pub fn score(
        &self,
        parsed: &ParsedResume,
        jd_text: &str,
        role_hint: Option<&str>,
    ) -> Result<AtsReport> {
        let jd = jd::parse(jd_text, &self.ontology, &self.normalizer);
        let role = match role_hint {
            Some(hint) => RoleTag::from_hint(hint)?,
            None => jd.role,
        };
        let weights = role.weights();

        let mut warnings: Vec<String> = parsed.warnings.clone();
        if parsed.tokens.len() < EMPTY_TOKEN_THRESHOLD
            && !warnings.iter().any(|w| w.contains("empty"))
        {
            warnings.push("resume is empty or too short; components scored zero".to_string());
        }
        if jd.keyword_freq.is_empty() {
            warnings.push("job description is empty; keyword component scored zero".to_string());
        }

        let skills_score = component_skills(parsed);
        let experience_score = component_experience(parsed);
        let education_score = component_education(parsed);
        let structure_score = component_structure(parsed);
        let (keywords_score, keyword_credits) = self.component_keywords(parsed, &jd);

        let components = ComponentScores {
            skills: skills_score,
            experience: experience_score,
            education: education_score,
            structure: structure_score,
            keywords: keywords_score,
        };

        let achievement_bonus = self.achievement_bonus(&parsed.achievement_text());
        let ordering_penalty = ordering_penalty(&parsed.section_order);

        let weighted = components.skills as f64 * weights.skills
            + components.experience as f64 * weights.experience
            + components.education as f64 * weights.education
            + components.structure as f64 * weights.structure
            + components.keywords as f64 * weights.keywords;
        let total = (weighted.round() as i64 + achievement_bonus as i64 - ordering_penalty as i64)
            .clamp(0, 100) as u8;

        let explanation = build_explanation(parsed, &components, &keyword_credits);

        Ok(AtsReport {
            total,
            components,
            achievement_bonus,
            ordering_penalty,
            role,
            weights,
            keyword_credits,
            explanation,
            warnings,
            failed_sections: parsed.failed_sections.clone(),
        })
    }

    /// TF-IDF-style keyword component with diminishing per-occurrence
    /// credit: 1.0, 0.75, 0.50, then a 0.25 floor at the fourth occurrence.
    fn component_keywords(
        &self,
        parsed: &ParsedResume,
        jd: &JobDescription,
    ) -> (u8, Vec<KeywordCredit>) {
        if jd.keyword_freq.is_empty() {
            return (0, Vec::new());
        }

        let mut resume_freq: BTreeMap<&str, u32> = BTreeMap::new();
        for token in &parsed.tokens {
            *resume_freq.entry(token.as_str()).or_insert(0) += 1;
        }

        let mut credits = Vec::new();
        let mut raw = 0.0;
        let mut max_possible = 0.0;

        for (term, &jd_frequency) in &jd.keyword_freq {
            let importance = ((jd_frequency + 1) as f64).log2() * 10.0;
            max_possible += importance;

            let occurrences = resume_freq.get(term.as_str()).copied().unwrap_or(0);
            let credit = occurrence_credit(occurrences);
            raw += credit * importance;

            credits.push(KeywordCredit {
                term: term.clone(),
                jd_frequency,
                importance,
                resume_occurrences: occurrences,
                credit,
            });
        }

        let score = if max_possible > 0.0 {
            ((raw / max_possible) * 100.0).min(100.0).round() as u8
        } else {
            0
        };
        (score, credits)
    }

    /// Achievement detection over the combined experience/projects text:
    /// pattern points are summed, clamped to 100, and rescaled linearly to
    /// the [0, 10] bonus.
    fn achievement_bonus(&self, text: &str) -> u8 {
        let mut points: u32 = 0;
        for (pattern, value) in &self.achievement_patterns {
            points += pattern.find_iter(text).count() as u32 * value;
        }
        ((points.min(100) as f64) / 10.0).round() as u8
    }
}

/// Cumulative credit for n occurrences of a keyword. Marginal credit is
/// non-increasing and zero beyond the fourth occurrence's 0.25 floor.
fn occurrence_credit(occurrences: u32) -> f64 {
    match occurrences {
        0 => 0.0,
        1 => 1.0,
        2 => 1.75,
        3 => 2.25,
        _ => 2.5,
    }
}

fn component_skills(parsed: &ParsedResume) -> u8 {
    let ratio = parsed.skills.distinct_count() as f64 / SKILL_SATURATION as f64;
    (100.0 * ratio.min(1.0)).round() as u8
}

fn component_experience(parsed: &ParsedResume) -> u8 {
    let years = parsed.total_experience_months() as f64 / 12.0;
    (100.0 * (years / EXPERIENCE_SATURATION_YEARS).min(1.0)).round() as u8
}

fn component_education(parsed: &ParsedResume) -> u8 {
    if parsed
        .education
        .iter()
        .any(|e| e.degree.is_some() && e.institution.is_some())
    {
        100
    } else if !parsed.education.is_empty() {
        60
    } else {
        0
    }
}

/// 20 points per present structural element.
fn component_structure(parsed: &ParsedResume) -> u8 {
    let present = [
        parsed.contact.email.is_some(),
        !parsed.experience.is_empty(),
        !parsed.education.is_empty(),
        parsed.skills.distinct_count() > 0,
        !parsed.section_order.is_empty(),
    ];
    present.iter().filter(|p| **p).count() as u8 * 20
}

/// Canonical section order: summary?, experience, education, skills,
/// projects. One point per out-of-order adjacent pair, clamped to 5.
fn ordering_penalty(section_order: &[SectionKind]) -> u8 {
    let canonical: Vec<SectionKind> = section_order
        .iter()
        .copied()
        .filter(|kind| kind.canonical_index() <= 4)
        .collect();
    let inversions = canonical
        .windows(2)
        .filter(|pair| pair[0].canonical_index() > pair[1].canonical_index())
        .count();
    inversions.min(5) as u8
}

/// Mechanical explanation: weaknesses below 60, strengths at 80 and above,
/// suggestions from missing sections and the heaviest unmatched JD terms.
/// Bullets are emitted in a fixed component order so output is byte-stable.
fn build_explanation(
    parsed: &ParsedResume,
    components: &ComponentScores,
    keyword_credits: &[KeywordCredit],
) -> Explanation {
    let mut explanation = Explanation::default();

    let labeled = [
        ("skills", components.skills),
        ("experience", components.experience),
        ("education", components.education),
        ("structure", components.structure),
        ("keywords", components.keywords),
    ];
    for (name, score) in labeled {
        if score >= 80 {
            explanation
                .strengths
                .push(format!("strong {} component ({})", name, score));
        } else if score < 60 {
            explanation
                .weaknesses
                .push(format!("weak {} component ({})", name, score));
        }
    }

    if parsed.contact.email.is_none() {
        explanation
            .suggestions
            .push("add a contact email address".to_string());
    }
    for (kind, present) in [
        (SectionKind::Experience, !parsed.experience.is_empty()),
        (SectionKind::Education, !parsed.education.is_empty()),
        (SectionKind::Skills, parsed.skills.distinct_count() > 0),
    ] {
        if !present {
            explanation
                .suggestions
                .push(format!("add a {} section", kind.name()));
        }
    }

    // Top unmatched JD terms by importance, ties by term, capped at five.
    let mut unmatched: Vec<&KeywordCredit> = keyword_credits
        .iter()
        .filter(|c| c.resume_occurrences == 0)
        .collect();
    unmatched.sort_by(|a, b| {
        b.importance
            .partial_cmp(&a.importance)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.term.cmp(&b.term))
    });
    for credit in unmatched.into_iter().take(5) {
        explanation
            .suggestions
            .push(format!("mention '{}' from the job description", credit.term));
    }

    explanation
}
