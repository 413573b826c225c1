//! Job description parsing and role-weight tables

use crate::error::{PrepScoreError, Result};
use crate::ontology::SkillOntology;
use crate::processing::TextNormalizer;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Role tags selecting a row of the ATS weight matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoleTag {
    Software,
    DataScience,
    ProductMgmt,
    Frontend,
    Backend,
    Devops,
    Design,
    Generic,
}

/// Component weights for one role. Every row sums to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoleWeights {
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
    pub structure: f64,
    pub keywords: f64,
}

impl RoleTag {
    pub const ALL: [RoleTag; 8] = [
        RoleTag::Software,
        RoleTag::DataScience,
        RoleTag::ProductMgmt,
        RoleTag::Frontend,
        RoleTag::Backend,
        RoleTag::Devops,
        RoleTag::Design,
        RoleTag::Generic,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RoleTag::Software => "software",
            RoleTag::DataScience => "data-science",
            RoleTag::ProductMgmt => "product-mgmt",
            RoleTag::Frontend => "frontend",
            RoleTag::Backend => "backend",
            RoleTag::Devops => "devops",
            RoleTag::Design => "design",
            RoleTag::Generic => "generic",
        }
    }

    /// Parse a user-supplied role hint. Unknown hints are a configuration
    /// error at the call boundary, not a silent fallback.
    pub fn from_hint(hint: &str) -> Result<RoleTag> {
        let key = hint.trim().to_lowercase();
        RoleTag::ALL
            .iter()
            .copied()
            .find(|tag| tag.name() == key)
            .ok_or_else(|| {
                PrepScoreError::Config(format!(
                    "unrecognized role hint '{}'; expected one of: {}",
                    hint,
                    RoleTag::ALL
                        .iter()
                        .map(|t| t.name())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }

    pub fn weights(&self) -> RoleWeights {
        match self {
            RoleTag::Software => RoleWeights {
                skills: 0.35,
                experience: 0.25,
                education: 0.15,
                structure: 0.15,
                keywords: 0.10,
            },
            RoleTag::DataScience => RoleWeights {
                skills: 0.30,
                experience: 0.20,
                education: 0.25,
                structure: 0.15,
                keywords: 0.10,
            },
            RoleTag::ProductMgmt => RoleWeights {
                skills: 0.20,
                experience: 0.35,
                education: 0.15,
                structure: 0.10,
                keywords: 0.20,
            },
            RoleTag::Frontend => RoleWeights {
                skills: 0.35,
                experience: 0.25,
                education: 0.10,
                structure: 0.20,
                keywords: 0.10,
            },
            RoleTag::Backend => RoleWeights {
                skills: 0.35,
                experience: 0.25,
                education: 0.15,
                structure: 0.15,
                keywords: 0.10,
            },
            RoleTag::Devops => RoleWeights {
                skills: 0.30,
                experience: 0.30,
                education: 0.10,
                structure: 0.15,
                keywords: 0.15,
            },
            RoleTag::Design => RoleWeights {
                skills: 0.25,
                experience: 0.25,
                education: 0.10,
                structure: 0.30,
                keywords: 0.10,
            },
            RoleTag::Generic => RoleWeights {
                skills: 0.30,
                experience: 0.25,
                education: 0.20,
                structure: 0.15,
                keywords: 0.10,
            },
        }
    }
}

/// Parsed view of a job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescription {
    pub raw: String,
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub role: RoleTag,
    /// Term frequency over the normalized token stream.
    pub keyword_freq: BTreeMap<String, u32>,
}

/// Role-detection keyword lists, checked in fixed priority order. The first
/// role whose phrase appears in the JD wins.
const ROLE_KEYWORDS: &[(RoleTag, &[&str])] = &[
    (
        RoleTag::Devops,
        &["devops", "site reliability", "sre", "infrastructure engineer"],
    ),
    (
        RoleTag::DataScience,
        &["data scientist", "data science", "machine learning engineer", "ml engineer"],
    ),
    (
        RoleTag::Frontend,
        &["frontend", "front-end", "front end", "ui engineer"],
    ),
    (
        RoleTag::Backend,
        &["backend", "back-end", "back end", "server-side"],
    ),
    (
        RoleTag::ProductMgmt,
        &["product manager", "product management", "product owner"],
    ),
    (
        RoleTag::Design,
        &["ux designer", "ui designer", "product designer", "visual designer"],
    ),
    (
        RoleTag::Software,
        &["software engineer", "software developer", "developer", "engineer"],
    ),
];

pub fn parse(jd_text: &str, ontology: &SkillOntology, normalizer: &TextNormalizer) -> JobDescription {
    let normalized = normalizer.normalize(jd_text);
    let lower = normalized.text.to_lowercase();

    let role = derive_role(&lower);

    let mut keyword_freq: BTreeMap<String, u32> = BTreeMap::new();
    for token in &normalized.tokens {
        *keyword_freq.entry(token.clone()).or_insert(0) += 1;
    }

    let (required_skills, preferred_skills) = split_skill_requirements(&normalized.text, ontology);

    JobDescription {
        raw: jd_text.to_string(),
        required_skills,
        preferred_skills,
        role,
        keyword_freq,
    }
}

fn derive_role(lower_text: &str) -> RoleTag {
    for (role, phrases) in ROLE_KEYWORDS {
        if phrases.iter().any(|p| lower_text.contains(p)) {
            return *role;
        }
    }
    RoleTag::Generic
}

/// Split requirement prose into required and preferred skill lists using the
/// ontology. Sentences carrying a preferred marker feed the preferred list;
/// everything else counts as required.
fn split_skill_requirements(text: &str, ontology: &SkillOntology) -> (Vec<String>, Vec<String>) {
    let preferred_marker =
        Regex::new(r"(?i)\b(preferred|nice to have|bonus|a plus|familiarity with)\b")
            .expect("valid preferred marker regex");

    let mut required = Vec::new();
    let mut preferred = Vec::new();

    for sentence in text.split(['.', '\n', ';']) {
        if sentence.trim().is_empty() {
            continue;
        }
        let bucket = if preferred_marker.is_match(sentence) {
            &mut preferred
        } else {
            &mut required
        };
        for (canonical, _) in ontology.scan(sentence) {
            if !bucket.contains(&canonical) {
                bucket.push(canonical);
            }
        }
    }

    // Required membership wins over preferred.
    preferred.retain(|skill| !required.contains(skill));
    required.sort();
    preferred.sort();
    (required, preferred)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_jd(text: &str) -> JobDescription {
        parse(text, &SkillOntology::builtin(), &TextNormalizer::new())
    }

    #[test]
    fn test_weight_rows_sum_to_one() {
        for role in RoleTag::ALL {
            let w = role.weights();
            let sum = w.skills + w.experience + w.education + w.structure + w.keywords;
            assert!((sum - 1.0).abs() < 1e-9, "weights for {} sum to {}", role.name(), sum);
        }
    }

    #[test]
    fn test_role_hint_parsing() {
        assert_eq!(RoleTag::from_hint("data-science").unwrap(), RoleTag::DataScience);
        assert_eq!(RoleTag::from_hint("SOFTWARE").unwrap(), RoleTag::Software);
        assert!(RoleTag::from_hint("wizard").is_err());
    }

    #[test]
    fn test_role_derived_from_title() {
        let jd = parse_jd("We seek a Senior Software Engineer with React, Node.js, PostgreSQL, AWS. 5+ years.");
        assert_eq!(jd.role, RoleTag::Software);

        let jd = parse_jd("Hiring a DevOps engineer to run our Kubernetes clusters");
        assert_eq!(jd.role, RoleTag::Devops);

        let jd = parse_jd("Come write poetry with us");
        assert_eq!(jd.role, RoleTag::Generic);
    }

    #[test]
    fn test_required_and_preferred_split() {
        let jd = parse_jd(
            "Requirements: strong React and TypeScript experience.\nNice to have: familiarity with Docker.",
        );
        assert!(jd.required_skills.contains(&"React".to_string()));
        assert!(jd.required_skills.contains(&"TypeScript".to_string()));
        assert_eq!(jd.preferred_skills, vec!["Docker".to_string()]);
    }

    #[test]
    fn test_keyword_frequency_counts_lemmatized_tokens() {
        let jd = parse_jd("Kubernetes, kubernetes and more Kubernetes experience");
        assert_eq!(jd.keyword_freq.get("kubernete"), Some(&3));
    }
}
