//! Ontology-driven skill matching
//!
//! Required and preferred skills are matched against a candidate's skill set
//! through the ontology. Each requirement gets a verdict and a credit in
//! [0, 1]; the aggregate is the weighted credit ratio scaled to [0, 100].

use crate::error::{PrepScoreError, Result};
use crate::extract::SkillSet;
use crate::ontology::SkillOntology;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Default weight applied to preferred skills in the aggregate.
pub const DEFAULT_PREFERRED_WEIGHT: f64 = 0.5;

/// How a single requirement was satisfied, if at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SkillVerdict {
    /// The requirement names the canonical skill and the candidate has it.
    Exact,
    /// The requirement used a synonym spelling that resolves to a canonical
    /// skill the candidate has. Credit is identical to an exact match.
    Synonym { canonical: String },
    /// No direct match, but a candidate skill in the same category grants
    /// partial credit.
    Transferable { via: String, coefficient: f64 },
    Missing,
}

impl SkillVerdict {
    pub fn credit(&self) -> f64 {
        match self {
            SkillVerdict::Exact | SkillVerdict::Synonym { .. } => 1.0,
            SkillVerdict::Transferable { coefficient, .. } => *coefficient,
            SkillVerdict::Missing => 0.0,
        }
    }
}

/// One required or preferred skill with its match outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMatch {
    /// The requirement as given by the caller.
    pub requested: String,
    /// Canonical form, or the lowercased raw form when the ontology does
    /// not know the skill.
    pub canonical: String,
    pub required: bool,
    pub verdict: SkillVerdict,
    pub credit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMatchReport {
    /// Aggregate match score in [0, 100].
    pub score: u8,
    pub matches: Vec<SkillMatch>,
    pub missing_required: Vec<String>,
    /// Mechanical learning suggestions derived from transferable verdicts.
    pub learning_paths: Vec<String>,
    pub preferred_weight: f64,
    pub warnings: Vec<String>,
}

pub struct SkillMatcher {
    ontology: Arc<SkillOntology>,
    preferred_weight: f64,
}

impl SkillMatcher {
    pub fn new(ontology: Arc<SkillOntology>) -> Self {
        Self {
            ontology,
            preferred_weight: DEFAULT_PREFERRED_WEIGHT,
        }
    }

    /// Override the preferred-skill weight. Values outside (0, 1] are a
    /// configuration error.
    pub fn with_preferred_weight(mut self, weight: f64) -> Result<Self> {
        if !(weight > 0.0 && weight <= 1.0) {
            return Err(PrepScoreError::Config(format!(
                "preferred_weight must be in (0, 1], got {}",
                weight
            )));
        }
        self.preferred_weight = weight;
        Ok(self)
    }

    /// Match requirements against a candidate skill set.
    ///
    /// Requirements are evaluated in the order given; the report is fully
    /// determined by the inputs and the ontology snapshot.
    pub fn matches(
        &self,
        required: &[String],
        preferred: &[String],
        candidate: &SkillSet,
    ) -> SkillMatchReport {
        let mut matches = Vec::new();
        let mut weighted_credit = 0.0;
        let mut total_weight = 0.0;
        let mut warnings = Vec::new();

        for (list, is_required, weight) in [
            (required, true, 1.0),
            (preferred, false, self.preferred_weight),
        ] {
            for requested in list {
                let entry = self.match_one(requested, is_required, candidate);
                weighted_credit += entry.credit * weight;
                total_weight += weight;
                matches.push(entry);
            }
        }

        let score = if total_weight > 0.0 {
            ((weighted_credit / total_weight) * 100.0).round() as u8
        } else {
            warnings.push("no required or preferred skills given; score is zero".to_string());
            0
        };

        let mut missing_required: Vec<String> = matches
            .iter()
            .filter(|m| m.required && m.verdict == SkillVerdict::Missing)
            .map(|m| m.canonical.clone())
            .collect();
        missing_required.sort();

        let mut learning_paths: Vec<String> = matches
            .iter()
            .filter_map(|m| match &m.verdict {
                SkillVerdict::Transferable { via, .. } => Some(format!(
                    "build on {} experience to pick up {}",
                    via, m.canonical
                )),
                _ => None,
            })
            .collect();
        learning_paths.sort();
        learning_paths.dedup();

        SkillMatchReport {
            score,
            matches,
            missing_required,
            learning_paths,
            preferred_weight: self.preferred_weight,
            warnings,
        }
    }

    fn match_one(&self, requested: &str, required: bool, candidate: &SkillSet) -> SkillMatch {
        let resolved = self.ontology.lookup(requested);
        let canonical = match resolved {
            Some(name) => name.to_string(),
            None => requested.trim().to_lowercase(),
        };

        let verdict = if candidate.contains(&canonical) {
            // The synonym verdict reports the resolution; credit is the
            // same as an exact hit either way.
            if requested.trim().eq_ignore_ascii_case(&canonical) {
                SkillVerdict::Exact
            } else {
                SkillVerdict::Synonym {
                    canonical: canonical.clone(),
                }
            }
        } else {
            self.best_transfer(&canonical, candidate)
        };

        let credit = verdict.credit();
        SkillMatch {
            requested: requested.to_string(),
            canonical,
            required,
            verdict,
            credit,
        }
    }

    /// Best same-category candidate. Coefficients within a category are
    /// uniform, so ties resolve to the lexicographically smallest name.
    fn best_transfer(&self, canonical: &str, candidate: &SkillSet) -> SkillVerdict {
        let mut best: Option<(&str, f64)> = None;
        for name in candidate.all() {
            let coefficient = self.ontology.transferability(canonical, name);
            if coefficient <= 0.0 {
                continue;
            }
            let better = match best {
                None => true,
                Some((best_name, best_coeff)) => {
                    coefficient > best_coeff || (coefficient == best_coeff && name < best_name)
                }
            };
            if better {
                best = Some((name, coefficient));
            }
        }
        match best {
            Some((via, coefficient)) => SkillVerdict::Transferable {
                via: via.to_string(),
                coefficient,
            },
            None => SkillVerdict::Missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ontology::SkillCategory;

    fn matcher() -> SkillMatcher {
        SkillMatcher::new(Arc::new(SkillOntology::builtin()))
    }

    fn candidate(skills: &[(&str, SkillCategory)]) -> SkillSet {
        let mut set = SkillSet::default();
        for (name, category) in skills {
            set.insert(name.to_string(), *category);
        }
        set
    }

    #[test]
    fn test_exact_match() {
        let report = matcher().matches(
            &["React".to_string()],
            &[],
            &candidate(&[("React", SkillCategory::Frameworks)]),
        );
        assert_eq!(report.matches[0].verdict, SkillVerdict::Exact);
        assert_eq!(report.matches[0].credit, 1.0);
        assert_eq!(report.score, 100);
    }

    #[test]
    fn test_synonym_resolves_to_full_credit() {
        // Candidate listed "ReactJS"; extraction canonicalized it to React.
        let report = matcher().matches(
            &["reactjs".to_string()],
            &[],
            &candidate(&[("React", SkillCategory::Frameworks)]),
        );
        assert_eq!(report.matches[0].credit, 1.0);
        assert_eq!(
            report.matches[0].verdict,
            SkillVerdict::Synonym {
                canonical: "React".to_string()
            }
        );
        assert_eq!(report.score, 100);
    }

    #[test]
    fn test_transferable_match() {
        let report = matcher().matches(
            &["Vue".to_string()],
            &[],
            &candidate(&[("React", SkillCategory::Frameworks)]),
        );
        assert_eq!(
            report.matches[0].verdict,
            SkillVerdict::Transferable {
                via: "React".to_string(),
                coefficient: 0.7,
            }
        );
        assert_eq!(report.matches[0].credit, 0.7);
        assert_eq!(report.score, 70);
        assert_eq!(
            report.learning_paths,
            vec!["build on React experience to pick up Vue".to_string()]
        );
    }

    #[test]
    fn test_transfer_tie_breaks_lexicographically() {
        let report = matcher().matches(
            &["Vue".to_string()],
            &[],
            &candidate(&[
                ("React", SkillCategory::Frameworks),
                ("Angular", SkillCategory::Frameworks),
            ]),
        );
        assert_eq!(
            report.matches[0].verdict,
            SkillVerdict::Transferable {
                via: "Angular".to_string(),
                coefficient: 0.7,
            }
        );
    }

    #[test]
    fn test_missing_skill() {
        let report = matcher().matches(
            &["Kubernetes".to_string()],
            &[],
            &candidate(&[("React", SkillCategory::Frameworks)]),
        );
        assert_eq!(report.matches[0].verdict, SkillVerdict::Missing);
        assert_eq!(report.score, 0);
        assert_eq!(report.missing_required, vec!["Kubernetes".to_string()]);
    }

    #[test]
    fn test_preferred_weight_in_aggregate() {
        // Required React matched, preferred Docker missing.
        // Score = (1.0 + 0.0 * 0.5) / (1.0 + 0.5) = 0.6667 -> 67.
        let report = matcher().matches(
            &["React".to_string()],
            &["Docker".to_string()],
            &candidate(&[("React", SkillCategory::Frameworks)]),
        );
        assert_eq!(report.score, 67);
        assert!(report.missing_required.is_empty());
    }

    #[test]
    fn test_custom_preferred_weight() {
        let matcher = matcher().with_preferred_weight(1.0).unwrap();
        let report = matcher.matches(
            &["React".to_string()],
            &["Docker".to_string()],
            &candidate(&[("React", SkillCategory::Frameworks)]),
        );
        assert_eq!(report.score, 50);

        assert!(super::SkillMatcher::new(Arc::new(SkillOntology::builtin()))
            .with_preferred_weight(0.0)
            .is_err());
        assert!(super::SkillMatcher::new(Arc::new(SkillOntology::builtin()))
            .with_preferred_weight(1.5)
            .is_err());
    }

    #[test]
    fn test_unknown_requirement_falls_back_to_raw_form() {
        let report = matcher().matches(
            &["Quantum Basket Weaving".to_string()],
            &[],
            &candidate(&[("React", SkillCategory::Frameworks)]),
        );
        assert_eq!(report.matches[0].canonical, "quantum basket weaving");
        assert_eq!(report.matches[0].verdict, SkillVerdict::Missing);
    }

    #[test]
    fn test_empty_requirements_warn() {
        let report = matcher().matches(&[], &[], &SkillSet::default());
        assert_eq!(report.score, 0);
        assert!(report.warnings[0].contains("no required or preferred"));
    }

    #[test]
    fn test_report_is_deterministic() {
        let skills = candidate(&[
            ("React", SkillCategory::Frameworks),
            ("PostgreSQL", SkillCategory::Databases),
        ]);
        let required = vec!["Vue".to_string(), "MySQL".to_string()];
        let preferred = vec!["Docker".to_string()];
        let first = matcher().matches(&required, &preferred, &skills);
        let second = matcher().matches(&required, &preferred, &skills);
        assert_eq!(first, second);
    }
}
