//! Skill ontology: canonical skills, synonyms, categories, transferability
//!
//! The ontology is process-wide state loaded once at startup and read-only
//! afterwards. Requests share an `Arc` snapshot; replacing the ontology swaps
//! the `Arc` atomically so in-flight requests keep reading the snapshot they
//! started with.

mod builtin;
mod loader;

pub use loader::OntologyFile;

use crate::error::{PrepScoreError, Result};
use aho_corasick::AhoCorasick;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Skill categories. Partition every canonical skill into exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    Programming,
    Frameworks,
    Databases,
    Tools,
    Cloud,
    Soft,
    Other,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 7] = [
        SkillCategory::Programming,
        SkillCategory::Frameworks,
        SkillCategory::Databases,
        SkillCategory::Tools,
        SkillCategory::Cloud,
        SkillCategory::Soft,
        SkillCategory::Other,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SkillCategory::Programming => "programming",
            SkillCategory::Frameworks => "frameworks",
            SkillCategory::Databases => "databases",
            SkillCategory::Tools => "tools",
            SkillCategory::Cloud => "cloud",
            SkillCategory::Soft => "soft",
            SkillCategory::Other => "other",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        SkillCategory::ALL
            .iter()
            .copied()
            .find(|c| c.name() == name.to_lowercase())
    }
}

#[derive(Debug, Clone)]
struct SkillEntry {
    canonical: String,
    category: SkillCategory,
}

/// Immutable skill ontology snapshot.
pub struct SkillOntology {
    entries: Vec<SkillEntry>,
    /// Lowercased alias (canonical name or synonym) -> entry index.
    aliases: HashMap<String, usize>,
    /// Automaton over every alias for free-text scanning; pattern id maps
    /// into `pattern_entries`.
    scanner: AhoCorasick,
    pattern_entries: Vec<usize>,
    /// Transferability coefficient per category, each within [0.5, 0.8].
    transfer: HashMap<SkillCategory, f64>,
    version: String,
}

impl SkillOntology {
    /// Build an ontology from (canonical, synonyms, category) triples and a
    /// per-category transferability table.
    pub fn build(
        skills: Vec<(String, Vec<String>, SkillCategory)>,
        transfer: HashMap<SkillCategory, f64>,
        version: String,
    ) -> Result<Self> {
        for (category, coefficient) in &transfer {
            if !(0.5..=0.8).contains(coefficient) {
                return Err(PrepScoreError::Ontology(format!(
                    "transferability for {} must be within [0.5, 0.8], got {}",
                    category.name(),
                    coefficient
                )));
            }
        }

        let mut entries = Vec::new();
        let mut aliases = HashMap::new();
        let mut patterns: Vec<String> = Vec::new();
        let mut pattern_entries = Vec::new();

        for (canonical, synonyms, category) in skills {
            let idx = entries.len();
            entries.push(SkillEntry {
                canonical: canonical.clone(),
                category,
            });

            for alias in std::iter::once(canonical).chain(synonyms) {
                let key = alias.to_lowercase();
                if let Some(existing) = aliases.insert(key.clone(), idx) {
                    if existing != idx {
                        return Err(PrepScoreError::Ontology(format!(
                            "alias '{}' maps to more than one canonical skill",
                            key
                        )));
                    }
                    continue;
                }
                patterns.push(key);
                pattern_entries.push(idx);
            }
        }

        let scanner = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(aho_corasick::MatchKind::LeftmostLongest)
            .build(&patterns)
            .map_err(|e| PrepScoreError::Ontology(format!("failed to build scanner: {}", e)))?;

        Ok(Self {
            entries,
            aliases,
            scanner,
            pattern_entries,
            transfer,
            version,
        })
    }

    /// The built-in ontology shipped with the crate.
    pub fn builtin() -> Self {
        builtin::build().expect("built-in ontology is well-formed")
    }

    /// Load an ontology from its versioned TOML layout.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        loader::from_toml_str(content)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve any input string to its canonical skill name.
    /// Case-insensitive and synonym-resolving.
    pub fn lookup(&self, raw: &str) -> Option<&str> {
        let key = raw.trim().to_lowercase();
        self.aliases
            .get(&key)
            .map(|&idx| self.entries[idx].canonical.as_str())
    }

    /// Category of a canonical skill (or any alias of it).
    pub fn category(&self, skill: &str) -> Option<SkillCategory> {
        let key = skill.trim().to_lowercase();
        self.aliases.get(&key).map(|&idx| self.entries[idx].category)
    }

    /// Transferability coefficient between two skills.
    ///
    /// 1.0 for the same canonical skill, the category coefficient for two
    /// skills in the same category, 0.0 otherwise. Symmetric by construction.
    pub fn transferability(&self, from: &str, to: &str) -> f64 {
        let a = match self.aliases.get(&from.trim().to_lowercase()) {
            Some(&idx) => idx,
            None => return 0.0,
        };
        let b = match self.aliases.get(&to.trim().to_lowercase()) {
            Some(&idx) => idx,
            None => return 0.0,
        };
        if a == b {
            return 1.0;
        }
        let cat_a = self.entries[a].category;
        if cat_a == self.entries[b].category {
            *self.transfer.get(&cat_a).unwrap_or(&0.5)
        } else {
            0.0
        }
    }

    pub fn category_coefficient(&self, category: SkillCategory) -> f64 {
        *self.transfer.get(&category).unwrap_or(&0.5)
    }

    /// Scan free text for skill mentions. Returns distinct canonical names
    /// with their categories, sorted by canonical name for determinism.
    pub fn scan(&self, text: &str) -> Vec<(String, SkillCategory)> {
        let bytes = text.as_bytes();
        let mut seen: Vec<usize> = Vec::new();

        for mat in self.scanner.find_iter(text) {
            // Word-boundary check: an alias hit inside a longer word
            // ("go" in "google") does not count.
            let before_ok = mat.start() == 0
                || !bytes[mat.start() - 1].is_ascii_alphanumeric();
            let after_ok =
                mat.end() == bytes.len() || !bytes[mat.end()].is_ascii_alphanumeric();
            if !before_ok || !after_ok {
                continue;
            }
            let entry_idx = self.pattern_entries[mat.pattern().as_usize()];
            if !seen.contains(&entry_idx) {
                seen.push(entry_idx);
            }
        }

        let mut hits: Vec<(String, SkillCategory)> = seen
            .into_iter()
            .map(|idx| {
                let entry = &self.entries[idx];
                (entry.canonical.clone(), entry.category)
            })
            .collect();
        hits.sort_by(|a, b| a.0.cmp(&b.0));
        hits
    }

    /// All canonical names, sorted. Used by the CLI ontology listing.
    pub fn canonical_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.iter().map(|e| e.canonical.as_str()).collect();
        names.sort_unstable();
        names
    }
}

/// One-writer/many-reader cell for the process-wide ontology snapshot.
pub struct OntologyCell {
    inner: RwLock<Arc<SkillOntology>>,
}

impl OntologyCell {
    pub fn new(ontology: SkillOntology) -> Self {
        Self {
            inner: RwLock::new(Arc::new(ontology)),
        }
    }

    /// Current snapshot. Callers hold the `Arc` for the duration of a
    /// request; a concurrent `replace` does not affect them.
    pub fn snapshot(&self) -> Arc<SkillOntology> {
        self.inner.read().expect("ontology cell poisoned").clone()
    }

    /// Atomically publish a new snapshot.
    pub fn replace(&self, ontology: SkillOntology) {
        *self.inner.write().expect("ontology cell poisoned") = Arc::new(ontology);
    }
}
