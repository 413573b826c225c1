//! Versioned TOML layout for ontology snapshots
//!
//! ```toml
//! version = "1.0"
//!
//! [transferability]
//! frameworks = 0.7
//!
//! [[skills]]
//! name = "React"
//! synonyms = ["reactjs", "react.js"]
//! category = "frameworks"
//! ```

use super::{SkillCategory, SkillOntology};
use crate::error::{PrepScoreError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OntologyFile {
    pub version: String,
    pub transferability: HashMap<String, f64>,
    pub skills: Vec<SkillRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillRecord {
    pub name: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
    pub category: String,
}

pub fn from_toml_str(content: &str) -> Result<SkillOntology> {
    let file: OntologyFile = toml::from_str(content)
        .map_err(|e| PrepScoreError::Ontology(format!("failed to parse ontology: {}", e)))?;

    // Major.minor version tag; the major half gates compatibility.
    let major = file
        .version
        .split('.')
        .next()
        .and_then(|v| v.parse::<u32>().ok())
        .ok_or_else(|| {
            PrepScoreError::Ontology(format!("invalid version tag '{}'", file.version))
        })?;
    if major != 1 {
        return Err(PrepScoreError::Ontology(format!(
            "unsupported ontology major version {}",
            major
        )));
    }

    let mut transfer = HashMap::new();
    for (name, coefficient) in &file.transferability {
        let category = SkillCategory::from_name(name).ok_or_else(|| {
            PrepScoreError::Ontology(format!("unknown category '{}'", name))
        })?;
        transfer.insert(category, *coefficient);
    }

    let mut skills = Vec::new();
    for record in file.skills {
        let category = SkillCategory::from_name(&record.category).ok_or_else(|| {
            PrepScoreError::Ontology(format!(
                "unknown category '{}' for skill '{}'",
                record.category, record.name
            ))
        })?;
        skills.push((record.name, record.synonyms, category));
    }

    SkillOntology::build(skills, transfer, file.version)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
version = "1.0"

[transferability]
programming = 0.6
frameworks = 0.7
databases = 0.7
tools = 0.6
cloud = 0.75
soft = 0.5
other = 0.5

[[skills]]
name = "React"
synonyms = ["reactjs", "react.js"]
category = "frameworks"

[[skills]]
name = "Vue"
synonyms = ["vuejs"]
category = "frameworks"
"#;

    #[test]
    fn test_load_from_toml() {
        let ontology = from_toml_str(SAMPLE).unwrap();
        assert_eq!(ontology.lookup("reactjs"), Some("React"));
        assert_eq!(ontology.transferability("Vue", "React"), 0.7);
        assert_eq!(ontology.version(), "1.0");
    }

    #[test]
    fn test_unsupported_major_version_rejected() {
        let content = SAMPLE.replace("version = \"1.0\"", "version = \"2.0\"");
        assert!(from_toml_str(&content).is_err());
    }

    #[test]
    fn test_out_of_range_coefficient_rejected() {
        let content = SAMPLE.replace("frameworks = 0.7", "frameworks = 0.9");
        assert!(from_toml_str(&content).is_err());
    }

    #[test]
    fn test_unknown_category_rejected() {
        let content = SAMPLE.replace("category = \"frameworks\"", "category = \"wizardry\"");
        assert!(from_toml_str(&content).is_err());
    }
}
