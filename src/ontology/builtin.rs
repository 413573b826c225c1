//! Built-in skill ontology shipped with the crate
//!
//! Versioned alongside the coefficients: any change to the transferability
//! table is a breaking change and bumps the major version.

use super::{SkillCategory, SkillOntology};
use crate::error::Result;
use std::collections::HashMap;

pub const BUILTIN_VERSION: &str = "1.0";

/// Per-category transferability coefficients, each within [0.5, 0.8].
const TRANSFER: &[(SkillCategory, f64)] = &[
    (SkillCategory::Programming, 0.6),
    (SkillCategory::Frameworks, 0.7),
    (SkillCategory::Databases, 0.7),
    (SkillCategory::Tools, 0.6),
    (SkillCategory::Cloud, 0.75),
    (SkillCategory::Soft, 0.5),
    (SkillCategory::Other, 0.5),
];

pub fn build() -> Result<SkillOntology> {
    let skills = skill_table();
    let transfer: HashMap<SkillCategory, f64> = TRANSFER.iter().copied().collect();
    SkillOntology::build(skills, transfer, BUILTIN_VERSION.to_string())
}

fn skill_table() -> Vec<(String, Vec<String>, SkillCategory)> {
    use SkillCategory::*;

    let table: Vec<(&str, Vec<&str>, SkillCategory)> = vec![
        // Programming languages
        ("Python", vec!["python3", "py"], Programming),
        ("JavaScript", vec!["js", "ecmascript"], Programming),
        ("TypeScript", vec!["ts"], Programming),
        ("Java", vec![], Programming),
        ("C++", vec!["cpp", "cplusplus"], Programming),
        ("C#", vec!["csharp", "c sharp"], Programming),
        ("Go", vec!["golang"], Programming),
        ("Rust", vec!["rustlang"], Programming),
        ("Ruby", vec![], Programming),
        ("PHP", vec![], Programming),
        ("Swift", vec![], Programming),
        ("Kotlin", vec![], Programming),
        ("Scala", vec![], Programming),
        ("SQL", vec![], Programming),
        // Frameworks and libraries
        ("React", vec!["reactjs", "react.js"], Frameworks),
        ("Vue", vec!["vuejs", "vue.js"], Frameworks),
        ("Angular", vec!["angularjs"], Frameworks),
        ("Svelte", vec![], Frameworks),
        ("Next.js", vec!["nextjs"], Frameworks),
        ("Node.js", vec!["node", "nodejs"], Frameworks),
        ("Express", vec!["expressjs", "express.js"], Frameworks),
        ("Django", vec![], Frameworks),
        ("Flask", vec![], Frameworks),
        ("FastAPI", vec![], Frameworks),
        ("Spring", vec!["spring boot", "springboot"], Frameworks),
        ("Rails", vec!["ruby on rails"], Frameworks),
        ("TensorFlow", vec![], Frameworks),
        ("PyTorch", vec![], Frameworks),
        ("Pandas", vec![], Frameworks),
        ("NumPy", vec![], Frameworks),
        // Databases
        ("PostgreSQL", vec!["postgres", "psql"], Databases),
        ("MySQL", vec![], Databases),
        ("MongoDB", vec!["mongo"], Databases),
        ("Redis", vec![], Databases),
        ("SQLite", vec![], Databases),
        ("Elasticsearch", vec!["elastic search"], Databases),
        ("Cassandra", vec![], Databases),
        ("DynamoDB", vec![], Databases),
        // Tools
        ("Git", vec![], Tools),
        ("Docker", vec![], Tools),
        ("Kubernetes", vec!["k8s"], Tools),
        ("Terraform", vec![], Tools),
        ("Jenkins", vec![], Tools),
        ("Ansible", vec![], Tools),
        ("Kafka", vec!["apache kafka"], Tools),
        ("Spark", vec!["apache spark"], Tools),
        ("GraphQL", vec![], Tools),
        ("Jira", vec![], Tools),
        ("Figma", vec![], Tools),
        ("Linux", vec![], Tools),
        ("Webpack", vec![], Tools),
        // Cloud
        ("AWS", vec!["amazon web services"], Cloud),
        ("Azure", vec!["microsoft azure"], Cloud),
        ("GCP", vec!["google cloud", "google cloud platform"], Cloud),
        ("Heroku", vec![], Cloud),
        ("Cloudflare", vec![], Cloud),
        // Soft skills
        ("Leadership", vec![], Soft),
        ("Communication", vec![], Soft),
        ("Teamwork", vec!["collaboration"], Soft),
        ("Problem Solving", vec!["problem-solving"], Soft),
        ("Mentoring", vec!["coaching"], Soft),
        ("Time Management", vec![], Soft),
        ("Presentation", vec!["public speaking"], Soft),
        // Other / methodology
        ("Agile", vec![], Other),
        ("Scrum", vec![], Other),
        ("Kanban", vec![], Other),
        ("Project Management", vec![], Other),
        ("Product Management", vec![], Other),
        ("Machine Learning", vec!["ml"], Other),
        ("Data Analysis", vec!["data analytics"], Other),
        ("Microservices", vec![], Other),
        ("REST", vec!["rest api", "restful"], Other),
        ("CI/CD", vec!["cicd", "continuous integration"], Other),
        ("UX Design", vec!["user experience"], Other),
        ("UI Design", vec!["user interface design"], Other),
    ];

    table
        .into_iter()
        .map(|(name, synonyms, category)| {
            (
                name.to_string(),
                synonyms.into_iter().map(|s| s.to_string()).collect(),
                category,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_builds() {
        let ontology = build().unwrap();
        assert!(ontology.len() > 50);
        assert_eq!(ontology.version(), BUILTIN_VERSION);
    }

    #[test]
    fn test_every_category_has_coefficient() {
        for category in SkillCategory::ALL {
            assert!(TRANSFER.iter().any(|(c, _)| *c == category));
        }
    }
}
