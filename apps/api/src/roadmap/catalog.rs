//! Roadmap catalog: the role → skills and skill → image tables.
//!
//! Loaded once at startup (built-in tables, or a JSON file named by
//! `ROADMAP_CATALOG_PATH`) and shared read-only through `AppState`.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// A career track and the ordered skills its roadmap walks through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleTrack {
    pub name: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadmapCatalog {
    roles: Vec<RoleTrack>,
    /// Skill name → image file name inside the asset store.
    skill_assets: BTreeMap<String, String>,
}

impl RoadmapCatalog {
    /// The tables the product ships with.
    pub fn builtin() -> Self {
        let role = |name: &str, skills: &[&str]| RoleTrack {
            name: name.to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
        };

        let roles = vec![
            role("Frontend Engineer", &["HTML", "CSS", "JavaScript"]),
            role("Backend Developer", &["Python", "Java", "C"]),
            role(
                "Full-Stack Web Developer",
                &["HTML", "CSS", "JavaScript", "Python", "Java"],
            ),
            role("Software Development Engineer (SDE)", &["Java", "Python", "C"]),
            role("Data Analyst / Junior Data Scientist", &["Python"]),
            role("Android App Developer", &["Java"]),
            role("Embedded Systems Engineer", &["C"]),
            role("Automation / QA Engineer", &["Python", "JavaScript"]),
            role("Product Designer (UI/UX)", &["UI/UX"]),
            role("Cyber Security Analyst", &["C", "Python"]),
        ];

        let skill_assets = [
            ("HTML", "html(rm).jpeg"),
            ("CSS", "css(rm).jpeg"),
            ("JavaScript", "js(rm).jpeg"),
            ("Python", "python (rm).jpeg"),
            ("Java", "java(rm).jpeg"),
            ("C", "c(rm).jpeg"),
            ("UI/UX", "ui(rm).jpeg"),
        ]
        .into_iter()
        .map(|(skill, file)| (skill.to_string(), file.to_string()))
        .collect();

        RoadmapCatalog {
            roles,
            skill_assets,
        }
    }

    /// Parses and validates a catalog from JSON text.
    pub fn from_json(raw: &str) -> Result<Self> {
        let catalog: RoadmapCatalog =
            serde_json::from_str(raw).context("Roadmap catalog is not valid JSON")?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Reads a catalog file. Used when `ROADMAP_CATALOG_PATH` is set.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read roadmap catalog {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("Invalid roadmap catalog {}", path.display()))
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for track in &self.roles {
            if track.name.trim().is_empty() {
                bail!("Role names must not be empty");
            }
            if !seen.insert(track.name.as_str()) {
                bail!("Duplicate role '{}'", track.name);
            }
        }
        for (skill, file) in &self.skill_assets {
            if !is_plain_file_name(file) {
                bail!("Asset '{file}' for skill '{skill}' must be a plain file name");
            }
        }
        Ok(())
    }

    /// Ordered skills for `role`. Unknown roles get an empty slice, not an error.
    pub fn skills_for_role(&self, role: &str) -> &[String] {
        self.roles
            .iter()
            .find(|track| track.name == role)
            .map(|track| track.skills.as_slice())
            .unwrap_or(&[])
    }

    /// Image file registered for `skill`, if any.
    pub fn asset_for_skill(&self, skill: &str) -> Option<&str> {
        self.skill_assets.get(skill).map(String::as_str)
    }

    pub fn roles(&self) -> &[RoleTrack] {
        &self.roles
    }

    /// Every distinct skill mentioned by a role, in first-seen order.
    pub fn skill_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.roles
            .iter()
            .flat_map(|track| track.skills.iter())
            .filter(|skill| seen.insert(skill.as_str()))
            .map(String::as_str)
            .collect()
    }
}

impl Default for RoadmapCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// True for a single path component that can't escape the asset root.
pub fn is_plain_file_name(name: &str) -> bool {
    !name.trim().is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_frontend_skills() {
        let catalog = RoadmapCatalog::builtin();
        assert_eq!(
            catalog.skills_for_role("Frontend Engineer"),
            &["HTML", "CSS", "JavaScript"]
        );
    }

    #[test]
    fn test_unknown_role_is_empty() {
        let catalog = RoadmapCatalog::builtin();
        assert!(catalog.skills_for_role("Nonexistent Role").is_empty());
    }

    #[test]
    fn test_role_lookup_is_exact() {
        let catalog = RoadmapCatalog::builtin();
        assert!(catalog.skills_for_role("frontend engineer").is_empty());
    }

    #[test]
    fn test_every_builtin_skill_has_an_asset() {
        let catalog = RoadmapCatalog::builtin();
        for skill in catalog.skill_names() {
            assert!(catalog.asset_for_skill(skill).is_some(), "{skill} has no asset");
        }
        assert_eq!(catalog.asset_for_skill("Python"), Some("python (rm).jpeg"));
        assert_eq!(catalog.asset_for_skill("Rust"), None);
    }

    #[test]
    fn test_skill_names_are_distinct_and_ordered() {
        let catalog = RoadmapCatalog::builtin();
        assert_eq!(
            catalog.skill_names(),
            vec!["HTML", "CSS", "JavaScript", "Python", "Java", "C", "UI/UX"]
        );
    }

    #[test]
    fn test_builtin_passes_validation() {
        RoadmapCatalog::builtin().validate().unwrap();
    }

    #[test]
    fn test_from_json_roundtrips_builtin_shape() {
        let raw = r#"{
            "roles": [{"name": "Rustacean", "skills": ["Rust", "C"]}],
            "skill_assets": {"Rust": "rust.png"}
        }"#;
        let catalog = RoadmapCatalog::from_json(raw).unwrap();
        assert_eq!(catalog.skills_for_role("Rustacean"), &["Rust", "C"]);
        assert_eq!(catalog.asset_for_skill("Rust"), Some("rust.png"));
        assert_eq!(catalog.asset_for_skill("C"), None);
    }

    #[test]
    fn test_from_json_rejects_duplicate_roles() {
        let raw = r#"{
            "roles": [{"name": "A", "skills": []}, {"name": "A", "skills": []}],
            "skill_assets": {}
        }"#;
        let err = RoadmapCatalog::from_json(raw).unwrap_err();
        assert!(err.to_string().contains("Duplicate role"), "{err}");
    }

    #[test]
    fn test_from_json_rejects_path_traversal() {
        let raw = r#"{"roles": [], "skill_assets": {"C": "../secret.png"}}"#;
        assert!(RoadmapCatalog::from_json(raw).is_err());
    }

    #[test]
    fn test_from_json_file_reports_path() {
        let err = RoadmapCatalog::from_json_file(Path::new("/nonexistent/catalog.json"))
            .unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/catalog.json"));
    }

    #[test]
    fn test_is_plain_file_name() {
        assert!(is_plain_file_name("python (rm).jpeg"));
        assert!(!is_plain_file_name(".."));
        assert!(!is_plain_file_name("a/b.png"));
        assert!(!is_plain_file_name("a\\b.png"));
        assert!(!is_plain_file_name("  "));
    }
}
