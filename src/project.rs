//! Progetti disponibili per le query
//!
//! I progetti arrivano da un file YAML esterno e sono in sola lettura per
//! i componenti dell'interfaccia.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Errori di caricamento dei progetti
#[derive(Debug, Error)]
pub enum ProjectsError {
    #[error("impossibile leggere il file dei progetti {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file dei progetti {path:?} non valido: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("id di progetto duplicato: {0}")]
    DuplicateId(String),
}

/// Un progetto dell'organizzazione
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Identificatore testuale, normalmente numerico
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,

    /// Nome breve usato nelle etichette
    pub slug: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Project {
    pub fn new(id: &str, slug: &str) -> Self {
        Project {
            id: id.to_string(),
            slug: slug.to_string(),
            name: None,
        }
    }

    /// Id numerico in base 10, letto dalle cifre iniziali ("12abc" vale 12)
    ///
    /// `None` se l'id non inizia con un intero.
    pub fn numeric_id(&self) -> Option<i64> {
        let id = self.id.trim_start();
        let sign_len = if id.starts_with(['+', '-']) { 1 } else { 0 };
        let digits_len = id[sign_len..].bytes().take_while(u8::is_ascii_digit).count();
        if digits_len == 0 {
            return None;
        }
        id[..sign_len + digits_len].parse::<i64>().ok()
    }
}

// Nei file YAML l'id può essere scritto anche come numero
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Int(i64),
}

fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Int(id) => id.to_string(),
    })
}

/// Interpreta il contenuto YAML di un file di progetti
pub fn parse_projects(content: &str, path: &Path) -> Result<Vec<Project>, ProjectsError> {
    let projects: Vec<Project> = serde_yaml::from_str(content).map_err(|source| ProjectsError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    // "1" e "01" indicano lo stesso progetto
    let mut seen_numeric = HashSet::new();
    let mut seen_raw = HashSet::new();
    for project in &projects {
        let unique = match project.numeric_id() {
            Some(id) => seen_numeric.insert(id),
            None => {
                warn!("Progetto {} con id non numerico: {}", project.slug, project.id);
                seen_raw.insert(project.id.as_str())
            }
        };
        if !unique {
            return Err(ProjectsError::DuplicateId(project.id.clone()));
        }
    }

    Ok(projects)
}

/// Carica i progetti da un file YAML
pub fn load_projects(path: &Path) -> Result<Vec<Project>, ProjectsError> {
    let content = fs::read_to_string(path).map_err(|source| ProjectsError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let projects = parse_projects(&content, path)?;
    info!("Caricati {} progetti da {:?}", projects.len(), path);
    Ok(projects)
}

/// Progetti di esempio scritti da `--create-example`
pub fn example_projects() -> Vec<Project> {
    vec![
        Project {
            id: "1".to_string(),
            slug: "frontend".to_string(),
            name: Some("Frontend".to_string()),
        },
        Project {
            id: "2".to_string(),
            slug: "backend".to_string(),
            name: Some("Backend API".to_string()),
        },
        Project::new("3", "mobile"),
        Project::new("4", "workers"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_id_parses_base_ten() {
        assert_eq!(Project::new("42", "a").numeric_id(), Some(42));
        assert_eq!(Project::new(" 7 ", "b").numeric_id(), Some(7));
        assert_eq!(Project::new("abc", "c").numeric_id(), None);
        assert_eq!(Project::new("", "d").numeric_id(), None);
        assert_eq!(Project::new("-", "e").numeric_id(), None);
    }

    #[test]
    fn numeric_id_reads_leading_digits() {
        assert_eq!(Project::new("12abc", "a").numeric_id(), Some(12));
        assert_eq!(Project::new("3.0", "b").numeric_id(), Some(3));
        assert_eq!(Project::new("  -5x", "c").numeric_id(), Some(-5));
        assert_eq!(Project::new("+8", "d").numeric_id(), Some(8));
        assert_eq!(Project::new("007", "e").numeric_id(), Some(7));
        assert_eq!(Project::new("x12", "f").numeric_id(), None);
    }

    #[test]
    fn parses_yaml_project_list() {
        let yaml = "- id: \"1\"\n  slug: alpha\n- id: \"2\"\n  slug: beta\n  name: Beta\n";
        let projects = parse_projects(yaml, Path::new("projects.yaml")).unwrap();

        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0], Project::new("1", "alpha"));
        assert_eq!(projects[1].name.as_deref(), Some("Beta"));
    }

    #[test]
    fn numeric_yaml_ids_are_accepted() {
        let projects = parse_projects("- id: 12\n  slug: gamma\n", Path::new("p.yaml")).unwrap();
        assert_eq!(projects[0].id, "12");
        assert_eq!(projects[0].numeric_id(), Some(12));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let yaml = "- id: \"1\"\n  slug: alpha\n- id: \"1\"\n  slug: again\n";
        let err = parse_projects(yaml, Path::new("projects.yaml")).unwrap_err();

        assert!(matches!(err, ProjectsError::DuplicateId(id) if id == "1"));
    }

    #[test]
    fn duplicate_ids_compare_by_number() {
        let yaml = "- id: \"1\"\n  slug: alpha\n- id: \"01\"\n  slug: again\n";
        let err = parse_projects(yaml, Path::new("projects.yaml")).unwrap_err();
        assert!(matches!(err, ProjectsError::DuplicateId(id) if id == "01"));

        let yaml = "- id: abc\n  slug: alpha\n- id: abc\n  slug: again\n";
        let err = parse_projects(yaml, Path::new("projects.yaml")).unwrap_err();
        assert!(matches!(err, ProjectsError::DuplicateId(id) if id == "abc"));
    }

    #[test]
    fn invalid_yaml_is_a_parse_error() {
        let err = parse_projects("- id: [", Path::new("broken.yaml")).unwrap_err();
        assert!(matches!(err, ProjectsError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let path = std::env::temp_dir().join("discover-missing-projects.yaml");
        let err = load_projects(&path).unwrap_err();
        assert!(matches!(err, ProjectsError::Read { .. }));
    }
}
