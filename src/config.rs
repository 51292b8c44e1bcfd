//! Gestione della configurazione per Discover
//!
//! Questo modulo gestisce il caricamento e il salvataggio della configurazione
//! dell'applicazione in formato TOML.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::project::example_projects;

/// Nome del file di configurazione
const CONFIG_FILE_NAME: &str = "discover.toml";

/// Nome del file dei progetti di esempio
const EXAMPLE_PROJECTS_FILE: &str = "projects.yaml";

/// Struttura principale di configurazione per Discover
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// File YAML con l'elenco dei progetti
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects_file: Option<String>,

    /// Directory per i file di log
    pub log_dir: String,

    /// Tema dell'interfaccia utente
    pub ui_theme: String,

    /// Lingua dell'interfaccia ("en", "it")
    pub locale: String,

    /// Progetti selezionati all'avvio
    pub default_selection: Vec<i64>,

    /// Percorso del file di configurazione caricato
    #[serde(skip)]
    pub config_file_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            projects_file: None,
            log_dir: get_base_directory().join("logs").to_string_lossy().to_string(),
            ui_theme: "default".to_string(),
            locale: "en".to_string(),
            default_selection: Vec::new(),
            config_file_path: None,
        }
    }
}

impl Config {
    /// Carica la configurazione da un file
    pub fn load(path: Option<&str>) -> Result<Self> {
        // Se è specificato un path esplicito, deve esistere
        if let Some(explicit_path) = path {
            info!("Caricamento configurazione da: {}", explicit_path);
            return Config::load_from_file(Path::new(explicit_path));
        }

        let default_path = get_default_config_path();
        if default_path.exists() {
            match Config::load_from_file(&default_path) {
                Ok(config) => return Ok(config),
                Err(e) => warn!("Configurazione in {:?} non valida: {:#}", default_path, e),
            }
        }

        // Nessuna configurazione trovata: salva quella di default
        info!("Creazione di una configurazione di default");
        let mut config = Config::default();
        config.save(&default_path)?;
        config.config_file_path = Some(default_path);
        Ok(config)
    }

    /// Legge e interpreta un file di configurazione
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Impossibile leggere la configurazione: {:?}", path))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Configurazione non valida: {:?}", path))?;
        config.config_file_path = Some(path.to_path_buf());

        info!("Configurazione caricata da: {:?}", path);
        Ok(config)
    }

    /// Salva la configurazione in un file
    pub fn save(&self, path: &Path) -> Result<()> {
        info!("Salvataggio configurazione in: {:?}", path);

        // Assicurati che la directory esista
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Impossibile creare la directory per: {:?}", path))?;
            }
        }

        let content = toml::to_string_pretty(self).context("Impossibile serializzare la configurazione")?;
        fs::write(path, content)
            .with_context(|| format!("Impossibile salvare la configurazione in: {:?}", path))?;

        Ok(())
    }

    /// Salva nel file da cui la configurazione è stata caricata, se noto
    pub fn persist(&self) -> Result<()> {
        match &self.config_file_path {
            Some(path) => self.save(path),
            None => Ok(()),
        }
    }

    /// Percorso del file dei progetti, relativo al file di configurazione se non assoluto
    pub fn resolve_projects_file(&self) -> Option<PathBuf> {
        let file = Path::new(self.projects_file.as_ref()?);
        if file.is_absolute() {
            return Some(file.to_path_buf());
        }

        let base = self
            .config_file_path
            .as_ref()
            .and_then(|p| p.parent())
            .map(Path::to_path_buf)
            .unwrap_or_else(get_base_directory);
        Some(base.join(file))
    }
}

/// Ottiene la directory di base dell'applicazione
pub fn get_base_directory() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("discover");
    }

    // Fallback: utilizza la directory corrente
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Ottiene il percorso predefinito per il file di configurazione
pub fn get_default_config_path() -> PathBuf {
    get_base_directory().join(CONFIG_FILE_NAME)
}

/// Crea configurazione e progetti di esempio nella directory specificata
pub fn create_example_config(dir: &Path) -> Result<PathBuf> {
    info!("Creazione configurazione di esempio in: {:?}", dir);

    fs::create_dir_all(dir).with_context(|| format!("Impossibile creare la directory: {:?}", dir))?;

    let projects_path = dir.join(EXAMPLE_PROJECTS_FILE);
    let projects = serde_yaml::to_string(&example_projects()).context("Impossibile serializzare i progetti")?;
    fs::write(&projects_path, projects)
        .with_context(|| format!("Impossibile scrivere i progetti in: {:?}", projects_path))?;

    let config = Config {
        projects_file: Some(EXAMPLE_PROJECTS_FILE.to_string()),
        log_dir: dir.join("logs").to_string_lossy().to_string(),
        default_selection: vec![1],
        ..Config::default()
    };

    let config_path = dir.join(CONFIG_FILE_NAME);
    config.save(&config_path)?;

    info!("File di configurazione di esempio creato con successo");
    Ok(config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::load_projects;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("discover-test-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = temp_dir("config");
        let path = dir.join("discover.toml");
        let config = Config {
            ui_theme: "dark".to_string(),
            locale: "it".to_string(),
            default_selection: vec![2, 5],
            ..Config::default()
        };

        config.save(&path).unwrap();
        let loaded = Config::load(Some(path.to_str().unwrap())).unwrap();

        assert_eq!(loaded.ui_theme, "dark");
        assert_eq!(loaded.default_selection, vec![2, 5]);
        assert_eq!(loaded.config_file_path.as_deref(), Some(path.as_path()));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_keys_use_defaults() {
        let config: Config = toml::from_str("ui_theme = \"dark\"\n").unwrap();

        assert_eq!(config.ui_theme, "dark");
        assert_eq!(config.locale, "en");
        assert!(config.default_selection.is_empty());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = temp_dir("missing");
        let path = dir.join("nope.toml");
        assert!(Config::load(Some(path.to_str().unwrap())).is_err());
    }

    #[test]
    fn example_config_points_at_example_projects() {
        let dir = temp_dir("example");
        let config_path = create_example_config(&dir).unwrap();

        let config = Config::load_from_file(&config_path).unwrap();
        let projects_path = config.resolve_projects_file().unwrap();
        let projects = load_projects(&projects_path).unwrap();

        assert_eq!(projects_path, dir.join("projects.yaml"));
        assert_eq!(projects.len(), example_projects().len());
        assert_eq!(config.default_selection, vec![1]);
        let _ = fs::remove_dir_all(&dir);
    }
}
