//! Modulo per la gestione centralizzata dei log su file
//!
//! Durante l'esecuzione della TUI il terminale è occupato da cursive, quindi
//! i log vengono scritti su file invece che su console.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use chrono::Local;
use lazy_static::lazy_static;
use log::{LevelFilter, Log, Metadata, Record};

// Singleton per il file di log
lazy_static! {
    static ref LOG_FILE: Mutex<Option<(File, PathBuf)>> = Mutex::new(None);
}

/// Nome del file di log per un timestamp dato
fn log_file_name(timestamp: &str) -> String {
    format!("discover_{}.log", timestamp)
}

/// Inizializza il sistema di logging su file (solo su file, non su console)
pub fn init_file_logger(log_dir: &str, level: LevelFilter) -> Result<PathBuf> {
    // Crea la directory dei log se non esiste
    fs::create_dir_all(log_dir).context("Failed to create log directory")?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let log_file_path = Path::new(log_dir).join(log_file_name(&timestamp));

    // Apri il file in modalità append
    let file = File::options()
        .create(true)
        .append(true)
        .open(&log_file_path)
        .context("Failed to open log file")?;

    {
        let mut guard = LOG_FILE.lock().map_err(|_| anyhow!("Log file mutex poisoned"))?;
        *guard = Some((file, log_file_path.clone()));
    }

    log::set_boxed_logger(Box::new(FileLogger { level }))
        .map(|()| log::set_max_level(level))
        .context("Failed to set logger")?;

    log::info!("Logger initialized, writing to: {:?}", log_file_path);
    Ok(log_file_path)
}

/// Percorso del file di log corrente, se il logger è attivo
pub fn current_log_file() -> Option<PathBuf> {
    LOG_FILE
        .lock()
        .ok()
        .and_then(|guard| guard.as_ref().map(|(_, path)| path.clone()))
}

/// Ultime righe del file di log corrente
pub fn get_recent_logs(lines: usize) -> Result<Vec<String>> {
    let Some(path) = current_log_file() else {
        return Ok(Vec::new());
    };

    let content = fs::read_to_string(&path).with_context(|| format!("Failed to read log file {:?}", path))?;
    Ok(tail(&content, lines))
}

fn tail(content: &str, lines: usize) -> Vec<String> {
    let all: Vec<&str> = content.lines().collect();
    let start = all.len().saturating_sub(lines);
    all[start..].iter().map(|l| l.to_string()).collect()
}

/// Formatta un record di log su una riga
fn format_record(timestamp: &str, record: &Record) -> String {
    format!(
        "[{}] {} {}: {}\n",
        timestamp,
        record.level(),
        record.module_path().unwrap_or("unknown"),
        record.args()
    )
}

/// Implementazione di un logger personalizzato che scrive solo su file
struct FileLogger {
    level: LevelFilter,
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let formatted = format_record(&timestamp, record);

        if let Ok(mut guard) = LOG_FILE.lock() {
            if let Some((file, _)) = guard.as_mut() {
                let _ = file.write_all(formatted.as_bytes());
                let _ = file.flush();
            }
        }
    }

    fn flush(&self) {
        if let Ok(mut guard) = LOG_FILE.lock() {
            if let Some((file, _)) = guard.as_mut() {
                let _ = file.flush();
            }
        }
    }
}
