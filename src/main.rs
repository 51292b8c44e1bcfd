use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result, anyhow};
use clap::{Arg, ArgAction, Command};
use env_logger::Builder;
use log::{LevelFilter, error, info, warn};

use discover::config::{Config, create_example_config};
use discover::locale::{self, Locale};
use discover::logger;
use discover::project::{Project, load_projects};
use discover::ui::app::run_app;
use discover::ui::project_picker::{derive_picker, stale_ids};

fn build_cli() -> Command {
    Command::new("Discover")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Selettore di progetti per le query Discover")
        .arg(Arg::new("config")
            .short('c')
            .long("config")
            .value_name("FILE")
            .help("Specifica un file di configurazione personalizzato"))
        .arg(Arg::new("projects")
            .short('p')
            .long("projects")
            .value_name("FILE")
            .help("File YAML con l'elenco dei progetti"))
        .arg(Arg::new("select")
            .short('s')
            .long("select")
            .value_name("IDS")
            .help("Id dei progetti selezionati, separati da virgola"))
        .arg(Arg::new("create-example")
            .long("create-example")
            .value_name("DIR")
            .help("Crea configurazione e progetti di esempio nella directory indicata"))
        .arg(Arg::new("summary")
            .long("summary")
            .action(ArgAction::SetTrue)
            .help("Stampa riepilogo e opzioni della selezione senza avviare la TUI"))
}

/// Interpreta un elenco di id separati da virgola
fn parse_selection(raw: &str) -> Result<Vec<i64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<i64>().map_err(|_| anyhow!("Id di progetto non valido: {}", s)))
        .collect()
}

/// Carica i progetti dal file indicato sulla riga di comando o in configurazione
fn resolve_projects(cli_path: Option<&String>, config: &Config) -> Result<Vec<Project>> {
    let path = match cli_path {
        Some(path) => Some(PathBuf::from(path)),
        None => config.resolve_projects_file(),
    };

    match path {
        Some(path) => Ok(load_projects(&path)?),
        None => {
            warn!("Nessun file di progetti configurato");
            Ok(Vec::new())
        }
    }
}

/// Stampa il riepilogo della selezione su stdout
fn print_summary(selection: &[i64], projects: &[Project]) {
    let model = derive_picker(selection, projects);
    println!("{}", model.summary);
    for option in &model.options {
        let marker = match option.value.as_int() {
            Some(id) if selection.contains(&id) => "[x]",
            _ => "[ ]",
        };
        println!("{} {} {}", marker, option.value, option.label);
    }

    let stale = stale_ids(selection, projects);
    if !stale.is_empty() {
        warn!("Id selezionati senza progetto corrispondente: {:?}", stale);
    }
}

fn main() -> Result<()> {
    let matches = build_cli().get_matches();
    let tui_mode = !matches.get_flag("summary") && !matches.contains_id("create-example");

    // In modalità TUI il logger su file viene installato dopo aver letto la configurazione
    if !tui_mode {
        Builder::new().filter_level(LevelFilter::Info).init();
    }

    // Gestione dell'opzione per creare i file di esempio
    if let Some(example_dir) = matches.get_one::<String>("create-example") {
        match create_example_config(Path::new(example_dir)) {
            Ok(path) => {
                println!("Configurazione di esempio creata in: {}", path.display());
                process::exit(0);
            }
            Err(e) => {
                eprintln!("Errore durante la creazione della configurazione di esempio: {:#}", e);
                process::exit(1);
            }
        }
    }

    // Caricamento della configurazione
    let config_path = matches.get_one::<String>("config").map(|s| s.as_str());
    let config = match Config::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Errore durante il caricamento della configurazione: {:#}", e);
            eprintln!("Errore durante il caricamento della configurazione: {:#}", e);
            eprintln!("Prova ad eseguire il programma con l'opzione --create-example per creare una configurazione di esempio");
            process::exit(1);
        }
    };

    if tui_mode {
        let log_file = logger::init_file_logger(&config.log_dir, LevelFilter::Info)
            .context("Impossibile inizializzare il log su file")?;
        info!("Log su file: {:?}", log_file);
    }

    match Locale::from_code(&config.locale) {
        Some(locale) => locale::set_locale(locale),
        None => warn!("Lingua non supportata: {}", config.locale),
    }

    let projects = resolve_projects(matches.get_one::<String>("projects"), &config)
        .context("Errore durante il caricamento dei progetti")?;

    let selection = match matches.get_one::<String>("select") {
        Some(raw) => parse_selection(raw)?,
        None => config.default_selection.clone(),
    };

    if matches.get_flag("summary") {
        print_summary(&selection, &projects);
        return Ok(());
    }

    // Avvio dell'applicazione
    run_app(config, projects, selection).context("Errore durante l'esecuzione dell'applicazione")?;

    Ok(())
}
