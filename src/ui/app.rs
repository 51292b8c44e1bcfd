//! Applicazione TUI principale
//!
//! Questo modulo gestisce l'interfaccia utente testuale principale dell'applicazione.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::{DateTime, Local};
use log::{info, warn};

use cursive::Cursive;
use cursive::align::HAlign;
use cursive::traits::*;
use cursive::views::{Dialog, DummyView, LinearLayout, Panel, TextView};

use crate::config::Config;
use crate::locale::{self, Locale, format_date, t};
use crate::logger;
use crate::project::Project;
use crate::ui::components::form_field::FormField;
use crate::ui::components::option::{FieldValue, SelectOption};
use crate::ui::components::select_field::SelectField;
use crate::ui::project_picker::{PickerHandle, ProjectPicker, stale_ids};
use crate::ui::theme;

// Dimensioni standard per le finestre
pub const WINDOW_WIDTH: usize = 72;
const RECENT_LOG_LINES: usize = 20;

/// Stato dell'applicazione, conservato come user data di cursive
pub struct DiscoverState {
    pub projects: Vec<Project>,
    /// Selezione corrente: l'unica fonte di verità per il selettore
    pub selected: Vec<i64>,
    pub last_query: Option<DateTime<Local>>,
    pub queries_run: usize,
    picker: Option<PickerHandle>,
}

impl DiscoverState {
    pub fn new(projects: Vec<Project>, selected: Vec<i64>) -> Self {
        DiscoverState {
            projects,
            selected,
            last_query: None,
            queries_run: 0,
            picker: None,
        }
    }

    /// Testo della riga di stato dell'ultima query
    pub fn query_status(&self) -> String {
        match &self.last_query {
            Some(date) => format!("{}: {} (#{})", t("Last query"), format_date(date), self.queries_run),
            None => format!("{}: {}", t("Last query"), t("Never")),
        }
    }
}

/// Avvia l'applicazione TUI
pub fn run_app(config: Config, projects: Vec<Project>, selection: Vec<i64>) -> Result<()> {
    // Crea l'oggetto Cursive per la TUI
    let mut siv = cursive::default();

    siv.set_theme(theme::get_theme(&config.ui_theme));

    let stale = stale_ids(&selection, &projects);
    if !stale.is_empty() {
        warn!("La selezione iniziale contiene progetti sconosciuti: {:?}", stale);
    }

    siv.set_user_data(DiscoverState::new(projects, selection));
    let config = Arc::new(Mutex::new(config));

    create_main_screen(&mut siv, Arc::clone(&config));

    // Esegui il loop principale
    siv.run();

    Ok(())
}

/// Crea la schermata principale dell'applicazione
fn create_main_screen(siv: &mut Cursive, config: Arc<Mutex<Config>>) {
    let (projects, selected, status) = match siv.user_data::<DiscoverState>() {
        Some(state) => (state.projects.clone(), state.selected.clone(), state.query_status()),
        None => (Vec::new(), Vec::new(), String::new()),
    };

    let picker = ProjectPicker::new(projects, selected)
        .on_change(on_selection_change)
        .run_query(run_query);
    let (picker_view, handle) = picker.into_view();

    siv.with_user_data(|state: &mut DiscoverState| state.picker = Some(handle));

    let title = TextView::new("DISCOVER").h_align(HAlign::Center);
    let status_view = TextView::new(status).with_name("query_status");

    let layout = LinearLayout::vertical()
        .child(title)
        .child(DummyView.fixed_height(1))
        .child(Panel::new(picker_view))
        .child(DummyView.fixed_height(1))
        .child(Panel::new(status_view).title(t("Last query")));

    siv.add_layer(
        Dialog::around(layout)
            .title("Discover")
            .button(t("Settings"), move |s| create_settings_screen(s, Arc::clone(&config)))
            .button("Log", show_recent_logs)
            .button(t("Quit"), |s| s.quit())
            .fixed_width(WINDOW_WIDTH),
    );
}

/// Il selettore ha emesso una nuova selezione: aggiorna lo stato e rimandala giù
fn on_selection_change(siv: &mut Cursive, next: Vec<i64>) {
    let handle = siv.with_user_data(|state: &mut DiscoverState| {
        let stale = stale_ids(&next, &state.projects);
        if !stale.is_empty() {
            warn!("Selezione con progetti sconosciuti: {:?}", stale);
        }
        state.selected = next.clone();
        state.picker.clone()
    });

    if let Some(Some(handle)) = handle {
        handle.set_value(siv, next);
    }
}

/// Esegue la query con la selezione corrente
fn run_query(siv: &mut Cursive) {
    let status = siv.with_user_data(|state: &mut DiscoverState| {
        state.last_query = Some(Local::now());
        state.queries_run += 1;
        info!(
            "Query #{} eseguita su {}",
            state.queries_run,
            if state.selected.is_empty() {
                "tutti i progetti".to_string()
            } else {
                format!("{:?}", state.selected)
            }
        );
        state.query_status()
    });

    if let Some(status) = status {
        siv.call_on_name("query_status", |view: &mut TextView| view.set_content(status));
    }
}

/// Ridisegna i testi della schermata principale nella lingua corrente
fn refresh_main_screen(siv: &mut Cursive) {
    let refreshed = siv.with_user_data(|state: &mut DiscoverState| (state.picker.clone(), state.query_status()));
    let Some((picker, status)) = refreshed else {
        return;
    };

    if let Some(picker) = picker {
        picker.refresh(siv);
    }
    siv.call_on_name("query_status", |view: &mut TextView| view.set_content(status));
}

/// Crea la schermata delle impostazioni
fn create_settings_screen(siv: &mut Cursive, config: Arc<Mutex<Config>>) {
    let (current_theme, current_locale) = match config.lock() {
        Ok(guard) => (guard.ui_theme.clone(), guard.locale.clone()),
        Err(_) => {
            siv.add_layer(Dialog::info("Configurazione non disponibile"));
            return;
        }
    };

    let theme_config = Arc::clone(&config);
    let theme_field = SelectField::new(
        FormField::new("theme")
            .label(&t("Theme"))
            .initial(Some(FieldValue::from(current_theme))),
    )
    .choices(theme::theme_choices())
    .clearable(false)
    .stacked(true)
    .on_change(move |s, value| {
        let Some(name) = value.as_ref().and_then(FieldValue::as_text) else {
            return;
        };
        s.set_theme(theme::get_theme(name));
        save_setting(s, &theme_config, |config| config.ui_theme = name.to_string());
    });

    let locale_options: Vec<SelectOption> = locale::available_locales()
        .into_iter()
        .map(|l| SelectOption::new(l.code(), l.display_name()))
        .collect();

    let locale_config = Arc::clone(&config);
    let locale_field = SelectField::new(
        FormField::new("locale")
            .label(&t("Language"))
            .initial(Some(FieldValue::from(current_locale))),
    )
    .options(locale_options)
    .clearable(false)
    .stacked(true)
    .on_change(move |s, value| {
        let Some(locale) = value.as_ref().and_then(FieldValue::as_text).and_then(Locale::from_code) else {
            return;
        };
        locale::set_locale(locale);
        refresh_main_screen(s);
        save_setting(s, &locale_config, |config| config.locale = locale.code().to_string());
    });

    let layout = LinearLayout::vertical()
        .child(theme_field.into_view())
        .child(locale_field.into_view());

    siv.add_layer(
        Dialog::around(layout)
            .title(t("Settings"))
            .button(t("Back"), |s| {
                s.pop_layer();
            })
            .fixed_width(WINDOW_WIDTH / 2),
    );
}

/// Applica una modifica alla configurazione e la salva
fn save_setting<F>(siv: &mut Cursive, config: &Arc<Mutex<Config>>, update: F)
where
    F: FnOnce(&mut Config),
{
    let result = match config.lock() {
        Ok(mut guard) => {
            update(&mut guard);
            guard.persist()
        }
        Err(_) => return,
    };

    if let Err(e) = result {
        siv.add_layer(Dialog::info(format!("Errore nel salvataggio della configurazione: {:#}", e)));
    }
}

/// Mostra le ultime righe del file di log
fn show_recent_logs(siv: &mut Cursive) {
    let content = match logger::get_recent_logs(RECENT_LOG_LINES) {
        Ok(lines) if lines.is_empty() => "Nessun log disponibile".to_string(),
        Ok(lines) => lines.join("\n"),
        Err(e) => format!("Errore nella lettura del file di log: {:#}", e),
    };

    siv.add_layer(
        Dialog::around(TextView::new(content).scrollable())
            .title("Log")
            .button(t("Back"), |s| {
                s.pop_layer();
            })
            .fixed_width(WINDOW_WIDTH),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> DiscoverState {
        DiscoverState::new(vec![Project::new("1", "alpha"), Project::new("2", "beta")], vec![])
    }

    #[test]
    fn selection_change_is_stored_in_state() {
        let mut siv = Cursive::new();
        siv.set_user_data(state());

        on_selection_change(&mut siv, vec![2, 7]);

        let selected = siv.with_user_data(|s: &mut DiscoverState| s.selected.clone());
        assert_eq!(selected, Some(vec![2, 7]));
    }

    #[test]
    fn run_query_records_each_run() {
        let mut siv = Cursive::new();
        siv.set_user_data(state());

        run_query(&mut siv);
        run_query(&mut siv);

        let (runs, last) = siv
            .with_user_data(|s: &mut DiscoverState| (s.queries_run, s.last_query.is_some()))
            .unwrap();
        assert_eq!(runs, 2);
        assert!(last);
    }

    #[test]
    fn status_before_first_query() {
        assert_eq!(state().query_status(), "Last query: Never");
    }

    #[test]
    fn main_screen_wires_the_picker_handle() {
        let mut siv = Cursive::new();
        siv.set_user_data(DiscoverState::new(vec![Project::new("1", "alpha")], vec![1]));
        create_main_screen(&mut siv, Arc::new(Mutex::new(Config::default())));

        let handle = siv
            .with_user_data(|s: &mut DiscoverState| s.picker.clone())
            .flatten()
            .unwrap();
        assert_eq!(handle.summary(), "alpha");

        on_selection_change(&mut siv, vec![]);
        assert_eq!(handle.value(), Vec::<i64>::new());
        assert_eq!(handle.summary(), "None selected, using all");
    }

    #[test]
    fn refresh_main_screen_redraws_picker_and_status() {
        let mut siv = Cursive::new();
        siv.set_user_data(DiscoverState::new(vec![Project::new("1", "alpha")], vec![]));
        create_main_screen(&mut siv, Arc::new(Mutex::new(Config::default())));
        siv.call_on_name("query_status", |view: &mut TextView| view.set_content("stale"));
        siv.call_on_name("projects-trigger", |button: &mut cursive::views::Button| {
            button.set_label_raw("stale")
        });

        refresh_main_screen(&mut siv);

        let status = siv
            .call_on_name("query_status", |view: &mut TextView| view.get_content().source().to_string())
            .unwrap();
        let title = siv
            .call_on_name("projects-trigger", |button: &mut cursive::views::Button| button.label().to_string())
            .unwrap();
        assert_eq!(status, "Last query: Never");
        assert_eq!(title, "None selected, using all ▾");
    }
}
