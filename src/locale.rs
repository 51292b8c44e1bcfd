//! Testi localizzati e formattazione delle date
//!
//! Le chiavi del catalogo sono i testi inglesi; la lingua attiva viene
//! impostata all'avvio dalla configurazione.

use std::collections::HashMap;
use std::fmt::Display;
use std::sync::RwLock;

use chrono::{DateTime, TimeZone};
use lazy_static::lazy_static;

/// Lingue supportate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    En,
    It,
}

impl Locale {
    /// Converte un codice lingua ("en", "it_IT", ...) nella lingua corrispondente
    pub fn from_code(code: &str) -> Option<Self> {
        let lang = code.split(['_', '-']).next().unwrap_or("").to_lowercase();
        match lang.as_str() {
            "en" => Some(Locale::En),
            "it" => Some(Locale::It),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::It => "it",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::It => "Italiano",
        }
    }
}

lazy_static! {
    static ref CURRENT_LOCALE: RwLock<Locale> = RwLock::new(Locale::En);

    static ref IT_CATALOG: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("Projects", "Progetti");
        m.insert("None selected, using all", "Nessuno selezionato, uso tutti");
        m.insert("Update", "Aggiorna");
        m.insert("Close", "Chiudi");
        m.insert("This field is required", "Questo campo è obbligatorio");
        m.insert("Theme", "Tema");
        m.insert("Language", "Lingua");
        m.insert("Settings", "Impostazioni");
        m.insert("Last query", "Ultima query");
        m.insert("Never", "Mai");
        m.insert("Query projects", "Progetti della query");
        m.insert("New option", "Nuova opzione");
        m.insert("Add", "Aggiungi");
        m.insert("Quit", "Esci");
        m.insert("Back", "Indietro");
        m.insert("Select...", "Seleziona...");
        m
    };
}

/// Lingue disponibili, nell'ordine in cui vengono proposte
pub fn available_locales() -> Vec<Locale> {
    vec![Locale::En, Locale::It]
}

/// Imposta la lingua attiva
pub fn set_locale(locale: Locale) {
    if let Ok(mut current) = CURRENT_LOCALE.write() {
        *current = locale;
    }
}

pub fn current_locale() -> Locale {
    CURRENT_LOCALE.read().map(|l| *l).unwrap_or(Locale::En)
}

/// Traduce una chiave nella lingua indicata; le chiavi sconosciute restano invariate
pub fn translate(locale: Locale, key: &str) -> String {
    match locale {
        Locale::En => key.to_string(),
        Locale::It => IT_CATALOG.get(key).copied().unwrap_or(key).to_string(),
    }
}

/// Traduce una chiave nella lingua attiva
pub fn t(key: &str) -> String {
    translate(current_locale(), key)
}

/// Formatta una data come "October 19, 3:04 pm"
pub fn format_date<Tz>(date: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    date.format("%B %-d, %-I:%M %P").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn locale_codes_are_parsed() {
        assert_eq!(Locale::from_code("it_IT"), Some(Locale::It));
        assert_eq!(Locale::from_code("en-US"), Some(Locale::En));
        assert_eq!(Locale::from_code("fr"), None);
    }

    #[test]
    fn unknown_keys_fall_back_to_the_key() {
        assert_eq!(translate(Locale::It, "Update"), "Aggiorna");
        assert_eq!(translate(Locale::It, "Unmapped text"), "Unmapped text");
        assert_eq!(translate(Locale::En, "Update"), "Update");
    }

    #[test]
    fn dates_use_month_day_and_twelve_hour_clock() {
        let date = Utc.with_ymd_and_hms(2026, 10, 19, 15, 4, 0).unwrap();
        assert_eq!(format_date(&date), "October 19, 3:04 pm");
    }
}
