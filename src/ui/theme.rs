//! Gestione dei temi per l'interfaccia utente (TUI)
//!
//! Questo modulo fornisce la personalizzazione dell'aspetto dell'interfaccia utente.

use cursive::theme::{BaseColor, BorderStyle, Color, Palette, PaletteColor, Theme};

use crate::ui::components::option::{Choice, FieldValue};

/// Nomi dei temi disponibili
pub const THEME_NAMES: [&str; 3] = ["default", "dark", "high_contrast"];

/// Costruisce un tema a partire dai colori principali
fn build_theme(background: Color, primary: Color, accent: Color, secondary: Color, borders: BorderStyle) -> Theme {
    let mut theme = Theme::default();
    let mut palette = Palette::default();

    // Colori del testo e dello sfondo
    palette[PaletteColor::Background] = background;
    palette[PaletteColor::View] = background;
    palette[PaletteColor::Primary] = primary;

    // Titoli ed elementi evidenziati (il trigger del dropdown usa Highlight)
    palette[PaletteColor::TitlePrimary] = accent;
    palette[PaletteColor::Secondary] = secondary;
    palette[PaletteColor::Highlight] = accent;
    palette[PaletteColor::HighlightInactive] = secondary;

    theme.borders = borders;
    theme.palette = palette;
    theme
}

/// Ottiene un tema di default per l'applicazione
pub fn default_theme() -> Theme {
    build_theme(
        Color::TerminalDefault,
        Color::Dark(BaseColor::White),
        Color::Dark(BaseColor::Magenta),
        Color::Dark(BaseColor::Blue),
        BorderStyle::Simple,
    )
}

/// Tema dark mode
pub fn dark_theme() -> Theme {
    build_theme(
        Color::Dark(BaseColor::Black),
        Color::Light(BaseColor::White),
        Color::Light(BaseColor::Magenta),
        Color::Light(BaseColor::Blue),
        BorderStyle::Simple,
    )
}

/// Tema high contrast
pub fn high_contrast_theme() -> Theme {
    build_theme(
        Color::Dark(BaseColor::Black),
        Color::Light(BaseColor::White),
        Color::Light(BaseColor::Yellow),
        Color::Light(BaseColor::White),
        BorderStyle::Outset,
    )
}

/// Ottiene un tema in base al nome
pub fn get_theme(name: &str) -> Theme {
    match name.to_lowercase().as_str() {
        "dark" => dark_theme(),
        "high_contrast" => high_contrast_theme(),
        _ => default_theme(),
    }
}

/// Temi disponibili come scelte per un campo select
pub fn theme_choices() -> Vec<Choice> {
    THEME_NAMES
        .iter()
        .map(|name| (FieldValue::from(*name), name.replace('_', " ")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_theme_falls_back_to_default() {
        assert_eq!(get_theme("nope").borders, default_theme().borders);
        assert_eq!(get_theme("HIGH_CONTRAST").borders, BorderStyle::Outset);
    }

    #[test]
    fn choices_cover_every_theme() {
        let choices = theme_choices();
        assert_eq!(choices.len(), THEME_NAMES.len());
        assert_eq!(choices[2], (FieldValue::from("high_contrast"), "high contrast".to_string()));
    }
}
