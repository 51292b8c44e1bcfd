//! Modulo per l'interfaccia utente (TUI)
//!
//! Questo modulo gestisce l'interfaccia utente testuale (TUI) dell'applicazione.

pub mod app;
pub mod components;
pub mod project_picker;
pub mod theme;
