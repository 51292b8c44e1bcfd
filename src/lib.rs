//! Discover: selettore di progetti per le query da terminale
//!
//! Campi select controllati e un selettore di progetti costruiti su cursive.

pub mod config;
pub mod locale;
pub mod logger;
pub mod project;
pub mod ui;
