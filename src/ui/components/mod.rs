// File: src/ui/components/mod.rs

//! Componenti riutilizzabili per l'interfaccia utente
//!
//! Questo modulo fornisce i campi controllati (select, multi-select) e il
//! dropdown usati dalle viste dell'applicazione.

use std::sync::{Arc, Mutex};

use cursive::Cursive;

pub mod dropdown;
pub mod form_field;
pub mod multi_select_field;
pub mod option;
pub mod select_field;
pub mod selection;

/// Listener chiamato con il nuovo valore di un campo
pub type ChangeCallback<V> = Arc<dyn Fn(&mut Cursive, V) + Send + Sync>;

/// Azione senza argomenti (es. il bottone "Update")
pub type ActionCallback = Arc<dyn Fn(&mut Cursive) + Send + Sync>;

/// Stato condiviso tra una vista e le sue closure
pub type Shared<T> = Arc<Mutex<T>>;

/// Crea un nuovo stato condiviso
pub fn new_shared<T>(value: T) -> Shared<T> {
    Arc::new(Mutex::new(value))
}
