// File: src/ui/components/form_field.rs

//! Capacità comune dei campi controllati di un form
//!
//! I campi concreti (select, multi-select) non estendono una classe base:
//! possiedono un valore che implementa `ControlledField` e vi delegano
//! identificatore, valore corrente e validazione.

use log::debug;

use crate::locale::t;

/// Campo il cui valore è sempre guidato dall'esterno
pub trait ControlledField: Send {
    type Value: Clone + PartialEq;

    /// Identificatore stabile del campo
    fn id(&self) -> String;

    /// Valore corrente
    fn value(&self) -> Option<&Self::Value>;

    /// Imposta il valore corrente; è l'unica fonte di verità del campo
    fn set_value(&mut self, value: Option<Self::Value>);

    /// Etichetta da mostrare sopra il campo
    fn display_label(&self) -> Option<String> {
        None
    }
}

/// Implementazione di base di un campo: valore, stato "dirty" e validazione
#[derive(Debug, Clone)]
pub struct FormField<V> {
    name: String,
    label: Option<String>,
    help: Option<String>,
    required: bool,
    disabled: bool,
    value: Option<V>,
    initial: Option<V>,
    error: Option<String>,
}

impl<V: Clone + PartialEq> FormField<V> {
    pub fn new(name: &str) -> Self {
        FormField {
            name: name.to_string(),
            label: None,
            help: None,
            required: false,
            disabled: false,
            value: None,
            initial: None,
            error: None,
        }
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Valore iniziale, usato anche da `reset`
    pub fn initial(mut self, value: Option<V>) -> Self {
        self.initial = value.clone();
        self.value = value;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get_label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn get_help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Il valore differisce da quello iniziale
    pub fn is_dirty(&self) -> bool {
        self.value != self.initial
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Ricalcola l'errore di validazione
    pub fn validate(&mut self) -> bool {
        self.error = if self.required && self.value.is_none() {
            Some(t("This field is required"))
        } else {
            None
        };
        self.error.is_none()
    }

    /// Ripristina il valore iniziale
    pub fn reset(&mut self) {
        self.value = self.initial.clone();
        self.error = None;
    }
}

impl<V: Clone + PartialEq + Send> ControlledField for FormField<V> {
    type Value = V;

    fn id(&self) -> String {
        format!("id-{}", self.name)
    }

    fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    fn set_value(&mut self, value: Option<V>) {
        self.value = value;
        self.validate();
        debug!("Campo {} aggiornato (dirty: {})", self.name, self.is_dirty());
    }

    fn display_label(&self) -> Option<String> {
        Some(self.label.clone().unwrap_or_else(|| self.name.clone()))
    }
}
