// File: src/ui/components/option.rs

//! Valori e opzioni per i campi di selezione
//!
//! Un'opzione è una coppia valore/etichetta; il valore è un identificatore
//! stabile (numerico o testuale), l'etichetta è il testo mostrato.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Valore primitivo gestito dai campi di un form
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Text(String),
}

impl FieldValue {
    /// Restituisce il valore numerico, se presente
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Int(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(n) => write!(f, "{}", n),
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Int(n)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

/// Una scelta selezionabile in una lista
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: FieldValue,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<FieldValue>, label: impl Into<String>) -> Self {
        SelectOption {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Coppia grezza valore/etichetta, alternativa alle opzioni strutturate
pub type Choice = (FieldValue, String);

impl From<Choice> for SelectOption {
    fn from((value, label): Choice) -> Self {
        SelectOption { value, label }
    }
}
