// File: src/ui/components/multi_select_field.rs

//! Campo di selezione multipla controllato
//!
//! Il campo non cambia mai da solo il proprio valore: premendo Invio su una
//! riga emette la nuova selezione tramite `on_change`, e il proprietario la
//! rimanda indietro con `MultiSelectHandle::set_value`.

use std::sync::Arc;

use cursive::Cursive;
use cursive::align::HAlign;
use cursive::traits::*;
use cursive::utils::markup::StyledString;
use cursive::views::{NamedView, SelectView};
use log::debug;

use crate::ui::components::option::{FieldValue, SelectOption};
use crate::ui::components::selection::MultiSelection;
use crate::ui::components::{ChangeCallback, Shared, new_shared};

pub struct MultiSelectField {
    name: String,
    value: MultiSelection<FieldValue>,
    options: Vec<SelectOption>,
    on_change: Option<ChangeCallback<Vec<FieldValue>>>,
}

impl MultiSelectField {
    pub fn new(name: &str) -> Self {
        MultiSelectField {
            name: name.to_string(),
            value: MultiSelection::new(),
            options: Vec::new(),
            on_change: None,
        }
    }

    pub fn value(mut self, value: &[FieldValue]) -> Self {
        self.value = MultiSelection::from_values(value);
        self
    }

    pub fn options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = options;
        self
    }

    pub fn on_change<C>(mut self, callback: C) -> Self
    where
        C: Fn(&mut Cursive, Vec<FieldValue>) + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(callback));
        self
    }

    pub fn get_value(&self) -> &[FieldValue] {
        self.value.values()
    }

    /// Nuova selezione con il valore aggiunto o rimosso
    pub fn toggled(&self, value: &FieldValue) -> Vec<FieldValue> {
        self.value.toggled(value).into_values()
    }

    /// Nome della `SelectView` interna
    pub fn view_name(&self) -> String {
        format!("{}-multiselect", self.name)
    }

    /// Etichetta della riga di un'opzione, con il marcatore di selezione
    pub fn row_label(&self, option: &SelectOption) -> String {
        let marker = if self.value.is_selected(&option.value) { "[x]" } else { "[ ]" };
        format!("{} {}", marker, option.label)
    }

    /// Costruisce la vista e restituisce l'handle per aggiornarla
    pub fn into_view(self) -> (NamedView<SelectView<usize>>, MultiSelectHandle) {
        let name = self.view_name();

        let mut select = SelectView::<usize>::new().h_align(HAlign::Left).autojump();
        for (idx, option) in self.options.iter().enumerate() {
            select.add_item(self.row_label(option), idx);
        }

        let shared = new_shared(self);
        let shared_submit = Arc::clone(&shared);
        select.set_on_submit(move |s, idx: &usize| {
            let (next, listener) = {
                let field = match shared_submit.lock() {
                    Ok(field) => field,
                    Err(_) => return,
                };
                let Some(option) = field.options.get(*idx) else {
                    return;
                };
                (field.toggled(&option.value), field.on_change.clone())
            };

            debug!("Multi-select: nuova selezione {:?}", next);
            if let Some(callback) = listener {
                callback(s, next);
            }
        });

        (select.with_name(name), MultiSelectHandle { inner: shared })
    }
}

/// Riferimento a un multi-select già costruito
#[derive(Clone)]
pub struct MultiSelectHandle {
    inner: Shared<MultiSelectField>,
}

impl MultiSelectHandle {
    /// Valore corrente del campo
    pub fn value(&self) -> Vec<FieldValue> {
        self.inner
            .lock()
            .map(|field| field.get_value().to_vec())
            .unwrap_or_default()
    }

    /// Imposta il valore controllato e aggiorna le righe della vista
    pub fn set_value(&self, siv: &mut Cursive, value: &[FieldValue]) {
        let (name, labels) = {
            let mut field = match self.inner.lock() {
                Ok(field) => field,
                Err(_) => return,
            };
            field.value = MultiSelection::from_values(value);
            let labels: Vec<String> = field.options.iter().map(|o| field.row_label(o)).collect();
            (field.view_name(), labels)
        };

        siv.call_on_name(&name, |view: &mut SelectView<usize>| {
            for (idx, label) in labels.into_iter().enumerate() {
                if let Some((row, _)) = view.get_item_mut(idx) {
                    *row = StyledString::plain(label);
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn projects_field() -> MultiSelectField {
        MultiSelectField::new("projects")
            .options(vec![SelectOption::new(1, "alpha"), SelectOption::new(2, "beta")])
            .value(&[FieldValue::Int(2)])
    }

    #[test]
    fn toggled_does_not_mutate_the_value() {
        let field = projects_field();

        assert_eq!(field.toggled(&FieldValue::Int(1)), vec![FieldValue::Int(2), FieldValue::Int(1)]);
        assert_eq!(field.toggled(&FieldValue::Int(2)), Vec::<FieldValue>::new());
        assert_eq!(field.get_value(), &[FieldValue::Int(2)]);
    }

    #[test]
    fn rows_show_selection_marker() {
        let field = projects_field();

        assert_eq!(field.row_label(&field.options[0]), "[ ] alpha");
        assert_eq!(field.row_label(&field.options[1]), "[x] beta");
        assert_eq!(field.view_name(), "projects-multiselect");
    }

    #[test]
    fn handle_set_value_replaces_selection() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let field = projects_field().on_change(move |_, next| {
            *seen_clone.lock().unwrap() = next;
        });

        let (_view, handle) = field.into_view();
        let mut siv = Cursive::new();
        handle.set_value(&mut siv, &[FieldValue::Int(1), FieldValue::Int(1)]);

        assert_eq!(handle.value(), vec![FieldValue::Int(1)]);
        // Nessun evento emesso da un aggiornamento esterno
        assert!(seen.lock().unwrap().is_empty());
    }
}
