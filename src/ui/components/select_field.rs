// File: src/ui/components/select_field.rs

//! Campo di selezione a valore singolo
//!
//! Traduce l'opzione scelta nella `SelectView` nel valore scalare del campo
//! controllato sottostante, poi avvisa l'eventuale listener esterno.

use std::sync::{Arc, Mutex};

use cursive::Cursive;
use cursive::align::HAlign;
use cursive::traits::*;
use cursive::views::{Button, DummyView, EditView, LinearLayout, SelectView, TextView};
use log::debug;

use crate::locale::t;
use crate::ui::components::form_field::{ControlledField, FormField};
use crate::ui::components::option::{Choice, FieldValue, SelectOption};
use crate::ui::components::ChangeCallback;

/// Larghezza della riga per la creazione di nuove opzioni
const NEW_OPTION_WIDTH: usize = 24;

/// Campo select controllato
pub struct SelectField<F = FormField<FieldValue>>
where
    F: ControlledField<Value = FieldValue>,
{
    field: F,
    options: Vec<SelectOption>,
    choices: Vec<Choice>,
    /// Opzioni create dall'utente, in coda alle altre
    created: Vec<SelectOption>,
    clearable: bool,
    creatable: bool,
    placeholder: Option<String>,
    disabled: bool,
    required: bool,
    /// Il campo è impilato in un form: lascia una riga vuota sotto
    stacked: bool,
    /// Il campo è già racchiuso in un gruppo che gestisce la spaziatura
    in_control_group: bool,
    on_change: Option<ChangeCallback<Option<FieldValue>>>,
}

impl<F> SelectField<F>
where
    F: ControlledField<Value = FieldValue> + 'static,
{
    pub fn new(field: F) -> Self {
        SelectField {
            field,
            options: Vec::new(),
            choices: Vec::new(),
            created: Vec::new(),
            clearable: true,
            creatable: false,
            placeholder: None,
            disabled: false,
            required: false,
            stacked: false,
            in_control_group: false,
            on_change: None,
        }
    }

    pub fn options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = options;
        self
    }

    pub fn choices(mut self, choices: Vec<Choice>) -> Self {
        self.choices = choices;
        self
    }

    pub fn clearable(mut self, clearable: bool) -> Self {
        self.clearable = clearable;
        self
    }

    pub fn creatable(mut self, creatable: bool) -> Self {
        self.creatable = creatable;
        self
    }

    pub fn placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn stacked(mut self, stacked: bool) -> Self {
        self.stacked = stacked;
        self
    }

    pub fn in_control_group(mut self, in_control_group: bool) -> Self {
        self.in_control_group = in_control_group;
        self
    }

    /// Registra il listener chiamato dopo ogni cambio di valore
    pub fn on_change<C>(mut self, callback: C) -> Self
    where
        C: Fn(&mut Cursive, Option<FieldValue>) + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(callback));
        self
    }

    pub fn field(&self) -> &F {
        &self.field
    }

    /// Opzioni strutturate, poi le scelte grezze, poi le opzioni create
    ///
    /// Le posizioni esistenti non cambiano quando si crea un'opzione.
    pub fn resolved_options(&self) -> Vec<SelectOption> {
        self.options
            .iter()
            .cloned()
            .chain(self.choices.iter().cloned().map(SelectOption::from))
            .chain(self.created.iter().cloned())
            .collect()
    }

    /// Applica l'opzione scelta (o la cancellazione) al campo sottostante
    pub fn handle_change(&mut self, option: Option<&SelectOption>) -> Option<FieldValue> {
        let value = option.map(|o| o.value.clone());
        debug!("Select {}: nuovo valore {:?}", self.field.id(), value);
        self.field.set_value(value.clone());
        value
    }

    /// Avvisa il listener esterno, se presente
    pub fn notify(&self, siv: &mut Cursive, value: Option<FieldValue>) {
        if let Some(callback) = &self.on_change {
            callback(siv, value);
        }
    }

    /// Crea un'opzione ad-hoc; con la stessa etichetta riusa quella esistente
    pub fn create_option(&mut self, label: &str) -> Option<SelectOption> {
        let label = label.trim();
        if !self.creatable || label.is_empty() {
            return None;
        }

        if let Some(existing) = self.resolved_options().into_iter().find(|o| o.label == label) {
            return Some(existing);
        }

        let option = SelectOption::new(label, label);
        self.created.push(option.clone());
        Some(option)
    }

    /// Posizione del valore corrente tra le opzioni risolte
    pub fn selected_index(&self) -> Option<usize> {
        let current = self.field.value()?;
        self.resolved_options().iter().position(|o| &o.value == current)
    }

    fn listener(&self) -> Option<ChangeCallback<Option<FieldValue>>> {
        self.on_change.clone()
    }

    /// Nome della `SelectView` interna
    pub fn select_name(&self) -> String {
        format!("{}-select", self.field.id())
    }

    /// Costruisce la vista del campo
    pub fn into_view(self) -> LinearLayout {
        let select_name = self.select_name();
        let new_option_name = format!("{}-new", self.field.id());
        let add_name = format!("{}-add", self.field.id());
        let clearable = self.clearable;
        let creatable = self.creatable;
        let offset = if clearable { 1 } else { 0 };

        let mut select = SelectView::<Option<usize>>::new().h_align(HAlign::Left);
        if clearable {
            let placeholder = self.placeholder.clone().unwrap_or_else(|| t("Select..."));
            select.add_item(placeholder, None);
        }
        for (idx, option) in self.resolved_options().iter().enumerate() {
            select.add_item(option.label.clone(), Some(idx));
        }
        if let Some(idx) = self.selected_index() {
            select = select.selected(idx + offset);
        }
        select.set_enabled(!self.disabled);

        let label = self.field.display_label().unwrap_or_else(|| self.field.id());
        let title = if self.required { format!("{} *", label) } else { label };
        let spacing = self.stacked && !self.in_control_group;
        let disabled = self.disabled;

        let shared = Arc::new(Mutex::new(self));

        let shared_submit = Arc::clone(&shared);
        select.set_on_submit(move |s, item: &Option<usize>| {
            // Rilascia il lock prima di chiamare il listener
            let (value, listener) = {
                let mut field = match shared_submit.lock() {
                    Ok(field) => field,
                    Err(_) => return,
                };
                let options = field.resolved_options();
                let option = item.and_then(|idx| options.get(idx).cloned());
                (field.handle_change(option.as_ref()), field.listener())
            };

            if let Some(callback) = listener {
                callback(s, value);
            }
        });

        let mut layout = LinearLayout::vertical()
            .child(TextView::new(title))
            .child(select.with_name(select_name.clone()));

        if creatable && !disabled {
            let shared_create = Arc::clone(&shared);
            let input_name = new_option_name.clone();
            let add_button = Button::new(t("Add"), move |s| {
                let label = s
                    .call_on_name(&input_name, |view: &mut EditView| view.get_content())
                    .map(|content| content.to_string())
                    .unwrap_or_default();

                let (option, index, value, listener) = {
                    let mut field = match shared_create.lock() {
                        Ok(field) => field,
                        Err(_) => return,
                    };
                    let Some(option) = field.create_option(&label) else {
                        return;
                    };
                    let Some(index) = field.resolved_options().iter().position(|o| *o == option) else {
                        return;
                    };
                    let value = field.handle_change(Some(&option));
                    (option, index, value, field.listener())
                };

                s.call_on_name(&select_name, |view: &mut SelectView<Option<usize>>| {
                    if view.iter().all(|(_, item)| *item != Some(index)) {
                        view.add_item(option.label.clone(), Some(index));
                    }
                    let _ = view.set_selection(index + offset);
                });
                s.call_on_name(&input_name, |view: &mut EditView| {
                    view.set_content("");
                });

                if let Some(callback) = listener {
                    callback(s, value);
                }
            });

            layout.add_child(
                LinearLayout::horizontal()
                    .child(TextView::new(format!("{}: ", t("New option"))))
                    .child(EditView::new().with_name(new_option_name).fixed_width(NEW_OPTION_WIDTH))
                    .child(DummyView.fixed_width(1))
                    .child(add_button.with_name(add_name)),
            );
        }

        if spacing {
            layout.add_child(DummyView.fixed_height(1));
        }

        layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use cursive::event::{Event, EventResult, Key};

    fn theme_field() -> SelectField {
        SelectField::new(FormField::new("theme"))
            .options(vec![SelectOption::new("default", "Default")])
            .choices(vec![(FieldValue::from("dark"), "Dark".to_string())])
    }

    #[test]
    fn forwarded_value_is_the_option_value() {
        let mut select = theme_field();
        let option = SelectOption::new(7, "seven");

        let value = select.handle_change(Some(&option));

        assert_eq!(value, Some(FieldValue::Int(7)));
        assert_eq!(select.field().value(), Some(&FieldValue::Int(7)));
    }

    #[test]
    fn clearing_forwards_none() {
        let mut select = theme_field();
        select.handle_change(Some(&SelectOption::new("dark", "Dark")));

        assert_eq!(select.handle_change(None), None);
        assert_eq!(select.field().value(), None);
    }

    #[test]
    fn options_come_before_choices() {
        let select = theme_field();
        let labels: Vec<String> = select.resolved_options().into_iter().map(|o| o.label).collect();

        assert_eq!(labels, vec!["Default", "Dark"]);
        assert!(select.clearable);
    }

    #[test]
    fn selected_index_follows_the_field_value() {
        let select = SelectField::new(FormField::new("theme").initial(Some(FieldValue::from("dark"))))
            .options(vec![SelectOption::new("default", "Default")])
            .choices(vec![(FieldValue::from("dark"), "Dark".to_string())]);

        assert_eq!(select.selected_index(), Some(1));
    }

    #[test]
    fn create_option_requires_creatable() {
        let mut select = theme_field();
        assert_eq!(select.create_option("solarized"), None);

        let mut select = theme_field().creatable(true);
        let created = select.create_option(" solarized ").unwrap();
        assert_eq!(created, SelectOption::new("solarized", "solarized"));
        assert_eq!(select.resolved_options().len(), 3);

        // Stessa etichetta: nessun duplicato
        let again = select.create_option("Dark").unwrap();
        assert_eq!(again.value, FieldValue::from("dark"));
        assert_eq!(select.resolved_options().len(), 3);
        assert_eq!(select.create_option("   "), None);
    }

    #[test]
    fn notify_calls_the_listener_with_the_value() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(None));

        let calls_clone = Arc::clone(&calls);
        let seen_clone = Arc::clone(&seen);
        let mut select = theme_field().on_change(move |_, value| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
            *seen_clone.lock().unwrap() = value;
        });

        let mut siv = Cursive::new();
        let value = select.handle_change(Some(&SelectOption::new("dark", "Dark")));
        select.notify(&mut siv, value);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*seen.lock().unwrap(), Some(FieldValue::from("dark")));
    }

    #[test]
    fn required_select_reports_missing_value() {
        let mut select = SelectField::new(FormField::new("locale").required(true)).required(true);
        select.handle_change(None);

        assert_eq!(select.field().error(), Some("This field is required"));
    }

    #[test]
    fn created_option_keeps_existing_rows_in_place() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let select = theme_field()
            .creatable(true)
            .on_change(move |_, value| seen_clone.lock().unwrap().push(value));

        let mut siv = Cursive::new();
        siv.add_layer(select.into_view());

        siv.call_on_name("id-theme-new", |view: &mut EditView| {
            let _ = view.set_content("solarized");
        });
        let pressed = siv
            .call_on_name("id-theme-add", |button: &mut Button| button.on_event(Event::Key(Key::Enter)))
            .unwrap_or(EventResult::Ignored);
        pressed.process(&mut siv);

        let rows = siv
            .call_on_name("id-theme-select", |view: &mut SelectView<Option<usize>>| {
                let rows: Vec<(String, Option<usize>)> =
                    view.iter().map(|(label, item)| (label.to_string(), *item)).collect();
                (rows, view.selected_id())
            })
            .unwrap();
        assert_eq!(
            rows.0,
            vec![
                ("Select...".to_string(), None),
                ("Default".to_string(), Some(0)),
                ("Dark".to_string(), Some(1)),
                ("solarized".to_string(), Some(2)),
            ]
        );
        assert_eq!(rows.1, Some(3));

        // La riga "Dark" inoltra ancora il proprio valore
        let result = siv
            .call_on_name("id-theme-select", |view: &mut SelectView<Option<usize>>| {
                let _ = view.set_selection(2);
                view.on_event(Event::Key(Key::Enter))
            })
            .unwrap_or(EventResult::Ignored);
        result.process(&mut siv);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![Some(FieldValue::from("solarized")), Some(FieldValue::from("dark"))]
        );
    }
}
