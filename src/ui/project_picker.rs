//! Selettore dei progetti per le query
//!
//! Mostra un riepilogo dei progetti selezionati come etichetta di un
//! dropdown; il menu contiene un multi-select con tutti i progetti e il
//! bottone "Update" che lancia la query. La selezione appartiene al
//! chiamante: il selettore emette `on_change` e riceve il nuovo valore
//! tramite `PickerHandle::set_value`.

use std::collections::HashSet;
use std::sync::Arc;

use cursive::Cursive;
use cursive::align::HAlign;
use cursive::traits::*;
use cursive::views::{BoxedView, Button, DummyView, LinearLayout, TextView};
use log::{debug, info};

use crate::locale::t;
use crate::project::Project;
use crate::ui::components::dropdown::Dropdown;
use crate::ui::components::multi_select_field::{MultiSelectField, MultiSelectHandle};
use crate::ui::components::option::{FieldValue, SelectOption};
use crate::ui::components::{ActionCallback, ChangeCallback, Shared, new_shared};

/// Nome del dropdown dei progetti
pub const PICKER_NAME: &str = "projects";

/// Nome dell'etichetta sopra il dropdown
const LABEL_NAME: &str = "projects-label";

/// Altezza massima della lista nel menu
const MENU_LIST_HEIGHT: usize = 12;

/// Stato derivato dalla selezione e dai progetti
#[derive(Debug, Clone, PartialEq)]
pub struct PickerModel {
    pub summary: String,
    pub options: Vec<SelectOption>,
}

/// Calcola riepilogo e opzioni a partire da selezione e progetti
pub fn derive_picker(value: &[i64], projects: &[Project]) -> PickerModel {
    let selected: HashSet<i64> = value.iter().copied().collect();

    let slugs: Vec<&str> = projects
        .iter()
        .filter(|p| p.numeric_id().is_some_and(|id| selected.contains(&id)))
        .map(|p| p.slug.as_str())
        .collect();

    let summary = if slugs.is_empty() {
        t("None selected, using all")
    } else {
        slugs.join(", ")
    };

    let options = projects
        .iter()
        .map(|p| {
            let value = match p.numeric_id() {
                Some(id) => FieldValue::Int(id),
                None => FieldValue::Text(p.id.clone()),
            };
            SelectOption::new(value, p.slug.clone())
        })
        .collect();

    PickerModel { summary, options }
}

/// Id selezionati che non corrispondono ad alcun progetto
pub fn stale_ids(value: &[i64], projects: &[Project]) -> Vec<i64> {
    let known: HashSet<i64> = projects.iter().filter_map(Project::numeric_id).collect();
    value.iter().copied().filter(|id| !known.contains(id)).collect()
}

pub struct ProjectPicker {
    value: Vec<i64>,
    projects: Vec<Project>,
    on_change: Option<ChangeCallback<Vec<i64>>>,
    run_query: Option<ActionCallback>,
    /// Multi-select del menu, quando il menu è stato aperto
    menu: Option<MultiSelectHandle>,
}

impl ProjectPicker {
    pub fn new(projects: Vec<Project>, value: Vec<i64>) -> Self {
        ProjectPicker {
            value,
            projects,
            on_change: None,
            run_query: None,
            menu: None,
        }
    }

    pub fn on_change<C>(mut self, callback: C) -> Self
    where
        C: Fn(&mut Cursive, Vec<i64>) + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(callback));
        self
    }

    pub fn run_query<C>(mut self, callback: C) -> Self
    where
        C: Fn(&mut Cursive) + Send + Sync + 'static,
    {
        self.run_query = Some(Arc::new(callback));
        self
    }

    pub fn value(&self) -> &[i64] {
        &self.value
    }

    pub fn model(&self) -> PickerModel {
        derive_picker(&self.value, &self.projects)
    }

    pub fn summary(&self) -> String {
        self.model().summary
    }

    pub fn options(&self) -> Vec<SelectOption> {
        self.model().options
    }

    /// Propaga una nuova selezione al proprietario
    pub fn change(&self, siv: &mut Cursive, next: Vec<i64>) {
        debug!("Selezione progetti richiesta: {:?}", next);
        if let Some(callback) = &self.on_change {
            callback(siv, next);
        }
    }

    /// Lancia la query, indipendentemente dalla selezione
    pub fn apply(&self, siv: &mut Cursive) {
        info!("Query richiesta sui progetti {:?}", self.value);
        if let Some(callback) = &self.run_query {
            callback(siv);
        }
    }

    /// Costruisce la vista e restituisce l'handle del selettore
    pub fn into_view(self) -> (LinearLayout, PickerHandle) {
        let summary = self.summary();
        let handle = PickerHandle {
            inner: new_shared(self),
        };

        let menu_handle = handle.clone();
        let dropdown = Dropdown::new(PICKER_NAME, &summary, move || menu_handle.build_menu())
            .keep_open(true)
            .anchor_right(true);

        let layout = LinearLayout::vertical()
            .child(TextView::new(t("Projects")).h_align(HAlign::Right).with_name(LABEL_NAME))
            .child(
                LinearLayout::horizontal()
                    .child(DummyView.full_width())
                    .child(dropdown.into_view()),
            );

        (layout, handle)
    }
}

/// Riferimento condiviso a un selettore già costruito
#[derive(Clone)]
pub struct PickerHandle {
    inner: Shared<ProjectPicker>,
}

impl PickerHandle {
    pub fn value(&self) -> Vec<i64> {
        self.inner
            .lock()
            .map(|picker| picker.value.clone())
            .unwrap_or_default()
    }

    pub fn summary(&self) -> String {
        self.inner
            .lock()
            .map(|picker| picker.summary())
            .unwrap_or_default()
    }

    /// Imposta la selezione controllata e aggiorna etichetta e menu
    pub fn set_value(&self, siv: &mut Cursive, value: Vec<i64>) {
        let (summary, menu) = {
            let mut picker = match self.inner.lock() {
                Ok(picker) => picker,
                Err(_) => return,
            };
            picker.value = value.clone();
            (picker.summary(), picker.menu.clone())
        };

        Dropdown::set_title(siv, PICKER_NAME, &summary);
        if let Some(menu) = menu {
            menu.set_value(siv, &to_field_values(&value));
        }
    }

    /// Ridisegna etichetta e riepilogo, ad esempio dopo un cambio di lingua
    pub fn refresh(&self, siv: &mut Cursive) {
        siv.call_on_name(LABEL_NAME, |view: &mut TextView| view.set_content(t("Projects")));
        let value = self.value();
        self.set_value(siv, value);
    }

    /// Come `ProjectPicker::change`, senza tenere il lock durante il callback
    pub fn change(&self, siv: &mut Cursive, next: Vec<i64>) {
        let callback = match self.inner.lock() {
            Ok(picker) => picker.on_change.clone(),
            Err(_) => return,
        };
        if let Some(callback) = callback {
            callback(siv, next);
        }
    }

    /// Come `ProjectPicker::apply`, senza tenere il lock durante il callback
    pub fn apply(&self, siv: &mut Cursive) {
        let callback = match self.inner.lock() {
            Ok(picker) => {
                info!("Query richiesta sui progetti {:?}", picker.value);
                picker.run_query.clone()
            }
            Err(_) => return,
        };
        if let Some(callback) = callback {
            callback(siv);
        }
    }

    fn build_menu(&self) -> BoxedView {
        let field = match self.inner.lock() {
            Ok(picker) => MultiSelectField::new(PICKER_NAME)
                .value(&to_field_values(&picker.value))
                .options(picker.options()),
            Err(_) => MultiSelectField::new(PICKER_NAME),
        };

        let change_handle = self.clone();
        let field = field.on_change(move |s, values| {
            // Gli id non numerici non possono corrispondere a una selezione
            let next: Vec<i64> = values.iter().filter_map(FieldValue::as_int).collect();
            if next == change_handle.value() {
                debug!("Selezione progetti invariata, nessun evento");
                return;
            }
            change_handle.change(s, next);
        });

        let (list, menu) = field.into_view();
        if let Ok(mut picker) = self.inner.lock() {
            picker.menu = Some(menu);
        }

        let apply_handle = self.clone();
        let update = Button::new(t("Update"), move |s| apply_handle.apply(s));

        BoxedView::boxed(
            LinearLayout::vertical()
                .child(TextView::new(t("Query projects")))
                .child(list.scrollable().max_height(MENU_LIST_HEIGHT))
                .child(DummyView.fixed_height(1))
                .child(update),
        )
    }
}

fn to_field_values(value: &[i64]) -> Vec<FieldValue> {
    value.iter().copied().map(FieldValue::Int).collect()
}
