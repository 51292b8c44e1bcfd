// File: src/ui/components/dropdown.rs

//! Dropdown con etichetta di attivazione e menu a comparsa
//!
//! Il contenuto del menu viene ricostruito a ogni apertura.

use std::sync::Arc;

use cursive::Cursive;
use cursive::event::{Event, EventResult, Key};
use cursive::traits::*;
use cursive::view::Position;
use cursive::views::{BoxedView, Button, Dialog, OnEventView};

use crate::locale::t;

/// Larghezza predefinita del menu
const MENU_WIDTH: usize = 40;

type ContentBuilder = Arc<dyn Fn() -> BoxedView + Send + Sync>;

pub struct Dropdown {
    name: String,
    title: String,
    /// Le interazioni nel menu non lo chiudono; si chiude solo con "Close"
    keep_open: bool,
    /// Il menu si apre allineato al bordo destro dello schermo
    anchor_right: bool,
    width: usize,
    content: ContentBuilder,
}

impl Dropdown {
    pub fn new<C>(name: &str, title: &str, content: C) -> Self
    where
        C: Fn() -> BoxedView + Send + Sync + 'static,
    {
        Dropdown {
            name: name.to_string(),
            title: title.to_string(),
            keep_open: false,
            anchor_right: false,
            width: MENU_WIDTH,
            content: Arc::new(content),
        }
    }

    pub fn keep_open(mut self, keep_open: bool) -> Self {
        self.keep_open = keep_open;
        self
    }

    pub fn anchor_right(mut self, anchor_right: bool) -> Self {
        self.anchor_right = anchor_right;
        self
    }

    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Nome del bottone di attivazione
    pub fn trigger_name(name: &str) -> String {
        format!("{}-trigger", name)
    }

    /// Nome del layer del menu aperto
    pub fn menu_name(name: &str) -> String {
        format!("{}-menu", name)
    }

    /// Testo del bottone di attivazione
    pub fn trigger_label(title: &str) -> String {
        format!("{} ▾", title)
    }

    /// Aggiorna l'etichetta di attivazione
    pub fn set_title(siv: &mut Cursive, name: &str, title: &str) {
        let label = Dropdown::trigger_label(title);
        siv.call_on_name(&Dropdown::trigger_name(name), |button: &mut Button| {
            button.set_label_raw(label);
        });
    }

    pub fn is_open(siv: &mut Cursive, name: &str) -> bool {
        siv.screen_mut()
            .find_layer_from_name(&Dropdown::menu_name(name))
            .is_some()
    }

    /// Chiude il menu, se aperto
    pub fn close(siv: &mut Cursive, name: &str) {
        let menu_name = Dropdown::menu_name(name);
        if let Some(position) = siv.screen_mut().find_layer_from_name(&menu_name) {
            siv.screen_mut().remove_layer(position);
        }
    }

    fn open(&self, siv: &mut Cursive) {
        if Dropdown::is_open(siv, &self.name) {
            return;
        }

        let name = self.name.clone();
        let content = (self.content)();
        let content = if self.keep_open {
            content
        } else {
            // Chiude il menu dopo che il contenuto ha gestito l'Invio
            let name = name.clone();
            BoxedView::boxed(OnEventView::new(content).on_pre_event_inner(
                Event::Key(Key::Enter),
                move |inner, event| {
                    let name = name.clone();
                    let result = inner.on_event(event.clone());
                    Some(result.and(EventResult::with_cb(move |s| Dropdown::close(s, &name))))
                },
            ))
        };

        let close_name = name.clone();
        let menu = Dialog::around(content)
            .button(t("Close"), move |s| Dropdown::close(s, &close_name))
            .fixed_width(self.width)
            .with_name(Dropdown::menu_name(&name));

        if self.anchor_right {
            let x = siv.screen_size().x.saturating_sub(self.width + 1);
            siv.screen_mut().add_layer_at(Position::absolute((x, 1)), menu);
        } else {
            siv.add_layer(menu);
        }
    }

    /// Costruisce il bottone di attivazione
    pub fn into_view(self) -> impl View {
        let trigger_name = Dropdown::trigger_name(&self.name);
        let label = Dropdown::trigger_label(&self.title);
        Button::new_raw(label, move |s| self.open(s)).with_name(trigger_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cursive::views::TextView;

    #[test]
    fn names_are_derived_from_the_dropdown_name() {
        assert_eq!(Dropdown::trigger_name("projects"), "projects-trigger");
        assert_eq!(Dropdown::menu_name("projects"), "projects-menu");
        assert_eq!(Dropdown::trigger_label("alpha, beta"), "alpha, beta ▾");
    }

    #[test]
    fn open_and_close_manage_the_menu_layer() {
        let dropdown = Dropdown::new("projects", "alpha", || BoxedView::boxed(TextView::new("menu")))
            .keep_open(true);
        let mut siv = Cursive::new();

        dropdown.open(&mut siv);
        assert!(Dropdown::is_open(&mut siv, "projects"));

        // Una seconda apertura non duplica il menu
        dropdown.open(&mut siv);
        Dropdown::close(&mut siv, "projects");
        assert!(!Dropdown::is_open(&mut siv, "projects"));
    }
}
