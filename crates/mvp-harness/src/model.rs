#![forbid(unsafe_code)]

//! A model that counts and journals its lifecycle.

use mvp_presenter::{Model, ScreenParams};

use crate::journal::{Counter, Journal};

/// Logs `model.activate`, `model.on_show` and `model.deactivate`.
#[derive(Debug, Default)]
pub struct CountingModel {
    journal: Journal,
    activations: Counter,
    shows: Counter,
    deactivations: Counter,
    last_params: Option<ScreenParams>,
}

impl CountingModel {
    #[must_use]
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn activations(&self) -> usize {
        self.activations.get()
    }

    #[must_use]
    pub fn shows(&self) -> usize {
        self.shows.get()
    }

    #[must_use]
    pub fn deactivations(&self) -> usize {
        self.deactivations.get()
    }

    /// Parameters from the latest activation.
    #[must_use]
    pub fn last_params(&self) -> Option<&ScreenParams> {
        self.last_params.as_ref()
    }
}

impl Model for CountingModel {
    fn activate(&mut self, params: Option<&ScreenParams>) {
        self.activations.bump();
        self.last_params = params.cloned();
        self.journal.push("model.activate");
    }

    fn on_show(&mut self) {
        self.shows.bump();
        self.journal.push("model.on_show");
    }

    fn deactivate(&mut self) {
        self.deactivations.bump();
        self.journal.push("model.deactivate");
    }
}
