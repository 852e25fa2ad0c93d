#![forbid(unsafe_code)]

//! Screen models.
//!
//! A [`Model`] is activated by its presenter on every transition out of
//! `NotInitialized`/`Inactive`, told when a hidden screen is shown again, and
//! deactivated on teardown. [`DataModel`] adapts a [`ModelData`] source whose
//! data is created once and re-initialised on every activation.

use std::fmt;

use crate::params::ScreenParams;

/// Model driven by a presenter.
pub trait Model: 'static {
    fn activate(&mut self, params: Option<&ScreenParams>);

    /// A hidden screen is being shown again.
    fn on_show(&mut self) {}

    fn deactivate(&mut self) {}
}

/// Source of a [`DataModel`]'s data.
pub trait ModelData: 'static {
    type Data;

    /// Build the data. Runs once, on the first activation.
    fn create_data(&mut self) -> Self::Data;

    /// Prepare the data for a new activation.
    fn init_data(&mut self, data: &mut Self::Data, params: Option<&ScreenParams>);

    fn deactivate(&mut self, _data: &mut Self::Data) {}
}

/// A model whose data is created lazily and re-initialised per activation.
pub struct DataModel<S: ModelData> {
    source: S,
    data: Option<S::Data>,
    open_params: Option<ScreenParams>,
}

impl<S: ModelData> fmt::Debug for DataModel<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataModel")
            .field("source", &std::any::type_name::<S>())
            .field("created", &self.data.is_some())
            .field("open_params", &self.open_params)
            .finish()
    }
}

impl<S: ModelData> DataModel<S> {
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source,
            data: None,
            open_params: None,
        }
    }

    /// The data, once the model has been activated.
    #[must_use]
    pub fn data(&self) -> Option<&S::Data> {
        self.data.as_ref()
    }

    pub fn data_mut(&mut self) -> Option<&mut S::Data> {
        self.data.as_mut()
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Parameters from the latest activation.
    #[must_use]
    pub fn open_params(&self) -> Option<&ScreenParams> {
        self.open_params.as_ref()
    }
}

impl<S: ModelData> Model for DataModel<S> {
    fn activate(&mut self, params: Option<&ScreenParams>) {
        self.open_params = params.cloned();
        let data = self
            .data
            .get_or_insert_with(|| self.source.create_data());
        self.source.init_data(data, self.open_params.as_ref());
    }

    fn deactivate(&mut self) {
        if let Some(data) = self.data.as_mut() {
            self.source.deactivate(data);
        }
    }
}
