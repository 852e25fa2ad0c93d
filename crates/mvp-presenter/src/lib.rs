#![forbid(unsafe_code)]

//! Screen presenters for the MVP lifecycle framework.
//!
//! | Piece | Role |
//! |---|---|
//! | [`Model`], [`DataModel`] | screen state, activated with [`ScreenParams`] |
//! | [`View`], [`ScreenView`] | host-scene view handles the presenter toggles |
//! | [`PresenterCore`] | model, view, widgets and subscription identity |
//! | [`Screen`] | per-screen hooks |
//! | [`Presenter`] | object-safe state machine driven by a screen router |
//!
//! ```ignore
//! struct Shop { core: PresenterCore<ShopModel, ShopView> }
//!
//! impl Screen for Shop {
//!     type Kind = ScreenKind;
//!     type Model = ShopModel;
//!     type View = ShopView;
//!     fn kind(&self) -> ScreenKind { ScreenKind::Shop }
//!     fn core(&self) -> &PresenterCore<ShopModel, ShopView> { &self.core }
//!     fn core_mut(&mut self) -> &mut PresenterCore<ShopModel, ShopView> { &mut self.core }
//! }
//!
//! let mut shop: Box<dyn Presenter<ScreenKind>> = Box::new(shop);
//! shop.attach_view(view)?;
//! shop.activate();
//! ```

pub mod base;
pub mod error;
pub mod model;
pub mod params;
pub mod presenter;
pub mod state;
pub mod view;

pub use base::PresenterCore;
pub use error::{PresenterError, Result};
pub use model::{DataModel, Model, ModelData};
pub use params::ScreenParams;
pub use presenter::{Presenter, Screen};
pub use state::PresenterState;
pub use view::{ScreenView, View};
