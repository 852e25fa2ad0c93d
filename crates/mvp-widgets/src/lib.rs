#![forbid(unsafe_code)]

//! Widgets: nested, independently activatable units of UI behavior.
//!
//! - [`Widget`]: the object-safe capability presenters and composites drive.
//! - [`WidgetBehavior`] + [`WidgetBase`]: how concrete widgets are written.
//! - [`ChildWidgets`]: child ownership for composite widgets.
//! - [`WidgetFactory`]: construction through [`Construct`] plus per-type
//!   pooling for spawned widgets.
//! - [`WidgetView`] / [`ViewHandle`]: what a widget needs from its view.
//!
//! All widget handles are `Rc<RefCell<W>>`; a widget is never shared across
//! threads.

pub mod base;
pub mod composite;
pub mod context;
pub mod factory;
pub mod props;
pub mod view;
pub mod widget;

pub use base::WidgetBase;
pub use composite::{Child, ChildWidgets};
pub use context::{Resources, WidgetContext};
pub use factory::{Construct, PooledWidget, WidgetFactory, WidgetFactoryConfig};
pub use props::WidgetProps;
pub use view::{ViewHandle, WidgetView};
pub use widget::{Widget, WidgetBehavior};
