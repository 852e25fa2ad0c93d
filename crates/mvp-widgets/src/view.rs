#![forbid(unsafe_code)]

//! View contracts consumed by widgets.
//!
//! Views are owned by the host scene, not by widgets. A widget keeps an
//! `Rc` to its view and asks it whether it is still alive before handing it
//! out; a view destroyed out of band reports `is_alive() == false`.

use mvp_core::geometry::Transform;

/// Type-independent part of a widget view.
pub trait ViewHandle: 'static {
    /// Stop presenting.
    fn deactivate(&self);

    /// Whether the underlying view object still exists.
    fn is_alive(&self) -> bool {
        true
    }

    /// Placement of the view in its host scene.
    fn transform(&self) -> Transform {
        Transform::IDENTITY
    }
}

/// A view that presents data of type [`WidgetView::Data`].
pub trait WidgetView: ViewHandle {
    type Data: Clone + 'static;

    /// Start presenting `data`.
    fn activate(&self, data: &Self::Data);
}
