#![forbid(unsafe_code)]

//! Screen view collaborators.
//!
//! Views belong to the host scene; the presenter only toggles them. Methods
//! take `&self` so hosts keep their own interior state.

use mvp_core::geometry::Transform;

/// A view object in the host scene.
pub trait View: 'static {
    fn set_active(&self, active: bool);

    fn is_active(&self) -> bool;

    fn transform(&self) -> Transform;

    /// Replace the host transform.
    fn apply_transform(&self, transform: Transform);

    /// Move to `position`; `rotation` is applied only when it is not the
    /// identity, so an unrotated move keeps the current rotation.
    fn set_transform(&self, position: [f32; 3], rotation: [f32; 4]) {
        let mut transform = self.transform();
        transform.position = position;
        if rotation != Transform::IDENTITY_ROTATION {
            transform.rotation = rotation;
        }
        self.apply_transform(transform);
    }

    /// Remove the view from the host scene.
    fn destroy(&self) {
        self.set_active(false);
    }
}

/// The root view of a screen.
pub trait ScreenView: View {
    fn on_activate(&self) {}

    fn on_deactivate(&self) {}

    fn show(&self) {
        self.set_active(true);
        self.on_activate();
    }

    fn hide(&self) {
        self.set_active(false);
        self.on_deactivate();
    }
}
