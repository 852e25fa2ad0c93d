#![forbid(unsafe_code)]

//! Child widget ownership for composite widgets.
//!
//! A composite embeds a [`ChildWidgets`] and returns it from
//! [`WidgetBehavior::children`](crate::WidgetBehavior::children). Children
//! are created during the composite's own activation and released when it
//! deactivates: pooled children go back to the factory, owned children are
//! dropped.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use mvp_core::owner::OwnerId;

use crate::factory::{Construct, PooledWidget, WidgetFactory};
use crate::props::WidgetProps;
use crate::widget::Widget;

/// One child of a composite.
#[derive(Clone)]
pub enum Child {
    /// Created with `create`; dropped on release.
    Owned(Rc<RefCell<dyn Widget>>),
    /// Spawned from the factory; despawned on release.
    Pooled(PooledWidget),
}

impl Child {
    #[must_use]
    pub fn widget(&self) -> &Rc<RefCell<dyn Widget>> {
        match self {
            Self::Owned(widget) => widget,
            Self::Pooled(pooled) => pooled.widget(),
        }
    }

    #[must_use]
    pub fn owner_id(&self) -> OwnerId {
        self.widget().borrow().owner_id()
    }

    #[must_use]
    pub fn is_pooled(&self) -> bool {
        matches!(self, Self::Pooled(_))
    }
}

impl fmt::Debug for Child {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_pooled() { "Pooled" } else { "Owned" };
        f.debug_tuple(kind).field(&self.owner_id()).finish()
    }
}

/// Ordered children of a composite widget.
pub struct ChildWidgets {
    factory: WidgetFactory,
    entries: Vec<Child>,
    inherited_props: Option<WidgetProps>,
}

impl fmt::Debug for ChildWidgets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildWidgets")
            .field("entries", &self.entries)
            .finish()
    }
}

impl ChildWidgets {
    #[must_use]
    pub fn new(factory: WidgetFactory) -> Self {
        Self {
            factory,
            entries: Vec::new(),
            inherited_props: None,
        }
    }

    /// Construct an owned child. Without explicit `props` the child gets the
    /// composite's props.
    pub fn create<W: Widget + Construct>(&mut self, props: Option<WidgetProps>) -> Rc<RefCell<W>> {
        let widget = self.factory.create::<W>();
        widget
            .borrow_mut()
            .set_props(props.or_else(|| self.inherited_props.clone()));
        self.entries.push(Child::Owned(Rc::clone(&widget) as _));
        widget
    }

    /// Spawn a pooled child. Without explicit `props` the child gets the
    /// composite's props.
    pub fn spawn<W: Widget + Construct>(&mut self, props: Option<WidgetProps>) -> Rc<RefCell<W>> {
        let widget = self.factory.spawn::<W>();
        widget
            .borrow_mut()
            .set_props(props.or_else(|| self.inherited_props.clone()));
        self.entries
            .push(Child::Pooled(PooledWidget::new(Rc::clone(&widget))));
        widget
    }

    /// Remove one child, deactivate it and despawn it when pooled. Returns
    /// `false` if no child has that owner id.
    ///
    /// [`WidgetBehavior::remove_child`](crate::WidgetBehavior::remove_child)
    /// does the same and also runs the composite's hook.
    pub fn remove(&mut self, owner: OwnerId) -> bool {
        let Some(child) = self.detach(owner) else {
            return false;
        };
        child.widget().borrow_mut().deactivate();
        self.retire(child);
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains(&self, owner: OwnerId) -> bool {
        self.entries.iter().any(|entry| entry.owner_id() == owner)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Child> {
        self.entries.iter()
    }

    #[must_use]
    pub fn factory(&self) -> &WidgetFactory {
        &self.factory
    }

    pub(crate) fn set_inherited_props(&mut self, props: Option<WidgetProps>) {
        self.inherited_props = props;
    }

    pub(crate) fn activate_all(&self) {
        for entry in &self.entries {
            entry.widget().borrow_mut().activate();
        }
    }

    pub(crate) fn take_all(&mut self) -> Vec<Child> {
        std::mem::take(&mut self.entries)
    }

    pub(crate) fn detach(&mut self, owner: OwnerId) -> Option<Child> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.owner_id() == owner)?;
        Some(self.entries.remove(index))
    }

    /// Hand a detached, deactivated child back: pooled children are
    /// despawned, owned children are dropped.
    pub(crate) fn retire(&self, child: Child) {
        if let Child::Pooled(pooled) = child {
            self.factory.despawn_pooled(pooled);
        }
    }
}
