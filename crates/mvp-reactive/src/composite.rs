#![forbid(unsafe_code)]

//! Composite reactive values over two to four sources.
//!
//! A composite re-broadcasts a tuple of the current values of all of its
//! sources whenever any one of them changes. The triggering source
//! contributes the value it just announced; the others are read live at
//! broadcast time, so a composite never serves a stale snapshot.
//!
//! # Lifetime
//!
//! A composite holds its sources strongly and its sources reach it only
//! through `Weak` listeners. Dropping the last composite handle detaches
//! every source listener.

use std::rc::{Rc, Weak};

use mvp_core::event::{Event, ListenerId};

use crate::value::ReactiveValue;

macro_rules! composite {
    (
        $(#[$meta:meta])*
        $name:ident, $inner:ident, $combine:ident;
        $($T:ident $src:ident . $idx:tt),+
    ) => {
        struct $inner<$($T: 'static),+> {
            sources: ($(ReactiveValue<$T>,)+),
            listeners: Vec<ListenerId>,
            on_changed: Event<($($T,)+)>,
        }

        impl<$($T: Clone + PartialEq + 'static),+> $inner<$($T),+> {
            fn current(&self) -> ($($T,)+) {
                ($(self.sources.$idx.get(),)+)
            }
        }

        impl<$($T: 'static),+> Drop for $inner<$($T),+> {
            fn drop(&mut self) {
                $(self.sources.$idx.on_changed().remove_listener(self.listeners[$idx]);)+
            }
        }

        $(#[$meta])*
        pub struct $name<$($T: 'static),+> {
            inner: Rc<$inner<$($T),+>>,
        }

        impl<$($T: 'static),+> Clone for $name<$($T),+> {
            fn clone(&self) -> Self {
                Self {
                    inner: Rc::clone(&self.inner),
                }
            }
        }

        impl<$($T: 'static),+> std::fmt::Debug for $name<$($T),+> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("listeners", &self.inner.on_changed.listener_count())
                    .finish()
            }
        }

        impl<$($T: Clone + PartialEq + 'static),+> $name<$($T),+> {
            /// Observe every source and re-broadcast their combined values.
            #[must_use]
            pub fn new($($src: &ReactiveValue<$T>),+) -> Self {
                let inner = Rc::new_cyclic(|weak: &Weak<$inner<$($T),+>>| {
                    let sources = ($($src.clone(),)+);
                    let listeners = vec![$({
                        let weak = Weak::clone(weak);
                        sources.$idx.on_changed().add_listener(move |fresh: &$T| {
                            if let Some(inner) = weak.upgrade() {
                                let mut values = inner.current();
                                values.$idx = fresh.clone();
                                inner.on_changed.emit(&values);
                            }
                        })
                    }),+];
                    $inner {
                        sources,
                        listeners,
                        on_changed: Event::new(),
                    }
                });
                Self { inner }
            }

            /// Current values of every source, read now.
            #[must_use]
            pub fn value(&self) -> ($($T,)+) {
                self.inner.current()
            }

            /// Event fired with the combined values after any source changes.
            #[must_use]
            pub fn on_changed(&self) -> &Event<($($T,)+)> {
                &self.inner.on_changed
            }

            /// Subscribe to combined changes.
            pub fn subscribe(&self, handler: impl Fn(&($($T,)+)) + 'static) -> ListenerId {
                self.inner.on_changed.add_listener(handler)
            }

            /// Remove every observer of the combined event.
            pub fn clear_listeners(&self) {
                self.inner.on_changed.remove_all_listeners();
            }
        }

        /// Combine sources into a composite; see the type docs.
        #[must_use]
        pub fn $combine<$($T: Clone + PartialEq + 'static),+>(
            $($src: &ReactiveValue<$T>),+
        ) -> $name<$($T),+> {
            $name::new($($src),+)
        }
    };
}

composite! {
    /// Combined view over two reactive values.
    Composite2, Composite2Inner, combine2;
    A a.0, B b.1
}

composite! {
    /// Combined view over three reactive values.
    Composite3, Composite3Inner, combine3;
    A a.0, B b.1, C c.2
}

composite! {
    /// Combined view over four reactive values.
    Composite4, Composite4Inner, combine4;
    A a.0, B b.1, C c.2, D d.3
}
