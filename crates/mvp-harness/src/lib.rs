#![forbid(unsafe_code)]

//! Test fixtures for MVP screens and widgets.
//!
//! Every fixture logs into a shared [`Journal`], so a test can assert the
//! exact order of lifecycle calls across models, presenters, widgets and
//! views:
//!
//! ```ignore
//! let journal = Journal::new();
//! let mut screen = JournalScreen::new(
//!     "lobby",
//!     ScreenLayout::default().with_owned(1),
//!     probe_factory(&journal),
//!     &journal,
//! );
//! screen.core_mut().set_view(RecordingScreenView::new("lobby", &journal));
//! Presenter::activate(&mut screen);
//! assert!(journal.precedes("owned0.activate", "lobby.show"));
//! ```

pub mod journal;
pub mod model;
pub mod probe;
pub mod screen;
pub mod views;

pub use journal::{Counter, Journal, counter};
pub use model::CountingModel;
pub use probe::{ProbeView, ProbeWidget, probe_view};
pub use screen::{JournalScreen, ScreenLayout, probe_factory};
pub use views::{RecordingScreenView, RecordingWidgetView};
