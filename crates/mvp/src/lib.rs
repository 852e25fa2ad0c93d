#![forbid(unsafe_code)]

//! MVP lifecycle framework public facade.
//!
//! [`prelude`] re-exports the member crates under short names, plus the
//! types most screens need.

pub mod prelude {
    pub use mvp_core as core;
    pub use mvp_events as events;
    #[cfg(feature = "harness")]
    pub use mvp_harness as harness;
    pub use mvp_presenter as presenter;
    pub use mvp_reactive as reactive;
    pub use mvp_widgets as widgets;

    pub use mvp_core::{CoreError, Event, Event0, Event2, OwnerId, SignalHub, Transform};
    pub use mvp_events::{EventsStore, EventsStoreConfig, PoolConfig};
    pub use mvp_presenter::{
        DataModel, Model, ModelData, Presenter, PresenterCore, PresenterError, PresenterState,
        Screen, ScreenParams, ScreenView, View,
    };
    pub use mvp_reactive::{
        CombinationMode, ConditionalComposite, ReactiveList, ReactiveValue, combine2, combine3,
        combine4,
    };
    pub use mvp_widgets::{
        ChildWidgets, Construct, Resources, ViewHandle, Widget, WidgetBase, WidgetBehavior,
        WidgetContext, WidgetFactory, WidgetFactoryConfig, WidgetProps, WidgetView,
    };
}
