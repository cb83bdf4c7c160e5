pub mod config;
pub mod dom;
pub mod effects;
pub mod error;
pub mod event;
pub mod fixture;
pub mod page;
pub mod reveal;
pub mod runtime;
pub mod scenario;
pub mod scroll;
pub mod task;
pub mod timer;
pub mod viewport;

pub use config::{AppConfig, EasingType, ScrollConfig};
pub use dom::{Document, ElementId, ElementSpec, Mutation, Rect, SelectorList};
pub use error::{Error, Result};
pub use event::{DispatchOutcome, KeyPress, PageEvent};
pub use page::{Page, PageUpdate};
pub use runtime::PageDriver;
pub use scenario::{ReplayLog, Scenario};
pub use viewport::Viewport;
