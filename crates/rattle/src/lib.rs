//! Server-held widget state rendered into an HTML template.
//!
//! An [`App`] parses its template once, owns one widget per placeholder,
//! and answers two kinds of request: a page load, which binds the current
//! widget markup into the template, and a widget event, which applies the
//! client's field values, runs the registered handler and returns the
//! ordered list of field changes that resulted.

pub mod app;
pub mod error;
pub mod queue;
pub mod registry;
pub mod template;
pub mod widget;

pub use app::{App, AppRequest, AppResponse, EventHandler};
pub use error::RattleError;
pub use queue::{MutationQueue, MutationSink};
pub use registry::WidgetRegistry;
pub use template::{bind, parse};
pub use widget::{Button, Input, Label, Widget, WidgetKind};
