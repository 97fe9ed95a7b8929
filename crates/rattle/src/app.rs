use std::{collections::HashMap, fmt};

use serde_json::{Map, Value};
use shared::{
    domain::{EventName, WidgetId},
    protocol::Mutation,
};
use tracing::{debug, trace, warn};

use crate::{
    error::RattleError,
    registry::WidgetRegistry,
    template::{bind, parse},
    widget::Widget,
};

/// Runs after the client's props are applied. May read and write any
/// widget; its writes are reported along with the props.
pub type EventHandler =
    Box<dyn Fn(&mut WidgetRegistry) -> Result<(), RattleError> + Send + Sync>;

/// Transport-neutral description of one client request.
#[derive(Debug, Clone, PartialEq)]
pub enum AppRequest {
    PageLoad,
    Event {
        widget_id: WidgetId,
        event: EventName,
        props: Map<String, Value>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppResponse {
    Page(String),
    Mutations(Vec<Mutation>),
}

/// Owns the template, its widgets and their event handlers.
///
/// Requests are synchronous and take `&mut self` for event dispatch, so a
/// transport sharing one `App` between connections must serialize access,
/// e.g. by holding a mutex for the whole request.
pub struct App {
    title: String,
    template: String,
    widgets: WidgetRegistry,
    handlers: HashMap<WidgetId, HashMap<EventName, EventHandler>>,
}

impl App {
    pub fn new(title: impl Into<String>, template: impl Into<String>) -> Result<Self, RattleError> {
        let template = template.into();
        let widgets = parse(&template)?;
        let title = title.into();
        debug!(%title, widgets = widgets.len(), "app created");
        Ok(Self {
            title,
            template,
            widgets,
            handlers: HashMap::new(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn widgets(&self) -> &WidgetRegistry {
        &self.widgets
    }

    pub fn widget(&self, id: &str) -> Option<&dyn Widget> {
        self.widgets.get(id)
    }

    /// Registers `handler` for `event` on `widget_id`, replacing any
    /// earlier registration for the same pair.
    pub fn on<F>(&mut self, widget_id: &str, event: &str, handler: F) -> Result<(), RattleError>
    where
        F: Fn(&mut WidgetRegistry) -> Result<(), RattleError> + Send + Sync + 'static,
    {
        let Some(widget) = self.widgets.get(widget_id) else {
            return Err(RattleError::UnknownWidget {
                id: WidgetId::from(widget_id),
            });
        };
        self.handlers
            .entry(widget.id().clone())
            .or_default()
            .insert(EventName::from(event), Box::new(handler));
        Ok(())
    }

    pub fn has_handler(&self, widget_id: &str, event: &str) -> bool {
        self.handler(widget_id, event).is_some()
    }

    pub fn handle(&mut self, request: AppRequest) -> Result<AppResponse, RattleError> {
        match request {
            AppRequest::PageLoad => Ok(AppResponse::Page(self.handle_page_load())),
            AppRequest::Event {
                widget_id,
                event,
                props,
            } => self
                .handle_event(widget_id.as_str(), event.as_str(), props)
                .map(AppResponse::Mutations),
        }
    }

    /// The template with every placeholder replaced by current markup.
    pub fn handle_page_load(&self) -> String {
        bind(&self.template, &self.widgets)
    }

    /// Applies `props` to `widget_id` in the given order, then runs the
    /// handler registered for `event`, if any.
    ///
    /// Returns the field changes in the order they happened. Writes are
    /// not rolled back on failure: fields written before an error keep
    /// their new values, but the error is returned instead of the list.
    pub fn handle_event<I, K>(
        &mut self,
        widget_id: &str,
        event: &str,
        props: I,
    ) -> Result<Vec<Mutation>, RattleError>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        self.widgets.clear_mutations();
        debug!(widget_id, event, "dispatching event");

        let outcome = self.dispatch(widget_id, event, props);
        let mutations = self.widgets.take_mutations();

        match outcome {
            Ok(()) => {
                debug!(widget_id, event, mutations = mutations.len(), "event dispatched");
                Ok(mutations)
            }
            Err(error) => {
                warn!(widget_id, event, applied = mutations.len(), %error, "event dispatch failed");
                Err(error)
            }
        }
    }

    fn dispatch<I, K>(&mut self, widget_id: &str, event: &str, props: I) -> Result<(), RattleError>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        if !self.widgets.contains(widget_id) {
            return Err(RattleError::UnknownWidget {
                id: WidgetId::from(widget_id),
            });
        }

        for (field, value) in props {
            self.widgets.set(widget_id, field.as_ref(), value)?;
        }

        match self.handlers.get(widget_id).and_then(|by_event| by_event.get(event)) {
            Some(handler) => handler(&mut self.widgets),
            None => {
                trace!(widget_id, event, "no handler registered");
                Ok(())
            }
        }
    }

    fn handler(&self, widget_id: &str, event: &str) -> Option<&EventHandler> {
        self.handlers.get(widget_id)?.get(event)
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handlers: Vec<(&str, &str)> = self
            .handlers
            .iter()
            .flat_map(|(id, by_event)| {
                by_event
                    .keys()
                    .map(move |event| (id.as_str(), event.as_str()))
            })
            .collect();
        f.debug_struct("App")
            .field("title", &self.title)
            .field("widgets", &self.widgets)
            .field("handlers", &handlers)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;
