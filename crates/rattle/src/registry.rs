use std::collections::HashMap;

use serde_json::Value;
use shared::{domain::WidgetId, protocol::Mutation};

use crate::{error::RattleError, queue::MutationQueue, widget::Widget};

/// Widgets of one app in order of first appearance in the template, plus
/// the queue their writes are reported to.
///
/// Event handlers receive `&mut WidgetRegistry`; every write made through
/// [`WidgetRegistry::set`] lands in the same queue as the client's props.
#[derive(Debug, Default)]
pub struct WidgetRegistry {
    widgets: Vec<Box<dyn Widget>>,
    index: HashMap<WidgetId, usize>,
    pending: MutationQueue,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&dyn Widget> {
        self.index.get(id).map(|&slot| &*self.widgets[slot])
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Widget> + '_ {
        self.widgets.iter().map(|widget| &**widget)
    }

    /// Adds a widget unless one with the same id is already registered.
    /// Returns `false` when the id was taken.
    pub fn insert(&mut self, widget: Box<dyn Widget>) -> bool {
        if self.index.contains_key(widget.id()) {
            return false;
        }
        self.index.insert(widget.id().clone(), self.widgets.len());
        self.widgets.push(widget);
        true
    }

    pub fn field(&self, id: &str, name: &str) -> Result<&Value, RattleError> {
        let widget = self.get(id).ok_or_else(|| unknown_widget(id))?;
        widget
            .field(name)
            .ok_or_else(|| RattleError::UnknownField {
                id: widget.id().clone(),
                kind: widget.kind(),
                field: name.to_string(),
            })
    }

    /// Writes a field on any widget. Changes are queued for the current
    /// request.
    pub fn set(
        &mut self,
        id: &str,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<(), RattleError> {
        let slot = *self.index.get(id).ok_or_else(|| unknown_widget(id))?;
        self.widgets[slot].set_field(name, value.into(), &mut self.pending)
    }

    /// Changes queued since the last [`WidgetRegistry::take_mutations`].
    pub fn pending(&self) -> &[Mutation] {
        self.pending.as_slice()
    }

    pub(crate) fn clear_mutations(&mut self) {
        self.pending.clear();
    }

    pub(crate) fn take_mutations(&mut self) -> Vec<Mutation> {
        self.pending.take()
    }
}

fn unknown_widget(id: &str) -> RattleError {
    RattleError::UnknownWidget {
        id: WidgetId::from(id),
    }
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod tests;
