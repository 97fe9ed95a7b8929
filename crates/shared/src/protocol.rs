use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::WidgetId;

/// One observed field change, reported to the client after an event.
///
/// Serializes as `{"id_": .., "key": .., "value": ..}`, the shape the
/// client script applies to the DOM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mutation {
    #[serde(rename = "id_")]
    pub id: WidgetId,
    pub key: String,
    pub value: Value,
}

impl Mutation {
    pub fn new(id: WidgetId, key: impl Into<String>, value: Value) -> Self {
        Self {
            id,
            key: key.into(),
            value,
        }
    }
}

/// Form fields posted by the client script for a widget event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventForm {
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default, rename = "id_")]
    pub id: Option<String>,
    #[serde(default)]
    pub props: Option<String>,
}

impl EventForm {
    /// Decodes `props`, keeping the field order the client sent.
    pub fn decode_props(&self) -> Result<Map<String, Value>, serde_json::Error> {
        match self.props.as_deref() {
            None | Some("") => Ok(Map::new()),
            Some(raw) => serde_json::from_str(raw),
        }
    }
}

pub fn encode_mutations(mutations: &[Mutation]) -> String {
    serde_json::to_string(mutations).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
