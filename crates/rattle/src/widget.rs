use std::{borrow::Cow, fmt, str::FromStr};

use serde_json::Value;
use shared::domain::WidgetId;

use crate::{error::RattleError, queue::MutationSink};

/// A server-held UI element whose markup always reflects its fields.
pub trait Widget: fmt::Debug + Send {
    fn id(&self) -> &WidgetId;

    fn kind(&self) -> WidgetKind;

    /// Current markup. Pure read.
    fn render(&self) -> &str;

    fn field(&self, name: &str) -> Option<&Value>;

    /// Writes one mutable field, recomputes the markup from the new value
    /// and reports the change to `sink`.
    ///
    /// Writing the value a field already holds is accepted and reports
    /// nothing. Names outside the kind's field set fail with
    /// [`RattleError::UnknownField`] and leave the widget untouched.
    fn set_field(
        &mut self,
        name: &str,
        value: Value,
        sink: &mut dyn MutationSink,
    ) -> Result<(), RattleError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Input,
    Label,
    Button,
}

impl WidgetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            WidgetKind::Input => "input",
            WidgetKind::Label => "label",
            WidgetKind::Button => "button",
        }
    }

    pub fn fields(self) -> &'static [&'static str] {
        match self {
            WidgetKind::Input => &["value"],
            WidgetKind::Label | WidgetKind::Button => &["text"],
        }
    }

    pub fn build(self, id: WidgetId) -> Box<dyn Widget> {
        match self {
            WidgetKind::Input => Box::new(Input::new(id)),
            WidgetKind::Label => Box::new(Label::new(id)),
            WidgetKind::Button => Box::new(Button::new(id)),
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WidgetKind {
    type Err = RattleError;

    fn from_str(kind: &str) -> Result<Self, Self::Err> {
        Ok(match kind {
            "input" => WidgetKind::Input,
            "label" => WidgetKind::Label,
            "button" => WidgetKind::Button,
            _ => {
                return Err(RattleError::UnknownWidgetKind {
                    kind: kind.to_string(),
                })
            }
        })
    }
}

/// Single-line text entry. Field: `value`.
#[derive(Debug, Clone)]
pub struct Input {
    id: WidgetId,
    value: Value,
    markup: String,
}

impl Input {
    pub fn new(id: WidgetId) -> Self {
        let mut input = Self {
            id,
            value: Value::String(String::new()),
            markup: String::new(),
        };
        input.markup = input.compute_markup();
        input
    }

    fn compute_markup(&self) -> String {
        let id = escape_html(self.id.as_str());
        let value = display_value(&self.value);
        if value.is_empty() {
            format!(r#"<input type="text" id="{id}" class="widget">"#)
        } else {
            format!(
                r#"<input type="text" id="{id}" class="widget" value="{}">"#,
                escape_html(&value)
            )
        }
    }
}

impl Widget for Input {
    fn id(&self) -> &WidgetId {
        &self.id
    }

    fn kind(&self) -> WidgetKind {
        WidgetKind::Input
    }

    fn render(&self) -> &str {
        &self.markup
    }

    fn field(&self, name: &str) -> Option<&Value> {
        match name {
            "value" => Some(&self.value),
            _ => None,
        }
    }

    fn set_field(
        &mut self,
        name: &str,
        value: Value,
        sink: &mut dyn MutationSink,
    ) -> Result<(), RattleError> {
        let slot = match name {
            "value" => &mut self.value,
            _ => return Err(unknown_field(&self.id, WidgetKind::Input, name)),
        };
        if *slot == value {
            return Ok(());
        }
        *slot = value;
        self.markup = self.compute_markup();
        sink.notify(&self.id, name, &self.value);
        Ok(())
    }
}

/// Read-only paragraph of text. Field: `text`.
#[derive(Debug, Clone)]
pub struct Label {
    id: WidgetId,
    text: Value,
    markup: String,
}

impl Label {
    pub fn new(id: WidgetId) -> Self {
        let mut label = Self {
            id,
            text: Value::String(String::new()),
            markup: String::new(),
        };
        label.markup = label.compute_markup();
        label
    }

    fn compute_markup(&self) -> String {
        format!(
            r#"<p id="{}" class="widget">{}</p>"#,
            escape_html(self.id.as_str()),
            escape_html(&display_value(&self.text))
        )
    }
}

impl Widget for Label {
    fn id(&self) -> &WidgetId {
        &self.id
    }

    fn kind(&self) -> WidgetKind {
        WidgetKind::Label
    }

    fn render(&self) -> &str {
        &self.markup
    }

    fn field(&self, name: &str) -> Option<&Value> {
        match name {
            "text" => Some(&self.text),
            _ => None,
        }
    }

    fn set_field(
        &mut self,
        name: &str,
        value: Value,
        sink: &mut dyn MutationSink,
    ) -> Result<(), RattleError> {
        let slot = match name {
            "text" => &mut self.text,
            _ => return Err(unknown_field(&self.id, WidgetKind::Label, name)),
        };
        if *slot == value {
            return Ok(());
        }
        *slot = value;
        self.markup = self.compute_markup();
        sink.notify(&self.id, name, &self.text);
        Ok(())
    }
}

/// Clickable button with a caption. Field: `text`.
#[derive(Debug, Clone)]
pub struct Button {
    id: WidgetId,
    text: Value,
    markup: String,
}

impl Button {
    pub fn new(id: WidgetId) -> Self {
        let mut button = Self {
            id,
            text: Value::String(String::new()),
            markup: String::new(),
        };
        button.markup = button.compute_markup();
        button
    }

    fn compute_markup(&self) -> String {
        format!(
            r#"<button id="{}" class="widget">{}</button>"#,
            escape_html(self.id.as_str()),
            escape_html(&display_value(&self.text))
        )
    }
}

impl Widget for Button {
    fn id(&self) -> &WidgetId {
        &self.id
    }

    fn kind(&self) -> WidgetKind {
        WidgetKind::Button
    }

    fn render(&self) -> &str {
        &self.markup
    }

    fn field(&self, name: &str) -> Option<&Value> {
        match name {
            "text" => Some(&self.text),
            _ => None,
        }
    }

    fn set_field(
        &mut self,
        name: &str,
        value: Value,
        sink: &mut dyn MutationSink,
    ) -> Result<(), RattleError> {
        let slot = match name {
            "text" => &mut self.text,
            _ => return Err(unknown_field(&self.id, WidgetKind::Button, name)),
        };
        if *slot == value {
            return Ok(());
        }
        *slot = value;
        self.markup = self.compute_markup();
        sink.notify(&self.id, name, &self.text);
        Ok(())
    }
}

fn unknown_field(id: &WidgetId, kind: WidgetKind, field: &str) -> RattleError {
    RattleError::UnknownField {
        id: id.clone(),
        kind,
        field: field.to_string(),
    }
}

/// Text shown for a field value: strings as-is, `null` as nothing,
/// anything else as its JSON text.
pub fn display_value(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(text) => Cow::Borrowed(text),
        Value::Null => Cow::Borrowed(""),
        other => Cow::Owned(other.to_string()),
    }
}

pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(|ch: char| matches!(ch, '&' | '<' | '>' | '"' | '\'')) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
#[path = "tests/widget_tests.rs"]
mod tests;
