use std::ops::Range;

use shared::domain::WidgetId;
use tracing::debug;

use crate::{error::RattleError, registry::WidgetRegistry, widget::WidgetKind};

const OPEN: &str = "{{ ";
const CLOSE: &str = " }}";

/// A `{{ kind#id }}` token found in template text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder<'a> {
    pub span: Range<usize>,
    pub kind: &'a str,
    pub id: &'a str,
}

/// Yields placeholders left to right. A `{{ ` that does not open a
/// well-formed single-line token is plain text and the scan resumes one
/// byte after it.
pub fn placeholders(source: &str) -> Placeholders<'_> {
    Placeholders { source, cursor: 0 }
}

pub struct Placeholders<'a> {
    source: &'a str,
    cursor: usize,
}

impl<'a> Iterator for Placeholders<'a> {
    type Item = Placeholder<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let source = self.source;
        loop {
            let start = self.cursor + source.get(self.cursor..)?.find(OPEN)?;
            let inner_start = start + OPEN.len();
            let line_end = source[inner_start..]
                .find('\n')
                .map_or(source.len(), |offset| inner_start + offset);

            if let Some(offset) = source[inner_start..line_end].find(CLOSE) {
                let inner_end = inner_start + offset;
                if let Some((kind, id)) = split_token(&source[inner_start..inner_end]) {
                    let end = inner_end + CLOSE.len();
                    self.cursor = end;
                    return Some(Placeholder {
                        span: start..end,
                        kind,
                        id,
                    });
                }
            }
            self.cursor = start + 1;
        }
    }
}

fn split_token(inner: &str) -> Option<(&str, &str)> {
    let (kind, id) = inner.split_once('#')?;
    (is_token_part(kind) && is_token_part(id)).then_some((kind, id))
}

fn is_token_part(part: &str) -> bool {
    !part.is_empty()
        && !part
            .chars()
            .any(|ch| ch.is_whitespace() || matches!(ch, '#' | '{' | '}'))
}

/// Builds one widget per distinct placeholder, in order of first
/// appearance. Repeating a token reuses its widget; reusing an id under a
/// different kind is an error.
pub fn parse(source: &str) -> Result<WidgetRegistry, RattleError> {
    let mut widgets = WidgetRegistry::new();
    for placeholder in placeholders(source) {
        let kind: WidgetKind = placeholder.kind.parse()?;
        if let Some(existing) = widgets.get(placeholder.id) {
            if existing.kind() != kind {
                return Err(RattleError::DuplicateWidgetId {
                    id: WidgetId::from(placeholder.id),
                    existing: existing.kind(),
                    requested: kind,
                });
            }
            continue;
        }
        debug!(kind = %kind, id = placeholder.id, "creating widget");
        widgets.insert(kind.build(WidgetId::from(placeholder.id)));
    }
    Ok(widgets)
}

/// Substitutes every placeholder with the current markup of its widget.
///
/// One scan over `source`; inserted markup is never rescanned. Tokens
/// without a matching widget of the same kind are kept as they are.
pub fn bind(source: &str, widgets: &WidgetRegistry) -> String {
    let mut html = String::with_capacity(source.len());
    let mut copied = 0;
    for placeholder in placeholders(source) {
        let Some(widget) = widgets.get(placeholder.id) else {
            continue;
        };
        if widget.kind().as_str() != placeholder.kind {
            continue;
        }
        html.push_str(&source[copied..placeholder.span.start]);
        html.push_str(widget.render());
        copied = placeholder.span.end;
    }
    html.push_str(&source[copied..]);
    html
}

#[cfg(test)]
#[path = "tests/template_tests.rs"]
mod tests;
