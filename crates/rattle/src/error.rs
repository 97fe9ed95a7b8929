use shared::{
    domain::WidgetId,
    error::{ApiError, ErrorCode},
};
use thiserror::Error;

use crate::widget::WidgetKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RattleError {
    #[error("template references unknown widget kind '{kind}'")]
    UnknownWidgetKind { kind: String },
    #[error("widget id '{id}' is declared as both {existing} and {requested}")]
    DuplicateWidgetId {
        id: WidgetId,
        existing: WidgetKind,
        requested: WidgetKind,
    },
    #[error("no widget with id '{id}'")]
    UnknownWidget { id: WidgetId },
    #[error("{kind} widget '{id}' has no field '{field}'")]
    UnknownField {
        id: WidgetId,
        kind: WidgetKind,
        field: String,
    },
}

impl RattleError {
    pub fn code(&self) -> ErrorCode {
        match self {
            RattleError::UnknownWidget { .. } => ErrorCode::NotFound,
            RattleError::UnknownField { .. } => ErrorCode::Validation,
            RattleError::UnknownWidgetKind { .. }
            | RattleError::DuplicateWidgetId { .. } => ErrorCode::Internal,
        }
    }
}

impl From<RattleError> for ApiError {
    fn from(value: RattleError) -> Self {
        ApiError::new(value.code(), value.to_string())
    }
}
