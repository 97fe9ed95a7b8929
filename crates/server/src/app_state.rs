use std::sync::{Mutex, MutexGuard};

use rattle::App;
use shared::error::{ApiError, ErrorCode};

/// The one widget tree every connection talks to. The lock is held for a
/// whole request so dispatches never interleave.
pub(crate) struct AppState {
    app: Mutex<App>,
}

impl AppState {
    pub(crate) fn new(app: App) -> Self {
        Self {
            app: Mutex::new(app),
        }
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, App>, ApiError> {
        self.app
            .lock()
            .map_err(|_| ApiError::new(ErrorCode::Internal, "app state lock poisoned"))
    }
}
