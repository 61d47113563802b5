//! Shared router state.

use crate::services::ContactService;

/// State injected into every handler. Cheap to clone; the relay behind the
/// contact service is reference counted.
#[derive(Clone)]
pub struct AppState {
    /// Contact submission pipeline.
    pub contact: ContactService,
}

impl AppState {
    /// Build state around a contact service.
    #[must_use]
    pub fn new(contact: ContactService) -> Self {
        Self { contact }
    }
}
