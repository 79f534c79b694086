use std::sync::Arc;

use crate::repository::CustomerRepository;

/// Shared application state handed to every handler. The repository is chosen by the caller.
#[derive(Clone)]
pub struct AppState {
    pub(crate) customers: Arc<dyn CustomerRepository>,
}

impl AppState {
    pub fn new(customers: Arc<dyn CustomerRepository>) -> Self {
        Self { customers }
    }

    pub fn customers(&self) -> &dyn CustomerRepository {
        self.customers.as_ref()
    }
}
