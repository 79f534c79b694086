use async_trait::async_trait;
use common_http_errors::ApiError;
use thiserror::Error;
use uuid::Uuid;

use crate::customer::{Customer, NewCustomer};

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("customer {0} no longer exists in the store")]
    Missing(Uuid),
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        ApiError::internal(err)
    }
}

/// Storage backend for customers. Handlers only ever talk to the store through this trait.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Every stored customer, oldest first.
    async fn list(&self) -> RepositoryResult<Vec<Customer>>;
    /// Persists a new customer; the store assigns `id` and timestamps.
    async fn create(&self, new_customer: NewCustomer) -> RepositoryResult<Customer>;
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Customer>>;
    /// Writes `name` and `description` back and refreshes `updated_at`.
    async fn save(&self, customer: &Customer) -> RepositoryResult<Customer>;
    /// Hard delete.
    async fn delete(&self, customer: &Customer) -> RepositoryResult<()>;
}
