use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::customer::{Customer, NewCustomer};
use crate::repository::{CustomerRepository, RepositoryError, RepositoryResult};

/// Process-local store used when no database is configured, and by tests.
#[derive(Clone, Default)]
pub struct InMemoryCustomerRepository {
    customers: Arc<RwLock<Vec<Customer>>>,
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.customers.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.customers.read().await.is_empty()
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn list(&self) -> RepositoryResult<Vec<Customer>> {
        Ok(self.customers.read().await.clone())
    }

    async fn create(&self, new_customer: NewCustomer) -> RepositoryResult<Customer> {
        let NewCustomer { name, description } = new_customer;
        let now = Utc::now();
        let customer = Customer {
            id: Uuid::new_v4(),
            name,
            description,
            created_at: now,
            updated_at: now,
        };
        self.customers.write().await.push(customer.clone());
        Ok(customer)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Customer>> {
        Ok(self
            .customers
            .read()
            .await
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn save(&self, customer: &Customer) -> RepositoryResult<Customer> {
        let mut customers = self.customers.write().await;
        let stored = customers
            .iter_mut()
            .find(|c| c.id == customer.id)
            .ok_or(RepositoryError::Missing(customer.id))?;
        stored.name = customer.name.clone();
        stored.description = customer.description.clone();
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete(&self, customer: &Customer) -> RepositoryResult<()> {
        self.customers.write().await.retain(|c| c.id != customer.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acme() -> NewCustomer {
        NewCustomer { name: Some("Acme".into()), description: Some("Widgets".into()) }
    }

    #[tokio::test]
    async fn create_assigns_distinct_ids() {
        let repo = InMemoryCustomerRepository::new();
        let a = repo.create(acme()).await.unwrap();
        let b = repo.create(acme()).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.created_at, a.updated_at);
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn list_keeps_insertion_order() {
        let repo = InMemoryCustomerRepository::new();
        let first = repo.create(acme()).await.unwrap();
        let second = repo.create(NewCustomer { name: Some("Globex".into()), description: None }).await.unwrap();
        let all = repo.list().await.unwrap();
        assert_eq!(all, vec![first, second]);
    }

    #[tokio::test]
    async fn save_writes_fields_and_bumps_updated_at() {
        let repo = InMemoryCustomerRepository::new();
        let mut customer = repo.create(acme()).await.unwrap();
        customer.name = Some("Initech".into());
        let saved = repo.save(&customer).await.unwrap();
        assert_eq!(saved.name.as_deref(), Some("Initech"));
        assert!(saved.updated_at >= saved.created_at);
        let found = repo.find_by_id(customer.id).await.unwrap().unwrap();
        assert_eq!(found, saved);
    }

    #[tokio::test]
    async fn save_of_deleted_customer_fails() {
        let repo = InMemoryCustomerRepository::new();
        let customer = repo.create(acme()).await.unwrap();
        repo.delete(&customer).await.unwrap();
        let err = repo.save(&customer).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Missing(id) if id == customer.id));
    }

    #[tokio::test]
    async fn delete_removes_only_target() {
        let repo = InMemoryCustomerRepository::new();
        let keep = repo.create(acme()).await.unwrap();
        let gone = repo.create(acme()).await.unwrap();
        repo.delete(&gone).await.unwrap();
        assert!(repo.find_by_id(gone.id).await.unwrap().is_none());
        assert!(repo.find_by_id(keep.id).await.unwrap().is_some());
        repo.delete(&keep).await.unwrap();
        assert!(repo.is_empty().await);
    }
}
