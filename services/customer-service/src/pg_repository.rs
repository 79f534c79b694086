use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::customer::{Customer, NewCustomer};
use crate::repository::{CustomerRepository, RepositoryError, RepositoryResult};

#[derive(Clone)]
pub struct PgCustomerRepository {
    db: PgPool,
}

impl PgCustomerRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CustomerRepository for PgCustomerRepository {
    async fn list(&self) -> RepositoryResult<Vec<Customer>> {
        let rows = sqlx::query_as::<_, Customer>(
            "SELECT id, name, description, created_at, updated_at
             FROM customers
             ORDER BY created_at, id",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn create(&self, new_customer: NewCustomer) -> RepositoryResult<Customer> {
        let NewCustomer { name, description } = new_customer;
        let now = Utc::now();
        let row = sqlx::query_as::<_, Customer>(
            "INSERT INTO customers (id, name, description, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $4)
             RETURNING id, name, description, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(description)
        .bind(now)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Customer>> {
        let row = sqlx::query_as::<_, Customer>(
            "SELECT id, name, description, created_at, updated_at
             FROM customers
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn save(&self, customer: &Customer) -> RepositoryResult<Customer> {
        sqlx::query_as::<_, Customer>(
            "UPDATE customers
             SET name = $2,
                 description = $3,
                 updated_at = $4
             WHERE id = $1
             RETURNING id, name, description, created_at, updated_at",
        )
        .bind(customer.id)
        .bind(customer.name.as_deref())
        .bind(customer.description.as_deref())
        .bind(Utc::now())
        .fetch_optional(&self.db)
        .await?
        .ok_or(RepositoryError::Missing(customer.id))
    }

    async fn delete(&self, customer: &Customer) -> RepositoryResult<()> {
        sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(customer.id)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer::CustomerFields;
    use serde_json::json;
    use sqlx::migrate::MigrateError;

    fn require_database_url() -> Option<String> {
        std::env::var("CUSTOMER_TEST_DATABASE_URL")
            .ok()
            .or_else(|| std::env::var("DATABASE_URL").ok())
    }

    #[tokio::test]
    #[cfg_attr(not(feature = "integration"), ignore = "enable with --features integration (requires Postgres)")]
    async fn postgres_round_trip_honours_merge_and_delete() -> Result<(), Box<dyn std::error::Error>> {
        let database_url = match require_database_url() {
            Some(url) => url,
            None => {
                eprintln!("Skipping Postgres repository test because DATABASE_URL is not set.");
                return Ok(());
            }
        };

        let pool = PgPool::connect(&database_url).await?;
        if let Err(err) = sqlx::migrate!("./migrations").run(&pool).await {
            if !matches!(err, MigrateError::VersionMissing(_)) {
                return Err(err.into());
            }
        }
        let repo = PgCustomerRepository::new(pool.clone());

        let created = repo
            .create(NewCustomer { name: Some("Acme".into()), description: Some("Widgets".into()) })
            .await?;
        let mut found = repo.find_by_id(created.id).await?.ok_or("created customer missing")?;
        assert_eq!(found.name.as_deref(), Some("Acme"));

        found.merge(CustomerFields { name: Some(json!("Acme Corp")), description: Some(json!("")) });
        let saved = repo.save(&found).await?;
        assert_eq!(saved.name.as_deref(), Some("Acme Corp"));
        assert_eq!(saved.description.as_deref(), Some("Widgets"));
        assert!(repo.list().await?.iter().any(|c| c.id == created.id));

        repo.delete(&saved).await?;
        assert!(repo.find_by_id(created.id).await?.is_none());
        assert!(matches!(repo.save(&saved).await, Err(RepositoryError::Missing(_))));

        Ok(())
    }
}
