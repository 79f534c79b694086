use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use common_http_errors::{ApiError, ApiResult};
use serde::Serialize;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::customer::Customer;
use crate::extract::PostFields;
use crate::metrics::record_operation;
use crate::repository::RepositoryError;

pub const OK_MESSAGE: &str = "OK";
pub const CREATED_MESSAGE: &str = "Customer Created.";
const NOT_FOUND_CODE: &str = "customer_not_found";

/// Success body: `{"message": ..., "data": ...}`.
#[derive(Serialize, Debug)]
pub struct Envelope<T> {
    pub message: &'static str,
    pub data: T,
}

impl<T> Envelope<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self { message: OK_MESSAGE, data })
    }
}

fn not_found(operation: &'static str) -> ApiError {
    record_operation(operation, "not_found");
    ApiError::not_found(NOT_FOUND_CODE)
}

fn store_failure(operation: &'static str) -> impl FnOnce(RepositoryError) -> ApiError {
    move |err| {
        error!(operation, error = %err, "customer store call failed");
        record_operation(operation, "error");
        ApiError::from(err)
    }
}

/// Loads the customer named by a raw path segment. Ids that are not UUIDs name nothing.
async fn find_customer(state: &AppState, raw_id: &str, operation: &'static str) -> ApiResult<Customer> {
    let Ok(id) = Uuid::parse_str(raw_id) else {
        debug!(operation, raw_id, "customer id is not a UUID");
        return Err(not_found(operation));
    };
    match state.customers().find_by_id(id).await.map_err(store_failure(operation))? {
        Some(customer) => Ok(customer),
        None => {
            debug!(operation, customer_id = %id, "customer not found");
            Err(not_found(operation))
        }
    }
}

pub async fn list_customers(
    State(state): State<AppState>,
) -> ApiResult<Json<Envelope<Vec<Customer>>>> {
    let customers = state.customers().list().await.map_err(store_failure("list"))?;
    if customers.is_empty() {
        debug!("no customers stored");
        return Err(not_found("list"));
    }
    record_operation("list", "ok");
    Ok(Envelope::ok(customers))
}

pub async fn create_customer(
    State(state): State<AppState>,
    PostFields(fields): PostFields,
) -> ApiResult<(StatusCode, Json<Envelope<Customer>>)> {
    let customer = state
        .customers()
        .create(fields.into())
        .await
        .map_err(store_failure("create"))?;
    info!(customer_id = %customer.id, "customer created");
    record_operation("create", "ok");
    Ok((
        StatusCode::CREATED,
        Json(Envelope { message: CREATED_MESSAGE, data: customer }),
    ))
}

pub async fn get_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> ApiResult<Json<Envelope<Customer>>> {
    let customer = find_customer(&state, &customer_id, "show").await?;
    record_operation("show", "ok");
    Ok(Envelope::ok(customer))
}

pub async fn update_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    PostFields(fields): PostFields,
) -> ApiResult<Json<Envelope<Customer>>> {
    let mut customer = find_customer(&state, &customer_id, "update").await?;
    let changed = customer.merge(fields);
    let customer = state
        .customers()
        .save(&customer)
        .await
        .map_err(store_failure("update"))?;
    info!(customer_id = %customer.id, changed, "customer updated");
    record_operation("update", "ok");
    Ok(Envelope::ok(customer))
}

pub async fn delete_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> ApiResult<StatusCode> {
    let customer = find_customer(&state, &customer_id, "destroy").await?;
    state
        .customers()
        .delete(&customer)
        .await
        .map_err(store_failure("destroy"))?;
    info!(customer_id = %customer.id, "customer deleted");
    record_operation("destroy", "ok");
    Ok(StatusCode::NO_CONTENT)
}
