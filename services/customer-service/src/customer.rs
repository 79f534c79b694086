use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A stored customer record as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Customer {
    pub id: Uuid,
    pub name: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted in create and update bodies. Any JSON value is accepted;
/// it is reduced to text only when written to the record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CustomerFields {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub description: Option<Value>,
}

/// Input to [`crate::repository::CustomerRepository::create`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewCustomer {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl From<CustomerFields> for NewCustomer {
    /// Create stores whatever was sent, falsy or not; only `null` stays null.
    fn from(fields: CustomerFields) -> Self {
        let CustomerFields { name, description } = fields;
        Self {
            name: name.and_then(stored_text),
            description: description.and_then(stored_text),
        }
    }
}

impl Customer {
    /// Overwrites `name` and `description` with the incoming values that are
    /// truthy. `null`, `false`, `0` and `""` keep what is stored.
    /// Returns whether anything changed.
    pub fn merge(&mut self, fields: CustomerFields) -> bool {
        let mut changed = false;
        if let Some(name) = fields.name.and_then(truthy_text) {
            changed |= self.name.as_deref() != Some(name.as_str());
            self.name = Some(name);
        }
        if let Some(description) = fields.description.and_then(truthy_text) {
            changed |= self.description.as_deref() != Some(description.as_str());
            self.description = Some(description);
        }
        changed
    }
}

/// Text column form of a body value: strings verbatim, everything else as JSON text.
fn stored_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn truthy_text(value: Value) -> Option<String> {
    let falsy = match &value {
        Value::Null | Value::Bool(false) => true,
        Value::Number(n) => n.as_f64().map_or(false, |f| f == 0.0 || f.is_nan()),
        Value::String(s) => s.is_empty(),
        Value::Bool(true) | Value::Array(_) | Value::Object(_) => false,
    };
    if falsy {
        None
    } else {
        stored_text(value)
    }
}
