use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
    Form,
};
use common_http_errors::ApiError;

use crate::customer::CustomerFields;

/// Customer fields read from a request body, accepting JSON or urlencoded form
/// posts. An empty body yields the default (all fields absent).
#[derive(Debug, Clone, Default)]
pub struct PostFields(pub CustomerFields);

#[async_trait]
impl<S> FromRequest<S> for PostFields
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_ascii_lowercase().starts_with("application/x-www-form-urlencoded"))
            .unwrap_or(false);

        if is_form {
            let Form(fields) = Form::<CustomerFields>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            return Ok(Self(fields));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice::<CustomerFields>(&bytes)
            .map(Self)
            .map_err(|err| {
                ApiError::BadRequest { code: "invalid_body", message: Some(format!("Invalid request body: {err}")) }
                    .into_response()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode};
    use serde_json::json;

    async fn extract(content_type: Option<&str>, body: &'static str) -> Result<PostFields, Response> {
        let mut builder = axum::http::Request::builder().method("POST").uri("/customers");
        if let Some(ct) = content_type {
            builder = builder.header(CONTENT_TYPE, ct);
        }
        let req = builder.body(Body::from(body)).unwrap();
        PostFields::from_request(req, &()).await
    }

    #[tokio::test]
    async fn reads_json_body() {
        let PostFields(fields) = extract(Some("application/json"), r#"{"name":"Acme","description":"Widgets"}"#)
            .await
            .unwrap();
        assert_eq!(fields.name, Some(json!("Acme")));
        assert_eq!(fields.description, Some(json!("Widgets")));
    }

    #[tokio::test]
    async fn reads_form_body() {
        let PostFields(fields) = extract(Some("application/x-www-form-urlencoded"), "name=Acme+Co&description=")
            .await
            .unwrap();
        assert_eq!(fields.name, Some(json!("Acme Co")));
        assert_eq!(fields.description, Some(json!("")));
    }

    #[tokio::test]
    async fn empty_body_is_no_fields() {
        let PostFields(fields) = extract(None, "").await.unwrap();
        assert_eq!(fields, CustomerFields::default());
        let PostFields(fields) = extract(Some("application/json"), "").await.unwrap();
        assert_eq!(fields, CustomerFields::default());
    }

    #[tokio::test]
    async fn null_and_unknown_fields_are_tolerated() {
        let PostFields(fields) = extract(Some("application/json"), r#"{"name":null,"extra":1}"#).await.unwrap();
        assert_eq!(fields, CustomerFields::default());
    }

    #[tokio::test]
    async fn non_string_values_are_accepted() {
        let PostFields(fields) = extract(Some("application/json"), r#"{"name":0,"description":false}"#).await.unwrap();
        assert_eq!(fields.name, Some(json!(0)));
        assert_eq!(fields.description, Some(json!(false)));
    }

    #[tokio::test]
    async fn malformed_json_is_rejected() {
        let resp = extract(Some("application/json"), "{not json").await.unwrap_err();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(resp.headers().get("X-Error-Code").unwrap(), "invalid_body");
    }
}
