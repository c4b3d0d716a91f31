use ::std::collections::HashMap;
use axum::{
    async_trait,
    body::HttpBody,
    extract::{Form, FromRequest},
    http::{Request, StatusCode},
    BoxError,
};
use garde::Validate;
use serde::{
    Deserialize,
    de::value::{Error as ValueError, MapDeserializer},
};
use common_types::Payloads::Submission;

use crate::Response::{ServerResponse, status_response, field_errors_response};

/// Extracts a urlencoded form body and only hands it to the handler once
/// every field of `T::form()` passes.
#[derive(Debug, Clone)]
pub struct ValidatedForm<T>(pub T);

#[async_trait]
impl<S, B, T> FromRequest<S, B> for ValidatedForm<T>
where
    T: Submission + Send,
    S: Send + Sync,
    B: HttpBody + Send + 'static,
    B::Data: Send,
    B::Error: Into<BoxError>,
{
    type Rejection = ServerResponse;

    async fn from_request(req: Request<B>, state: &S) -> Result<Self, Self::Rejection> {
        let Form(submitted) = Form::<HashMap<String, String>>::from_request(req, state).await.map_err(|rejection| {
            tracing::info!("Failed to decode form body, {rejection}");
            status_response(rejection.status(), rejection.body_text())
        })?;
        validate_submission(submitted).map(ValidatedForm)
    }
}

// 1. Validate every declared field against the form definition
// 2. Build the typed payload, undeclared keys are dropped
// 3. Run the payload's own garde rules
#[tracing::instrument(skip(submitted), fields(form=%T::form().name))]
pub fn validate_submission<T: Submission>(submitted: HashMap<String, String>) -> Result<T, ServerResponse> {
    let report = T::form().validate(&submitted);
    if !report.is_valid() {
        return Err(field_errors_response(&report));
    }

    let payload = T::deserialize(MapDeserializer::<_, ValueError>::new(submitted.into_iter())).map_err(|err| {
        tracing::info!("Failed to build payload, {err}");
        status_response(StatusCode::BAD_REQUEST, err)
    })?;

    if let Err(err) = payload.validate(&()) {
        tracing::info!("Validation failed with reason: {err}");
        return Err(status_response(StatusCode::BAD_REQUEST, err));
    }
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common_types::Payloads::{CommentPayload, LoginPayload};

    fn submission(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(key, value)| (key.to_string(), value.to_string())).collect()
    }

    #[test]
    fn builds_payload_and_drops_undeclared_keys() {
        let payload: LoginPayload = validate_submission(submission(&[
            ("email", "user@example.com"),
            ("password", "hunter2"),
            ("submit", "Let Me In!"),
        ])).unwrap();
        assert_eq!(payload.email, "user@example.com");
        assert_eq!(payload.password, "hunter2");
    }

    #[test]
    fn rejects_with_field_errors_json() {
        let (status, body) = validate_submission::<CommentPayload>(submission(&[("comment_text", "   ")])).unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["form"], "Comment");
        assert_eq!(body["errors"]["comment_text"][0], "This field is required.");
    }
}
