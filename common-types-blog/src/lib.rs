mod extract;

#[allow(non_snake_case)]
pub mod Extract {
    pub use crate::extract::*;
}

#[allow(non_snake_case)]
pub mod Response {
    use axum::http::StatusCode;
    use serde::{Serialize, Serializer};
    use common_types::Forms::FormReport;

    pub type ServerResponse = (StatusCode, String);

    pub fn status_response<E: ToString>(status: StatusCode, error: E) -> ServerResponse {
        (status, error.to_string())
    }

    pub fn internal_server_error<E: ToString>(err: E) -> ServerResponse {
        status_response(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    #[derive(Serialize)]
    pub struct FieldErrors {
        pub form: &'static str,
        #[serde(serialize_with = "ordered_map")]
        pub errors: Vec<(&'static str, Vec<String>)>,
    }

    // Object keys are written in the form's field order
    fn ordered_map<S: Serializer>(errors: &Vec<(&'static str, Vec<String>)>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(errors.iter().map(|(field, messages)| (field, messages)))
    }

    impl From<&FormReport> for FieldErrors {
        fn from(report: &FormReport) -> Self {
            FieldErrors {
                form: report.form,
                errors: report.errors(),
            }
        }
    }

    // Body is JSON so templates can place each message next to its field
    pub fn field_errors_response(report: &FormReport) -> ServerResponse {
        match serde_json::to_string(&FieldErrors::from(report)) {
            Ok(body) => status_response(StatusCode::BAD_REQUEST, body),
            Err(err) => {
                tracing::error!("Failed to serialize field errors, {err}");
                internal_server_error("Internal Server Error")
            }
        }
    }
}
