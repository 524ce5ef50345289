//! Shared request validation helpers for inbound HTTP adapters.

use actix_web::web;
use serde_json::json;
use tracing::debug;

use crate::domain::{Error, JobApplicationId, UserId};

const ID_FIELD: &str = "id";

fn invalid_id(raw: &str) -> Error {
    Error::invalid_request(format!("invalid {ID_FIELD}: {raw:?}"))
        .with_details(json!({ "field": ID_FIELD, "code": "invalid_uuid" }))
}

/// Parse a `{id}` path segment as a user id.
pub(crate) fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|_| invalid_id(raw))
}

/// Parse a `{id}` path segment as a job application id.
pub(crate) fn parse_job_application_id(raw: &str) -> Result<JobApplicationId, Error> {
    raw.parse().map_err(|_| invalid_id(raw))
}

/// JSON extractor configuration reporting bad bodies in the domain error
/// shape instead of Actix's plain-text default.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        debug!(error = %err, "rejected JSON body");
        Error::invalid_request(format!("invalid JSON body: {err}"))
            .with_details(json!({ "code": "invalid_json" }))
            .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("42")]
    #[case("not-a-uuid")]
    fn malformed_ids_name_the_id_field(#[case] raw: &str) {
        for err in [
            parse_user_id(raw).expect_err("user id"),
            parse_job_application_id(raw).expect_err("job application id"),
        ] {
            assert_eq!(err.code(), ErrorCode::InvalidRequest);
            assert_eq!(
                err.details().and_then(|details| details.get("field")),
                Some(&json!("id"))
            );
        }
    }

    #[rstest]
    fn uuid_ids_parse() {
        let raw = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
        assert_eq!(parse_user_id(raw).map(|id| id.to_string()), Ok(raw.to_owned()));
        assert_eq!(
            parse_job_application_id(raw).map(|id| id.to_string()),
            Ok(raw.to_owned())
        );
    }
}
