use crate::errors::ServerError;
use crate::responses::ResultResp;
use astra::{Body, ResponseBuilder};
use serde::Serialize;

/// Serialize `value` as the response body, plus any extra headers.
pub fn json_response<T: Serialize>(value: &T, headers: &[(&str, &str)]) -> ResultResp {
    let body = serde_json::to_vec(value).map_err(|e| {
        tracing::error!(error = %e, "json encoding failed");
        ServerError::InternalError
    })?;

    let mut builder = ResponseBuilder::new()
        .status(200)
        .header("Content-Type", "application/json");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }

    builder
        .body(Body::from(body))
        .map_err(|_| ServerError::InternalError)
}
