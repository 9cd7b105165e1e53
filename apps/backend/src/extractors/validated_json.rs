use std::ops::{Deref, DerefMut};

use actix_web::dev::Payload;
use actix_web::web::BytesMut;
use actix_web::{FromRequest, HttpRequest};
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde_json::Error as JsonError;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::trace_ctx;

/// JSON body extractor whose failures come back as problem details.
///
/// An empty body is `EMPTY_BODY`; anything serde rejects is `INVALID_JSON`.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for ValidatedJson<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T> FromRequest for ValidatedJson<T>
where
    T: DeserializeOwned + 'static,
{
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let mut payload = payload.take();

        let content_type = req
            .headers()
            .get("content-type")
            .and_then(|ct| ct.to_str().ok())
            .unwrap_or("")
            .to_string();

        Box::pin(async move {
            let trace_id = trace_ctx::trace_id();

            let mut body = BytesMut::new();
            while let Some(chunk) = payload.next().await {
                let chunk = chunk.map_err(|e| {
                    warn!(trace_id = %trace_id, error = %e, "Failed to read request body chunk");
                    AppError::bad_request(ErrorCode::BadRequest, "Failed to read request body")
                })?;
                body.extend_from_slice(&chunk);
            }

            if body.iter().all(u8::is_ascii_whitespace) {
                return Err(AppError::bad_request(
                    ErrorCode::EmptyBody,
                    "Request body is empty",
                ));
            }

            let parsed = serde_json::from_slice::<T>(&body).map_err(|e| {
                debug!(
                    trace_id = %trace_id,
                    error = %e,
                    content_type = %content_type,
                    body_size = body.len(),
                    "JSON parsing failed"
                );
                AppError::bad_request(ErrorCode::InvalidJson, classify_json_error(&e))
            })?;

            Ok(ValidatedJson(parsed))
        })
    }
}

fn classify_json_error(error: &JsonError) -> String {
    match error.classify() {
        serde_json::error::Category::Syntax => {
            let line = error.line();
            format!("Invalid JSON at line {line}")
        }
        serde_json::error::Category::Eof => "Invalid JSON: unexpected end of input".to_string(),
        // Missing fields land here too; serde's message names the field.
        serde_json::error::Category::Data => format!("Invalid JSON: {error}"),
        serde_json::error::Category::Io => "Invalid JSON: I/O error while reading body".to_string(),
    }
}
