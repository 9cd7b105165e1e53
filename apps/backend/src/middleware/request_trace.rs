//! Assigns every request a trace id.
//!
//! The id is stored in request extensions (for `StructuredLogger`), opened as
//! the task-local trace scope (for error bodies), attached to a `request`
//! span, and echoed in the `x-trace-id` response header.
//!
//! Wire it inside `StructuredLogger` so the logger sees the extension:
//!
//! App::new()
//!     .wrap(StructuredLogger)
//!     .wrap(RequestTrace)

use std::future::{ready, Ready};

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::HttpMessage;
use futures_util::future::LocalBoxFuture;
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::trace_ctx;

pub struct RequestTrace;

impl<S, B> Transform<S, ServiceRequest> for RequestTrace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RequestTraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestTraceMiddleware { service }))
    }
}

pub struct RequestTraceMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestTraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = Uuid::new_v4().to_string();
        req.extensions_mut().insert(trace_id.clone());

        let span = info_span!(
            "request",
            trace_id = %trace_id,
            method = %req.method(),
            path = %req.path(),
        );

        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res =
                trace_ctx::with_trace_id(trace_id.clone(), fut.instrument(span)).await?;

            let header_value = HeaderValue::from_str(&trace_id)
                .unwrap_or_else(|_| HeaderValue::from_static("invalid-trace-id"));
            res.headers_mut()
                .insert(HeaderName::from_static("x-trace-id"), header_value);

            Ok(res)
        })
    }
}
