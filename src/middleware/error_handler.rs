use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::{JsonPayloadError, PathError, QueryPayloadError},
    Error, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

use crate::core::AppError;
use crate::middleware::request_id::RequestIdValue;

/// Middleware that logs every failed response with its request ID
pub struct ErrorLogger;

impl<S, B> Transform<S, ServiceRequest> for ErrorLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = ErrorLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ErrorLoggerMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct ErrorLoggerMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for ErrorLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            let result = service.call(req).await;

            match &result {
                Ok(res) => {
                    let status = res.status();
                    if status.is_client_error() || status.is_server_error() {
                        let request_id = res
                            .request()
                            .extensions()
                            .get::<RequestIdValue>()
                            .map(|id| id.0.clone())
                            .unwrap_or_default();
                        let message = res
                            .response()
                            .error()
                            .map(|e| e.to_string())
                            .unwrap_or_default();

                        if status.is_server_error() {
                            tracing::error!(
                                request_id = %request_id,
                                status = %status,
                                path = %res.request().path(),
                                error = %message,
                                "Request failed"
                            );
                        } else {
                            tracing::warn!(
                                request_id = %request_id,
                                status = %status,
                                path = %res.request().path(),
                                error = %message,
                                "Request rejected"
                            );
                        }
                    }
                }
                Err(err) => tracing::error!("Request error: {:?}", err),
            }

            result
        })
    }
}

/// Render malformed JSON bodies in the standard error format
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> Error {
    AppError::validation(format!("Invalid request body: {}", err)).into()
}

/// Render malformed query strings in the standard error format
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> Error {
    AppError::validation(format!("Invalid query parameters: {}", err)).into()
}

/// Render unparsable path segments (e.g. a bad UUID) in the standard error format
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> Error {
    AppError::validation(format!("Invalid path parameter: {}", err)).into()
}
