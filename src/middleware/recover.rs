//! Panic recovery.

use std::any::Any;
use std::error::Error as StdError;
use std::panic::AssertUnwindSafe;

use futures_util::FutureExt;
use http::StatusCode;
use tracing::error;

use crate::error::Error;
use crate::handler::BoxedHandler;
use crate::request::Request;
use crate::response::Response;

type BoxError = Box<dyn StdError + Send + Sync>;

const UNKNOWN: &str = "unknown error";

/// Catches panics from every handler inside it and answers `500`.
///
/// The response body is the panic's message: the `Display` of an error
/// passed to [`raise`], the text of `panic!("...")`, or `unknown error` for
/// any other payload. No headers are set.
///
/// A panic payload carries no trait information, so only error values that
/// arrive as `Box<dyn Error + Send + Sync>` (what [`raise`] sends),
/// [`crate::Error`] or `std::io::Error` are recognized. An arbitrary error
/// type passed straight to `std::panic::panic_any` is reported as
/// `unknown error`; unwind with [`raise`] to keep its message.
///
/// Only code *inside* this layer is protected. Add it first to cover the
/// whole chain.
pub fn recover(next: BoxedHandler) -> BoxedHandler {
    BoxedHandler::new(move |req: Request| {
        let next = next.clone();
        async move {
            let method = req.method().clone();
            let path = req.path().to_owned();

            // The call itself sits inside the boundary too: a handler may
            // panic before it ever returns a future.
            let outcome = AssertUnwindSafe(async move { next.call(req).await })
                .catch_unwind()
                .await;

            match outcome {
                Ok(res) => res,
                Err(payload) => {
                    let err = classify(payload);
                    error!(%method, %path, "handler panicked: {err}");
                    Response::builder()
                        .status(StatusCode::INTERNAL_SERVER_ERROR)
                        .body(err.to_string())
                }
            }
        }
    })
}

/// Unwind out of a handler with a structured error.
///
/// Under [`recover`] the client receives `500` with `err`'s message as the
/// body. Without it, this is an ordinary panic.
///
/// ```rust,no_run
/// use strata::{Request, middleware};
///
/// async fn load(_req: Request) -> &'static str {
///     let config = std::fs::read_to_string("app.toml")
///         .unwrap_or_else(|e| middleware::raise(e));
///     # let _ = config;
///     "loaded"
/// }
/// ```
pub fn raise<E>(err: E) -> !
where
    E: StdError + Send + Sync + 'static,
{
    std::panic::panic_any(BoxError::from(err))
}

/// Error values win over text, text wins over everything else.
fn classify(payload: Box<dyn Any + Send>) -> BoxError {
    let payload = match payload.downcast::<BoxError>() {
        Ok(err) => return *err,
        Err(other) => other,
    };
    let payload = match payload.downcast::<Error>() {
        Ok(err) => return err,
        Err(other) => other,
    };
    let payload = match payload.downcast::<std::io::Error>() {
        Ok(err) => return err,
        Err(other) => other,
    };

    if let Some(text) = payload.downcast_ref::<&'static str>() {
        BoxError::from(*text)
    } else if let Some(text) = payload.downcast_ref::<String>() {
        BoxError::from(text.as_str())
    } else {
        BoxError::from(UNKNOWN)
    }
}
