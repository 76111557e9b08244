//! Per-request latency logging.

use std::time::Instant;

use tracing::trace;

use crate::handler::BoxedHandler;
use crate::request::Request;

/// Logs `METHOD /path?query <n>ms` at trace level once the inner handler
/// has produced its response.
///
/// The clock is monotonic. A panic below this layer skips the log line and
/// keeps unwinding; put [`recover`](super::recover) outside it to answer
/// the request anyway.
pub fn timing(next: BoxedHandler) -> BoxedHandler {
    BoxedHandler::new(move |req: Request| {
        let next = next.clone();
        async move {
            let method = req.method().clone();
            let target = req.path_and_query().to_owned();

            let start = Instant::now();
            let res = next.call(req).await;
            let elapsed = start.elapsed().as_millis();

            trace!("{method} {target} {elapsed}ms");
            res
        }
    })
}
