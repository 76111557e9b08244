//! Middleware layer.
//!
//! Middleware wraps a handler to add cross-cutting behavior without changing
//! its contract: it receives the next handler as a [`BoxedHandler`] and
//! returns a new one. Any `Fn(BoxedHandler) -> BoxedHandler` qualifies.
//!
//! A [`Chain`] holds middleware in order. The first one added is the
//! outermost: for `[a, b, c]` around `handler`, a request flows
//! `a → b → c → handler` and the response flows back `handler → c → b → a`.
//!
//! ```rust
//! use strata::{Request, middleware::{self, Chain}};
//!
//! async fn hello(_req: Request) -> &'static str { "hello" }
//!
//! let handler = Chain::new()
//!     .with(middleware::recover)
//!     .with(middleware::timing)
//!     .then(hello);
//! ```
//!
//! Built-in middleware:
//! - [`recover`]: turns a panic in any inner handler into a `500` response
//! - [`timing`]: logs `METHOD /path?query 12ms` at trace level

mod recover;
mod timing;

use std::fmt;
use std::sync::Arc;

use crate::handler::{BoxedHandler, Handler};

pub use recover::{raise, recover};
pub use timing::timing;

/// Transforms a handler into another handler.
///
/// Implemented for every `Fn(BoxedHandler) -> BoxedHandler + Send + Sync`,
/// so a plain `fn` or a closure is enough:
///
/// ```rust
/// use strata::{BoxedHandler, Request};
/// use strata::middleware::Middleware;
///
/// fn request_id(next: BoxedHandler) -> BoxedHandler {
///     BoxedHandler::new(move |req: Request| {
///         let next = next.clone();
///         async move {
///             let res = next.call(req).await;
///             // inspect or replace `res` here
///             res
///         }
///     })
/// }
///
/// fn assert_middleware(_: impl Middleware) {}
/// assert_middleware(request_id);
/// ```
pub trait Middleware: Send + Sync + 'static {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler;
}

impl<F> Middleware for F
where
    F: Fn(BoxedHandler) -> BoxedHandler + Send + Sync + 'static,
{
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        self(next)
    }
}

// ── Chain ─────────────────────────────────────────────────────────────────────

/// An ordered list of middleware, outermost first.
///
/// Cloning shares the middleware themselves. A `Chain` is also a
/// [`Middleware`], so chains nest.
#[derive(Clone, Default)]
pub struct Chain {
    layers: Vec<Arc<dyn Middleware>>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `middleware` inside everything added so far.
    pub fn with(mut self, middleware: impl Middleware) -> Self {
        self.layers.push(Arc::new(middleware));
        self
    }

    /// Wrap `handler` in every middleware of the chain.
    ///
    /// With no middleware the handler is returned as is.
    pub fn then(&self, handler: impl Handler) -> BoxedHandler {
        self.wrap(handler.into_boxed_handler())
    }

    pub fn len(&self) -> usize { self.layers.len() }
    pub fn is_empty(&self) -> bool { self.layers.is_empty() }
}

impl Middleware for Chain {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        // Innermost first, so the first layer ends up on the outside.
        self.layers
            .iter()
            .rev()
            .fold(next, |inner, layer| layer.wrap(inner))
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain").field("len", &self.layers.len()).finish()
    }
}

/// Build a [`Chain`] from middleware listed outermost first.
///
/// ```rust
/// use std::sync::Arc;
/// use strata::middleware::{self, Middleware};
///
/// let layers: Vec<Arc<dyn Middleware>> = vec![
///     Arc::new(middleware::recover),
///     Arc::new(middleware::timing),
/// ];
/// let chain = middleware::chain(layers);
/// assert_eq!(chain.len(), 2);
/// ```
pub fn chain<I>(layers: I) -> Chain
where
    I: IntoIterator<Item = Arc<dyn Middleware>>,
{
    Chain { layers: layers.into_iter().collect() }
}
