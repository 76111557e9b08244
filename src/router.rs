//! Radix-tree request router.
//!
//! One tree per HTTP method, O(path-length) lookup. Middleware registered
//! with [`Router::with`] wraps every route once, when the server starts.

use std::collections::HashMap;

use http::Method;
use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};
use crate::middleware::{Chain, Middleware};

/// The application router.
///
/// Build it once at startup and pass it to [`Server::serve`](crate::Server::serve).
/// Every builder method returns `self` so registrations chain naturally.
///
/// ```rust
/// use strata::{Request, Router, middleware};
///
/// async fn hello(_req: Request) -> &'static str { "hello" }
///
/// let app = Router::new()
///     .with(middleware::recover)
///     .with(middleware::timing)
///     .get("/hello", hello);
/// ```
pub struct Router {
    routes: HashMap<Method, MatchitRouter<usize>>,
    handlers: Vec<BoxedHandler>,
    middleware: Chain,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), handlers: Vec::new(), middleware: Chain::new() }
    }

    /// Add `middleware` to every route, inside any middleware added before it.
    ///
    /// Order relative to route registration does not matter.
    pub fn with(mut self, middleware: impl Middleware) -> Self {
        self.middleware = self.middleware.with(middleware);
        self
    }

    /// Register a handler for a method + path pair.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with one already
    /// registered for `method`.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        let index = self.handlers.len();
        self.routes
            .entry(method)
            .or_default()
            .insert(path, index)
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self.handlers.push(handler.into_boxed_handler());
        self
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::GET, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::POST, path, handler)
    }

    pub fn put(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::PUT, path, handler)
    }

    pub fn patch(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::PATCH, path, handler)
    }

    pub fn delete(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::DELETE, path, handler)
    }

    /// Wraps every handler in the middleware chain. Called once before
    /// serving; the chain is spent afterwards.
    pub(crate) fn finish(mut self) -> Self {
        let chain = std::mem::take(&mut self.middleware);
        self.handlers = self.handlers.into_iter().map(|h| chain.wrap(h)).collect();
        self
    }

    pub(crate) fn lookup(
        &self,
        method: &Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(method)?;
        let matched = tree.at(path).ok()?;
        let handler = self.handlers.get(*matched.value)?.clone();
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }

    /// Whether `path` is routed under any method.
    pub(crate) fn knows_path(&self, path: &str) -> bool {
        self.routes.values().any(|tree| tree.at(path).is_ok())
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use http::StatusCode;

    use super::*;
    use crate::middleware;
    use crate::request::Request;
    use crate::response::Response;

    async fn user(req: Request) -> String {
        format!("user {}", req.param("id").unwrap_or("?"))
    }

    async fn boom(_req: Request) -> Response {
        panic!("boom")
    }

    #[tokio::test]
    async fn routes_by_method_and_extracts_params() {
        let router = Router::new().get("/users/{id}", user).finish();

        let (handler, params) = router.lookup(&Method::GET, "/users/42").unwrap();
        assert_eq!(params.get("id").map(String::as_str), Some("42"));

        let req = Request::new(
            Method::GET,
            http::Uri::from_static("/users/42"),
            http::HeaderMap::new(),
            bytes::Bytes::new(),
            params,
        );
        assert_eq!(handler.call(req).await.body(), b"user 42");

        assert!(router.lookup(&Method::POST, "/users/42").is_none());
        assert!(router.knows_path("/users/42"));
        assert!(router.lookup(&Method::GET, "/nope").is_none());
        assert!(!router.knows_path("/nope"));
    }

    #[tokio::test]
    async fn middleware_added_after_routes_still_applies() {
        let router = Router::new()
            .get("/boom", boom)
            .with(middleware::recover)
            .finish();

        let (handler, _) = router.lookup(&Method::GET, "/boom").unwrap();
        let res = handler.call(Request::fake(Method::GET, "/boom")).await;

        assert_eq!(res.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(res.body(), b"boom");
    }

    #[test]
    #[should_panic(expected = "invalid route")]
    fn conflicting_routes_panic() {
        let _ = Router::new()
            .get("/users/{id}", user)
            .get("/users/{name}", user);
    }
}
