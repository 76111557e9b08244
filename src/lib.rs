//! # strata
//!
//! A minimal HTTP framework whose one idea is the handler chain: a terminal
//! handler wrapped in an ordered list of middleware.
//!
//! ## The chain
//!
//! A handler is an `async fn(Request) -> impl IntoResponse`. A middleware is
//! a function from handler to handler. A [`middleware::Chain`] applies its
//! middleware so that the first one listed is the outermost:
//!
//! ```text
//! request  ─► recover ─► timing ─► handler
//! response ◄─ recover ◄─ timing ◄─┘
//! ```
//!
//! Two middleware ship with the crate:
//!
//! - [`middleware::recover`]: a panic anywhere inside it becomes
//!   `500 Internal Server Error` with the panic message as the body
//! - [`middleware::timing`]: one trace-level line per request,
//!   `GET /users/42?full=1 3ms`
//!
//! Everything else (connection handling, HTTP parsing, HTTP/2) is hyper's
//! job, and log output is whatever `tracing` subscriber the application
//! installs.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use strata::{middleware, Request, Response, Router, Server};
//! use http::StatusCode;
//!
//! #[tokio::main]
//! async fn main() {
//!     let app = Router::new()
//!         .with(middleware::recover)
//!         .with(middleware::timing)
//!         .get("/users/{id}", get_user)
//!         .post("/users", create_user);
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await.unwrap();
//! }
//!
//! async fn get_user(req: Request) -> Response {
//!     let id = req.param("id").unwrap_or("unknown");
//!     Response::json(format!(r#"{{"id":"{id}"}}"#).into_bytes())
//! }
//!
//! async fn create_user(req: Request) -> Response {
//!     if req.body().is_empty() {
//!         return Response::status(StatusCode::BAD_REQUEST);
//!     }
//!     Response::builder()
//!         .status(StatusCode::CREATED)
//!         .header("location", "/users/99")
//!         .json(br#"{"id":"99"}"#.to_vec())
//! }
//! ```

mod error;
mod handler;
mod request;
mod response;
mod router;
mod server;

pub mod middleware;

pub use error::Error;
pub use handler::{BoxFuture, BoxedHandler, Handler};
pub use request::Request;
pub use response::{ContentType, IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;

pub use http::{Method, StatusCode};
