//! Minimal strata example: a few routes behind `recover` and `timing`.
//!
//! Run with:
//!   cargo run --example basic
//!
//! Try:
//!   curl -i http://localhost:3000/users/42?fields=name
//!   curl -i -X POST http://localhost:3000/users -d '{"name":"alice"}'
//!   curl -i http://localhost:3000/panic          # 500, body "something broke"
//!   curl -i http://localhost:3000/config         # 500, body from the io error
//!
//! Every request prints a trace line such as `GET /users/42?fields=name 0ms`.

use strata::{middleware, Request, Response, Router, Server, StatusCode};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    let app = Router::new()
        .with(middleware::recover)
        .with(middleware::timing)
        .get("/users/{id}", get_user)
        .post("/users", create_user)
        .delete("/users/{id}", delete_user)
        .get("/panic", panic_handler)
        .get("/config", read_config);

    if let Err(e) = Server::bind("0.0.0.0:3000").serve(app).await {
        tracing::error!("server error: {e}");
        std::process::exit(1);
    }
}

// GET /users/{id}
async fn get_user(req: Request) -> Response {
    let id = req.param("id").unwrap_or("unknown");
    Response::json(format!(r#"{{"id":"{id}","name":"alice"}}"#).into_bytes())
}

// POST /users
async fn create_user(req: Request) -> Response {
    if req.body().is_empty() {
        return Response::status(StatusCode::BAD_REQUEST);
    }
    Response::builder()
        .status(StatusCode::CREATED)
        .header("location", "/users/99")
        .json(br#"{"id":"99","name":"new_user"}"#.to_vec())
}

// DELETE /users/{id}
async fn delete_user(_req: Request) -> StatusCode {
    StatusCode::NO_CONTENT
}

// GET /panic: recovered into a 500 by `middleware::recover`
async fn panic_handler(_req: Request) -> Response {
    panic!("something broke")
}

// GET /config: unwinds with a typed error instead of a string
async fn read_config(_req: Request) -> String {
    std::fs::read_to_string("/definitely/not/here.toml")
        .unwrap_or_else(|e| middleware::raise(e))
}
