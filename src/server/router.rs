//! Route table
//!
//! - `/`    health, no auth (also the fallback for unknown paths)
//! - `/get` read rows
//! - `/add` insert a row
//! - `/upd` update a row by id
//! - `/del` delete a row by id
//!
//! Routes accept any HTTP method. Every response carries
//! `Access-Control-Allow-Origin: *` and an `Access-Control-Allow-Methods`
//! value naming the route's verb (`GET` for health and the fallback).

use axum::{
    Router,
    http::{
        HeaderValue,
        header::{ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN},
    },
    routing::{MethodRouter, any},
};
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::Level;

use super::handlers::{AppState, add_row, delete_row, get_rows, health, update_row};

/// Build the gateway router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", any(health))
        .route("/get", allow_methods(any(get_rows), "GET"))
        .route("/add", allow_methods(any(add_row), "POST"))
        .route("/upd", allow_methods(any(update_row), "PUT"))
        .route("/del", allow_methods(any(delete_row), "DELETE"))
        .fallback(health)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(SetResponseHeaderLayer::overriding(
                    ACCESS_CONTROL_ALLOW_ORIGIN,
                    HeaderValue::from_static("*"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    ACCESS_CONTROL_ALLOW_METHODS,
                    HeaderValue::from_static("GET"),
                )),
        )
}

fn allow_methods(route: MethodRouter<AppState>, methods: &'static str) -> MethodRouter<AppState> {
    route.layer(SetResponseHeaderLayer::overriding(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(methods),
    ))
}
