//! Request handlers for the visitor endpoint.

use std::net::{IpAddr, SocketAddr};

use axum::Json;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::header::USER_AGENT;
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use log::{debug, warn};
use serde_json::json;

use super::AppState;
use crate::visitors::{ClientInfo, VisitorStats};

const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Records a visit for the requesting client. Only `POST` is accepted.
pub async fn log_visitors(State(state): State<AppState>, request: Request) -> Response {
    if request.method() != Method::POST {
        debug!("Rejecting {} /api/logVisitors", request.method());
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            Json(json!({ "message": "Method Not Allowed" })),
        )
            .into_response();
    }

    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    let client = client_info(request.headers(), peer);

    match state.visitors.log_visitor(&client).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "success": true }))).into_response(),
        Err(e) => {
            warn!("Error in /api/logVisitors: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

pub async fn visitor_stats(State(state): State<AppState>) -> Json<VisitorStats> {
    Json(state.visitors.visitor_stats().await)
}

/// Client address from the first `X-Forwarded-For` entry, else the socket peer.
pub fn client_info(headers: &HeaderMap, peer: Option<IpAddr>) -> ClientInfo {
    let forwarded = headers
        .get(X_FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok());

    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    ClientInfo {
        ip: forwarded.or(peer),
        user_agent,
    }
}
