use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use common::ErrorResponse;
use std::net::{IpAddr, SocketAddr};

/// Origin the request claims through a proxy: first `X-Forwarded-For` hop,
/// else `X-Real-IP`. Non-ASCII bytes are kept as replacement characters, so
/// such a header never reads as loopback.
pub fn forwarded_origin(headers: &HeaderMap) -> Option<String> {
    let value = headers
        .get("x-forwarded-for")
        .or_else(|| headers.get("x-real-ip"))?;
    let text = String::from_utf8_lossy(value.as_bytes());
    Some(text.split(',').next().unwrap_or_default().trim().to_string())
}

pub fn is_loopback_name(origin: &str) -> bool {
    if origin.eq_ignore_ascii_case("localhost") {
        return true;
    }
    let bare = origin.trim_start_matches('[').trim_end_matches(']');
    match bare.parse::<IpAddr>() {
        Ok(ip) => ip.to_canonical().is_loopback(),
        Err(_) => false,
    }
}

/// The TCP peer must be loopback, and so must any origin named by a
/// forwarding header.
pub fn is_loopback_request(headers: &HeaderMap, peer: Option<IpAddr>) -> bool {
    let peer_ok = peer.map(|ip| ip.to_canonical().is_loopback()).unwrap_or(false);
    if !peer_ok {
        return false;
    }
    match forwarded_origin(headers) {
        Some(origin) => is_loopback_name(&origin),
        None => true,
    }
}

pub fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: "Unauthorized".to_string(),
        }),
    )
        .into_response()
}

pub async fn require_loopback(req: Request<Body>, next: Next) -> Response {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    if is_loopback_request(req.headers(), peer) {
        return next.run(req).await;
    }

    log::warn!(
        "Rejected {} {} from peer {:?} (forwarded: {:?})",
        req.method(),
        req.uri().path(),
        peer,
        forwarded_origin(req.headers())
    );
    unauthorized()
}
