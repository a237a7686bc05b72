//! Session resolution from request headers.
//!
//! The role header is a capability toggle for the admin console, not
//! authentication.

use axum::{
    extract::Request,
    http::{HeaderName, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use dronedesk_core::{Role, Session};

pub const ROLE_HEADER: HeaderName = HeaderName::from_static("x-dronedesk-role");
pub const TEAM_HEADER: HeaderName = HeaderName::from_static("x-dronedesk-team");

/// Resolve the [`Session`] for this request and store it as an extension.
///
/// A missing role header means pilot; an unrecognised one is rejected.
pub async fn resolve_session(mut request: Request, next: Next) -> Response {
    let headers = request.headers();
    let role = match headers.get(&ROLE_HEADER).map(|value| value.to_str()) {
        None => Role::Pilot,
        Some(Ok(value)) => match value.parse::<Role>() {
            Ok(role) => role,
            Err(_) => return bad_role(value),
        },
        Some(Err(_)) => return bad_role("<non-ascii>"),
    };
    let team = headers
        .get(&TEAM_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim);

    let session = Session::new(role, team);
    request.extensions_mut().insert(session);
    next.run(request).await
}

fn bad_role(value: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({
            "error": format!("unknown role '{}'", value),
            "expected": "admin | pilot"
        })),
    )
        .into_response()
}
