//! Authentication middleware
//!
//! Attaches the bearer token on the way out and handles 401 on the way back.

use reqwest::{RequestBuilder, Response, StatusCode};

use crate::error::{ClientError, ClientResult};
use crate::session::Session;

/// Add `Authorization: Bearer <token>` when the session holds a token
pub fn authorize(request: RequestBuilder, session: &Session) -> RequestBuilder {
    match session.token() {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

/// Turn any non-success response into a [`ClientError`].
///
/// A 401 to a request that carried a token expires the session. A 401
/// without one, such as a failed login, only reports the service's detail.
pub async fn check_response(
    response: Response,
    session: &Session,
    authenticated: bool,
) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::debug!(status = status.as_u16(), body = %body, "request rejected");
    if status == StatusCode::UNAUTHORIZED && authenticated {
        session.expire();
    }
    Err(ClientError::from_response(status.as_u16(), &body))
}
