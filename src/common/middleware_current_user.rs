use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::Response;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Caller identity as vouched for by whatever sits in front of this service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentUser(pub String);

pub async fn set_current_user<B>(mut request: Request<B>, next: Next<B>) -> Result<Response, StatusCode> {
    let headers = request.headers();

    let user_id = headers
        .get(USER_ID_HEADER)
        .ok_or_else(|| StatusCode::BAD_REQUEST)?;

    let user_id = user_id.to_str().map_err(|_error| StatusCode::BAD_REQUEST)?.trim().to_owned();
    if user_id.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let extensions = request.extensions_mut();
    extensions.insert(CurrentUser(user_id));

    Ok(next.run(request).await)
}
