use std::sync::Arc;

use auth::Authenticator;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::extract::Request;
use axum::extract::State;
use axum::middleware;
use axum::middleware::Next;
use axum::response::Response;
use axum::routing::MethodRouter;
use http::header;
use http::request::Parts;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::user::errors::UserError;
use crate::user::ports::UserServicePort;

/// Collaborators the authentication middleware needs on every request.
#[derive(Clone)]
pub struct AuthState {
    pub authenticator: Arc<Authenticator>,
    pub users: Arc<dyn UserServicePort>,
}

/// Identity resolved for the current request.
///
/// Inserted into the request extensions by [`authenticate`] and dropped with
/// the request. Handlers take it as an extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: EmailAddress,
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(ApiError::unauthenticated)
    }
}

/// Wrap the handlers of `method_router` with [`authenticate`].
///
/// Only the methods it routes are gated. Its fallback is left alone, so an
/// unsupported method still answers 405 once merged with public handlers on
/// the same path.
pub fn protect<S>(method_router: MethodRouter<S>, auth_state: AuthState) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    method_router.route_layer(middleware::from_fn_with_state(auth_state, authenticate))
}

/// Require a valid bearer token naming a user that still exists.
///
/// Every rejection produces the same 401 body. Nothing is cached between
/// requests: the token is verified and the user looked up each time.
pub async fn authenticate(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_header(&request).ok_or_else(|| {
        tracing::debug!("Request without bearer token");
        ApiError::unauthenticated()
    })?;

    let subject = state.authenticator.validate_token(token).map_err(|e| {
        tracing::warn!(error = %e, "Token rejected");
        ApiError::unauthenticated()
    })?;

    let user_id = UserId::from_string(&subject).map_err(|e| {
        tracing::warn!(error = %e, "Token subject is not a user id");
        ApiError::unauthenticated()
    })?;

    let user = match state.users.get_user(&user_id).await {
        Ok(user) => user,
        Err(UserError::NotFound(_)) => {
            tracing::warn!(user_id = %user_id, "Token subject no longer exists");
            return Err(ApiError::unauthenticated());
        }
        Err(e) => {
            tracing::error!(error = %e, user_id = %user_id, "Identity lookup failed");
            return Err(ApiError::InternalServerError(
                "Internal server error".to_string(),
            ));
        }
    };

    request
        .extensions_mut()
        .insert(AuthenticatedUser::from(&user));

    Ok(next.run(request).await)
}

fn extract_token_from_header(request: &Request) -> Option<&str> {
    let value = request.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
