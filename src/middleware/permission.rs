//! Route-level permission gate.
//!
//! [`require_permission`] builds a tower layer for `route_layer`. For every
//! request it resolves the bearer token, reloads the account, reads the
//! account's override and asks the evaluator. Nothing is cached between
//! requests, so role and permission changes apply immediately.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::extract::Request;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use examhall_core::AppError;
use examhall_core::permissions::{ActionFlag, Module, PermissionError, evaluate};
use tower::{Layer, Service};
use tracing::{debug, instrument, warn};

use crate::metrics::track_permission_decision;
use crate::middleware::auth::{Principal, resolve_principal};
use crate::state::AppState;

/// Runs the full gate against a request's parts.
///
/// Errors are terminal for the request. A store failure while reading the
/// override propagates; it is never replaced by the role default.
#[instrument(skip(state, parts), fields(module = %module, action = ?action))]
pub async fn authorize(
    state: &AppState,
    parts: &Parts,
    module: Module,
    action: Option<ActionFlag>,
) -> Result<Principal, PermissionError> {
    let claims = resolve_principal(parts, &state.jwt_config)?;
    let account_id = claims.user_id()?.into();

    let account = state
        .store
        .find_account(account_id)
        .await?
        .ok_or(PermissionError::PrincipalNotFound)?;

    let stored = state.store.read_override(account.id).await?;
    let decision = evaluate(
        account.role,
        stored.as_ref().map(|o| &o.policy),
        module,
        action,
    );
    track_permission_decision(account.role, module, decision.allowed);

    if !decision.allowed {
        warn!(
            account_id = %account.id,
            role = %account.role,
            module = %module,
            action = ?action,
            "Permission denied"
        );
        return Err(PermissionError::Authorization { module });
    }

    debug!(account_id = %account.id, role = %account.role, "Permission granted");
    Ok(Principal {
        account_id: account.id,
        role: account.role,
    })
}

/// Gate for `module`, optionally narrowed to `action`.
pub fn require_permission(
    state: AppState,
    module: Module,
    action: Option<ActionFlag>,
) -> RequirePermissionLayer {
    RequirePermissionLayer {
        state,
        module,
        action,
    }
}

#[derive(Clone)]
pub struct RequirePermissionLayer {
    state: AppState,
    module: Module,
    action: Option<ActionFlag>,
}

impl<S> Layer<S> for RequirePermissionLayer {
    type Service = RequirePermission<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequirePermission {
            inner,
            state: self.state.clone(),
            module: self.module,
            action: self.action,
        }
    }
}

#[derive(Clone)]
pub struct RequirePermission<S> {
    inner: S,
    state: AppState,
    module: Module,
    action: Option<ActionFlag>,
}

impl<S> Service<Request> for RequirePermission<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        // the clone may not be ready; keep the one poll_ready was called on
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let state = self.state.clone();
        let module = self.module;
        let action = self.action;

        Box::pin(async move {
            let (mut parts, body) = req.into_parts();
            match authorize(&state, &parts, module, action).await {
                Ok(principal) => {
                    parts.extensions.insert(principal);
                    inner.call(Request::from_parts(parts, body)).await
                }
                Err(err) => Ok(AppError::from(err).into_response()),
            }
        })
    }
}
