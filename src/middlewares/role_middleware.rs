use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use tracing::{error, warn};

use crate::middlewares::auth_middleware::SessionContext;
use crate::model::user::Role;
use crate::util::error::{HandlerError, HandlerErrorKind, INTERNAL_ERROR_MESSAGE};

/// Set of roles a route admits
#[derive(Debug, Clone, Copy)]
pub struct RoleGate {
    allowed: &'static [Role],
}

pub const ADMIN_ONLY: RoleGate = RoleGate::new(&[Role::Admin]);

impl RoleGate {
    pub const fn new(allowed: &'static [Role]) -> Self {
        RoleGate { allowed }
    }

    pub fn admits(&self, role: Role) -> bool {
        self.allowed.contains(&role)
    }
}

/// Must be layered inside `authenticate`; a request reaching it without a
/// session is answered with 500.
pub async fn require_role(
    State(gate): State<RoleGate>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, HandlerError> {
    let role = match req.extensions().get::<SessionContext>() {
        Some(ctx) => ctx.user.role,
        None => {
            error!("Role gate reached without a session context");
            return Err(HandlerError::new(HandlerErrorKind::Internal, INTERNAL_ERROR_MESSAGE));
        }
    };

    if !gate.admits(role) {
        warn!("Role {} denied access to {}", role, req.uri().path());
        return Err(HandlerError::forbidden(format!(
            "User role \"{}\" not authorized to access this resource",
            role
        )));
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_only_gate() {
        assert!(ADMIN_ONLY.admits(Role::Admin));
        assert!(!ADMIN_ONLY.admits(Role::User));
    }

    #[test]
    fn test_gate_with_several_roles() {
        let gate = RoleGate::new(&[Role::User, Role::Admin]);
        assert!(gate.admits(Role::User));
        assert!(gate.admits(Role::Admin));
        assert!(!RoleGate::new(&[]).admits(Role::Admin));
    }
}
