//! Authenticated user extractor
//!
//! Handlers take [`CurrentUser`] as an argument to require a valid
//! Bearer token; role checks happen inside the handler because most
//! resources mix public, user and admin routes on one path.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use super::jwt::{Claims, JwtService};
use crate::core::ServerState;
use crate::db::models::ROLE_ADMIN;
use crate::utils::{AppError, AppResult};

/// Request-scoped identity parsed from the JWT
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// User id, "user:xyz" form
    pub id: String,
    pub name: String,
    pub role: String,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            name: claims.name,
            role: claims.role,
        }
    }
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    /// Admin gate for management endpoints
    pub fn ensure_admin(&self) -> AppResult<()> {
        if !self.is_admin() {
            return Err(AppError::not_authorized("Not authorized as admin"));
        }
        Ok(())
    }
}

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(AppError::unauthorized)?;

        let token = JwtService::extract_from_header(header).ok_or_else(AppError::unauthorized)?;

        let claims = state.jwt_service.validate_token(token)?;
        Ok(CurrentUser::from(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_gate() {
        let admin = CurrentUser {
            id: "user:root".into(),
            name: "Root".into(),
            role: "admin".into(),
        };
        let customer = CurrentUser {
            id: "user:alice".into(),
            name: "Alice".into(),
            role: "user".into(),
        };
        assert!(admin.ensure_admin().is_ok());
        assert!(customer.ensure_admin().is_err());
        assert!(!customer.is_admin());
    }
}
