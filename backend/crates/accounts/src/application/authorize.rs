//! Access Check
//!
//! Resolves a bearer token to a live, unsuspended platform admin.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::config::AccountsConfig;
use crate::application::issue_codes::now_ms;
use crate::application::token::verify_access_token;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_role::UserRole;
use crate::error::{AccountsError, AccountsResult};

/// Caller identity placed in request extensions by the admin middleware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub role: UserRole,
}

pub struct AuthorizeAdminUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AccountsConfig>,
}

impl<U> AuthorizeAdminUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AccountsConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, bearer_token: Option<&str>) -> AccountsResult<AuthenticatedUser> {
        let token = bearer_token.ok_or(AccountsError::Unauthorized)?;
        let claims = verify_access_token(&self.config.session_secret, token, now_ms())
            .ok_or(AccountsError::Unauthorized)?;

        // The token may predate a role change or suspension
        let user = self
            .user_repo
            .find_by_id(&claims.user_id)
            .await?
            .ok_or(AccountsError::Unauthorized)?;

        if user.is_suspended {
            return Err(AccountsError::AccountSuspended);
        }
        if !user.role.is_platform_admin() {
            return Err(AccountsError::Forbidden);
        }

        Ok(AuthenticatedUser {
            user_id: user.user_id,
            role: user.role,
        })
    }
}
