//! Sign In Use Case
//!
//! Email + password login issuing a stateless access token.

use std::sync::Arc;

use platform::password::{ClearTextPassword, HashedPassword};

use crate::application::config::AccountsConfig;
use crate::application::issue_codes::now_ms;
use crate::application::token::{AccessClaims, issue_access_token};
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::email::Email;
use crate::error::{AccountsError, AccountsResult};

pub struct SignInInput {
    pub email: String,
    pub password: String,
}

pub struct SignInOutput {
    pub token: String,
    pub expires_at_ms: i64,
    pub user: User,
}

pub struct SignInUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AccountsConfig>,
}

impl<U> SignInUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AccountsConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, input: SignInInput) -> AccountsResult<SignInOutput> {
        let email = Email::new(input.email).map_err(|_| AccountsError::InvalidCredentials)?;

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AccountsError::InvalidCredentials)?;

        let hash = HashedPassword::from_phc_string(user.password_hash.as_str())?;
        let password = ClearTextPassword::unchecked(input.password);
        if !hash.verify(&password, self.config.pepper()) {
            return Err(AccountsError::InvalidCredentials);
        }

        if user.is_suspended {
            return Err(AccountsError::AccountSuspended);
        }

        let claims = AccessClaims {
            user_id: user.user_id,
            role: user.role,
            expires_at_ms: now_ms() + self.config.access_token_ttl_ms(),
        };
        let token = issue_access_token(&self.config.session_secret, &claims);

        tracing::info!(user_id = %user.user_id, role = %user.role, "User signed in");

        Ok(SignInOutput {
            token,
            expires_at_ms: claims.expires_at_ms,
            user,
        })
    }
}
