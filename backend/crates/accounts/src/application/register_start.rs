//! Registration Step 1
//!
//! Validates basic info and opens a temporary registration session.
//! Nothing is stored when any check fails.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::config::AccountsConfig;
use crate::application::token::sign_registration_token;
use crate::domain::entity::registration_session::RegistrationSession;
use crate::domain::repository::{RegistrationSessionRepository, UserRepository};
use crate::domain::value_object::{
    email::Email, person_name::PersonName, phone_number::PhoneNumber,
};
use crate::error::{AccountsError, AccountsResult};

pub struct RegisterStartInput {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub terms_accepted: bool,
}

pub struct RegisterStartOutput {
    pub temp_token: String,
    pub step: i16,
}

pub struct RegisterStartUseCase<U, S>
where
    U: UserRepository,
    S: RegistrationSessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    config: Arc<AccountsConfig>,
}

impl<U, S> RegisterStartUseCase<U, S>
where
    U: UserRepository,
    S: RegistrationSessionRepository,
{
    pub fn new(user_repo: Arc<U>, session_repo: Arc<S>, config: Arc<AccountsConfig>) -> Self {
        Self {
            user_repo,
            session_repo,
            config,
        }
    }

    pub async fn execute(&self, input: RegisterStartInput) -> AccountsResult<RegisterStartOutput> {
        if input.password != input.confirm_password {
            return Err(AccountsError::PasswordMismatch);
        }
        if !input.terms_accepted {
            return Err(AccountsError::TermsNotAccepted);
        }

        let email = Email::new(input.email)?;
        let phone = PhoneNumber::new(&input.phone)?;
        let first_name = PersonName::new(&input.first_name, "First name")?;
        let last_name = PersonName::new(&input.last_name, "Last name")?;
        let password = ClearTextPassword::new(input.password, &self.config.password_policy)?;

        if self.user_repo.exists_by_email(&email).await? {
            return Err(AccountsError::EmailTaken);
        }
        if self.user_repo.exists_by_phone(&phone).await? {
            return Err(AccountsError::PhoneTaken);
        }

        let password_hash = password.hash(self.config.pepper())?;

        let session = RegistrationSession::new(
            email,
            phone,
            first_name,
            last_name,
            password_hash.as_phc_string().to_string(),
            self.config.registration_ttl_ms(),
        );
        self.session_repo.create(&session).await?;

        tracing::info!(session_id = %session.session_id, "Registration started");

        Ok(RegisterStartOutput {
            temp_token: sign_registration_token(&self.config.session_secret, &session.session_id),
            step: session.step.number(),
        })
    }
}
