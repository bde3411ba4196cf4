//! Crate-level scenario tests
//!
//! Use cases run against `MemoryStore` and `FakeTransport`s; `router` drives
//! the full axum stack.

mod admin;
mod registration;

use std::sync::Arc;
use std::time::Duration;

use kernel::id::{RegistrationSessionId, UserId};
use platform::notify::Channel;
use platform::password::ClearTextPassword;

use crate::application::token::verify_registration_token;
use crate::application::{
    AccountsConfig, ApplyReferralInput, ApplyReferralOutput, ApplyReferralUseCase,
    NotificationDispatcher, RegisterStartInput, RegisterStartOutput, RegisterStartUseCase,
    ResendCodesOutput, ResendCodesUseCase, SelectCollegeInput, SelectCollegeOutput,
    SelectCollegeUseCase, VerifyCodesInput, VerifyCodesOutput, VerifyCodesUseCase,
};
use crate::domain::entity::{college::College, user::User};
use crate::domain::value_object::{
    email::Email, person_name::PersonName, phone_number::PhoneNumber, user_role::UserRole,
};
use crate::error::AccountsResult;

use memory::{FakeTransport, MemoryStore};

pub(crate) const PASSWORD: &str = "secret1";

pub(crate) fn test_config() -> AccountsConfig {
    AccountsConfig {
        delivery_timeout: Duration::from_millis(200),
        ..AccountsConfig::with_random_secret()
    }
}

/// A user stored directly, bypassing registration
pub(crate) fn make_user(email: &str, phone: &str, role: UserRole, config: &AccountsConfig) -> User {
    let hash = ClearTextPassword::new(PASSWORD.to_string(), &config.password_policy)
        .unwrap()
        .hash(config.pepper())
        .unwrap();
    User::new(
        Email::new(email).unwrap(),
        PhoneNumber::new(phone).unwrap(),
        PersonName::new("Pat", "First name").unwrap(),
        PersonName::new("Lee", "Last name").unwrap(),
        hash.as_phc_string().to_string(),
        role,
    )
}

pub(crate) struct Harness {
    pub store: MemoryStore,
    pub email: FakeTransport,
    pub sms: FakeTransport,
    pub config: Arc<AccountsConfig>,
    pub college: College,
}

impl Harness {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let college = store.add_college("State University");
        Self {
            store,
            email: FakeTransport::new(Channel::Email),
            sms: FakeTransport::new(Channel::Sms),
            config: Arc::new(test_config()),
            college,
        }
    }

    pub fn repo(&self) -> Arc<MemoryStore> {
        Arc::new(self.store.clone())
    }

    pub fn dispatcher(&self) -> NotificationDispatcher<FakeTransport> {
        NotificationDispatcher::new(
            Arc::new(self.email.clone()),
            Arc::new(self.sms.clone()),
            &self.config,
        )
    }

    pub fn session_id(&self, temp_token: &str) -> RegistrationSessionId {
        verify_registration_token(&self.config.session_secret, temp_token).unwrap()
    }

    pub fn step1_input(email: &str, phone: &str) -> RegisterStartInput {
        RegisterStartInput {
            email: email.to_string(),
            password: PASSWORD.to_string(),
            confirm_password: PASSWORD.to_string(),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            phone: phone.to_string(),
            terms_accepted: true,
        }
    }

    pub async fn step1(&self, input: RegisterStartInput) -> AccountsResult<RegisterStartOutput> {
        RegisterStartUseCase::new(self.repo(), self.repo(), self.config.clone())
            .execute(input)
            .await
    }

    pub async fn step2(&self, temp_token: &str) -> AccountsResult<SelectCollegeOutput> {
        self.step2_with(temp_token, &self.college.college_id.to_string(), 2026)
            .await
    }

    pub async fn step2_with(
        &self,
        temp_token: &str,
        college_id: &str,
        graduation_year: i32,
    ) -> AccountsResult<SelectCollegeOutput> {
        SelectCollegeUseCase::new(
            self.repo(),
            self.repo(),
            self.dispatcher(),
            self.config.clone(),
        )
        .execute(SelectCollegeInput {
            temp_token: temp_token.to_string(),
            college_id: college_id.to_string(),
            graduation_year,
        })
        .await
    }

    pub async fn step3(
        &self,
        temp_token: &str,
        email_code: &str,
        phone_code: &str,
    ) -> AccountsResult<VerifyCodesOutput> {
        VerifyCodesUseCase::new(self.repo(), self.repo(), self.repo(), self.config.clone())
            .execute(VerifyCodesInput {
                temp_token: temp_token.to_string(),
                email_code: email_code.to_string(),
                phone_code: phone_code.to_string(),
            })
            .await
    }

    /// Step 3 with the codes the fake transports last carried
    pub async fn step3_captured(&self, temp_token: &str) -> AccountsResult<VerifyCodesOutput> {
        let email_code = self.email.last_code();
        let phone_code = self.sms.last_code();
        self.step3(temp_token, &email_code, &phone_code).await
    }

    pub async fn step4(
        &self,
        temp_token: &str,
        user_id: &UserId,
        referral_code: Option<&str>,
        skip_referral: bool,
    ) -> AccountsResult<ApplyReferralOutput> {
        ApplyReferralUseCase::new(self.repo(), self.repo(), self.repo(), self.config.clone())
            .execute(ApplyReferralInput {
                temp_token: temp_token.to_string(),
                user_id: user_id.to_string(),
                referral_code: referral_code.map(str::to_string),
                skip_referral,
            })
            .await
    }

    pub async fn resend(&self, temp_token: &str) -> AccountsResult<ResendCodesOutput> {
        ResendCodesUseCase::new(self.repo(), self.dispatcher(), self.config.clone())
            .execute(temp_token.to_string())
            .await
    }

    /// Steps 1 to 3 with healthy transports; returns the temp token and new user
    pub async fn register(&self, email: &str, phone: &str) -> (String, User) {
        let started = self.step1(Self::step1_input(email, phone)).await.unwrap();
        self.step2(&started.temp_token).await.unwrap();
        let verified = self.step3_captured(&started.temp_token).await.unwrap();
        (started.temp_token, self.store.user(&verified.user_id))
    }
}
