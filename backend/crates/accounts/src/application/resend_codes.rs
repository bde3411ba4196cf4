//! Resend Codes
//!
//! Replaces both codes of a session that has reached step 2 and sends them
//! again, with the same partial-failure rules as step 2.

use std::sync::Arc;

use platform::notify::NotificationTransport;

use crate::application::config::AccountsConfig;
use crate::application::dispatch::NotificationDispatcher;
use crate::application::issue_codes::{
    ensure_cooldown_elapsed, issue_and_dispatch, load_open_session, now_ms,
};
use crate::domain::repository::RegistrationSessionRepository;
use crate::error::{AccountsError, AccountsResult};

pub struct ResendCodesOutput {
    pub temp_token: String,
    pub email_sent: bool,
    pub message_sent: bool,
    /// Seconds the client must wait before the next resend
    pub wait_time: u64,
}

pub struct ResendCodesUseCase<S, T>
where
    S: RegistrationSessionRepository,
    T: NotificationTransport + Send + Sync + 'static,
{
    session_repo: Arc<S>,
    dispatcher: NotificationDispatcher<T>,
    config: Arc<AccountsConfig>,
}

impl<S, T> ResendCodesUseCase<S, T>
where
    S: RegistrationSessionRepository,
    T: NotificationTransport + Send + Sync + 'static,
{
    pub fn new(
        session_repo: Arc<S>,
        dispatcher: NotificationDispatcher<T>,
        config: Arc<AccountsConfig>,
    ) -> Self {
        Self {
            session_repo,
            dispatcher,
            config,
        }
    }

    pub async fn execute(&self, temp_token: String) -> AccountsResult<ResendCodesOutput> {
        let mut session =
            load_open_session(self.session_repo.as_ref(), &self.config, &temp_token).await?;

        if session.college_id.is_none() {
            return Err(AccountsError::CodesNotIssued);
        }

        let now = now_ms();
        ensure_cooldown_elapsed(&session, &self.config, now)?;

        let report = issue_and_dispatch(
            self.session_repo.as_ref(),
            &self.dispatcher,
            &self.config,
            &mut session,
            now,
        )
        .await?;

        tracing::info!(session_id = %session.session_id, "Verification codes resent");

        Ok(ResendCodesOutput {
            temp_token,
            email_sent: report.email_sent,
            message_sent: report.message_sent,
            wait_time: self.config.resend_cooldown.as_secs(),
        })
    }
}
