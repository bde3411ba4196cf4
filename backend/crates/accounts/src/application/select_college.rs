//! Registration Step 2
//!
//! Records the college choice and issues the two verification codes.
//! A repeat submission re-issues codes and is subject to the resend cooldown.

use std::sync::Arc;

use kernel::id::CollegeId;
use platform::notify::NotificationTransport;

use crate::application::config::AccountsConfig;
use crate::application::dispatch::NotificationDispatcher;
use crate::application::issue_codes::{
    ensure_cooldown_elapsed, issue_and_dispatch, load_open_session, now_ms,
};
use crate::domain::repository::{CollegeRepository, RegistrationSessionRepository};
use crate::domain::value_object::graduation_year::GraduationYear;
use crate::error::{AccountsError, AccountsResult};

pub struct SelectCollegeInput {
    pub temp_token: String,
    pub college_id: String,
    pub graduation_year: i32,
}

pub struct SelectCollegeOutput {
    pub temp_token: String,
    pub step: i16,
    pub email_sent: bool,
    pub message_sent: bool,
}

pub struct SelectCollegeUseCase<S, C, T>
where
    S: RegistrationSessionRepository,
    C: CollegeRepository,
    T: NotificationTransport + Send + Sync + 'static,
{
    session_repo: Arc<S>,
    college_repo: Arc<C>,
    dispatcher: NotificationDispatcher<T>,
    config: Arc<AccountsConfig>,
}

impl<S, C, T> SelectCollegeUseCase<S, C, T>
where
    S: RegistrationSessionRepository,
    C: CollegeRepository,
    T: NotificationTransport + Send + Sync + 'static,
{
    pub fn new(
        session_repo: Arc<S>,
        college_repo: Arc<C>,
        dispatcher: NotificationDispatcher<T>,
        config: Arc<AccountsConfig>,
    ) -> Self {
        Self {
            session_repo,
            college_repo,
            dispatcher,
            config,
        }
    }

    pub async fn execute(&self, input: SelectCollegeInput) -> AccountsResult<SelectCollegeOutput> {
        let mut session =
            load_open_session(self.session_repo.as_ref(), &self.config, &input.temp_token).await?;

        let college_id =
            CollegeId::parse_str(&input.college_id).map_err(|_| AccountsError::CollegeNotFound)?;
        let graduation_year = GraduationYear::new(input.graduation_year)?;
        let college = self
            .college_repo
            .find_by_id(&college_id)
            .await?
            .ok_or(AccountsError::CollegeNotFound)?;

        let now = now_ms();
        ensure_cooldown_elapsed(&session, &self.config, now)?;

        session.select_college(college.college_id, graduation_year);
        let report = issue_and_dispatch(
            self.session_repo.as_ref(),
            &self.dispatcher,
            &self.config,
            &mut session,
            now,
        )
        .await?;

        tracing::info!(
            session_id = %session.session_id,
            college_id = %college.college_id,
            "College selected"
        );

        Ok(SelectCollegeOutput {
            temp_token: input.temp_token,
            step: session.step.number(),
            email_sent: report.email_sent,
            message_sent: report.message_sent,
        })
    }
}
