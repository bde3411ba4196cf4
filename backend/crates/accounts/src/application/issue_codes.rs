//! Code issuance shared by step 2 and resend

use chrono::Utc;
use kernel::id::RegistrationSessionId;
use platform::notify::NotificationTransport;

use crate::application::config::AccountsConfig;
use crate::application::dispatch::{DeliveryReport, NotificationDispatcher};
use crate::application::token::verify_registration_token;
use crate::domain::entity::registration_session::RegistrationSession;
use crate::domain::repository::RegistrationSessionRepository;
use crate::error::{AccountsError, AccountsResult};

/// Resolve a temp token to a live, unpromoted session
pub(crate) async fn load_open_session<S>(
    session_repo: &S,
    config: &AccountsConfig,
    temp_token: &str,
) -> AccountsResult<RegistrationSession>
where
    S: RegistrationSessionRepository,
{
    let session = load_session(session_repo, config, temp_token).await?;
    if session.is_promoted() {
        return Err(AccountsError::AlreadyVerified);
    }
    Ok(session)
}

/// Resolve a temp token to a live session, promoted or not
pub(crate) async fn load_session<S>(
    session_repo: &S,
    config: &AccountsConfig,
    temp_token: &str,
) -> AccountsResult<RegistrationSession>
where
    S: RegistrationSessionRepository,
{
    let session_id = verify_registration_token(&config.session_secret, temp_token)
        .ok_or(AccountsError::SessionInvalid)?;
    session_repo
        .find_active(&session_id)
        .await?
        .ok_or(AccountsError::SessionInvalid)
}

/// Refuse while the latest issuance is still inside the cooldown
pub(crate) fn ensure_cooldown_elapsed(
    session: &RegistrationSession,
    config: &AccountsConfig,
    now_ms: i64,
) -> AccountsResult<()> {
    match session.resend_wait_secs(config.resend_cooldown_ms(), now_ms) {
        Some(retry_after_secs) => Err(AccountsError::ResendTooSoon { retry_after_secs }),
        None => Ok(()),
    }
}

/// Issue fresh codes, claim the issuance, send them on both channels
///
/// The claim only succeeds against the issuance the caller checked the
/// cooldown on, so concurrent requests issue at most once. The new codes stay
/// stored when every channel fails; recovery is a resend.
pub(crate) async fn issue_and_dispatch<S, T>(
    session_repo: &S,
    dispatcher: &NotificationDispatcher<T>,
    config: &AccountsConfig,
    session: &mut RegistrationSession,
    now_ms: i64,
) -> AccountsResult<DeliveryReport>
where
    S: RegistrationSessionRepository,
    T: NotificationTransport + Send + Sync + 'static,
{
    let previous_issued_at = session.codes_issued_at_ms;
    let codes = session.issue_codes(config.code_ttl_ms(), now_ms);
    if !session_repo.claim_issuance(session, previous_issued_at).await? {
        tracing::debug!(session_id = %session.session_id, "Issuance claimed by another request");
        return Err(lost_claim_error(session_repo, config, &session.session_id).await?);
    }

    let report = dispatcher
        .dispatch_codes(&session.email, &session.phone, &codes)
        .await;

    if !report.any() {
        session.record_delivery(false);
        session_repo.update(session).await?;
        tracing::warn!(session_id = %session.session_id, "No channel accepted the codes");
        return Err(AccountsError::DeliveryFailed);
    }

    Ok(report)
}

/// Name the state that beat a lost issuance claim
async fn lost_claim_error<S>(
    session_repo: &S,
    config: &AccountsConfig,
    session_id: &RegistrationSessionId,
) -> AccountsResult<AccountsError>
where
    S: RegistrationSessionRepository,
{
    let current = session_repo
        .find_active(session_id)
        .await?
        .ok_or(AccountsError::SessionInvalid)?;
    if current.is_promoted() {
        return Ok(AccountsError::AlreadyVerified);
    }
    let retry_after_secs = current
        .resend_wait_secs(config.resend_cooldown_ms(), now_ms())
        .unwrap_or_else(|| config.resend_cooldown.as_secs());
    Ok(AccountsError::ResendTooSoon { retry_after_secs })
}

pub(crate) fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
