//! Notification Dispatcher
//!
//! Sends verification codes over email and SMS at the same time. Each channel
//! runs as its own task under its own timeout, and both are awaited whatever
//! the other does; a failure or panic on one side only turns that side's flag
//! false.

use std::sync::Arc;
use std::time::Duration;

use platform::notify::{Channel, DeliveryError, NotificationTransport, OutboundMessage};
use tokio::task::JoinError;
use tokio::time::error::Elapsed;

use crate::application::config::AccountsConfig;
use crate::domain::entity::registration_session::IssuedCodes;
use crate::domain::value_object::{email::Email, phone_number::PhoneNumber};

const CODE_EMAIL_SUBJECT: &str = "Your verification code";

/// Per-channel outcome of one code issuance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReport {
    pub email_sent: bool,
    pub message_sent: bool,
}

impl DeliveryReport {
    pub fn any(&self) -> bool {
        self.email_sent || self.message_sent
    }
}

pub struct NotificationDispatcher<T> {
    email: Arc<T>,
    sms: Arc<T>,
    timeout: Duration,
    code_ttl_minutes: u64,
}

impl<T> NotificationDispatcher<T>
where
    T: NotificationTransport + Send + Sync + 'static,
{
    pub fn new(email: Arc<T>, sms: Arc<T>, config: &AccountsConfig) -> Self {
        Self {
            email,
            sms,
            timeout: config.delivery_timeout,
            code_ttl_minutes: config.code_ttl.as_secs().div_ceil(60),
        }
    }

    /// Send both codes concurrently and wait for both to settle
    pub async fn dispatch_codes(
        &self,
        email: &Email,
        phone: &PhoneNumber,
        codes: &IssuedCodes,
    ) -> DeliveryReport {
        let email_message = OutboundMessage::email(
            email.as_str(),
            CODE_EMAIL_SUBJECT,
            format!(
                "Your email verification code is {}. It expires in {} minutes.",
                codes.email_code.as_str(),
                self.code_ttl_minutes
            ),
        );
        let sms_message = OutboundMessage::sms(
            phone.as_str(),
            format!(
                "Your phone verification code is {}. It expires in {} minutes.",
                codes.phone_code.as_str(),
                self.code_ttl_minutes
            ),
        );

        let email_task = tokio::spawn(send_bounded(
            self.email.clone(),
            email_message,
            self.timeout,
        ));
        let sms_task = tokio::spawn(send_bounded(self.sms.clone(), sms_message, self.timeout));

        let (email_result, sms_result) = tokio::join!(email_task, sms_task);

        let report = DeliveryReport {
            email_sent: settle(Channel::Email, email_result),
            message_sent: settle(Channel::Sms, sms_result),
        };

        tracing::info!(
            email_sent = report.email_sent,
            message_sent = report.message_sent,
            "Verification codes dispatched"
        );

        report
    }

    /// One email whose failure the caller does not act on
    pub async fn send_email_best_effort(&self, message: OutboundMessage) -> bool {
        let result = send_bounded(self.email.clone(), message, self.timeout).await;
        settle(Channel::Email, Ok(result))
    }
}

async fn send_bounded<T>(
    transport: Arc<T>,
    message: OutboundMessage,
    timeout: Duration,
) -> Result<Result<(), DeliveryError>, Elapsed>
where
    T: NotificationTransport + Send + Sync + 'static,
{
    tokio::time::timeout(timeout, transport.send(&message)).await
}

fn settle(
    channel: Channel,
    result: Result<Result<Result<(), DeliveryError>, Elapsed>, JoinError>,
) -> bool {
    match result {
        Ok(Ok(Ok(()))) => true,
        Ok(Ok(Err(e))) => {
            tracing::warn!(channel = %channel, error = %e, "Notification delivery failed");
            false
        }
        Ok(Err(_)) => {
            tracing::warn!(channel = %channel, "Notification delivery timed out");
            false
        }
        Err(e) => {
            tracing::warn!(channel = %channel, error = %e, "Notification task aborted");
            false
        }
    }
}
