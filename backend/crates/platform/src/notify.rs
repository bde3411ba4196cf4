//! Outbound Notifications
//!
//! A transport delivers one [`OutboundMessage`] over one [`Channel`] and
//! reports success or a [`DeliveryError`]. Callers decide what a failure means;
//! transports never retry.
//!
//! ## Implementations
//! - [`HttpEmailTransport`] - transactional email API (JSON body, `api-key` header)
//! - [`HttpSmsTransport`] - SMS API (form body, HTTP basic auth)
//! - [`LogTransport`] - writes the message to the log; local development only
//! - [`ConfiguredTransport`] - whichever of the above [`NotifyConfig`] selects

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// Delivery channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Email,
    Sms,
}

impl Channel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Channel::Email => "email",
            Channel::Sms => "sms",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message to one recipient
///
/// `body` usually carries a one-time code, so `Debug` leaves it out.
#[derive(Clone)]
pub struct OutboundMessage {
    pub channel: Channel,
    /// Email address or E.164 phone number
    pub recipient: String,
    /// Ignored by SMS transports
    pub subject: String,
    pub body: String,
}

impl OutboundMessage {
    pub fn email(
        recipient: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            channel: Channel::Email,
            recipient: recipient.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    pub fn sms(recipient: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            channel: Channel::Sms,
            recipient: recipient.into(),
            subject: String::new(),
            body: body.into(),
        }
    }
}

impl fmt::Debug for OutboundMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutboundMessage")
            .field("channel", &self.channel)
            .field("recipient", &self.recipient)
            .field("subject", &self.subject)
            .field("body", &"[REDACTED]")
            .finish()
    }
}

/// Delivery failure
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Transport does not handle the {0} channel")]
    WrongChannel(Channel),

    #[error("Provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider rejected message (status={status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Sends messages over a single channel
#[trait_variant::make(NotificationTransport: Send)]
pub trait LocalNotificationTransport {
    /// Channel this transport serves
    fn channel(&self) -> Channel;

    /// Attempt delivery once
    async fn send(&self, message: &OutboundMessage) -> Result<(), DeliveryError>;
}

fn is_success_status(status: u16) -> bool {
    (200..=299).contains(&status)
}

fn ensure_channel(expected: Channel, message: &OutboundMessage) -> Result<(), DeliveryError> {
    if message.channel == expected {
        Ok(())
    } else {
        Err(DeliveryError::WrongChannel(message.channel))
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Email provider credentials
#[derive(Clone)]
pub struct EmailProviderConfig {
    pub api_url: String,
    pub api_key: String,
    pub sender_email: String,
    pub sender_name: Option<String>,
}

impl fmt::Debug for EmailProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailProviderConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"[REDACTED]")
            .field("sender_email", &self.sender_email)
            .field("sender_name", &self.sender_name)
            .finish()
    }
}

/// SMS provider credentials
#[derive(Clone)]
pub struct SmsProviderConfig {
    /// Base URL, e.g. `https://api.twilio.com`
    pub api_url: String,
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
}

impl fmt::Debug for SmsProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmsProviderConfig")
            .field("api_url", &self.api_url)
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"[REDACTED]")
            .field("from_number", &self.from_number)
            .finish()
    }
}

/// Provider configuration for both channels
///
/// A channel without credentials falls back to [`LogTransport`].
#[derive(Debug, Clone, Default)]
pub struct NotifyConfig {
    pub email: Option<EmailProviderConfig>,
    pub sms: Option<SmsProviderConfig>,
    /// Per-request HTTP timeout handed to the client
    pub request_timeout: Option<Duration>,
}

const DEFAULT_EMAIL_API_URL: &str = "https://api.brevo.com/v3/smtp/email";
const DEFAULT_SMS_API_URL: &str = "https://api.twilio.com";

impl NotifyConfig {
    /// Read provider settings from the process environment
    ///
    /// `EMAIL_API_URL`, `EMAIL_API_KEY`, `EMAIL_SENDER`, `EMAIL_SENDER_NAME`,
    /// `SMS_API_URL`, `SMS_ACCOUNT_SID`, `SMS_AUTH_TOKEN`, `SMS_FROM`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`NotifyConfig::from_env`] with an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let email = match (get("EMAIL_API_KEY"), get("EMAIL_SENDER")) {
            (Some(api_key), Some(sender_email)) => Some(EmailProviderConfig {
                api_url: get("EMAIL_API_URL").unwrap_or_else(|| DEFAULT_EMAIL_API_URL.to_string()),
                api_key,
                sender_email,
                sender_name: get("EMAIL_SENDER_NAME"),
            }),
            _ => None,
        };

        let sms = match (
            get("SMS_ACCOUNT_SID"),
            get("SMS_AUTH_TOKEN"),
            get("SMS_FROM"),
        ) {
            (Some(account_sid), Some(auth_token), Some(from_number)) => Some(SmsProviderConfig {
                api_url: get("SMS_API_URL").unwrap_or_else(|| DEFAULT_SMS_API_URL.to_string()),
                account_sid,
                auth_token,
                from_number,
            }),
            _ => None,
        };

        Self {
            email,
            sms,
            request_timeout: None,
        }
    }

    fn client(&self) -> Result<reqwest::Client, DeliveryError> {
        let mut builder = reqwest::Client::builder().user_agent("campus-api/0.1");
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(builder.build()?)
    }

    /// Build the email transport
    pub fn email_transport(&self) -> Result<ConfiguredTransport, DeliveryError> {
        match &self.email {
            Some(provider) => Ok(ConfiguredTransport::Email(HttpEmailTransport::new(
                self.client()?,
                provider.clone(),
            ))),
            None => {
                tracing::warn!("Email provider not configured, using log transport");
                Ok(ConfiguredTransport::Log(LogTransport::new(Channel::Email)))
            }
        }
    }

    /// Build the SMS transport
    pub fn sms_transport(&self) -> Result<ConfiguredTransport, DeliveryError> {
        match &self.sms {
            Some(provider) => Ok(ConfiguredTransport::Sms(HttpSmsTransport::new(
                self.client()?,
                provider.clone(),
            ))),
            None => {
                tracing::warn!("SMS provider not configured, using log transport");
                Ok(ConfiguredTransport::Log(LogTransport::new(Channel::Sms)))
            }
        }
    }
}

// ============================================================================
// HTTP Email
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmailAddress<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailBody<'a> {
    sender: EmailAddress<'a>,
    to: Vec<EmailAddress<'a>>,
    subject: &'a str,
    text_content: &'a str,
}

/// Transactional email API client
#[derive(Debug, Clone)]
pub struct HttpEmailTransport {
    client: reqwest::Client,
    config: EmailProviderConfig,
}

impl HttpEmailTransport {
    pub fn new(client: reqwest::Client, config: EmailProviderConfig) -> Self {
        Self { client, config }
    }

    fn body<'a>(&'a self, message: &'a OutboundMessage) -> SendEmailBody<'a> {
        SendEmailBody {
            sender: EmailAddress {
                email: &self.config.sender_email,
                name: self.config.sender_name.as_deref(),
            },
            to: vec![EmailAddress {
                email: &message.recipient,
                name: None,
            }],
            subject: &message.subject,
            text_content: &message.body,
        }
    }
}

impl NotificationTransport for HttpEmailTransport {
    fn channel(&self) -> Channel {
        Channel::Email
    }

    async fn send(&self, message: &OutboundMessage) -> Result<(), DeliveryError> {
        ensure_channel(Channel::Email, message)?;

        let resp = self
            .client
            .post(&self.config.api_url)
            .header("api-key", &self.config.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&self.body(message))
            .send()
            .await?;

        let status = resp.status().as_u16();
        if is_success_status(status) {
            return Ok(());
        }

        let body = resp.text().await.unwrap_or_default();
        Err(DeliveryError::Rejected { status, body })
    }
}

// ============================================================================
// HTTP SMS
// ============================================================================

/// SMS API client (`POST {base}/2010-04-01/Accounts/{sid}/Messages.json`)
#[derive(Debug, Clone)]
pub struct HttpSmsTransport {
    client: reqwest::Client,
    config: SmsProviderConfig,
}

impl HttpSmsTransport {
    pub fn new(client: reqwest::Client, config: SmsProviderConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.api_url.trim_end_matches('/'),
            self.config.account_sid
        )
    }
}

impl NotificationTransport for HttpSmsTransport {
    fn channel(&self) -> Channel {
        Channel::Sms
    }

    async fn send(&self, message: &OutboundMessage) -> Result<(), DeliveryError> {
        ensure_channel(Channel::Sms, message)?;

        let form = [
            ("To", message.recipient.as_str()),
            ("From", self.config.from_number.as_str()),
            ("Body", message.body.as_str()),
        ];

        let resp = self
            .client
            .post(self.endpoint())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&form)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if is_success_status(status) {
            return Ok(());
        }

        let body = resp.text().await.unwrap_or_default();
        Err(DeliveryError::Rejected { status, body })
    }
}

// ============================================================================
// Log (development)
// ============================================================================

/// Prints messages to the log instead of sending them
///
/// Includes the message body so the flow can be completed without a provider.
#[derive(Debug, Clone, Copy)]
pub struct LogTransport {
    channel: Channel,
}

impl LogTransport {
    pub const fn new(channel: Channel) -> Self {
        Self { channel }
    }
}

impl NotificationTransport for LogTransport {
    fn channel(&self) -> Channel {
        self.channel
    }

    async fn send(&self, message: &OutboundMessage) -> Result<(), DeliveryError> {
        ensure_channel(self.channel, message)?;
        tracing::info!(
            channel = %message.channel,
            recipient = %message.recipient,
            subject = %message.subject,
            body = %message.body,
            "Outbound message (log transport)"
        );
        Ok(())
    }
}

// ============================================================================
// Configured
// ============================================================================

/// Transport chosen at startup from [`NotifyConfig`]
#[derive(Debug, Clone)]
pub enum ConfiguredTransport {
    Email(HttpEmailTransport),
    Sms(HttpSmsTransport),
    Log(LogTransport),
}

impl NotificationTransport for ConfiguredTransport {
    fn channel(&self) -> Channel {
        match self {
            ConfiguredTransport::Email(t) => NotificationTransport::channel(t),
            ConfiguredTransport::Sms(t) => NotificationTransport::channel(t),
            ConfiguredTransport::Log(t) => NotificationTransport::channel(t),
        }
    }

    async fn send(&self, message: &OutboundMessage) -> Result<(), DeliveryError> {
        match self {
            ConfiguredTransport::Email(t) => NotificationTransport::send(t, message).await,
            ConfiguredTransport::Sms(t) => NotificationTransport::send(t, message).await,
            ConfiguredTransport::Log(t) => NotificationTransport::send(t, message).await,
        }
    }
}
