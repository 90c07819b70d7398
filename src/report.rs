// ABOUTME: Single failure reporting path: error log, optional mail, exit status 2.
// ABOUTME: Mail goes through an unauthenticated SMTP relay using lettre.

use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::process::ExitCode;

use crate::config::NotifyConfig;
use crate::error::Error;

const SMTP_PORT: u16 = 25;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("invalid mail address '{address}': {source}")]
    Address {
        address: String,
        source: lettre::address::AddressError,
    },

    #[error("invalid mail relay '{0}'")]
    Relay(String),

    #[error("failed to build mail: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("failed to send mail: {0}")]
    Send(#[from] lettre::transport::smtp::Error),
}

/// Failure mail for one revision.
pub struct Notifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
    subject: String,
}

impl Notifier {
    /// Returns `None` when mail is not configured.
    pub fn from_config(config: &NotifyConfig, revision: u64) -> Result<Option<Self>, NotifyError> {
        let (Some(from), Some(to)) = (config.from.as_deref(), config.to.as_deref()) else {
            return Ok(None);
        };

        let (host, port) = split_relay(&config.mailer)?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(port)
            .build();

        Ok(Some(Self {
            transport,
            from: parse_mailbox(from)?,
            to: parse_mailbox(to)?,
            subject: config.subject_for(revision),
        }))
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn message(&self, body: &str) -> Result<Message, NotifyError> {
        Ok(Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(self.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?)
    }

    pub async fn send(&self, body: &str) -> Result<(), NotifyError> {
        let message = self.message(body)?;
        self.transport.send(message).await?;
        Ok(())
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("subject", &self.subject)
            .finish_non_exhaustive()
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address.parse().map_err(|source| NotifyError::Address {
        address: address.to_string(),
        source,
    })
}

/// `host` or `host:port`.
fn split_relay(mailer: &str) -> Result<(&str, u16), NotifyError> {
    let mailer = mailer.trim();
    let (host, port) = match mailer.rsplit_once(':') {
        Some((host, port)) => {
            let port = port
                .parse()
                .map_err(|_| NotifyError::Relay(mailer.to_string()))?;
            (host, port)
        }
        None => (mailer, SMTP_PORT),
    };

    if host.is_empty() {
        return Err(NotifyError::Relay(mailer.to_string()));
    }
    Ok((host, port))
}

/// Where fatal errors go before the process exits.
#[derive(Debug, Default)]
pub struct Reporter {
    notifier: Option<Notifier>,
}

impl Reporter {
    pub fn new(notifier: Option<Notifier>) -> Self {
        Self { notifier }
    }

    /// Log `err`, mail it if configured, and return the fatal exit status.
    ///
    /// A mail failure is logged as a warning and does not change the status.
    pub async fn fail(&self, err: &Error) -> ExitCode {
        tracing::error!("{}", err);

        if let Some(notifier) = &self.notifier {
            match notifier.send(&err.to_string()).await {
                Ok(()) => tracing::debug!("Failure notification sent: {}", notifier.subject()),
                Err(e) => tracing::warn!("Failed to send failure notification: {}", e),
            }
        }

        err.exit_code()
    }
}
