//! Mail transport port and the SMTP-backed implementation.

use crate::secrets::Credentials;
use casewatch_smtp::{Address, Client, connect};
use tracing::info;

/// Errors that can occur while sending the run email.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// Connection or protocol failure.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The server rejected the message.
    #[error("Send failed: {0}")]
    Send(String),

    /// Invalid sender or recipient address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}

/// A plain-text email to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    /// Sender address.
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

impl OutgoingMessage {
    /// Creates a new message.
    #[must_use]
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Builds the RFC 5322 formatted message.
    #[must_use]
    pub fn to_rfc5322(&self) -> String {
        use std::fmt::Write;

        let mut message = String::new();
        let _ = write!(message, "From: {}\r\n", self.from);
        let _ = write!(message, "To: {}\r\n", self.to);
        let _ = write!(message, "Subject: {}\r\n", self.subject);
        message.push_str("MIME-Version: 1.0\r\n");
        message.push_str("Content-Type: text/plain; charset=utf-8\r\n");
        message.push_str("Content-Transfer-Encoding: 8bit\r\n");
        message.push_str("\r\n");
        message.push_str(&self.body);
        message
    }
}

/// Mail delivery port. Exactly one message is sent per run.
pub trait MailTransport {
    /// Delivers the message, authenticating with the given credentials.
    /// Any failure is fatal to the run.
    ///
    /// # Errors
    ///
    /// Returns an error if connection, authentication, or sending fails.
    fn send(
        &self,
        credentials: &Credentials,
        message: &OutgoingMessage,
    ) -> impl Future<Output = Result<(), MailError>>;
}

/// SMTP submission transport: STARTTLS then AUTH PLAIN, one
/// transaction, QUIT.
#[derive(Debug, Clone)]
pub struct SmtpMailer {
    host: String,
    port: u16,
}

impl SmtpMailer {
    /// Creates a mailer for the given submission endpoint.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl MailTransport for SmtpMailer {
    async fn send(
        &self,
        credentials: &Credentials,
        message: &OutgoingMessage,
    ) -> Result<(), MailError> {
        let from =
            Address::new(&message.from).map_err(|e| MailError::InvalidAddress(e.to_string()))?;
        let to = Address::new(&message.to).map_err(|e| MailError::InvalidAddress(e.to_string()))?;

        let stream = connect(&self.host, self.port)
            .await
            .map_err(|e| MailError::Connection(e.to_string()))?;

        let client = Client::from_stream(stream)
            .await
            .map_err(|e| MailError::Connection(e.to_string()))?;

        let client = client
            .ehlo("localhost")
            .await
            .map_err(|e| MailError::Connection(e.to_string()))?;

        let client = client
            .starttls(&self.host)
            .await
            .map_err(|e| MailError::Connection(e.to_string()))?;

        let client = client
            .auth_plain(&credentials.sender, &credentials.password)
            .await
            .map_err(|e| MailError::Authentication(e.to_string()))?;

        let client = client
            .send(&from, &to, message.to_rfc5322().as_bytes())
            .await
            .map_err(|e| MailError::Send(e.to_string()))?;

        client
            .quit()
            .await
            .map_err(|e| MailError::Send(e.to_string()))?;

        info!(subject = %message.subject, "email sent");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn rfc5322_has_crlf_headers_and_blank_separator() {
        let message = OutgoingMessage::new(
            "sender@example.com",
            "dest@example.com",
            "Subject line",
            "Body text",
        );
        let raw = message.to_rfc5322();

        assert!(raw.starts_with("From: sender@example.com\r\n"));
        assert!(raw.contains("To: dest@example.com\r\n"));
        assert!(raw.contains("Subject: Subject line\r\n"));
        assert!(raw.contains("Content-Type: text/plain; charset=utf-8\r\n"));
        assert!(raw.ends_with("\r\n\r\nBody text"));
    }

    #[test]
    fn body_is_carried_verbatim() {
        let message = OutgoingMessage::new("a@x.com", "b@x.com", "s", "line one\n\nline two");
        assert!(message.to_rfc5322().ends_with("line one\n\nline two"));
    }
}
