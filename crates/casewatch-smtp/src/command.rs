//! SMTP command serialization.

use crate::address::Address;

/// The SMTP commands the submission client issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// EHLO - extended greeting and capability discovery.
    Ehlo {
        /// Client hostname.
        hostname: String,
    },
    /// STARTTLS - upgrade the connection to TLS.
    StartTls,
    /// AUTH PLAIN with an initial SASL response.
    AuthPlain {
        /// Base64-encoded `\0user\0password`.
        initial_response: String,
    },
    /// MAIL FROM - start a mail transaction.
    MailFrom {
        /// Sender envelope address.
        from: Address,
    },
    /// RCPT TO - add a recipient.
    RcptTo {
        /// Recipient envelope address.
        to: Address,
    },
    /// DATA - begin message content.
    Data,
    /// QUIT - close the connection.
    Quit,
}

impl Command {
    /// Serializes the command as a CRLF-terminated line.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let line = match self {
            Self::Ehlo { hostname } => format!("EHLO {hostname}"),
            Self::StartTls => "STARTTLS".to_string(),
            Self::AuthPlain { initial_response } => {
                format!("AUTH PLAIN {initial_response}")
            }
            Self::MailFrom { from } => format!("MAIL FROM:<{from}>"),
            Self::RcptTo { to } => format!("RCPT TO:<{to}>"),
            Self::Data => "DATA".to_string(),
            Self::Quit => "QUIT".to_string(),
        };

        let mut buf = line.into_bytes();
        buf.extend_from_slice(b"\r\n");
        buf
    }
}
