//! Type-state SMTP client.

use crate::address::Address;
use crate::command::Command;
use crate::error::{Error, Result};
use crate::reply::{Reply, ReplyCode, is_last_reply_line, parse_reply};
use crate::stream::SmtpStream;
use base64::Engine;
use std::marker::PhantomData;
use tracing::debug;

/// Type-state marker: connected, not yet authenticated.
#[derive(Debug)]
pub struct Connected;

/// Type-state marker: authenticated and ready to send.
#[derive(Debug)]
pub struct Authenticated;

/// Server capabilities discovered from the EHLO response.
#[derive(Debug, Clone, Default)]
pub struct ServerInfo {
    /// Server hostname from the greeting.
    pub hostname: String,
    /// Raw EHLO capability lines (greeting line excluded).
    pub extensions: Vec<String>,
}

impl ServerInfo {
    /// Checks whether a capability keyword was advertised.
    #[must_use]
    pub fn supports(&self, keyword: &str) -> bool {
        self.extensions.iter().any(|line| {
            line.split_whitespace()
                .next()
                .is_some_and(|kw| kw.eq_ignore_ascii_case(keyword))
        })
    }

    /// Checks whether STARTTLS was advertised.
    #[must_use]
    pub fn supports_starttls(&self) -> bool {
        self.supports("STARTTLS")
    }

    /// Returns the advertised AUTH mechanisms, uppercased.
    #[must_use]
    pub fn auth_mechanisms(&self) -> Vec<String> {
        self.extensions
            .iter()
            .filter_map(|line| {
                let mut parts = line.split_whitespace();
                parts
                    .next()
                    .filter(|kw| kw.eq_ignore_ascii_case("AUTH"))
                    .map(|_| parts.map(str::to_uppercase).collect::<Vec<_>>())
            })
            .flatten()
            .collect()
    }
}

/// SMTP client; the type parameter tracks the connection phase.
#[derive(Debug)]
pub struct Client<State> {
    stream: SmtpStream,
    server_info: ServerInfo,
    _state: PhantomData<State>,
}

impl Client<Connected> {
    /// Creates a client from a freshly connected stream and reads the
    /// server greeting.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the greeting fails or the server
    /// refuses the connection.
    pub async fn from_stream(mut stream: SmtpStream) -> Result<Self> {
        let greeting = read_reply(&mut stream).await?;
        if greeting.code != ReplyCode::SERVICE_READY {
            return Err(Error::smtp(
                greeting.code.as_u16(),
                greeting.message_text(),
            ));
        }

        let hostname = greeting
            .message
            .first()
            .and_then(|msg| msg.split_whitespace().next())
            .unwrap_or("unknown")
            .to_string();
        debug!(server = %hostname, "SMTP greeting received");

        Ok(Self {
            stream,
            server_info: ServerInfo {
                hostname,
                extensions: Vec::new(),
            },
            _state: PhantomData,
        })
    }

    /// Sends EHLO and records the advertised capabilities.
    ///
    /// # Errors
    ///
    /// Returns an error if the EHLO command fails.
    pub async fn ehlo(mut self, client_hostname: &str) -> Result<Self> {
        let reply = self
            .send_command(Command::Ehlo {
                hostname: client_hostname.to_string(),
            })
            .await?;

        if !reply.is_success() {
            return Err(Error::smtp(reply.code.as_u16(), reply.message_text()));
        }

        self.server_info.extensions = reply.message.iter().skip(1).cloned().collect();
        Ok(self)
    }

    /// Upgrades the connection with STARTTLS and repeats EHLO on the
    /// encrypted channel.
    ///
    /// # Errors
    ///
    /// Returns an error if STARTTLS was not advertised, the upgrade
    /// fails, or the follow-up EHLO fails.
    pub async fn starttls(mut self, hostname: &str) -> Result<Self> {
        if !self.server_info.supports_starttls() {
            return Err(Error::NotSupported("STARTTLS".into()));
        }

        let reply = self.send_command(Command::StartTls).await?;
        if !reply.is_success() {
            return Err(Error::smtp(reply.code.as_u16(), reply.message_text()));
        }

        self.stream = self.stream.upgrade_to_tls(hostname).await?;
        debug!(server = %hostname, "TLS established");

        // Capabilities must be rediscovered after the upgrade.
        self.server_info.extensions.clear();
        self.ehlo(hostname).await
    }

    /// Authenticates with AUTH PLAIN.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the credentials.
    pub async fn auth_plain(
        mut self,
        username: &str,
        password: &str,
    ) -> Result<Client<Authenticated>> {
        // SASL PLAIN initial response: \0authcid\0password
        let credentials = format!("\0{username}\0{password}");
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials.as_bytes());

        let reply = self
            .send_command(Command::AuthPlain {
                initial_response: encoded,
            })
            .await?;

        if !reply.is_success() {
            return Err(Error::smtp(reply.code.as_u16(), reply.message_text()));
        }
        debug!("SMTP authentication accepted");

        Ok(Client {
            stream: self.stream,
            server_info: self.server_info,
            _state: PhantomData,
        })
    }
}

impl Client<Authenticated> {
    /// Runs one complete mail transaction: MAIL FROM, RCPT TO, DATA,
    /// message content.
    ///
    /// The message should be RFC 5322 formatted. Line endings are
    /// normalized to CRLF and leading dots are stuffed; the terminating
    /// `.` line is appended automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if any step of the transaction is rejected.
    pub async fn send(mut self, from: &Address, to: &Address, message: &[u8]) -> Result<Self> {
        let reply = self
            .send_command(Command::MailFrom { from: from.clone() })
            .await?;
        if !reply.is_success() {
            return Err(Error::smtp(reply.code.as_u16(), reply.message_text()));
        }

        let reply = self.send_command(Command::RcptTo { to: to.clone() }).await?;
        if !reply.is_success() {
            return Err(Error::smtp(reply.code.as_u16(), reply.message_text()));
        }

        let reply = self.send_command(Command::Data).await?;
        if reply.code != ReplyCode::START_DATA {
            return Err(Error::smtp(reply.code.as_u16(), reply.message_text()));
        }

        for line in message.split(|&b| b == b'\n') {
            let line = line.strip_suffix(b"\r").unwrap_or(line);

            if line.first() == Some(&b'.') {
                self.stream.write_all(b".").await?;
            }
            self.stream.write_all(line).await?;
            self.stream.write_all(b"\r\n").await?;
        }
        self.stream.write_all(b".\r\n").await?;

        let reply = read_reply(&mut self.stream).await?;
        if !reply.is_success() {
            return Err(Error::smtp(reply.code.as_u16(), reply.message_text()));
        }
        debug!(recipient = %to, "message accepted for delivery");

        Ok(self)
    }
}

impl<S> Client<S> {
    /// Returns the server information discovered so far.
    #[must_use]
    pub const fn server_info(&self) -> &ServerInfo {
        &self.server_info
    }

    /// Sends QUIT and closes the connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the QUIT command fails.
    pub async fn quit(mut self) -> Result<()> {
        let reply = self.send_command(Command::Quit).await?;
        if !reply.is_success() && reply.code != ReplyCode::CLOSING {
            return Err(Error::smtp(reply.code.as_u16(), reply.message_text()));
        }
        Ok(())
    }

    async fn send_command(&mut self, cmd: Command) -> Result<Reply> {
        self.stream.write_all(&cmd.serialize()).await?;
        read_reply(&mut self.stream).await
    }
}

async fn read_reply(stream: &mut SmtpStream) -> Result<Reply> {
    let mut lines = Vec::new();
    loop {
        let line = stream.read_line().await?;
        if line.is_empty() {
            continue;
        }

        let is_last = is_last_reply_line(&line);
        lines.push(line);

        if is_last {
            break;
        }
    }

    parse_reply(&lines)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn info(lines: &[&str]) -> ServerInfo {
        ServerInfo {
            hostname: "smtp.example.com".to_string(),
            extensions: lines.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn starttls_detected() {
        let info = info(&["SIZE 35882577", "STARTTLS", "AUTH PLAIN LOGIN"]);
        assert!(info.supports_starttls());
    }

    #[test]
    fn starttls_absent() {
        let info = info(&["SIZE 35882577", "AUTH PLAIN LOGIN"]);
        assert!(!info.supports_starttls());
    }

    #[test]
    fn capability_match_is_case_insensitive() {
        let info = info(&["starttls"]);
        assert!(info.supports("STARTTLS"));
    }

    #[test]
    fn auth_mechanisms_listed() {
        let info = info(&["STARTTLS", "AUTH PLAIN LOGIN XOAUTH2"]);
        assert_eq!(info.auth_mechanisms(), vec!["PLAIN", "LOGIN", "XOAUTH2"]);
    }

    #[test]
    fn auth_mechanisms_empty_without_auth_line() {
        let info = info(&["STARTTLS"]);
        assert!(info.auth_mechanisms().is_empty());
    }

    #[tokio::test]
    async fn reply_cut_short_by_disconnect_is_an_error() {
        use tokio::io::AsyncWriteExt;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            // Continuation line only, then hang up before the final line.
            socket.write_all(b"250-smtp.example.com\r\n").await.unwrap();
            socket.shutdown().await.unwrap();
        });

        let mut stream = crate::stream::connect("127.0.0.1", port).await.unwrap();
        let result = read_reply(&mut stream).await;
        assert!(matches!(result, Err(Error::Protocol(_))));
        server.await.unwrap();
    }
}
