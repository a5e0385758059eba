//! # casewatch-smtp
//!
//! A minimal SMTP submission client covering the subset of RFC 5321 that
//! casewatch needs to deliver one plain-text message per run:
//!
//! - Plain TCP connect to the submission port, then STARTTLS upgrade
//! - EHLO capability discovery (repeated after the TLS upgrade)
//! - AUTH PLAIN with an initial SASL response
//! - A single MAIL FROM / RCPT TO / DATA transaction, then QUIT
//!
//! The connection phases are enforced at compile time: authentication is
//! only reachable from [`Connected`], and sending only from
//! [`Authenticated`].
//!
//! ```ignore
//! use casewatch_smtp::{Address, Client, connect};
//!
//! let stream = connect("smtp.example.com", 587).await?;
//! let client = Client::from_stream(stream).await?;
//! let client = client.ehlo("localhost").await?;
//! let client = client.starttls("smtp.example.com").await?;
//! let client = client.auth_plain("user@example.com", "password").await?;
//!
//! let from = Address::new("user@example.com")?;
//! let to = Address::new("dest@example.com")?;
//! let client = client.send(&from, &to, b"Subject: Hi\r\n\r\nHello\r\n").await?;
//! client.quit().await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod address;
mod client;
mod command;
mod error;
mod reply;
mod stream;

pub use address::Address;
pub use client::{Authenticated, Client, Connected, ServerInfo};
pub use command::Command;
pub use error::{Error, Result};
pub use reply::{Reply, ReplyCode};
pub use stream::{SmtpStream, connect};
