//! SMTP reply types and the reply-line parser.

use crate::error::{Error, Result};

/// SMTP reply code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReplyCode(u16);

impl ReplyCode {
    /// 220 Service ready.
    pub const SERVICE_READY: Self = Self(220);
    /// 221 Service closing transmission channel.
    pub const CLOSING: Self = Self(221);
    /// 250 Requested mail action okay, completed.
    pub const OK: Self = Self(250);
    /// 354 Start mail input.
    pub const START_DATA: Self = Self(354);
    /// 535 Authentication credentials invalid.
    pub const AUTH_FAILED: Self = Self(535);

    /// Creates a new reply code.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the numeric code.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Returns true if this is a success code (2xx).
    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Returns true if this is an intermediate reply (3xx).
    #[must_use]
    pub const fn is_intermediate(self) -> bool {
        self.0 >= 300 && self.0 < 400
    }

    /// Returns true if this is a transient error (4xx).
    #[must_use]
    pub const fn is_transient(self) -> bool {
        self.0 >= 400 && self.0 < 500
    }

    /// Returns true if this is a permanent error (5xx).
    #[must_use]
    pub const fn is_permanent(self) -> bool {
        self.0 >= 500 && self.0 < 600
    }
}

impl std::fmt::Display for ReplyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// SMTP reply from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Reply code (e.g. 250).
    pub code: ReplyCode,
    /// Reply message lines (code and separator stripped).
    pub message: Vec<String>,
}

impl Reply {
    /// Creates a new reply.
    #[must_use]
    pub const fn new(code: ReplyCode, message: Vec<String>) -> Self {
        Self { code, message }
    }

    /// Returns true if this is a success reply (2xx).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code.is_success()
    }

    /// Returns the full message as a single string.
    #[must_use]
    pub fn message_text(&self) -> String {
        self.message.join("\n")
    }
}

/// Parses an SMTP reply from collected response lines.
///
/// Replies are single-line (`250 OK`) or multi-line, where continuation
/// lines use a `-` separator and the final line a space
/// (`250-first` / `250 last`).
///
/// # Errors
///
/// Returns an error if the reply is empty or malformed.
pub fn parse_reply(lines: &[String]) -> Result<Reply> {
    let first = lines
        .first()
        .ok_or_else(|| Error::Protocol("empty reply".into()))?;

    if first.len() < 3 {
        return Err(Error::Protocol(format!("reply too short: {first}")));
    }

    let code_str = &first[0..3];
    let code = code_str
        .parse::<u16>()
        .map_err(|_| Error::Protocol(format!("invalid reply code: {code_str}")))?;

    let mut message = Vec::new();
    for line in lines {
        if line.len() > 4 {
            message.push(line[4..].to_string());
        } else if line.len() == 3
            || (line.len() == 4 && matches!(line.as_bytes()[3], b' ' | b'-'))
        {
            // Bare code, or a separator with no text after it.
            message.push(String::new());
        } else {
            return Err(Error::Protocol(format!("malformed reply line: {line}")));
        }
    }

    Ok(Reply::new(ReplyCode::new(code), message))
}

/// Checks whether a line terminates a (possibly multi-line) reply.
///
/// A bare three-character code is a final line; only a `-` in the
/// fourth column marks a continuation.
#[must_use]
pub fn is_last_reply_line(line: &str) -> bool {
    line.len() == 3 || (line.len() >= 4 && line.as_bytes()[3] == b' ')
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_single_line() {
        let reply = parse_reply(&["250 OK".to_string()]).unwrap();
        assert_eq!(reply.code, ReplyCode::OK);
        assert_eq!(reply.message, vec!["OK"]);
        assert!(reply.is_success());
    }

    #[test]
    fn parse_multi_line() {
        let lines = vec![
            "250-smtp.example.com".to_string(),
            "250-STARTTLS".to_string(),
            "250 AUTH PLAIN LOGIN".to_string(),
        ];
        let reply = parse_reply(&lines).unwrap();
        assert_eq!(reply.code.as_u16(), 250);
        assert_eq!(reply.message.len(), 3);
        assert_eq!(reply.message[1], "STARTTLS");
    }

    #[test]
    fn parse_bare_code() {
        let reply = parse_reply(&["354".to_string()]).unwrap();
        assert_eq!(reply.code, ReplyCode::START_DATA);
        assert_eq!(reply.message, vec![String::new()]);
    }

    #[test]
    fn parse_rejects_empty() {
        assert!(parse_reply(&[]).is_err());
    }

    #[test]
    fn parse_rejects_short_line() {
        assert!(parse_reply(&["25".to_string()]).is_err());
    }

    #[test]
    fn parse_rejects_non_numeric_code() {
        assert!(parse_reply(&["ABC OK".to_string()]).is_err());
    }

    #[test]
    fn last_line_detection() {
        assert!(is_last_reply_line("250 OK"));
        assert!(is_last_reply_line("250"));
        assert!(!is_last_reply_line("250-more to come"));
        assert!(!is_last_reply_line("250-"));
    }

    #[test]
    fn parse_empty_continuation_line() {
        let lines = vec!["250-".to_string(), "250 OK".to_string()];
        let reply = parse_reply(&lines).unwrap();
        assert_eq!(reply.message, vec![String::new(), "OK".to_string()]);
    }

    #[test]
    fn code_classification() {
        assert!(ReplyCode::SERVICE_READY.is_success());
        assert!(ReplyCode::START_DATA.is_intermediate());
        assert!(ReplyCode::new(421).is_transient());
        assert!(ReplyCode::AUTH_FAILED.is_permanent());
    }

    #[test]
    fn message_text_joins_lines() {
        let reply = Reply::new(
            ReplyCode::OK,
            vec!["first".to_string(), "second".to_string()],
        );
        assert_eq!(reply.message_text(), "first\nsecond");
    }
}
