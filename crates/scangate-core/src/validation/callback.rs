//! Callback URL protocol allow-list.
//!
//! Callback URLs are attacker-reachable: the gateway will eventually emit a
//! notification toward whatever URL the initiating client supplied. Only
//! `https` targets are accepted, and the check runs before any authorization
//! is issued.

use url::Url;

/// Allowed callback URL schemes.
const ALLOWED_PROTOCOLS: &[&str] = &["https"];

/// Rejection reasons for a submitted callback URL.
///
/// The `Display` strings are part of the wire contract: initiate responses
/// embed them verbatim so client integrations can pattern-match on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("Invalid callback url format")]
    InvalidFormat,

    #[error("Invalid callback url protocol")]
    InvalidProtocol,
}

/// Validate that `url` parses and uses an allowed scheme.
///
/// Pure function, no I/O. Callers run it as a guard: on `Err` the guarded
/// operation (authorization issuance) must not execute.
pub fn validate_callback_url(url: &str) -> Result<(), ProtocolError> {
    let parsed = Url::parse(url).map_err(|_| ProtocolError::InvalidFormat)?;

    if !ALLOWED_PROTOCOLS.contains(&parsed.scheme()) {
        return Err(ProtocolError::InvalidProtocol);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_https_urls() {
        assert!(validate_callback_url("https://my.callback.url").is_ok());
        assert!(validate_callback_url("https://my.callback.url:8443/notify?a=b").is_ok());
    }

    #[test]
    fn rejects_non_https_schemes() {
        assert_eq!(
            validate_callback_url("http://my.callback.url"),
            Err(ProtocolError::InvalidProtocol)
        );
        assert_eq!(
            validate_callback_url("ftp://my.callback.url"),
            Err(ProtocolError::InvalidProtocol)
        );
    }

    #[test]
    fn rejects_unparseable_urls() {
        assert_eq!(validate_callback_url("123"), Err(ProtocolError::InvalidFormat));
        assert_eq!(validate_callback_url(""), Err(ProtocolError::InvalidFormat));
        assert_eq!(
            validate_callback_url("not a url at all"),
            Err(ProtocolError::InvalidFormat)
        );
    }

    #[test]
    fn error_messages_are_wire_exact() {
        assert_eq!(
            ProtocolError::InvalidFormat.to_string(),
            "Invalid callback url format"
        );
        assert_eq!(
            ProtocolError::InvalidProtocol.to_string(),
            "Invalid callback url protocol"
        );
    }
}
