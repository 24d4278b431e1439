//! Error types for the network collaborators

use core::fmt;

/// Network session error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// Host name could not be resolved
    Dns,
    /// TCP connection could not be established
    Connect,
    /// TLS handshake or record error
    Tls,
    /// Sending the request failed
    Write,
    /// Reading the response failed
    Read,
    /// No data within the read timeout
    Timeout,
    /// Peer closed the connection
    Closed,
    /// Request does not fit into the request buffer
    RequestTooLong,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Dns => write!(f, "DNS lookup failed"),
            SessionError::Connect => write!(f, "connection failed"),
            SessionError::Tls => write!(f, "TLS error"),
            SessionError::Write => write!(f, "write failed"),
            SessionError::Read => write!(f, "read failed"),
            SessionError::Timeout => write!(f, "read timed out"),
            SessionError::Closed => write!(f, "connection closed"),
            SessionError::RequestTooLong => write!(f, "request too long"),
        }
    }
}

impl From<core::fmt::Error> for SessionError {
    fn from(_error: core::fmt::Error) -> Self {
        SessionError::RequestTooLong
    }
}

/// WiFi link error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// Station configuration was rejected
    Config,
    /// Radio could not be started
    Start,
    /// Connect request was rejected
    Connect,
    /// Network scan failed
    Scan,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::Config => write!(f, "invalid station configuration"),
            LinkError::Start => write!(f, "radio start failed"),
            LinkError::Connect => write!(f, "connect request failed"),
            LinkError::Scan => write!(f, "scan failed"),
        }
    }
}
