//! The legacy-TLS login handshake.
//!
//! Two interchangeable strategies produce the same [`LoginTicket`]: the
//! direct one negotiates in process, the curl one shells out to a binary
//! that still speaks the server's obsolete TLS dialect.

mod curl;
mod direct;

pub use curl::CurlLogin;
pub use direct::DirectLogin;

use crate::config::Config;
use crate::error::Result;

/// Outcome of a successful login, independent of how it was negotiated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginTicket {
    /// Ready-to-send `Cookie` header value: `B1SESSION=...; ROUTEID=...`.
    pub cookie_header: String,
    /// Session id reported by the server (matches the `B1SESSION` value).
    pub session_id: String,
}

pub trait LoginStrategy {
    /// Perform the `/Login` handshake and return the session cookies.
    ///
    /// Never returns a partial result: both cookies and the session id are
    /// present in the ticket, or this fails.
    fn login(&self, config: &Config) -> Result<LoginTicket>;
}

pub(crate) fn login_payload(config: &Config) -> serde_json::Value {
    serde_json::json!({
        "CompanyDB": config.company_db,
        "UserName": config.username,
        "Password": config.password,
    })
}
