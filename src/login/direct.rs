use reqwest::blocking::{Client, Response};
use reqwest::header::SET_COOKIE;
use reqwest::tls::Version;
use tracing::{debug, error};

use super::{login_payload, LoginStrategy, LoginTicket};
use crate::config::Config;
use crate::error::{Error, Result};

/// In-process login over a blocking reqwest client.
///
/// The Service Layer host presents a self-signed certificate and refuses
/// modern protocol versions, so the TLS floor is pinned to 1.0 and
/// certificate verification is disabled. The cipher list cannot be
/// restricted through this stack; when the handshake still fails, the curl
/// strategy is the fallback.
pub struct DirectLogin;

impl LoginStrategy for DirectLogin {
    fn login(&self, config: &Config) -> Result<LoginTicket> {
        let client = Client::builder()
            .min_tls_version(Version::TLS_1_0)
            .danger_accept_invalid_certs(true)
            .build()?;

        let url = format!("{}/Login", config.service_layer_url);
        debug!(%url, "posting login");
        let response = client.post(&url).json(&login_payload(config)).send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            error!(status = status.as_u16(), %body, "login rejected");
            return Err(Error::Authentication {
                status: status.as_u16(),
                body,
            });
        }

        // Cookies first: reading the body consumes the response.
        let b1session = cookie_pair(&response, "B1SESSION")?;
        let routeid = cookie_pair(&response, "ROUTEID")?;
        let cookie_header = format!("{b1session}; {routeid}");

        let body: serde_json::Value = response
            .json()
            .map_err(|e| Error::Parse(format!("login response body is not valid JSON: {e}")))?;
        let session_id = body
            .get("SessionId")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::Parse("login response has no SessionId field".to_string()))?
            .to_string();

        Ok(LoginTicket {
            cookie_header,
            session_id,
        })
    }
}

/// Find `name` among the `Set-Cookie` headers and return `name=value`
/// with the attributes stripped.
fn cookie_pair(response: &Response, name: &str) -> Result<String> {
    let prefix = format!("{name}=");
    for header in response.headers().get_all(SET_COOKIE) {
        let raw = header
            .to_str()
            .map_err(|_| Error::Parse(format!("Set-Cookie header for {name} is not ASCII")))?;
        if raw.starts_with(&prefix) {
            let end = raw.find(';').unwrap_or(raw.len());
            return Ok(raw[..end].trim().to_string());
        }
    }
    Err(Error::Parse(format!(
        "no {name} cookie in login response"
    )))
}
