use std::process::Command;

use tracing::{debug, error};

use super::{login_payload, LoginStrategy, LoginTicket};
use crate::config::Config;
use crate::error::{Error, Result};

/// Login through an external curl process.
///
/// curl negotiates the legacy TLS parameters the in-process stack cannot
/// (pinned protocol version AND a restricted cipher list), so the handshake
/// is delegated to it and its combined header+body output (`-i`) is parsed
/// for the session cookies and id.
pub struct CurlLogin;

impl LoginStrategy for CurlLogin {
    fn login(&self, config: &Config) -> Result<LoginTicket> {
        let url = format!("{}/Login", config.service_layer_url);
        let body = login_payload(config).to_string();
        debug!(helper = %config.helper, %url, "running helper login");

        let output = Command::new(&config.helper)
            .arg("-X")
            .arg("POST")
            .arg("--insecure")
            .arg("--tlsv1.0")
            .arg("--ciphers")
            .arg(&config.cipher)
            .arg("--max-time")
            .arg(config.timeout_secs.to_string())
            .arg("-sS")
            .arg("-i")
            .arg("-H")
            .arg("Content-Type: application/json")
            .arg("-d")
            .arg(body)
            .arg(url)
            .output()
            .map_err(|e| Error::Process {
                code: None,
                stderr: format!("could not run {}: {e}", config.helper),
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !output.status.success() {
            error!(code = ?output.status.code(), %stderr, "helper process failed");
            return Err(Error::Process {
                code: output.status.code(),
                stderr,
            });
        }

        let captured = String::from_utf8_lossy(&output.stdout);
        if !status_line_is_200(&captured) {
            // Stricter than the direct strategy on purpose: cookie
            // extraction is only attempted behind an explicit 200.
            error!(response = %captured, "helper login did not return 200 OK");
            return Err(Error::Process {
                code: output.status.code(),
                stderr,
            });
        }

        parse_login_output(&captured)
    }
}

/// The first `HTTP/` line must report status 200 exactly.
fn status_line_is_200(captured: &str) -> bool {
    captured
        .lines()
        .find(|line| line.starts_with("HTTP/"))
        .and_then(|line| line.split_whitespace().nth(1))
        .map(|code| code == "200")
        .unwrap_or(false)
}

/// Extract the cookie pair and `SessionId` from curl's `-i` output.
/// Assumes the 200 gate already passed.
fn parse_login_output(captured: &str) -> Result<LoginTicket> {
    let b1session = cookie_pair(captured, "B1SESSION")?;
    let routeid = cookie_pair(captured, "ROUTEID")?;

    let body = response_body(captured);
    if body.is_empty() {
        return Err(Error::Parse("login response body is empty".to_string()));
    }
    let json: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| Error::Parse(format!("login response body is not valid JSON: {e}")))?;
    let session_id = json
        .get("SessionId")
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::Parse("login response has no SessionId field".to_string()))?
        .to_string();

    Ok(LoginTicket {
        cookie_header: format!("{b1session}; {routeid}"),
        session_id,
    })
}

/// Find `name` in a `Set-Cookie` header line and return `name=value` with
/// the attributes stripped. Header name matching is case-insensitive.
fn cookie_pair(captured: &str, name: &str) -> Result<String> {
    let prefix = format!("{name}=");
    for line in captured.lines() {
        let Some((header, value)) = line.split_once(':') else {
            continue;
        };
        if !header.trim().eq_ignore_ascii_case("set-cookie") {
            continue;
        }
        let value = value.trim();
        if value.starts_with(&prefix) {
            let end = value.find(';').unwrap_or(value.len());
            return Ok(value[..end].to_string());
        }
    }
    Err(Error::Parse(format!(
        "no {name} cookie in login response"
    )))
}

/// Everything after the last blank line: the JSON body. Tolerates `\r\n`
/// and bare `\n` separators.
fn response_body(captured: &str) -> &str {
    if let Some((_, body)) = captured.rsplit_once("\r\n\r\n") {
        body.trim()
    } else if let Some((_, body)) = captured.rsplit_once("\n\n") {
        body.trim()
    } else {
        ""
    }
}
