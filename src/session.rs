use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, COOKIE};
use reqwest::tls::Version;
use tracing::{debug, info, warn};

use crate::config::{Config, Strategy};
use crate::error::{Error, Result};
use crate::login::{CurlLogin, DirectLogin, LoginStrategy, LoginTicket};

/// An authenticated Service Layer session.
///
/// Holds the cookie pair issued at login as default headers on a blocking
/// client, so every subsequent request is authenticated without further
/// negotiation. Immutable after construction apart from the release flag;
/// never partially constructed — acquisition either yields a session with
/// both cookies and a session id or an error. Owned by one calling flow,
/// not meant for concurrent reuse.
pub struct Session {
    http: Client,
    base_url: String,
    session_id: String,
    released: bool,
}

/// Log in with the configured strategy and return a ready-to-use session.
pub fn acquire_session(config: &Config) -> Result<Session> {
    let strategy: &dyn LoginStrategy = match config.strategy {
        Strategy::Direct => &DirectLogin,
        Strategy::Curl => &CurlLogin,
    };
    let ticket = strategy.login(config)?;
    Session::from_ticket(config, ticket)
}

/// Null-tolerant wrapper around [`Session::release`].
pub fn release_session(session: Option<&mut Session>) {
    if let Some(session) = session {
        session.release();
    }
}

impl Session {
    fn from_ticket(config: &Config, ticket: LoginTicket) -> Result<Self> {
        let cookie = HeaderValue::from_str(&ticket.cookie_header)
            .map_err(|_| Error::Parse("cookie value is not a valid header".to_string()))?;
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, cookie);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        // Same TLS relaxations as the login client; every later call hits
        // the same legacy host.
        let http = Client::builder()
            .default_headers(headers)
            .min_tls_version(Version::TLS_1_0)
            .danger_accept_invalid_certs(true)
            .build()?;

        info!(session_id = %ticket.session_id, "session established");
        Ok(Self {
            http,
            base_url: config.service_layer_url.clone(),
            session_id: ticket.session_id,
            released: false,
        })
    }

    /// Session id reported by the server at login.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        self.http.get(format!("{}{}", self.base_url, path))
    }

    /// Best-effort logout. Transport failures are logged as warnings and
    /// never returned; releasing an already-released session is a no-op.
    pub fn release(&mut self) {
        if self.released {
            debug!("session already released");
            return;
        }
        self.released = true;

        let url = format!("{}/Logout", self.base_url);
        match self.http.post(&url).send() {
            Ok(response) if response.status().is_success() => info!("session closed"),
            Ok(response) => {
                warn!(status = response.status().as_u16(), "logout rejected")
            }
            Err(e) => warn!(error = %e, "logout failed"),
        }
    }
}
