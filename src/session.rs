//! Login state
//!
//! The console never runs the identity provider's login flow; it is handed a
//! bearer token. `whoami` tells us whether that token is still good, and the
//! answer is remembered on disk so the next start can show the shell
//! immediately instead of a blank "checking..." screen.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

use crate::domain::User;
use crate::graphql::operations::{MePayload, ME};
use crate::graphql::{ClientError, GraphqlClient};

/// What gets written to `session.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CachedSession {
    pub logged_in: bool,
    /// sha256 of the token the flag was recorded for
    pub token_fingerprint: String,
    #[serde(default)]
    pub email: Option<String>,
    pub checked_at: DateTime<Utc>,
}

/// Outcome of a live check
#[derive(Debug, Clone)]
pub enum SessionState {
    LoggedIn(User),
    LoggedOut,
}

pub struct Session {
    path: PathBuf,
    fingerprint: String,
}

impl Session {
    /// `~/.config/lana-admin/session.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("lana-admin").join("session.json"))
    }

    pub fn new(path: PathBuf, token: Option<&str>) -> Self {
        Self {
            path,
            fingerprint: fingerprint(token.unwrap_or_default()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last recorded flag, without touching the network.
    ///
    /// A record made for a different token is ignored.
    pub fn cached(&self) -> bool {
        self.read()
            .map(|s| s.logged_in && s.token_fingerprint == self.fingerprint)
            .unwrap_or(false)
    }

    pub fn cached_email(&self) -> Option<String> {
        self.read()
            .filter(|s| s.token_fingerprint == self.fingerprint)
            .and_then(|s| s.email)
    }

    /// Run `whoami` and record the result
    pub async fn check(&self, client: &GraphqlClient) -> Result<SessionState, ClientError> {
        match client.execute::<_, MePayload>(&ME, &serde_json::json!({})).await {
            Ok(me) => {
                tracing::info!(email = %me.user.email, "Session valid");
                self.record(Some(&me.user.email));
                Ok(SessionState::LoggedIn(me.user))
            }
            Err(ClientError::Unauthorized) => {
                tracing::warn!("Token rejected, clearing cached session");
                self.clear();
                Ok(SessionState::LoggedOut)
            }
            Err(e) => Err(e),
        }
    }

    pub fn record(&self, email: Option<&str>) {
        let session = CachedSession {
            logged_in: true,
            token_fingerprint: self.fingerprint.clone(),
            email: email.map(str::to_string),
            checked_at: Utc::now(),
        };

        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("Could not create {}: {}", parent.display(), e);
                return;
            }
        }

        match serde_json::to_string_pretty(&session) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&self.path, json) {
                    tracing::warn!("Could not write session cache: {}", e);
                }
            }
            Err(e) => tracing::warn!("Could not serialize session cache: {}", e),
        }
    }

    pub fn clear(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Could not remove session cache: {}", e),
        }
    }

    fn read(&self) -> Option<CachedSession> {
        let contents = std::fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&contents).ok()
    }
}

fn fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}
