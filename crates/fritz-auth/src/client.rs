//! HTTP transport for the version-2 login endpoint.
//!
//! One client, three single-shot GETs: challenge fetch, response
//! submit, logout. No retries; the caller owns retry policy.

use crate::error::{AuthError, AuthResult};
use crate::session::SessionId;
use crate::xml;

/// Result of one challenge fetch: the raw challenge string and the
/// server-mandated cooldown in seconds. Owned by the orchestrator for
/// the duration of a single login attempt.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// Raw `$`-delimited challenge, exactly as received.
    pub challenge: String,
    /// Seconds the server requires the client to wait before
    /// submitting. Zero means submit immediately.
    pub blocktime: u64,
}

/// Client for the gateway's `login_sid.lua` endpoint.
#[derive(Clone)]
pub struct LoginClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl LoginClient {
    /// Create a new login client for a gateway base URL
    /// (e.g. `http://fritz.box`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            // one-shot requests only; keep no idle connections around
            http_client: reqwest::Client::builder()
                .pool_idle_timeout(None)
                .build()
                .unwrap_or_default(),
            base_url,
        }
    }

    /// Build the login endpoint URL.
    fn login_url(&self) -> String {
        format!("{}/login_sid.lua", self.base_url)
    }

    /// Fetch the current login challenge and block time.
    ///
    /// Issues one GET to `login_sid.lua?version=2` and extracts the
    /// `Challenge` and `BlockTime` elements.
    pub async fn fetch_challenge(&self) -> AuthResult<LoginState> {
        tracing::debug!(url = %self.login_url(), "fetching login challenge");

        let response = self
            .http_client
            .get(self.login_url())
            .query(&[("version", "2")])
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;

        let challenge = xml::first_text(&body, "Challenge")?;
        let blocktime_text = xml::first_text(&body, "BlockTime")?;
        let blocktime = blocktime_text
            .trim()
            .parse()
            .map_err(|_| AuthError::InvalidBlockTime(blocktime_text.clone()))?;

        tracing::debug!(blocktime, "challenge received");
        Ok(LoginState {
            challenge,
            blocktime,
        })
    }

    /// Submit a derived challenge response for a username.
    ///
    /// `response` is the full `<salt2_hex>$<hash_hex>` string; it is
    /// percent-encoded on the wire along with the username.
    pub async fn submit_response(
        &self,
        username: &str,
        response: &str,
    ) -> AuthResult<SessionId> {
        tracing::debug!(username, "submitting challenge response");

        let http_response = self
            .http_client
            .get(self.login_url())
            .query(&[
                ("version", "2"),
                ("username", username),
                ("response", response),
            ])
            .send()
            .await?
            .error_for_status()?;
        let body = http_response.text().await?;

        let sid = xml::first_text(&body, "SID")?;
        Ok(SessionId::new(sid))
    }

    /// Invalidate a session server-side.
    pub async fn logout(&self, sid: &SessionId) -> AuthResult<()> {
        tracing::debug!("logging out");

        self.http_client
            .get(self.login_url())
            .query(&[("version", "2"), ("logout", ""), ("sid", sid.as_str())])
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
