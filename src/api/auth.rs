use crate::api::{failure_from_response, network_error};
use crate::config::Credentials;
use crate::error::{FetchError, Result};
use attohttpc::Session;
use chrono::{DateTime, Duration, Utc};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::fmt;

pub(crate) const TOKEN_PATH: &str = "/oauth2/token";

// Treat the token as expired slightly early so a request is not sent with a
// token that lapses in flight
const EXPIRY_MARGIN_SECS: i64 = 30;

#[derive(Serialize)]
struct TokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    member_cid: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Bearer token obtained from the OAuth2 client-credentials exchange.
#[derive(Clone)]
pub struct AccessToken {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    pub(crate) fn from_response(response: TokenResponse, issued_at: DateTime<Utc>) -> Result<Self> {
        let expires_at = match response.expires_in {
            Some(secs) => Some(
                Duration::try_seconds(secs)
                    .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
                    .ok_or_else(|| {
                        FetchError::Authentication(format!(
                            "Malformed token response: expires_in {secs} is out of range"
                        ))
                    })?,
            ),
            None => None,
        };

        Ok(Self {
            value: response.access_token,
            expires_at,
        })
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => now + Duration::seconds(EXPIRY_MARGIN_SECS) >= expires_at,
            None => false,
        }
    }

    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.value)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Exchange the client credentials for a bearer token.
pub(crate) fn request_token(
    session: &Session,
    base_url: &str,
    credentials: &Credentials,
) -> Result<AccessToken> {
    let url = format!("{base_url}{TOKEN_PATH}");
    debug!("Requesting OAuth2 token from {url}");

    let form = TokenRequest {
        client_id: &credentials.client_id,
        client_secret: &credentials.client_secret,
        member_cid: credentials.member_cid.as_deref(),
    };

    let issued_at = Utc::now();
    let response = session
        .post(&url)
        .header("Accept", "application/json")
        .form(&form)?
        .send()
        .map_err(|e| network_error(&url, e))?;

    let status = response.status().as_u16();
    let body = response
        .text()
        .map_err(|e| FetchError::NetworkError(format!("Failed to read token response: {e}")))?;

    if !(200..300).contains(&status) {
        return Err(match failure_from_response(status, &body) {
            FetchError::Api {
                status: 400 | 401 | 403,
                message,
            } => FetchError::Authentication(message),
            other => other,
        });
    }

    let token: TokenResponse = serde_json::from_str(&body).map_err(|e| {
        trace!("Token response body: {body}");
        FetchError::Authentication(format!("Malformed token response: {e}"))
    })?;

    if let Some(ref token_type) = token.token_type
        && !token_type.eq_ignore_ascii_case("bearer")
    {
        return Err(FetchError::Authentication(format!(
            "Unsupported token type '{token_type}'"
        )));
    }

    let token = AccessToken::from_response(token, issued_at)?;
    debug!("Obtained access token, expires at {:?}", token.expires_at());
    Ok(token)
}
