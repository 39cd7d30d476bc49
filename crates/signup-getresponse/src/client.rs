//! GetResponse REST Client
//!
//! Thin wrapper over the GetResponse v3 HTTP API. Requests carry the API
//! key per call, since the admin can change it at any time, and use a
//! bounded timeout so a slow provider cannot hang order processing.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use signup_core::{Result, SignupError};

/// Production API base URL
pub const DEFAULT_API_URL: &str = "https://api.getresponse.com/v3";

const AUTH_HEADER: &str = "X-Auth-Token";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One campaign as returned by `GET /campaigns`
#[derive(Clone, Debug, Deserialize)]
pub struct CampaignRecord {
    #[serde(rename = "campaignId")]
    pub campaign_id: String,
    pub name: String,
}

/// One contact as returned by `GET /contacts`
#[derive(Clone, Debug, Deserialize)]
pub struct ContactRecord {
    #[serde(rename = "contactId")]
    pub contact_id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Opt-in mode for new contacts
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptinMode {
    /// Subscribed immediately
    Single,
    /// Provider sends a confirmation email first
    Double,
}

/// Campaign reference inside a contact payload
#[derive(Clone, Debug, Serialize)]
pub struct CampaignRef {
    #[serde(rename = "campaignId")]
    pub campaign_id: String,
}

/// Payload for `POST /contacts`
#[derive(Clone, Debug, Serialize)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    #[serde(rename = "dayOfCycle")]
    pub day_of_cycle: u32,
    pub optin: OptinMode,
    pub campaign: CampaignRef,
    #[serde(rename = "ipAddress")]
    pub ip_address: String,
}

/// Error object the API returns instead of a result
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// GetResponse API client
pub struct GetResponseClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for GetResponseClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GetResponseClient {
    /// Client against the production API
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_API_URL)
    }

    /// Client against a custom base URL (used by tests)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn auth_value(api_key: &str) -> String {
        format!("api-key {}", api_key)
    }

    /// `GET /campaigns`
    pub async fn list_campaigns(&self, api_key: &str) -> Result<Vec<CampaignRecord>> {
        let response = self
            .http
            .get(format!("{}/campaigns", self.base_url))
            .timeout(REQUEST_TIMEOUT)
            .header(AUTH_HEADER, Self::auth_value(api_key))
            .send()
            .await
            .map_err(|e| SignupError::ProviderUnreachable(e.to_string()))?;

        Self::decode(response).await
    }

    /// `GET /contacts` filtered by email and campaign; zero or one record
    pub async fn find_contact(
        &self,
        api_key: &str,
        email: &str,
        campaign_id: &str,
    ) -> Result<Option<ContactRecord>> {
        let response = self
            .http
            .get(format!("{}/contacts", self.base_url))
            .timeout(REQUEST_TIMEOUT)
            .header(AUTH_HEADER, Self::auth_value(api_key))
            .query(&[("query[email]", email), ("query[campaignId]", campaign_id)])
            .send()
            .await
            .map_err(|e| SignupError::ProviderUnreachable(e.to_string()))?;

        let contacts: Vec<ContactRecord> = Self::decode(response).await?;
        Ok(contacts.into_iter().next())
    }

    /// `POST /contacts`
    ///
    /// The API acknowledges creation with an empty success body, so only
    /// the status is inspected.
    pub async fn create_contact(&self, api_key: &str, contact: &NewContact) -> Result<()> {
        let response = self
            .http
            .post(format!("{}/contacts", self.base_url))
            .timeout(REQUEST_TIMEOUT)
            .header(AUTH_HEADER, Self::auth_value(api_key))
            .json(contact)
            .send()
            .await
            .map_err(|e| SignupError::ProviderUnreachable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SignupError::ProviderUnreachable(e.to_string()))?;

        Err(SignupError::Provider(Self::error_message(&body, status)))
    }

    /// Decode a response body, mapping `{message}` error objects to
    /// `SignupError::Provider` whether or not the status was an error.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| SignupError::ProviderUnreachable(e.to_string()))?;

        if !status.is_success() {
            return Err(SignupError::Provider(Self::error_message(&body, status)));
        }

        match serde_json::from_slice::<T>(&body) {
            Ok(value) => Ok(value),
            Err(err) => {
                // Some failures come back 200 with an error object
                if let Ok(api_err) = serde_json::from_slice::<ApiErrorBody>(&body) {
                    return Err(SignupError::Provider(api_err.message));
                }
                Err(err.into())
            }
        }
    }

    fn error_message(body: &[u8], status: reqwest::StatusCode) -> String {
        serde_json::from_slice::<ApiErrorBody>(body)
            .map(|b| b.message)
            .unwrap_or_else(|_| format!("HTTP {}", status))
    }
}
