//! GetResponse Newsletter Provider
//!
//! Concrete `NewsletterProvider` backed by the v3 REST API, with the
//! TTL-bounded campaign cache and an admin-facing last-error slot.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use signup_core::{
    Buyer, NewsletterProvider, Result, SignupConfig, SignupError, SubscribeOutcome,
};

use crate::cache::CampaignCache;
use crate::client::{CampaignRef, GetResponseClient, NewContact, OptinMode};

/// GetResponse provider
pub struct GetResponseNewsletter {
    config: Arc<dyn SignupConfig>,
    client: GetResponseClient,
    cache: CampaignCache,
    last_error: RwLock<Option<String>>,
}

impl GetResponseNewsletter {
    /// Provider against the production API
    pub fn new(config: Arc<dyn SignupConfig>) -> Self {
        Self::with_client(config, GetResponseClient::new())
    }

    /// Provider with a custom client (used by tests)
    pub fn with_client(config: Arc<dyn SignupConfig>, client: GetResponseClient) -> Self {
        Self {
            config,
            client,
            cache: CampaignCache::new(),
            last_error: RwLock::new(None),
        }
    }

    /// Host settings-save hook: call after any API-key write.
    ///
    /// The cache also fingerprints the key, so a missed call here degrades
    /// to a stale-but-wrong-key miss rather than wrong data.
    pub fn invalidate_campaign_cache(&self) {
        self.cache.invalidate();
    }

    fn record_error(&self, message: Option<String>) {
        *self.last_error.write().unwrap() = message;
    }
}

#[async_trait]
impl NewsletterProvider for GetResponseNewsletter {
    async fn campaigns(&self) -> HashMap<String, String> {
        let Some(api_key) = self.config.api_key() else {
            return HashMap::new();
        };

        if let Some(cached) = self.cache.get(&api_key) {
            return cached;
        }

        match self.client.list_campaigns(&api_key).await {
            Ok(records) => {
                let campaigns: HashMap<String, String> = records
                    .into_iter()
                    .map(|c| (c.campaign_id, c.name))
                    .collect();

                self.cache.store(&api_key, campaigns.clone());
                self.record_error(None);
                campaigns
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to fetch campaign directory");

                let message = match err {
                    SignupError::Provider(msg) => msg,
                    other => other.to_string(),
                };
                self.record_error(Some(message));
                HashMap::new()
            }
        }
    }

    async fn subscribe(&self, buyer: &Buyer, campaign_id: &str) -> Result<SubscribeOutcome> {
        let api_key = self.config.api_key().ok_or(SignupError::MissingApiKey)?;

        if campaign_id.trim().is_empty() {
            return Err(SignupError::NoTargetCampaign);
        }

        // Existing members are left alone: no duplicate-contact error from
        // the provider, no re-sent confirmation email under double opt-in
        if self
            .client
            .find_contact(&api_key, &buyer.email, campaign_id)
            .await?
            .is_some()
        {
            tracing::debug!(
                email = %buyer.email,
                campaign_id = %campaign_id,
                "contact already subscribed"
            );
            return Ok(SubscribeOutcome::AlreadySubscribed);
        }

        let contact = NewContact {
            name: buyer.display_name(),
            email: buyer.email.clone(),
            day_of_cycle: 0,
            optin: if self.config.double_optin() {
                OptinMode::Double
            } else {
                OptinMode::Single
            },
            campaign: CampaignRef {
                campaign_id: campaign_id.to_string(),
            },
            ip_address: buyer.ip_address.clone(),
        };

        self.client.create_contact(&api_key, &contact).await?;
        Ok(SubscribeOutcome::Subscribed)
    }

    fn last_api_error(&self) -> Option<String> {
        self.last_error.read().unwrap().clone()
    }

    fn name(&self) -> &str {
        "GetResponse"
    }
}
