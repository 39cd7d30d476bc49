//! Newsletter Provider Contract
//!
//! Capability contract for one external mailing-list provider. There is a
//! single concrete implementation in the sibling provider crate; tests use
//! hand-written mocks.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::Buyer;

/// What a subscribe call did
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubscribeOutcome {
    /// A new contact was created on the provider
    Subscribed,

    /// The buyer already exists in the target campaign; nothing was sent
    AlreadySubscribed,
}

/// Newsletter provider trait
#[async_trait]
pub trait NewsletterProvider: Send + Sync {
    /// Campaign directory: campaign ID mapped to display name.
    ///
    /// Empty when no API key is configured or the directory could not be
    /// fetched; a fetch failure is reported through [`last_api_error`]
    /// rather than an error return, since callers are admin screens that
    /// render whatever is available.
    ///
    /// [`last_api_error`]: NewsletterProvider::last_api_error
    async fn campaigns(&self) -> HashMap<String, String>;

    /// Add the buyer to one campaign, skipping buyers already subscribed
    async fn subscribe(&self, buyer: &Buyer, campaign_id: &str) -> Result<SubscribeOutcome>;

    /// Message from the most recent failed directory fetch, for display to
    /// administrators; cleared by the next successful fetch
    fn last_api_error(&self) -> Option<String> {
        None
    }

    /// Provider name
    fn name(&self) -> &str;
}
