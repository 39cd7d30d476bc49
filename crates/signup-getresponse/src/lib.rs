//! # signup-getresponse
//!
//! GetResponse implementation of the `signup-core` provider contract.
//!
//! Three v3 API operations are consumed: list campaigns, query contacts by
//! email and campaign, and create a contact. The campaign directory is
//! memoized with a one-hour TTL so admin screens do not refetch on every
//! render; subscribe calls always hit the API directly.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use signup_core::{SignupDispatcher, MemoryConfig, MemoryPendingStore};
//! use signup_getresponse::GetResponseNewsletter;
//!
//! let config = Arc::new(MemoryConfig::new());
//! config.set_api_key(Some("your-api-key"));
//! config.set_default_campaign(Some("V3n2p"));
//!
//! let provider = Arc::new(GetResponseNewsletter::new(config.clone()));
//! let dispatcher = SignupDispatcher::new(
//!     config,
//!     provider,
//!     Arc::new(MemoryPendingStore::new()),
//! );
//! ```

mod cache;
mod client;
mod provider;

pub use cache::{CACHE_TTL_SECS, CampaignCache};
pub use client::{
    CampaignRecord, CampaignRef, ContactRecord, DEFAULT_API_URL, GetResponseClient, NewContact,
    OptinMode,
};
pub use provider::GetResponseNewsletter;
