//! # signup-core
//!
//! Mailing-list signup core for an e-commerce checkout.
//!
//! At purchase time, a buyer can opt in to one or more mailing campaigns on
//! an external email-marketing provider. This crate owns the decision of
//! *which* campaigns an order maps to and dispatches one subscribe call per
//! target, without ever blocking the purchase on a mailing-list failure.
//!
//! ```text
//! ┌──────────┐  checkbox   ┌──────────────────┐  complete  ┌──────────────┐
//! │ Checkout │────────────▶│  Pending marker  │───────────▶│  Dispatcher  │
//! │  (host)  │             │  (per order)     │            │ resolve+send │
//! └──────────┘             └──────────────────┘            └──────┬───────┘
//!                                                                 │
//!                                                    one call per campaign
//!                                                                 ▼
//!                                                       NewsletterProvider
//! ```
//!
//! The host platform supplies configuration storage and the order-completion
//! event; the provider side (HTTP client, campaign cache) lives in a sibling
//! crate implementing [`NewsletterProvider`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use signup_core::{SignupDispatcher, MemoryConfig, MemoryPendingStore};
//!
//! let dispatcher = SignupDispatcher::new(config, provider, markers);
//!
//! // At checkout, when the signup box was checked:
//! dispatcher.record_checkout_optin(&order_id);
//!
//! // When the host fires its completion event:
//! let report = dispatcher.on_order_completed(&order).await;
//! if report.subscribed() {
//!     // at least one campaign accepted the buyer
//! }
//! ```

mod checkout;
mod config;
mod dispatch;
mod error;
mod marker;
mod model;
mod provider;
mod settings;

pub use checkout::{CheckoutField, checkout_field};
pub use config::{DEFAULT_CHECKOUT_LABEL, MemoryConfig, SignupConfig};
pub use dispatch::{CampaignResult, DispatchReport, SignupDispatcher};
pub use error::{Result, SignupError};
pub use marker::{MemoryPendingStore, PendingSignupStore};
pub use model::{Buyer, LineItem, Order};
pub use provider::{NewsletterProvider, SubscribeOutcome};
pub use settings::{
    SelectOption, SettingsField, SettingsKind, product_campaign_field, settings_fields,
};
