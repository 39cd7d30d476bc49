//! Signup Configuration
//!
//! Read side of the host platform's option storage. The host owns the
//! values; this crate only ever reads them. `MemoryConfig` is provided for
//! hosts without their own option store and for tests.

use std::collections::HashMap;
use std::sync::RwLock;

/// Checkbox label used when the admin has not set one
pub const DEFAULT_CHECKOUT_LABEL: &str = "Sign up for our mailing list";

/// Read-only view of the admin-configured signup settings
///
/// Implementations should treat a blank or whitespace-only API key as
/// absent.
pub trait SignupConfig: Send + Sync {
    /// Provider API key, `None` until the admin configures one
    fn api_key(&self) -> Option<String>;

    /// Site-wide default campaign, used when no product override applies
    fn default_campaign(&self) -> Option<String>;

    /// Campaign overrides for one product; empty means "no override"
    fn product_campaigns(&self, product_id: &str) -> Vec<String>;

    /// Require the provider to send a confirmation email before the
    /// subscription is active
    fn double_optin(&self) -> bool;

    /// Subscribe every buyer regardless of the checkout checkbox
    fn auto_subscribe(&self) -> bool;

    /// Show the signup checkbox on checkout
    fn show_checkout_signup(&self) -> bool;

    /// Label next to the checkout checkbox
    fn checkout_label(&self) -> String {
        DEFAULT_CHECKOUT_LABEL.to_string()
    }

    /// Whether the checkout checkbox starts checked
    fn checkout_default_checked(&self) -> bool {
        false
    }
}

#[derive(Clone, Debug, Default)]
struct ConfigValues {
    api_key: Option<String>,
    default_campaign: Option<String>,
    product_campaigns: HashMap<String, Vec<String>>,
    double_optin: bool,
    auto_subscribe: bool,
    show_checkout_signup: bool,
    checkout_label: Option<String>,
    checkout_default_checked: bool,
}

/// In-memory configuration store (for development and tests)
pub struct MemoryConfig {
    values: RwLock<ConfigValues>,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryConfig {
    pub fn new() -> Self {
        Self {
            values: RwLock::new(ConfigValues::default()),
        }
    }

    /// Set or clear the API key.
    ///
    /// A changed key implies a different universe of campaigns; callers
    /// holding a campaign cache should invalidate it after this write.
    pub fn set_api_key(&self, api_key: Option<impl Into<String>>) {
        self.values.write().unwrap().api_key = api_key.map(Into::into);
    }

    pub fn set_default_campaign(&self, campaign_id: Option<impl Into<String>>) {
        self.values.write().unwrap().default_campaign = campaign_id.map(Into::into);
    }

    pub fn set_product_campaigns(&self, product_id: impl Into<String>, campaigns: Vec<String>) {
        self.values
            .write()
            .unwrap()
            .product_campaigns
            .insert(product_id.into(), campaigns);
    }

    pub fn set_double_optin(&self, double_optin: bool) {
        self.values.write().unwrap().double_optin = double_optin;
    }

    pub fn set_auto_subscribe(&self, auto_subscribe: bool) {
        self.values.write().unwrap().auto_subscribe = auto_subscribe;
    }

    pub fn set_show_checkout_signup(&self, show: bool) {
        self.values.write().unwrap().show_checkout_signup = show;
    }

    pub fn set_checkout_label(&self, label: Option<impl Into<String>>) {
        self.values.write().unwrap().checkout_label = label.map(Into::into);
    }

    pub fn set_checkout_default_checked(&self, checked: bool) {
        self.values.write().unwrap().checkout_default_checked = checked;
    }
}

impl SignupConfig for MemoryConfig {
    fn api_key(&self) -> Option<String> {
        self.values
            .read()
            .unwrap()
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(String::from)
    }

    fn default_campaign(&self) -> Option<String> {
        self.values.read().unwrap().default_campaign.clone()
    }

    fn product_campaigns(&self, product_id: &str) -> Vec<String> {
        self.values
            .read()
            .unwrap()
            .product_campaigns
            .get(product_id)
            .cloned()
            .unwrap_or_default()
    }

    fn double_optin(&self) -> bool {
        self.values.read().unwrap().double_optin
    }

    fn auto_subscribe(&self) -> bool {
        self.values.read().unwrap().auto_subscribe
    }

    fn show_checkout_signup(&self) -> bool {
        self.values.read().unwrap().show_checkout_signup
    }

    fn checkout_label(&self) -> String {
        self.values
            .read()
            .unwrap()
            .checkout_label
            .clone()
            .unwrap_or_else(|| DEFAULT_CHECKOUT_LABEL.to_string())
    }

    fn checkout_default_checked(&self) -> bool {
        self.values.read().unwrap().checkout_default_checked
    }
}
