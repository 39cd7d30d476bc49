//! Checkout Field Descriptor
//!
//! Data the host needs to render the signup checkbox. Pure data, no HTML;
//! rendering belongs to the host platform.

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_CHECKOUT_LABEL, SignupConfig};

/// The signup checkbox as the host should render it
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckoutField {
    /// Form field name
    pub name: String,

    /// Label next to the checkbox
    pub label: String,

    /// Whether the checkbox starts checked
    pub checked: bool,
}

/// Build the checkout checkbox descriptor.
///
/// `None` when no API key is configured or the admin disabled the
/// checkbox; the host renders nothing in that case.
pub fn checkout_field(config: &dyn SignupConfig) -> Option<CheckoutField> {
    if config.api_key().is_none() || !config.show_checkout_signup() {
        return None;
    }

    let label = config.checkout_label();
    let label = label.trim();

    Some(CheckoutField {
        name: "newsletter_signup".to_string(),
        label: if label.is_empty() {
            DEFAULT_CHECKOUT_LABEL.to_string()
        } else {
            label.to_string()
        },
        checked: config.checkout_default_checked(),
    })
}
