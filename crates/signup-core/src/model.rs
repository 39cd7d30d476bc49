//! Order and Buyer Models
//!
//! Ephemeral per-order data handed over by the host commerce platform.
//! Nothing here is persisted by this crate; every value lives for one
//! dispatch and is discarded.

use serde::{Deserialize, Serialize};

/// The buyer attached to a completed order
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Buyer {
    /// Email address to subscribe
    pub email: String,

    /// First name, possibly blank
    pub first_name: String,

    /// Last name, possibly blank
    pub last_name: String,

    /// Client IP recorded at checkout, forwarded to the provider
    pub ip_address: String,
}

impl Buyer {
    pub fn new(
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        ip_address: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            ip_address: ip_address.into(),
        }
    }

    /// Display name sent to the provider
    ///
    /// "first last" with surrounding whitespace trimmed; falls back to the
    /// email address when both name parts are blank.
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();

        if name.is_empty() {
            self.email.clone()
        } else {
            name.to_string()
        }
    }
}

/// One purchased item on an order
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LineItem {
    /// Host platform's product identifier
    pub product_id: String,

    /// Product IDs contained in this item when it is a bundle.
    ///
    /// A bundle's campaign set is the union of its own override and the
    /// overrides of every bundled product. Empty for plain products.
    #[serde(default)]
    pub bundled_product_ids: Vec<String>,
}

impl LineItem {
    /// A plain, non-bundle product
    pub fn product(product_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            bundled_product_ids: Vec::new(),
        }
    }

    /// A bundle containing other products
    pub fn bundle(product_id: impl Into<String>, bundled_product_ids: Vec<String>) -> Self {
        Self {
            product_id: product_id.into(),
            bundled_product_ids,
        }
    }

    pub fn is_bundle(&self) -> bool {
        !self.bundled_product_ids.is_empty()
    }
}

/// A completed order, input to dispatch
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Order {
    /// Host platform's order identifier
    pub id: String,

    /// Whether the signup checkbox was checked at checkout
    pub opted_in: bool,

    /// Purchased items, in cart order
    pub items: Vec<LineItem>,

    /// The buyer
    pub buyer: Buyer,
}

impl Order {
    pub fn new(id: impl Into<String>, opted_in: bool, items: Vec<LineItem>, buyer: Buyer) -> Self {
        Self {
            id: id.into(),
            opted_in,
            items,
            buyer,
        }
    }
}
