//! Settings Descriptors
//!
//! Describes the admin settings screen and the per-product campaign picker
//! as plain data for the host to render. The campaign select only appears
//! once an API key has been saved, since its options come from the
//! provider's campaign directory.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::SignupConfig;

/// One option in a select field
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SelectOption {
    pub id: String,
    pub name: String,
    pub selected: bool,
}

/// Field kind, with the data each kind needs
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum SettingsKind {
    Header,
    Text { default: Option<String> },
    Checkbox { checked: bool },
    Select { options: Vec<SelectOption> },
    MultiSelect { options: Vec<SelectOption> },
}

/// One field on the settings screen
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SettingsField {
    pub id: String,
    pub label: String,
    pub description: String,
    pub kind: SettingsKind,
}

impl SettingsField {
    fn new(
        id: &str,
        label: &str,
        description: &str,
        kind: SettingsKind,
    ) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            description: description.to_string(),
            kind,
        }
    }
}

/// Campaign directory as sorted select options
fn campaign_options(campaigns: &HashMap<String, String>, selected: &[String]) -> Vec<SelectOption> {
    let mut options: Vec<SelectOption> = campaigns
        .iter()
        .map(|(id, name)| SelectOption {
            id: id.clone(),
            name: name.clone(),
            selected: selected.iter().any(|s| s == id),
        })
        .collect();

    options.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
    options
}

/// Build the settings-screen field list.
///
/// `campaigns` is the provider's current directory, fetched by the caller
/// (lazily, so the settings screen is what populates the campaign cache).
pub fn settings_fields(
    config: &dyn SignupConfig,
    campaigns: &HashMap<String, String>,
) -> Vec<SettingsField> {
    let mut fields = vec![
        SettingsField::new(
            "api_config",
            "API Configuration",
            "",
            SettingsKind::Header,
        ),
        SettingsField::new(
            "api_key",
            "API Key",
            "Enter your mailing-list provider API key",
            SettingsKind::Text { default: None },
        ),
    ];

    // Until a key is saved there is no directory to choose from
    if config.api_key().is_some() {
        let selected: Vec<String> = config.default_campaign().into_iter().collect();

        fields.push(SettingsField::new(
            "default_campaign",
            "Choose A Campaign",
            "Select the campaign you wish to subscribe buyers to",
            SettingsKind::Select {
                options: campaign_options(campaigns, &selected),
            },
        ));
    }

    fields.push(SettingsField::new(
        "signup_config",
        "Signup Configuration",
        "",
        SettingsKind::Header,
    ));
    fields.push(SettingsField::new(
        "show_checkout_signup",
        "Show Signup Checkbox",
        "Allow customers to sign up for the selected campaign during checkout",
        SettingsKind::Checkbox {
            checked: config.show_checkout_signup(),
        },
    ));
    fields.push(SettingsField::new(
        "checkout_label",
        "Checkbox Label",
        "Define a custom label for the subscription checkbox",
        SettingsKind::Text {
            default: Some(config.checkout_label()),
        },
    ));
    fields.push(SettingsField::new(
        "double_optin",
        "Double Opt-In",
        "Require buyers to confirm their subscription via email",
        SettingsKind::Checkbox {
            checked: config.double_optin(),
        },
    ));
    fields.push(SettingsField::new(
        "auto_subscribe",
        "Auto Subscribe",
        "Subscribe every buyer without showing the checkout checkbox",
        SettingsKind::Checkbox {
            checked: config.auto_subscribe(),
        },
    ));

    fields
}

/// Build the per-product campaign picker.
///
/// Selecting campaigns here overrides the site default for buyers of this
/// product.
pub fn product_campaign_field(
    product_id: &str,
    config: &dyn SignupConfig,
    campaigns: &HashMap<String, String>,
) -> SettingsField {
    let selected = config.product_campaigns(product_id);

    SettingsField::new(
        "product_campaigns",
        "Product-Specific Campaigns",
        "Select the campaigns you wish buyers to be subscribed to when purchasing. Overrides the global setting.",
        SettingsKind::MultiSelect {
            options: campaign_options(campaigns, &selected),
        },
    )
}
