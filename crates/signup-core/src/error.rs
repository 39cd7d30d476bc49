//! Error Types

use thiserror::Error;

/// Result type alias for signup operations
pub type Result<T> = std::result::Result<T, SignupError>;

/// Signup-related errors
#[derive(Error, Debug)]
pub enum SignupError {
    /// No API key configured; the integration is effectively switched off
    #[error("No API key configured")]
    MissingApiKey,

    /// Nothing to subscribe to (no product override, no default campaign)
    #[error("No target campaign configured")]
    NoTargetCampaign,

    /// Transport failure reaching the provider
    #[error("Provider unreachable: {0}")]
    ProviderUnreachable(String),

    /// Well-formed error response from the provider
    #[error("Provider error: {0}")]
    Provider(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

impl SignupError {
    /// True for conditions that mean "feature off", not a fault.
    ///
    /// These never warrant an admin notice; the admin simply has not
    /// finished configuring the integration.
    pub fn is_disabled(&self) -> bool {
        matches!(
            self,
            SignupError::MissingApiKey | SignupError::NoTargetCampaign
        )
    }

    /// The raw provider message, when there is one
    pub fn provider_message(&self) -> Option<&str> {
        match self {
            SignupError::Provider(msg) => Some(msg),
            _ => None,
        }
    }

    /// Convert to an admin-facing message
    pub fn user_message(&self) -> String {
        match self {
            SignupError::MissingApiKey => "Enter your API key to enable signup.".into(),
            SignupError::NoTargetCampaign => "Select a campaign to subscribe buyers to.".into(),
            SignupError::ProviderUnreachable(_) => {
                "The mailing-list service could not be reached. Please try again.".into()
            }
            SignupError::Provider(msg) => {
                format!("The mailing-list service returned an error: {}", msg)
            }
            SignupError::Config(msg) => format!("Configuration error: {}", msg),
            _ => "An unexpected error occurred.".into(),
        }
    }
}

impl From<anyhow::Error> for SignupError {
    fn from(err: anyhow::Error) -> Self {
        SignupError::Other(err.to_string())
    }
}
