use crate::error::{CreditReportError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ENQUIRY_WINDOW_DAYS: u32 = 7;
pub const DEFAULT_ADDRESS_SENTINEL: &str = "Address not available";
pub const DEFAULT_SECURED_KEYWORDS: [&str; 6] =
    ["home", "auto", "vehicle", "gold", "property", "secured"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct NormalizerOptions {
    #[serde(default = "default_enquiry_window_days")]
    #[schemars(
        description = "Width in days of the enquiry window used when a report has no declared summary. An enquiry dated exactly this many days ago still counts."
    )]
    pub enquiry_window_days: u32,

    #[serde(default = "default_secured_keywords")]
    #[schemars(
        description = "Case-insensitive substrings of an account type that mark the account as secured when deriving balance splits."
    )]
    pub secured_keywords: Vec<String>,

    #[serde(default = "default_address_sentinel")]
    #[schemars(description = "The single address reported when a document carries no address data.")]
    pub address_sentinel: String,
}

fn default_enquiry_window_days() -> u32 {
    DEFAULT_ENQUIRY_WINDOW_DAYS
}

fn default_secured_keywords() -> Vec<String> {
    DEFAULT_SECURED_KEYWORDS
        .iter()
        .map(|k| k.to_string())
        .collect()
}

fn default_address_sentinel() -> String {
    DEFAULT_ADDRESS_SENTINEL.to_string()
}

impl Default for NormalizerOptions {
    fn default() -> Self {
        Self {
            enquiry_window_days: default_enquiry_window_days(),
            secured_keywords: default_secured_keywords(),
            address_sentinel: default_address_sentinel(),
        }
    }
}

impl NormalizerOptions {
    /// Loads options from JSON. Missing keys take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if self.enquiry_window_days == 0 {
            return Err(CreditReportError::InvalidOptions(
                "enquiry_window_days must be at least 1".to_string(),
            ));
        }

        if self.secured_keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(CreditReportError::InvalidOptions(
                "secured_keywords must contain at least one non-blank keyword".to_string(),
            ));
        }

        if self.address_sentinel.trim().is_empty() {
            return Err(CreditReportError::InvalidOptions(
                "address_sentinel must not be blank".to_string(),
            ));
        }

        Ok(())
    }

    /// Lower-cased, non-blank secured keywords.
    pub(crate) fn normalized_keywords(&self) -> Vec<String> {
        self.secured_keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let options = NormalizerOptions::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.enquiry_window_days, 7);
        assert_eq!(options.secured_keywords.len(), 6);
        assert_eq!(options.address_sentinel, "Address not available");
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let options = NormalizerOptions::from_json_str(r#"{"enquiry_window_days": 30}"#).unwrap();
        assert_eq!(options.enquiry_window_days, 30);
        assert_eq!(options.secured_keywords, NormalizerOptions::default().secured_keywords);
    }

    #[test]
    fn test_invalid_options_rejected() {
        let err = NormalizerOptions::from_json_str(r#"{"enquiry_window_days": 0}"#).unwrap_err();
        assert!(matches!(err, CreditReportError::InvalidOptions(_)));

        let err = NormalizerOptions::from_json_str(r#"{"secured_keywords": ["  "]}"#).unwrap_err();
        assert!(matches!(err, CreditReportError::InvalidOptions(_)));

        let err = NormalizerOptions::from_json_str("not json").unwrap_err();
        assert!(matches!(err, CreditReportError::SerializationError(_)));
    }

    #[test]
    fn test_keywords_are_lowercased() {
        let options = NormalizerOptions {
            secured_keywords: vec!["Gold ".to_string(), "".to_string()],
            ..Default::default()
        };
        assert_eq!(options.normalized_keywords(), vec!["gold".to_string()]);
    }
}
