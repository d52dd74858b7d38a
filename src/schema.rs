use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalAccount {
    #[schemars(
        description = "Account type as reported by the bureau: either a numeric product code (e.g. '10' for credit card) or a label such as 'Home Loan'. 'Unknown' when absent."
    )]
    pub account_type: String,

    #[schemars(description = "Lending institution name, trimmed. 'Unknown' when absent.")]
    pub bank: String,

    #[schemars(description = "Account number as printed by the bureau. 'N/A' when absent.")]
    pub account_number: String,

    #[schemars(description = "Outstanding balance, truncated to a whole non-negative amount. 0 when absent.")]
    pub current_balance: u64,

    #[schemars(description = "Amount past due, truncated to a whole non-negative amount. 0 when absent.")]
    pub amount_overdue: u64,

    #[schemars(
        description = "Account status as reported: a numeric bureau code ('11' active, '13' closed) or a label. 'Unknown' when absent."
    )]
    pub status: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_accounts: u64,
    pub active_accounts: u64,
    pub closed_accounts: u64,
    pub current_balance_amount: u64,
    pub secured_accounts_amount: u64,
    pub unsecured_accounts_amount: u64,

    #[schemars(description = "Number of credit enquiries in the seven days before the report was normalized.")]
    pub last7_days_enquiries: u64,
}

impl ReportSummary {
    /// Whether the secured/unsecured split adds up to the current balance.
    /// Bureau-declared summaries are reported as-is, so this may be false.
    pub fn balance_split_holds(&self) -> bool {
        self.secured_accounts_amount
            .checked_add(self.unsecured_accounts_amount)
            .is_some_and(|sum| sum == self.current_balance_amount)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalCreditReport {
    #[schemars(description = "Applicant's full name. 'Unknown' when the report carries none.")]
    pub name: String,

    #[schemars(description = "Applicant's mobile phone number. 'N/A' when absent.")]
    pub mobile_phone: String,

    #[schemars(description = "Permanent Account Number (tax identity). 'N/A' when absent.")]
    pub pan: String,

    #[schemars(description = "Bureau score, expected in 0-900. 0 when the report carries no score.")]
    pub credit_score: u64,

    pub report_summary: ReportSummary,

    #[schemars(description = "Accounts in the order the bureau listed them.")]
    pub credit_accounts: Vec<CanonicalAccount>,

    #[schemars(
        description = "Distinct formatted addresses in discovery order. Exactly ['Address not available'] when none are present."
    )]
    pub addresses: Vec<String>,
}

impl CanonicalCreditReport {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(CanonicalCreditReport)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> CanonicalCreditReport {
        CanonicalCreditReport {
            name: "Test Person".to_string(),
            mobile_phone: "9000000000".to_string(),
            pan: "ABCDE1234F".to_string(),
            credit_score: 712,
            report_summary: ReportSummary {
                total_accounts: 1,
                active_accounts: 1,
                closed_accounts: 0,
                current_balance_amount: 2500,
                secured_accounts_amount: 0,
                unsecured_accounts_amount: 2500,
                last7_days_enquiries: 0,
            },
            credit_accounts: vec![CanonicalAccount {
                account_type: "Credit Card".to_string(),
                bank: "Axis Bank".to_string(),
                account_number: "XXXX1111".to_string(),
                current_balance: 2500,
                amount_overdue: 0,
                status: "Active".to_string(),
            }],
            addresses: vec!["Address not available".to_string()],
        }
    }

    #[test]
    fn test_schema_generation() {
        let schema_json = CanonicalCreditReport::schema_as_json().unwrap();
        assert!(schema_json.contains("creditScore"));
        assert!(schema_json.contains("reportSummary"));
        assert!(schema_json.contains("creditAccounts"));
    }

    #[test]
    fn test_serialization_uses_camel_case() {
        let json = sample_report().to_json().unwrap();
        assert!(json.contains("\"mobilePhone\""));
        assert!(json.contains("\"last7DaysEnquiries\""));
        assert!(json.contains("\"amountOverdue\""));

        let deserialized: CanonicalCreditReport = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, sample_report());
    }

    #[test]
    fn test_balance_split_check() {
        let mut summary = sample_report().report_summary;
        assert!(summary.balance_split_holds());

        summary.secured_accounts_amount = 100;
        assert!(!summary.balance_split_holds());
    }
}
