use crate::schema::CanonicalCreditReport;
use serde::{Deserialize, Serialize};

/// Overview figures across a set of normalized reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportStatistics {
    pub total_reports: usize,
    pub average_credit_score: f64,
}

impl ReportStatistics {
    pub fn from_reports(reports: &[CanonicalCreditReport]) -> Self {
        if reports.is_empty() {
            return Self::default();
        }

        let total: f64 = reports.iter().map(|r| r.credit_score as f64).sum();
        Self {
            total_reports: reports.len(),
            average_credit_score: total / reports.len() as f64,
        }
    }
}
