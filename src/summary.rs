use crate::coerce::int_at;
use crate::error::{CreditReportError, Result};
use crate::node::RawNode;
use crate::options::NormalizerOptions;
use crate::schema::{CanonicalAccount, ReportSummary};
use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, Utc};
use log::{debug, warn};

/// Declared summary subtree. Its presence selects the declared strategy.
pub const DECLARED_SUMMARY_PATH: &str = "CAIS_Account.CAIS_Summary";
pub const DECLARED_ENQUIRY_COUNTER_PATH: &str = "TotalCAPS_Summary.TotalCAPSLast7Days";

pub const ENQUIRY_COLLECTION_PATHS: &[&str] = &["Enquiries.Enquiry", "CAPS.CAPS_Application_Details"];
pub const ENQUIRY_DATE_FIELDS: &[&str] = &["EnquiryDate", "Date_of_Request"];

pub const ACTIVE_STATUS_CODE: &str = "11";
pub const CLOSED_STATUS_CODE: &str = "13";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryStrategy {
    /// Totals read verbatim from the bureau's own summary block.
    Declared,
    /// Totals computed from the extracted accounts and enquiry records.
    Derived,
}

impl SummaryStrategy {
    /// The declared summary is authoritative whenever its subtree exists.
    pub fn select(root: &RawNode) -> Self {
        match root.get(DECLARED_SUMMARY_PATH) {
            Some(summary) if !summary.is_blank() => SummaryStrategy::Declared,
            _ => SummaryStrategy::Derived,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Active,
    Closed,
    Other,
}

/// Case-insensitive substring match on "active"/"closed", or the bureau's
/// numeric codes. Labels such as "Inactive" therefore count as active.
pub fn classify_status(status: &str) -> StatusClass {
    let status = status.trim();
    let lowered = status.to_lowercase();
    if lowered.contains("active") || status == ACTIVE_STATUS_CODE {
        StatusClass::Active
    } else if lowered.contains("closed") || status == CLOSED_STATUS_CODE {
        StatusClass::Closed
    } else {
        StatusClass::Other
    }
}

pub fn is_secured(account_type: &str, keywords: &[String]) -> bool {
    let lowered = account_type.to_lowercase();
    keywords.iter().any(|keyword| lowered.contains(keyword.as_str()))
}

/// Parses the enquiry date forms bureaus emit. Timestamps keep their date part.
pub fn parse_enquiry_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if raw.len() == 8 && raw.bytes().all(|b| b.is_ascii_digit()) {
        let year = raw[..4].parse().ok()?;
        let month = raw[4..6].parse().ok()?;
        let day = raw[6..].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    for format in ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.date_naive());
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|dt| dt.date())
}

pub struct SummaryAggregator<'a> {
    options: &'a NormalizerOptions,
    now: DateTime<Utc>,
}

impl<'a> SummaryAggregator<'a> {
    pub fn new(options: &'a NormalizerOptions, now: DateTime<Utc>) -> Self {
        Self { options, now }
    }

    pub fn aggregate(&self, root: &RawNode, accounts: &[CanonicalAccount]) -> Result<ReportSummary> {
        let strategy = SummaryStrategy::select(root);
        debug!("Computing report summary with {:?} strategy", strategy);

        match strategy {
            SummaryStrategy::Declared => self.declared(root),
            SummaryStrategy::Derived => self.derived(root, accounts),
        }
    }

    fn declared(&self, root: &RawNode) -> Result<ReportSummary> {
        let empty = RawNode::scalar("");
        let summary = root.get_or(DECLARED_SUMMARY_PATH, &empty);

        let declared = ReportSummary {
            total_accounts: int_at(summary, "Credit_Account.CreditAccountTotal", "totalAccounts", 0)?,
            active_accounts: int_at(summary, "Credit_Account.CreditAccountActive", "activeAccounts", 0)?,
            closed_accounts: int_at(summary, "Credit_Account.CreditAccountClosed", "closedAccounts", 0)?,
            current_balance_amount: int_at(
                summary,
                "Total_Outstanding_Balance.Outstanding_Balance_All",
                "currentBalanceAmount",
                0,
            )?,
            secured_accounts_amount: int_at(
                summary,
                "Total_Outstanding_Balance.Outstanding_Balance_Secured",
                "securedAccountsAmount",
                0,
            )?,
            unsecured_accounts_amount: int_at(
                summary,
                "Total_Outstanding_Balance.Outstanding_Balance_UnSecured",
                "unsecuredAccountsAmount",
                0,
            )?,
            last7_days_enquiries: int_at(root, DECLARED_ENQUIRY_COUNTER_PATH, "last7DaysEnquiries", 0)?,
        };

        if !declared.balance_split_holds() {
            warn!(
                "Declared secured ({}) + unsecured ({}) does not equal current balance ({})",
                declared.secured_accounts_amount,
                declared.unsecured_accounts_amount,
                declared.current_balance_amount
            );
        }

        Ok(declared)
    }

    fn derived(&self, root: &RawNode, accounts: &[CanonicalAccount]) -> Result<ReportSummary> {
        let keywords = self.options.normalized_keywords();

        let mut active_accounts = 0u64;
        let mut closed_accounts = 0u64;
        let mut current_balance_amount = 0u64;
        let mut secured_accounts_amount = 0u64;

        for account in accounts {
            match classify_status(&account.status) {
                StatusClass::Active => active_accounts += 1,
                StatusClass::Closed => closed_accounts += 1,
                StatusClass::Other => {}
            }

            current_balance_amount = current_balance_amount.saturating_add(account.current_balance);
            if is_secured(&account.account_type, &keywords) {
                secured_accounts_amount = secured_accounts_amount.saturating_add(account.current_balance);
            }
        }

        let unsecured_accounts_amount = current_balance_amount
            .checked_sub(secured_accounts_amount)
            .ok_or_else(|| {
                CreditReportError::anomaly(
                    "unsecuredAccountsAmount",
                    format!(
                        "secured amount {} exceeds current balance {}",
                        secured_accounts_amount, current_balance_amount
                    ),
                )
            })?;

        Ok(ReportSummary {
            total_accounts: accounts.len() as u64,
            active_accounts,
            closed_accounts,
            current_balance_amount,
            secured_accounts_amount,
            unsecured_accounts_amount,
            last7_days_enquiries: self.count_recent_enquiries(root),
        })
    }

    /// Enquiries dated within the window ending today. The lower bound is
    /// inclusive; records with missing or unparseable dates are skipped.
    pub fn count_recent_enquiries(&self, root: &RawNode) -> u64 {
        let today = self.now.date_naive();
        let window_start = today
            .checked_sub_days(Days::new(u64::from(self.options.enquiry_window_days)))
            .unwrap_or(NaiveDate::MIN);

        let Some(collection) = ENQUIRY_COLLECTION_PATHS
            .iter()
            .find_map(|path| root.get(path))
        else {
            return 0;
        };

        collection
            .as_list()
            .into_iter()
            .filter_map(|enquiry| {
                ENQUIRY_DATE_FIELDS
                    .iter()
                    .filter_map(|field| enquiry.get(field).and_then(RawNode::text))
                    .find(|text| !text.trim().is_empty())
                    .and_then(parse_enquiry_date)
            })
            .filter(|date| *date >= window_start && *date <= today)
            .count() as u64
    }
}
