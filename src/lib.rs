//! # Credit Report Normalizer
//!
//! A library for turning credit-bureau XML documents, which arrive in more than one
//! schema dialect, into a single canonical, strongly-typed credit report record.
//!
//! ## Core Concepts
//!
//! - **Raw Tree**: The document is parsed once into a [`RawNode`] tree (Scalar | Node | List)
//! - **Dialect**: The root key decides which layout the bureau used (in-profile or generic report)
//! - **Candidate Paths**: Each canonical field is resolved from an ordered list of paths, first match wins
//! - **Total Extraction**: Missing data never fails; every field carries a typed default
//! - **Summary Strategy**: Totals come from the bureau's declared summary when present, otherwise
//!   they are derived from the extracted accounts and enquiries
//!
//! ## Example
//!
//! ```rust,ignore
//! use credit_report_normalizer::*;
//!
//! let xml = std::fs::read("report.xml")?;
//! let report = normalize(&xml)?;
//!
//! println!("{} scored {}", report.name, report.credit_score);
//! for account in &report.credit_accounts {
//!     println!("{}: {}", account.bank, account.current_balance);
//! }
//! ```

pub mod accounts;
pub mod address;
pub mod coerce;
pub mod dialect;
pub mod error;
pub mod fields;
pub mod node;
pub mod options;
pub mod parser;
pub mod schema;
pub mod stats;
pub mod summary;

pub use accounts::{account_entries, extract_accounts, map_account};
pub use address::{format_address, resolve_addresses};
pub use coerce::{coerce_int, parse_leading_int};
pub use dialect::{detect_dialect, DetectedRoot, Dialect};
pub use error::{CreditReportError, Result};
pub use fields::ApplicantFields;
pub use node::RawNode;
pub use options::NormalizerOptions;
pub use parser::parse_document;
pub use schema::*;
pub use stats::ReportStatistics;
pub use summary::{SummaryAggregator, SummaryStrategy};

use chrono::{DateTime, Utc};
use log::{debug, info};
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct CreditReportNormalizer {
    options: NormalizerOptions,
}

impl CreditReportNormalizer {
    pub fn new(options: NormalizerOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &NormalizerOptions {
        &self.options
    }

    /// Normalizes raw document bytes, using the current time for the enquiry window.
    pub fn normalize(&self, bytes: &[u8]) -> Result<CanonicalCreditReport> {
        self.normalize_at(bytes, Utc::now())
    }

    /// Normalizes raw document bytes against an explicit computation instant.
    pub fn normalize_at(&self, bytes: &[u8], now: DateTime<Utc>) -> Result<CanonicalCreditReport> {
        let document = parse_document(bytes)?;
        self.normalize_document(&document, now)
    }

    /// Assembles the canonical record from an already parsed tree. Either the
    /// whole record is produced or an error is returned.
    pub fn normalize_document(
        &self,
        document: &RawNode,
        now: DateTime<Utc>,
    ) -> Result<CanonicalCreditReport> {
        let detected = detect_dialect(document);
        detected.ensure_usable()?;
        info!("Normalizing credit report in {} dialect", detected.dialect);

        let root = detected.root;
        let applicant = ApplicantFields::extract(root)?;

        let entries = account_entries(root)?;
        let credit_accounts = extract_accounts(&entries)?;

        let report_summary =
            SummaryAggregator::new(&self.options, now).aggregate(root, &credit_accounts)?;

        let addresses = resolve_addresses(root, &entries, &self.options.address_sentinel);

        debug!(
            "Report assembled with {} accounts and {} addresses",
            credit_accounts.len(),
            addresses.len()
        );

        Ok(CanonicalCreditReport {
            name: applicant.name,
            mobile_phone: applicant.mobile_phone,
            pan: applicant.pan,
            credit_score: applicant.credit_score,
            report_summary,
            credit_accounts,
            addresses,
        })
    }

    pub fn normalize_file(&self, path: impl AsRef<Path>) -> Result<CanonicalCreditReport> {
        let bytes = std::fs::read(path)?;
        self.normalize(&bytes)
    }
}

pub fn normalize(bytes: &[u8]) -> Result<CanonicalCreditReport> {
    CreditReportNormalizer::default().normalize(bytes)
}

pub fn normalize_at(bytes: &[u8], now: DateTime<Utc>) -> Result<CanonicalCreditReport> {
    CreditReportNormalizer::default().normalize_at(bytes, now)
}

pub fn normalize_with_options(
    bytes: &[u8],
    options: NormalizerOptions,
) -> Result<CanonicalCreditReport> {
    CreditReportNormalizer::new(options)?.normalize(bytes)
}
