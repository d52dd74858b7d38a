use crate::node::RawNode;
use std::collections::HashSet;

pub const HOLDER_ADDRESS_KEY: &str = "CAIS_Holder_Address_Details";

pub const HOLDER_ADDRESS_PARTS: &[&str] = &[
    "First_Line_Of_Address_non_normalized",
    "Second_Line_Of_Address_non_normalized",
    "Third_Line_Of_Address_non_normalized",
    "City_non_normalized",
    "State_non_normalized",
    "ZIP_Postal_Code_non_normalized",
];

pub const APPLICANT_ADDRESS_PATH: &str =
    "Current_Application.Current_Application_Details.Current_Applicant_Address_Details";

pub const APPLICANT_ADDRESS_PARTS: &[&str] = &[
    "FlatNoPlotNoHouseNo",
    "BldgNoSocietyName",
    "RoadNoNameAreaLocality",
    "City",
    "State",
    "PINCode",
];

/// Report-level address collections, in priority order.
pub const REPORT_ADDRESS_PATHS: &[&str] = &["Addresses.Address", "UserInfo.Addresses.Address"];

pub const REPORT_ADDRESS_PARTS: &[&str] = &["AddressLine1", "AddressLine2", "City", "State", "PinCode"];

/// Joins the non-blank parts of an address record with ", " in the given
/// order. A plain-text address is taken as-is.
pub fn format_address(address: &RawNode, parts: &[&str]) -> Option<String> {
    let joined = match address {
        RawNode::Node(_) => parts
            .iter()
            .filter_map(|part| address.get(part).and_then(RawNode::text))
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        other => other.text().map(str::trim).unwrap_or_default().to_string(),
    };

    (!joined.is_empty()).then_some(joined)
}

/// Insertion-ordered set of formatted addresses.
#[derive(Debug, Default)]
pub struct AddressSet {
    seen: HashSet<String>,
    ordered: Vec<String>,
}

impl AddressSet {
    pub fn insert(&mut self, address: String) -> bool {
        if self.seen.contains(&address) {
            return false;
        }
        self.seen.insert(address.clone());
        self.ordered.push(address);
        true
    }

    pub fn extend_from(&mut self, collection: &RawNode, parts: &[&str]) {
        for address in collection.as_list() {
            if let Some(formatted) = format_address(address, parts) {
                self.insert(formatted);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.ordered
    }
}

/// Collects account holder addresses first. Only when none exist does it fall
/// back to the applicant's address, then to the first report-level collection
/// that yields anything. An empty result becomes exactly `[sentinel]`.
pub fn resolve_addresses(root: &RawNode, account_entries: &[&RawNode], sentinel: &str) -> Vec<String> {
    let mut addresses = AddressSet::default();

    for entry in account_entries {
        if let Some(holder) = entry.child(HOLDER_ADDRESS_KEY) {
            addresses.extend_from(holder, HOLDER_ADDRESS_PARTS);
        }
    }

    if addresses.is_empty() {
        if let Some(applicant) = root.get(APPLICANT_ADDRESS_PATH) {
            addresses.extend_from(applicant, APPLICANT_ADDRESS_PARTS);
        }
    }

    for path in REPORT_ADDRESS_PATHS {
        if !addresses.is_empty() {
            break;
        }
        if let Some(report_addresses) = root.get(path) {
            addresses.extend_from(report_addresses, REPORT_ADDRESS_PARTS);
        }
    }

    if addresses.is_empty() {
        return vec![sentinel.to_string()];
    }

    addresses.into_vec()
}
