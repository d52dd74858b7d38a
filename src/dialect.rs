use crate::error::{CreditReportError, Result};
use crate::node::RawNode;
use std::fmt;

pub const IN_PROFILE_ROOT: &str = "INProfileResponse";
pub const GENERIC_REPORT_ROOT: &str = "CreditReport";

/// Top-level sections either dialect is known to carry. A document whose root
/// is not a known dialect key is still usable if it holds one of these.
pub const KNOWN_SECTIONS: &[&str] = &[
    "Current_Application",
    "CAIS_Account",
    "CAIS",
    "SCORE",
    "ScoreSegment",
    "UserInfo",
    "TotalCAPS_Summary",
    "CAPS",
    "Header",
    "Accounts",
    "Score",
    "Addresses",
    "Enquiries",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Applicant, account and score subtrees nested under an in-profile response.
    InProfile,
    /// Flatter Header/Accounts/Score layout under a generic report root.
    GenericReport,
    /// Neither root key was present; the document's own root is used.
    Fallback,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Dialect::InProfile => "in-profile",
            Dialect::GenericReport => "generic-report",
            Dialect::Fallback => "fallback",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DetectedRoot<'a> {
    pub dialect: Dialect,
    pub root: &'a RawNode,
}

/// Identifies the dialect from the document's top-level keys. Never fails:
/// unknown shapes fall back to the content of the document's root element.
pub fn detect_dialect(document: &RawNode) -> DetectedRoot<'_> {
    if let Some(root) = document.child(IN_PROFILE_ROOT) {
        return DetectedRoot {
            dialect: Dialect::InProfile,
            root,
        };
    }

    if let Some(root) = document.child(GENERIC_REPORT_ROOT) {
        return DetectedRoot {
            dialect: Dialect::GenericReport,
            root,
        };
    }

    let root = match document {
        RawNode::Node(map) if map.len() == 1 => map.values().next().unwrap_or(document),
        _ => document,
    };

    DetectedRoot {
        dialect: Dialect::Fallback,
        root,
    }
}

impl DetectedRoot<'_> {
    /// A recognized dialect root is always usable. A fallback root must be a
    /// record holding at least one known section.
    pub fn ensure_usable(&self) -> Result<()> {
        if self.dialect != Dialect::Fallback {
            return Ok(());
        }

        let has_known_section = KNOWN_SECTIONS
            .iter()
            .any(|section| self.root.child(section).is_some());

        if has_known_section {
            Ok(())
        } else {
            Err(CreditReportError::UnusableRoot(format!(
                "expected a <{}> or <{}> root, or a root holding a known report section",
                IN_PROFILE_ROOT, GENERIC_REPORT_ROOT
            )))
        }
    }
}
