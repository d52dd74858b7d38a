use crate::coerce::coerce_int;
use crate::error::Result;
use crate::node::RawNode;
use log::warn;

/// One way of resolving a canonical field from a dialect root.
#[derive(Debug, Clone, Copy)]
pub enum Candidate {
    /// Text at a single path.
    Path(&'static str),
    /// Texts at several paths, joined with a space and trimmed.
    Joined(&'static [&'static str]),
}

/// Ordered candidate paths for one canonical field. The first candidate that
/// resolves to non-empty text wins; otherwise `default` applies.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub field: &'static str,
    pub candidates: &'static [Candidate],
    pub default: &'static str,
}

pub const APPLICANT_NAME: FieldSpec = FieldSpec {
    field: "name",
    candidates: &[
        Candidate::Joined(&[
            "Current_Application.Current_Application_Details.Current_Applicant_Details.First_Name",
            "Current_Application.Current_Application_Details.Current_Applicant_Details.Last_Name",
        ]),
        Candidate::Path("UserInfo.Name"),
        Candidate::Path("Header.Inquiry.Name"),
        Candidate::Path("UserInfo.PersonName"),
        Candidate::Path("Header.Inquiry.PersonName"),
    ],
    default: "Unknown",
};

pub const MOBILE_PHONE: FieldSpec = FieldSpec {
    field: "mobilePhone",
    candidates: &[
        Candidate::Path(
            "Current_Application.Current_Application_Details.Current_Applicant_Details.MobilePhoneNumber",
        ),
        Candidate::Path("UserInfo.MobilePhone"),
        Candidate::Path("Header.Inquiry.MobilePhone"),
        Candidate::Path("UserInfo.MobileTelephoneNumber"),
        Candidate::Path("Header.Inquiry.MobileTelephoneNumber"),
    ],
    default: "N/A",
};

pub const PAN: FieldSpec = FieldSpec {
    field: "pan",
    candidates: &[
        Candidate::Path("CAIS_Account.CAIS_Account_DETAILS.0.CAIS_Holder_Details.Income_TAX_PAN"),
        Candidate::Path(
            "Current_Application.Current_Application_Details.Current_Applicant_Details.IncomeTaxPan",
        ),
        Candidate::Path("UserInfo.PAN"),
        Candidate::Path("Header.Inquiry.PAN"),
        Candidate::Path("UserInfo.InquiryPAN"),
        Candidate::Path("Header.Inquiry.InquiryPAN"),
    ],
    default: "N/A",
};

pub const BUREAU_SCORE: FieldSpec = FieldSpec {
    field: "creditScore",
    candidates: &[
        Candidate::Path("SCORE.BureauScore"),
        Candidate::Path("ScoreSegment.BureauScore"),
        Candidate::Path("Score.Score"),
        Candidate::Path("Score.BureauScore"),
    ],
    default: "0",
};

pub const MAX_BUREAU_SCORE: u64 = 900;

impl FieldSpec {
    /// Resolves the first candidate with non-empty text.
    pub fn resolve(&self, root: &RawNode) -> Result<Option<String>> {
        for candidate in self.candidates {
            let resolved = match candidate {
                Candidate::Path(path) => root.text_at(path, self.field)?.map(str::to_string),
                Candidate::Joined(paths) => {
                    let mut parts = Vec::with_capacity(paths.len());
                    for path in paths.iter() {
                        if let Some(text) = root.text_at(path, self.field)? {
                            parts.push(text);
                        }
                    }
                    let joined = parts.join(" ");
                    let joined = joined.trim();
                    (!joined.is_empty()).then(|| joined.to_string())
                }
            };

            if resolved.is_some() {
                return Ok(resolved);
            }
        }

        Ok(None)
    }

    pub fn resolve_or_default(&self, root: &RawNode) -> Result<String> {
        Ok(self
            .resolve(root)?
            .unwrap_or_else(|| self.default.to_string()))
    }
}

/// Applicant-level scalar fields of a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicantFields {
    pub name: String,
    pub mobile_phone: String,
    pub pan: String,
    pub credit_score: u64,
}

impl ApplicantFields {
    pub fn extract(root: &RawNode) -> Result<Self> {
        let raw_score = BUREAU_SCORE.resolve(root)?;
        let credit_score = coerce_int(raw_score.as_deref(), 0);
        if credit_score > MAX_BUREAU_SCORE {
            warn!(
                "Bureau score {} is outside the expected 0-{} range",
                credit_score, MAX_BUREAU_SCORE
            );
        }

        Ok(Self {
            name: APPLICANT_NAME.resolve_or_default(root)?,
            mobile_phone: MOBILE_PHONE.resolve_or_default(root)?,
            pan: PAN.resolve_or_default(root)?,
            credit_score,
        })
    }
}
