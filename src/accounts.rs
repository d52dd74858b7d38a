use crate::coerce::coerce_int;
use crate::error::{CreditReportError, Result};
use crate::fields::{Candidate, FieldSpec};
use crate::node::RawNode;
use crate::schema::CanonicalAccount;
use log::debug;

/// Where each dialect keeps its account collection, in lookup order.
pub const ACCOUNT_COLLECTION_PATHS: &[&str] = &[
    "CAIS_Account.CAIS_Account_DETAILS",
    "CAIS.CAIS_Account.CAIS_Account_DETAILS",
    "Accounts.Account",
];

const ACCOUNT_TYPE: FieldSpec = FieldSpec {
    field: "accountType",
    candidates: &[Candidate::Path("Account_Type"), Candidate::Path("AccountType")],
    default: "Unknown",
};

const BANK: FieldSpec = FieldSpec {
    field: "bank",
    candidates: &[
        Candidate::Path("Subscriber_Name"),
        Candidate::Path("InstitutionName"),
    ],
    default: "Unknown",
};

const ACCOUNT_NUMBER: FieldSpec = FieldSpec {
    field: "accountNumber",
    candidates: &[
        Candidate::Path("Account_Number"),
        Candidate::Path("AccountNumber"),
    ],
    default: "N/A",
};

const CURRENT_BALANCE: FieldSpec = FieldSpec {
    field: "currentBalance",
    candidates: &[
        Candidate::Path("Current_Balance"),
        Candidate::Path("CurrentBalance"),
    ],
    default: "0",
};

const AMOUNT_OVERDUE: FieldSpec = FieldSpec {
    field: "amountOverdue",
    candidates: &[
        Candidate::Path("Amount_Past_Due"),
        Candidate::Path("Amount_Overdue"),
        Candidate::Path("AmountOverdue"),
    ],
    default: "0",
};

const STATUS: FieldSpec = FieldSpec {
    field: "status",
    candidates: &[
        Candidate::Path("Account_Status"),
        Candidate::Path("AccountStatus"),
    ],
    default: "Unknown",
};

/// Account records of the first collection path present, always list-shaped.
/// Blank entries are dropped; a non-blank text entry is an anomaly.
pub fn account_entries(root: &RawNode) -> Result<Vec<&RawNode>> {
    let Some(collection) = ACCOUNT_COLLECTION_PATHS
        .iter()
        .find_map(|path| root.get(path))
    else {
        return Ok(Vec::new());
    };

    let mut entries = Vec::new();
    for (idx, entry) in collection.as_list().into_iter().enumerate() {
        if entry.is_blank() {
            continue;
        }
        if !entry.is_node() {
            return Err(CreditReportError::anomaly(
                "creditAccounts",
                format!("Account entry #{} is not a record", idx),
            ));
        }
        entries.push(entry);
    }

    Ok(entries)
}

pub fn map_account(entry: &RawNode) -> Result<CanonicalAccount> {
    let current_balance = coerce_int(CURRENT_BALANCE.resolve(entry)?.as_deref(), 0);
    let amount_overdue = coerce_int(AMOUNT_OVERDUE.resolve(entry)?.as_deref(), 0);

    Ok(CanonicalAccount {
        account_type: ACCOUNT_TYPE.resolve_or_default(entry)?,
        bank: BANK.resolve_or_default(entry)?.trim().to_string(),
        account_number: ACCOUNT_NUMBER.resolve_or_default(entry)?,
        current_balance,
        amount_overdue,
        status: STATUS.resolve_or_default(entry)?,
    })
}

pub fn extract_accounts(entries: &[&RawNode]) -> Result<Vec<CanonicalAccount>> {
    let accounts = entries
        .iter()
        .map(|entry| map_account(entry))
        .collect::<Result<Vec<_>>>()?;

    debug!("Extracted {} credit accounts", accounts.len());
    Ok(accounts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::detect_dialect;
    use crate::parser::parse_document;

    fn accounts_from(xml: &str) -> Result<Vec<CanonicalAccount>> {
        let doc = parse_document(xml.as_bytes())?;
        let root = detect_dialect(&doc).root;
        let entries = account_entries(root)?;
        extract_accounts(&entries)
    }

    #[test]
    fn test_single_account_is_wrapped() {
        let accounts = accounts_from(
            "<INProfileResponse><CAIS_Account><CAIS_Account_DETAILS>\
             <Account_Type>10</Account_Type><Subscriber_Name>  ICICI Bank </Subscriber_Name>\
             <Account_Number>1234567890</Account_Number><Current_Balance>50000</Current_Balance>\
             <Amount_Past_Due>5000</Amount_Past_Due><Account_Status>Active</Account_Status>\
             </CAIS_Account_DETAILS></CAIS_Account></INProfileResponse>",
        )
        .unwrap();

        assert_eq!(
            accounts,
            vec![CanonicalAccount {
                account_type: "10".to_string(),
                bank: "ICICI Bank".to_string(),
                account_number: "1234567890".to_string(),
                current_balance: 50000,
                amount_overdue: 5000,
                status: "Active".to_string(),
            }]
        );
    }

    #[test]
    fn test_multiple_accounts_keep_order() {
        let accounts = accounts_from(
            "<CreditReport><Accounts>\
             <Account><AccountType>Home Loan</AccountType><InstitutionName>SBI</InstitutionName><CurrentBalance>60000</CurrentBalance></Account>\
             <Account><AccountType>Credit Card</AccountType><InstitutionName>HDFC</InstitutionName><AmountOverdue>250</AmountOverdue></Account>\
             </Accounts></CreditReport>",
        )
        .unwrap();

        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].bank, "SBI");
        assert_eq!(accounts[0].current_balance, 60000);
        assert_eq!(accounts[1].account_type, "Credit Card");
        assert_eq!(accounts[1].amount_overdue, 250);
        assert_eq!(accounts[1].current_balance, 0);
    }

    #[test]
    fn test_missing_fields_default() {
        let accounts = accounts_from(
            "<CreditReport><Accounts><Account><Notes>none</Notes></Account></Accounts></CreditReport>",
        )
        .unwrap();

        let account = &accounts[0];
        assert_eq!(account.account_type, "Unknown");
        assert_eq!(account.bank, "Unknown");
        assert_eq!(account.account_number, "N/A");
        assert_eq!(account.status, "Unknown");
        assert_eq!(account.current_balance, 0);
    }

    #[test]
    fn test_blank_entries_filtered() {
        let accounts = accounts_from(
            "<CreditReport><Accounts><Account/><Account><AccountNumber>77</AccountNumber></Account><Account> </Account></Accounts></CreditReport>",
        )
        .unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].account_number, "77");
    }

    #[test]
    fn test_no_collection_yields_no_accounts() {
        let accounts = accounts_from("<CreditReport><Header/></CreditReport>").unwrap();
        assert!(accounts.is_empty());
    }

    #[test]
    fn test_malformed_balance_truncates() {
        let accounts = accounts_from(
            "<CreditReport><Accounts><Account><CurrentBalance>12.9kg</CurrentBalance></Account></Accounts></CreditReport>",
        )
        .unwrap();
        assert_eq!(accounts[0].current_balance, 12);
    }

    #[test]
    fn test_text_entry_is_anomaly() {
        let err = accounts_from(
            "<CreditReport><Accounts><Account>closed</Account></Accounts></CreditReport>",
        )
        .unwrap_err();
        assert!(matches!(err, CreditReportError::ExtractionAnomaly { .. }));
    }
}
