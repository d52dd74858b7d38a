use anyhow::Context;
use credit_report_normalizer::{CreditReportNormalizer, NormalizerOptions};
use std::env;

const SAMPLE_REPORT: &str = r#"<?xml version="1.0"?>
<CreditReport>
  <Header><Inquiry><Name>Sample Applicant</Name><PAN>SAMPL1234E</PAN></Inquiry></Header>
  <Score><Score>731</Score></Score>
  <Accounts>
    <Account>
      <AccountType>Home Loan</AccountType>
      <InstitutionName>State Bank of India</InstitutionName>
      <AccountNumber>HL-0042</AccountNumber>
      <CurrentBalance>1850000</CurrentBalance>
      <AccountStatus>Active</AccountStatus>
    </Account>
    <Account>
      <AccountType>Credit Card</AccountType>
      <InstitutionName>HDFC Bank</InstitutionName>
      <AccountNumber>CC-9911</AccountNumber>
      <CurrentBalance>42000</CurrentBalance>
      <AmountOverdue>3500</AmountOverdue>
      <AccountStatus>Active</AccountStatus>
    </Account>
  </Accounts>
  <Addresses><Address><AddressLine1>14 Residency Road</AddressLine1><City>Bengaluru</City><PinCode>560025</PinCode></Address></Addresses>
</CreditReport>"#;

/// Usage: `cargo run --example normalize_file [report.xml] [options.json]`
fn main() -> anyhow::Result<()> {
    let mut args = env::args().skip(1);
    let report_path = args.next();
    let options_path = args.next();

    let options = match options_path {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading options from {}", path))?;
            NormalizerOptions::from_json_str(&json)?
        }
        None => NormalizerOptions::default(),
    };

    let normalizer = CreditReportNormalizer::new(options)?;

    let report = match report_path {
        Some(path) => normalizer
            .normalize_file(&path)
            .with_context(|| format!("normalizing {}", path))?,
        None => {
            println!("No report given, normalizing the built-in sample.\n");
            normalizer.normalize(SAMPLE_REPORT.as_bytes())?
        }
    };

    println!("Name:          {}", report.name);
    println!("PAN:           {}", report.pan);
    println!("Credit score:  {}", report.credit_score);
    println!(
        "Accounts:      {} total, {} active, {} closed",
        report.report_summary.total_accounts,
        report.report_summary.active_accounts,
        report.report_summary.closed_accounts
    );
    println!(
        "Balances:      {} current ({} secured / {} unsecured)",
        report.report_summary.current_balance_amount,
        report.report_summary.secured_accounts_amount,
        report.report_summary.unsecured_accounts_amount
    );
    for address in &report.addresses {
        println!("Address:       {}", address);
    }

    println!("\n{}", report.to_json()?);
    Ok(())
}
