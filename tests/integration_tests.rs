use loan_tiers::analyzers::analyzer::build_report;
use loan_tiers::analyzers::types::{LoanReport, Section};
use loan_tiers::parser::parse_records;
use loan_tiers::record::Dataset;

fn load_report() -> LoanReport {
    let bytes = include_bytes!("fixtures/loan_sample.csv");
    let records = parse_records(bytes.as_slice()).expect("Failed to parse fixture");
    build_report(&Dataset::new(records), "fixtures/loan_sample.csv")
}

fn values(section: &Section) -> Vec<(String, Option<f64>)> {
    section
        .rows()
        .iter()
        .map(|r| (r.key.join("/"), r.value))
        .collect()
}

fn expected(pairs: &[(&str, Option<f64>)]) -> Vec<(String, Option<f64>)> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

#[test]
fn test_full_pipeline() {
    let report = load_report();

    assert_eq!(report.records(), 16);
    assert_eq!(report.sections().len(), 10);
}

#[test]
fn test_default_rate_by_credit_tier() {
    let report = load_report();
    let section = report.section("default_rate_by_credit_tier").unwrap();

    assert_eq!(
        values(section),
        expected(&[
            ("Poor", Some(100.0)),
            ("Fair", Some(66.7)),
            ("Good", Some(22.2)),
            ("Very Good", Some(0.0)),
            ("Excellent", Some(0.0)),
        ])
    );
    // the row without a FICO score
    assert_eq!(section.unclassified().count, 1);
    assert_eq!(section.dropped(), 0);
}

#[test]
fn test_income_sections() {
    let report = load_report();

    let rates = report.section("default_rate_by_income_tier").unwrap();
    assert_eq!(
        values(rates),
        expected(&[
            ("0-25K", Some(50.0)),
            ("25-50K", Some(33.3)),
            ("50-75K", Some(80.0)),
            ("75-100K", Some(0.0)),
            ("100-125K", None),
            ("125K+", Some(0.0)),
        ])
    );
    // income above the last boundary
    assert_eq!(rates.unclassified().count, 1);

    let counts = report.section("applicants_by_income_tier").unwrap();
    assert_eq!(
        values(counts),
        expected(&[
            ("50-75K", Some(5.0)),
            ("75-100K", Some(4.0)),
            ("25-50K", Some(3.0)),
            ("0-25K", Some(2.0)),
            ("125K+", Some(1.0)),
            ("100-125K", Some(0.0)),
        ])
    );

    let balances = report.section("avg_revolving_balance_by_income_tier").unwrap();
    assert_eq!(
        values(balances),
        expected(&[
            ("0-25K", Some(6350.0)),
            ("25-50K", Some(4327.0)),
            ("50-75K", Some(15336.0)),
            ("75-100K", Some(34292.0)),
            ("100-125K", None),
            ("125K+", Some(50807.0)),
        ])
    );
    assert_eq!(balances.dropped(), 1);
}

#[test]
fn test_default_rate_by_balance_and_dti_tier() {
    let report = load_report();

    let balance = report.section("default_rate_by_balance_tier").unwrap();
    assert_eq!(
        values(balance),
        expected(&[
            ("0-5K", Some(50.0)),
            ("5K-10K", Some(0.0)),
            ("10K-20K", Some(100.0)),
            ("20K-40K", Some(25.0)),
            ("40K+", Some(0.0)),
        ])
    );

    let dti = report.section("default_rate_by_dti_tier").unwrap();
    assert_eq!(
        values(dti),
        expected(&[
            ("0-20", Some(27.3)),
            ("20-30", Some(100.0)),
            ("30-40", Some(0.0)),
            ("40-50", None),
            ("50-60", Some(0.0)),
            ("60+", Some(100.0)),
        ])
    );
}

#[test]
fn test_delinquency_sections() {
    let report = load_report();

    let rates = report.section("default_rate_by_delinquencies").unwrap();
    assert_eq!(
        values(rates),
        expected(&[("0", Some(25.0)), ("1", Some(50.0)), ("2", Some(100.0))])
    );
    // the row with an empty delinquency count
    assert_eq!(rates.dropped(), 1);

    let counts = report.section("applicants_by_delinquencies").unwrap();
    assert_eq!(
        values(counts),
        expected(&[("0", Some(12.0)), ("1", Some(2.0)), ("2", Some(1.0))])
    );
}

#[test]
fn test_delinquency_and_public_record_matrix() {
    let report = load_report();
    let section = report
        .section("default_rate_by_delinquency_and_public_records")
        .unwrap();
    let pivot = section.pivot().expect("two-factor section has a pivot");

    assert_eq!(pivot.rows, vec!["0", "1", "2"]);
    assert_eq!(pivot.columns, vec!["0", "1"]);
    assert_eq!(
        pivot.cells,
        vec![
            vec![Some(18.2), Some(100.0)],
            vec![Some(0.0), Some(100.0)],
            vec![Some(100.0), None],
        ]
    );
    assert_eq!(section.rows().len(), 6);
}

#[test]
fn test_default_rate_by_purpose_ranked() {
    let report = load_report();
    let section = report.section("default_rate_by_purpose").unwrap();

    assert_eq!(
        values(section),
        expected(&[
            ("all_other", Some(100.0)),
            ("small_business", Some(100.0)),
            ("credit_card", Some(25.0)),
            ("debt_consolidation", Some(20.0)),
            ("educational", Some(0.0)),
            ("home_improvement", Some(0.0)),
            ("major_purchase", Some(0.0)),
        ])
    );
    // "vacation" is not a known purpose
    assert_eq!(section.unclassified().count, 1);
    assert_eq!(section.unclassified().value, Some(100.0));
}

#[test]
fn test_report_serializes() {
    let report = load_report();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["records"], 16);
    assert_eq!(json["sections"][0]["id"], "default_rate_by_credit_tier");
    assert_eq!(json["sections"][0]["rows"][0]["key"][0], "Poor");
    assert!(json["sections"][0]["pivot"].is_null());
}
