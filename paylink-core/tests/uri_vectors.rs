use paylink_core::{
    build_uri, combine, parse, parse_decimal, Address, Amount, NetworkParams, PaymentRequest,
    UriError,
};

const PRODNET_GOOD_ADDRESS: &str = "LQz2pJYaeqntA9BFB8rDX5AL2TTKGd5AuN";

fn prodnet() -> NetworkParams {
    NetworkParams::litecoin_mainnet()
}

fn good_address() -> Address {
    PRODNET_GOOD_ADDRESS.parse().expect("test address should decode")
}

fn parse_suffix(suffix: &str) -> Result<PaymentRequest, UriError> {
    parse(&format!("litecoin:{PRODNET_GOOD_ADDRESS}{suffix}"), &prodnet())
}

fn error_for(suffix: &str) -> UriError {
    parse_suffix(suffix).expect_err("URI should be rejected")
}

#[test]
fn builds_canonical_uris() -> anyhow::Result<()> {
    let network = prodnet();
    let address = good_address();
    let amount = |text: &str| parse_decimal(text).map(Some);

    let cases: Vec<(Option<Amount>, Option<&str>, Option<&str>, &str)> = vec![
        (
            amount("12.34")?,
            Some("Hello"),
            Some("AMessage"),
            "?amount=12.34&label=Hello&message=AMessage",
        ),
        (
            amount("12.34")?,
            Some("Hello World"),
            Some("Mess & age + hope"),
            "?amount=12.34&label=Hello%20World&message=Mess%20%26%20age%20%2B%20hope",
        ),
        (None, Some("Hello"), Some("glory"), "?label=Hello&message=glory"),
        (amount("0.1")?, None, Some("glory"), "?amount=0.1&message=glory"),
        (amount("0.1")?, Some(""), Some("glory"), "?amount=0.1&message=glory"),
        (amount("12.34")?, Some("Hello"), None, "?amount=12.34&label=Hello"),
        (amount("12.34")?, Some("Hello"), Some(""), "?amount=12.34&label=Hello"),
        (amount("1000")?, None, None, "?amount=1000"),
        (amount("1000")?, Some(""), Some(""), "?amount=1000"),
        (None, Some("Hello"), None, "?label=Hello"),
        (None, None, Some("Agatha"), "?message=Agatha"),
        (None, Some(""), Some("Agatha"), "?message=Agatha"),
        (None, None, None, ""),
        (None, Some(""), Some(""), ""),
    ];

    for (amount, label, message, query) in cases {
        let uri = build_uri(&network, &address, amount, label, message)?;
        assert_eq!(uri, format!("litecoin:{PRODNET_GOOD_ADDRESS}{query}"));
    }
    Ok(())
}

#[test]
fn refuses_to_build_negative_amount() -> anyhow::Result<()> {
    let err = build_uri(
        &prodnet(),
        &good_address(),
        Some(parse_decimal("-0.1")?),
        Some("hope"),
        Some("glory"),
    )
    .unwrap_err();
    assert!(err.to_string().contains("Amount must be positive"));
    Ok(())
}

#[test]
fn parses_simple_address() -> anyhow::Result<()> {
    let request = parse_suffix("")?;
    assert_eq!(request.amount(), None);
    assert_eq!(request.label(), None);
    assert_eq!(request.address().hash160().len(), 20);
    Ok(())
}

#[test]
fn rejects_foreign_scheme() {
    let err = parse(&format!("blimpcoin:{PRODNET_GOOD_ADDRESS}"), &prodnet()).unwrap_err();
    assert_eq!(err.code(), "SCHEME_MISMATCH");
}

#[test]
fn rejects_bad_syntax() {
    let pipe = parse(&format!("litecoin|{PRODNET_GOOD_ADDRESS}"), &prodnet()).unwrap_err();
    assert!(pipe.to_string().contains("Bad URI syntax"));

    let backslash = error_for("\\");
    assert!(backslash.to_string().contains("Bad URI syntax"));
}

#[test]
fn rejects_missing_address() {
    assert_eq!(parse("litecoin", &prodnet()), Err(UriError::MissingAddress));
    assert_eq!(parse("litecoin:", &prodnet()), Err(UriError::MissingAddress));
}

#[test]
fn rejects_address_of_other_network() {
    let err = parse(
        &format!("litecoin:{PRODNET_GOOD_ADDRESS}"),
        &NetworkParams::litecoin_testnet(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("Bad address"));
    assert_eq!(err.field(), Some("address"));
}

#[test]
fn parses_amounts_exactly() -> anyhow::Result<()> {
    let cases = [
        ("?amount=9876543210.12345678", 987_654_321_012_345_678),
        ("?amount=.12345678", 12_345_678),
        ("?amount=9876543210", 987_654_321_000_000_000),
    ];
    for (suffix, units) in cases {
        let request = parse_suffix(suffix)?;
        assert_eq!(request.amount(), Some(Amount::from_units(units)), "{suffix}");
    }
    Ok(())
}

#[test]
fn parses_label_and_message() -> anyhow::Result<()> {
    assert_eq!(
        parse_suffix("?label=Hello%20World")?.label(),
        Some("Hello World")
    );
    assert_eq!(
        parse_suffix("?message=Hello%20World")?.message(),
        Some("Hello World")
    );
    Ok(())
}

#[test]
fn parses_label_with_ampersand_and_plus() -> anyhow::Result<()> {
    let request = parse_suffix("?label=Hello%20Earth%20%26%20Mars%20%2B%20Venus")?;
    assert_eq!(request.label(), Some("Hello Earth & Mars + Venus"));
    Ok(())
}

#[test]
fn parses_label_in_cyrillic() -> anyhow::Result<()> {
    let request = parse_suffix("?label=%D0%9C%D0%BE%D1%81%D0%BA%D0%B2%D0%B0")?;
    assert_eq!(
        request.label(),
        Some("\u{041c}\u{043e}\u{0441}\u{043a}\u{0432}\u{0430}")
    );
    Ok(())
}

#[test]
fn summarises_all_fields() -> anyhow::Result<()> {
    let request = parse_suffix("?amount=9876543210&label=Hello%20World&message=Be%20well")?;
    assert_eq!(
        request.to_string(),
        "PaymentRequest['address'='LQz2pJYaeqntA9BFB8rDX5AL2TTKGd5AuN','amount'='987654321000000000','label'='Hello World','message'='Be well']"
    );
    Ok(())
}

#[test]
fn rejects_bad_amounts() {
    for suffix in ["?amount=", "?amount=12X4", "?amount=1.000000001"] {
        let err = error_for(suffix);
        assert!(matches!(err, UriError::InvalidAmount { .. }), "{suffix}: {err}");
        assert!(err.to_string().contains("amount"));
    }
}

#[test]
fn rejects_huge_exponent_amounts() {
    for suffix in [
        "?amount=1E9223372036854775800",
        "?amount=1E9223372036854775807",
        "?amount=9.99e99999999999",
    ] {
        let err = error_for(suffix);
        assert!(matches!(err, UriError::InvalidAmount { .. }), "{suffix}: {err}");
    }
}

#[test]
fn rejects_empty_label_and_message() {
    let label = error_for("?label=");
    assert_eq!(label, UriError::EmptyFieldValue { field: "label" });
    assert!(label.to_string().contains("label"));

    let message = error_for("?message=");
    assert!(message.to_string().contains("message"));
}

#[test]
fn rejects_address_parameter() {
    let err = error_for("?address=aardvark");
    assert_eq!(err, UriError::DuplicateAddressField);
    assert!(err.to_string().contains("address"));
}

#[test]
fn rejects_too_many_equals() {
    let err = error_for("?label=aardvark=zebra");
    assert!(err.to_string().contains("cannot parse name value pair"));
}

#[test]
fn rejects_too_many_question_marks() {
    let err = error_for("?label=aardvark?message=zebra");
    assert!(err.to_string().contains("Too many question marks"));
}

#[test]
fn keeps_unknown_optional_parameters() -> anyhow::Result<()> {
    let request = parse_suffix("?aardvark=true")?;
    assert_eq!(
        request.to_string(),
        "PaymentRequest['address'='LQz2pJYaeqntA9BFB8rDX5AL2TTKGd5AuN','aardvark'='true']"
    );
    assert_eq!(request.parameter("aardvark").as_deref(), Some("true"));
    Ok(())
}

#[test]
fn rejects_parameter_without_value() {
    let err = error_for("?aardvark");
    assert!(err.to_string().contains("cannot parse name value pair"));
}

#[test]
fn rejects_unknown_required_parameter() {
    let err = error_for("?req-aardvark=true");
    assert_eq!(err.field(), Some("req-aardvark"));
    assert!(err.to_string().contains("req-aardvark"));
}

#[test]
fn accepts_legacy_wallet_uris() -> anyhow::Result<()> {
    // Some wallets emit `scheme://` and pad the amount with zeros.
    let network = NetworkParams {
        id: "org.bitcoin.production".to_string(),
        uri_scheme: "litecoin".to_string(),
        address_header: 0,
        acceptable_address_codes: vec![0],
    };
    let request = parse(
        "litecoin://1KzTSfqjF2iKCduwz59nv2uqh1W2JsTxZH?amount=0.01000000",
        &network,
    )?;
    assert_eq!(
        request.address().as_str(),
        "1KzTSfqjF2iKCduwz59nv2uqh1W2JsTxZH"
    );
    assert_eq!(request.amount(), Some(combine(0, 1)?));
    Ok(())
}

#[test]
fn error_report_is_machine_readable() -> anyhow::Result<()> {
    let report = error_for("?amount=abc").report();
    let json: serde_json::Value = serde_json::to_value(&report)?;
    assert_eq!(json["code"], "INVALID_AMOUNT");
    assert_eq!(json["field"], "amount");
    Ok(())
}
