use demandsearch::compiler::{self, compile, compile_checked, conjunction, format_value};
use demandsearch::criterion::{Criterion, Operator};
use demandsearch::registry::{self, Domain};
use demandsearch::SearchError;

#[test]
fn business_unit_and_is_new() {
    let criteria = vec![
        Criterion::new("businessunit", "Fast Food"),
        Criterion::and("isnew", "Yes"),
    ];
    let query = compile(&criteria).expect("two criteria survive");
    assert_eq!(query.as_str(), "businessunit:\"*Fast Food*\" AND isnew:*Yes*");
    // same input, same string
    assert_eq!(compile(&criteria), Some(query));
}

#[test]
fn operator_precedes_its_criterion() {
    let criteria = vec![
        Criterion::or("productid", "P1"),
        Criterion::or("productid", "P2"),
        Criterion::and("geography", "EU"),
    ];
    let query = compile(&criteria).expect("compiled");
    assert_eq!(query.as_str(), "productid:*P1* OR productid:*P2* AND geography:*EU*", "first operator is ignored");
}

#[test]
fn existing_wildcards_are_kept() {
    assert_eq!(format_value("ABC*").as_deref(), Some("ABC*"));
    assert_eq!(format_value("10%").as_deref(), Some("10%"));
    assert_eq!(format_value("v1.2").as_deref(), Some("v1.2"));
    assert_eq!(format_value("  Store ").as_deref(), Some("*Store*"), "value is trimmed first");
}

#[test]
fn quoting_escapes_delimiters() {
    assert_eq!(format_value("a:b").as_deref(), Some("\"*a:b*\""));
    assert_eq!(format_value("12\" pan").as_deref(), Some("\"*12\\\" pan*\""));
    assert_eq!(format_value("New\tYork").as_deref(), Some("\"*New\tYork*\""));
}

#[test]
fn blank_criteria_are_dropped() {
    let criteria = vec![
        Criterion::new("productid", "  "),
        Criterion::or("channelid", "C1"),
    ];
    assert_eq!(compile(&criteria).expect("one survives").as_str(), "channelid:*C1*");
    assert!(compile(&[Criterion::new("productid", ""), Criterion::and("isnew", " ")]).is_none());
    assert!(compile(&[]).is_none());
}

#[test]
fn form_fields_combine_with_and() {
    let query = conjunction([("productid", "P1"), ("channelid", ""), ("locationid", "L 9")]).expect("compiled");
    assert_eq!(query.as_str(), "productid:*P1* AND locationid:\"*L 9*\"");
    assert!(conjunction([("productid", ""), ("channelid", " ")]).is_none());
}

#[test]
fn fragment_uses_registry_tokens() {
    let token = registry::resolve(Domain::Channel, "Level").expect("level is registered");
    assert_eq!(token, "channellevel");
    assert_eq!(compiler::fragment(token, "Store").as_deref(), Some("channellevel:*Store*"));
    assert_eq!(registry::resolve(Domain::Product, "PRODUCTFAMILY"), Some("productfamily"));
    assert_eq!(registry::resolve(Domain::Location, "channelid"), None);
}

#[test]
fn unknown_field_is_a_validation_error() {
    let err = compile_checked(Some(Domain::Location), &[Criterion::new("productid", "P1")]).unwrap_err();
    assert_eq!(err, SearchError::UnknownField { domain: Domain::Location, field: "productid".into() });
    assert_eq!(err.user_message(), "Please choose a valid location attribute.");

    let err = compile_checked(None, &[Criterion::new("colour", "red")]).unwrap_err();
    assert!(matches!(err, SearchError::Validation(_)));

    // blank criteria are not checked
    let ok = compile_checked(Some(Domain::Product), &[Criterion::new("colour", " ")]).expect("nothing to check");
    assert!(ok.is_none());
}

#[test]
fn criteria_deserialize_from_form_json() {
    let criteria: Vec<Criterion> = serde_json::from_str(
        r#"[{"key":"businessunit","value":"Bakery"},{"field":"isnew","value":"No","op":"OR"}]"#,
    )
    .expect("valid json");
    assert_eq!(criteria[0].operator(), Operator::And);
    assert_eq!(criteria[1].operator(), Operator::Or);
    assert_eq!(compile(&criteria).expect("compiled").as_str(), "businessunit:*Bakery* OR isnew:*No*");
}

#[test]
fn checked_compile_uses_registry_spelling() {
    let query = compile_checked(
        Some(Domain::Product),
        &[Criterion::new("BusinessUnit", "x"), Criterion::or("ProductLevel", "2")],
    )
    .expect("known fields")
    .expect("two criteria");
    assert_eq!(query.as_str(), "businessunit:*x* OR productlevel:*2*");

    let query = compile_checked(None, &[Criterion::new("  ", ""), Criterion::and("ChannelLevel", "Store")])
        .expect("known field")
        .expect("one criterion");
    assert_eq!(query.as_str(), "channellevel:*Store*");
}
