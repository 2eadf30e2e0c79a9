use demandsearch::builder::{MasterCatalog, QueryBuilder, field_options};
use demandsearch::collaborator::{ProfileStore, SavedSearchStore};
use demandsearch::criterion::Operator;
use demandsearch::memory::{MemoryMasterData, MemoryProfiles, MemorySavedSearches};
use demandsearch::model::{Location, Product};
use demandsearch::profile::{CleanseConfig, CleanseProfile, MissingMethod, OutlierMethod, save_profile};
use demandsearch::registry::Domain;
use demandsearch::SearchError;

#[test]
fn builder_skips_blanks_and_duplicates() {
    let mut builder = QueryBuilder::new();
    assert_eq!(builder.field(), "businessunit");
    assert!(builder.add("Fast Food"));
    assert!(!builder.add(" Fast Food "), "same field and value");
    assert!(!builder.add("  "));
    builder.set_field("isnew").expect("registered");
    assert!(builder.add("Yes"));
    assert_eq!(builder.query().expect("two criteria").as_str(), "businessunit:\"*Fast Food*\" AND isnew:*Yes*");

    builder.set_next_operator(Operator::Or);
    assert!(builder.add("No"));
    assert_eq!(
        builder.query().expect("three criteria").as_str(),
        "businessunit:\"*Fast Food*\" AND isnew:*Yes* OR isnew:*No*"
    );
    assert!(builder.set_operator(1, Operator::Or));
    assert!(!builder.set_operator(7, Operator::Or));
    let removed = builder.remove(0).expect("present");
    assert_eq!(removed.value, "Fast Food");
    assert!(builder.remove(5).is_none());
    assert_eq!(builder.query().expect("two left").as_str(), "isnew:*Yes* OR isnew:*No*");
}

#[test]
fn builder_domain_switch() {
    let mut builder = QueryBuilder::new();
    builder.set_domain(Domain::Location);
    assert_eq!(builder.field(), "locationid");
    let err = builder.set_field("productid").unwrap_err();
    assert!(matches!(err, SearchError::UnknownField { domain: Domain::Location, .. }));
    builder.set_field("LocationLevel").expect("case is ignored");
    assert_eq!(builder.field(), "locationlevel");
    builder.add("2");
    builder.clear();
    assert!(builder.criteria().is_empty());
    assert!(builder.query().is_none());
}

#[test]
fn field_options_have_labels() {
    let labels: Vec<_> = field_options(Domain::Channel).iter().map(|f| (f.token, f.label)).collect();
    assert_eq!(
        labels,
        vec![("channelid", "Channel ID"), ("channeldescr", "Channel Description"), ("channellevel", "Channel Level")]
    );
}

#[tokio::test]
async fn catalog_values_are_sorted_and_distinct() {
    let master = MemoryMasterData {
        products: vec![
            Product { product_id: "P2".into(), level: "2".into(), business_unit: "dairy".into(), ..Product::default() },
            Product { product_id: "P1".into(), level: "1".into(), business_unit: "Bakery".into(), ..Product::default() },
            Product { product_id: "P3".into(), level: "1".into(), business_unit: "".into(), ..Product::default() },
        ],
        locations: vec![Location { location_id: "L1".into(), geography: "EU".into(), ..Location::default() }],
        ..MemoryMasterData::default()
    };
    let catalog = MasterCatalog::load(&master).await.expect("loaded");
    assert_eq!(catalog.field_values(Domain::Product, "businessunit"), vec!["Bakery", "dairy"]);
    assert_eq!(catalog.field_values(Domain::Product, "productlevel"), vec!["1", "2"]);
    assert_eq!(catalog.field_values(Domain::Location, "geography"), vec!["EU"]);
    assert!(catalog.field_values(Domain::Channel, "channelid").is_empty());
    assert!(catalog.field_values(Domain::Product, "colour").is_empty());

    let broken = MemoryMasterData { failure: Some("offline".into()), ..MemoryMasterData::default() };
    assert!(MasterCatalog::load(&broken).await.is_err());
}

#[tokio::test]
async fn saving_a_search() {
    let store = MemorySavedSearches::new();
    let mut builder = QueryBuilder::new();

    let err = builder.save("Bakery", &store).await.unwrap_err();
    assert_eq!(err.user_message(), "Please add at least one criterion.");
    builder.add("Bakery");
    let err = builder.save("  ", &store).await.unwrap_err();
    assert_eq!(err.user_message(), "Please enter a name.");

    let saved = builder.save(" Bakery ", &store).await.expect("stored");
    assert_eq!(saved.name, "Bakery");
    assert_eq!(saved.query, "businessunit:*Bakery*");
    assert_eq!(saved.id, Some(1));
    assert!(saved.created_at.is_some());
    assert_eq!(store.list().await.expect("listed").len(), 1);
}

#[tokio::test]
async fn cleanse_profiles() {
    let store = MemoryProfiles::new();
    let config = CleanseConfig { outlier_method: OutlierMethod::Hampel, ..CleanseConfig::default() };
    let err = save_profile(&store, "", &config).await.unwrap_err();
    assert_eq!(err.user_message(), "Please enter a profile name.");

    let profile = save_profile(&store, "Hampel weekly", &config).await.expect("saved");
    assert_eq!(profile.config.outlier_params.hampel_window, 7);
    assert_eq!(profile.config.missing_method, MissingMethod::ForwardFill);
    assert_eq!(store.list().await.expect("listed"), vec![profile]);
}

#[tokio::test]
async fn profile_store_failures() {
    let config = CleanseConfig::default();
    let err = save_profile(&MemoryProfiles::new().failing(""), "weekly", &config).await.unwrap_err();
    assert_eq!(err.user_message(), "Failed to save profile.", "blank detail gets the fallback");
    let err = save_profile(&MemoryProfiles::new().failing("quota exceeded"), "weekly", &config).await.unwrap_err();
    assert_eq!(err.user_message(), "quota exceeded");
}

#[test]
fn stored_profiles_fill_in_defaults() {
    let profile: CleanseProfile = serde_json::from_str(
        r#"{"name":"legacy","config":{"outlierMethod":"IQR","outlierParams":{"iqrK":2.0},"missingMethod":"Linear Interpolate"}}"#,
    )
    .expect("valid profile");
    assert_eq!(profile.config.outlier_method, OutlierMethod::Iqr);
    assert_eq!(profile.config.outlier_params.iqr_k, 2.0);
    assert_eq!(profile.config.outlier_params.z_threshold, 3.0);
    assert_eq!(profile.config.missing_method, MissingMethod::LinearInterpolate);
    assert_eq!(profile.config.missing_params.interpolate_order, 1);

    let json = serde_json::to_value(CleanseConfig::default()).expect("serializes");
    assert_eq!(json["outlierMethod"], "Z-Score");
    assert_eq!(json["missingMethod"], "Forward Fill");
}
