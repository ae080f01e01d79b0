//! End-to-end tests: registry dispatch against every canton engine.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use ggst_cantons::cantons::SchaffhausenEngine;
use ggst_cantons::{CantonEngine, CantonError, CantonRegistry};
use ggst_core::{Confession, TaxInputs, TaxpayerType};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn make_inputs(canton: &str, commune: &str) -> TaxInputs {
    TaxInputs {
        canton: canton.to_string(),
        commune: commune.to_string(),
        tax_year: 2025,
        purchase_date: NaiveDate::from_ymd_opt(2015, 3, 1).unwrap(),
        sale_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        purchase_price: dec!(500000),
        sale_price: dec!(550000),
        acquisition_costs: Decimal::ZERO,
        selling_costs: Decimal::ZERO,
        investments: vec![],
        taxpayer_type: TaxpayerType::Natural,
        confessions: BTreeMap::new(),
    }
}

#[test]
fn dispatches_to_every_registered_canton() {
    let registry = CantonRegistry::new();

    for (canton, commune) in [
        ("SH", "Schaffhausen"),
        ("ZH", "Zürich"),
        ("BE", "Bern"),
        ("AG", "Aarau"),
        ("SG", "St. Gallen"),
    ] {
        let result = registry
            .compute(&make_inputs(canton, commune))
            .unwrap_or_else(|e| panic!("{canton} failed: {e}"));

        assert_eq!(result.metadata.canton, canton);
        assert_eq!(result.taxable_gain, dec!(50000));
        assert_eq!(result.holding_months, 120);
        assert!(result.total_tax > Decimal::ZERO, "{canton} produced no tax");
    }
}

#[test]
fn dispatch_matches_direct_engine_call() {
    let registry = CantonRegistry::new();
    let mut inputs = make_inputs("sh", "Schaffhausen");
    inputs.confessions = BTreeMap::from([(Confession::RomanCatholic, 2)]);

    let via_registry = registry.compute(&inputs).unwrap();
    let direct = SchaffhausenEngine::new().compute(&inputs).unwrap();

    assert_eq!(via_registry, direct);
}

#[test]
fn case_insensitive_canton_code() {
    let registry = CantonRegistry::new();

    let result = registry.compute(&make_inputs("zh", "Zürich")).unwrap();

    assert_eq!(result.metadata.canton, "ZH");
}

#[test]
fn unknown_canton_is_reported() {
    let registry = CantonRegistry::new();

    let err = registry.compute(&make_inputs("TI", "Lugano")).unwrap_err();

    assert_eq!(err, CantonError::UnknownCanton("TI".to_string()));
}

#[test]
fn engine_metadata_is_consistent() {
    let registry = CantonRegistry::new();

    for code in registry.available_cantons() {
        let engine = registry.engine(code).unwrap();
        assert_eq!(engine.canton_code(), code);
        assert!(!engine.canton_name().is_empty());
        assert!(!engine.available_years().is_empty());
    }
}
