use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use termassign::config::{self, Config, MAX_BLUR_DEBOUNCE_MS, MIN_BLUR_DEBOUNCE_MS};
use termassign::field::ExpressionField;
use termassign::palette::default_groups;

#[test]
fn test_empty_config_is_default() {
    let config = Config::from_yaml("").unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.blur_debounce(), Duration::from_millis(150));
    assert_eq!(config.palette, default_groups());
}

#[test]
fn test_partial_config_keeps_other_defaults() {
    let config = Config::from_yaml("blur_debounce_ms: 300\n").unwrap();
    assert_eq!(config.blur_debounce_ms, 300);
    assert_eq!(config.auto_operator_names, Config::default().auto_operator_names);
    assert_eq!(config.palette.len(), 2);
}

#[test]
fn test_debounce_is_clamped() {
    let low = Config::from_yaml("blur_debounce_ms: 5").unwrap();
    assert_eq!(low.blur_debounce_ms, MIN_BLUR_DEBOUNCE_MS);

    let high = Config::from_yaml("blur_debounce_ms: 99999").unwrap();
    assert_eq!(high.blur_debounce_ms, MAX_BLUR_DEBOUNCE_MS);
}

#[test]
fn test_invalid_yaml_is_rejected() {
    assert!(Config::from_yaml("blur_debounce_ms: soon").is_err());
    assert!(Config::from_yaml("palette: 3").is_err());
}

#[test]
fn test_empty_groups_fall_back_to_defaults() {
    let config = Config::from_yaml("palette:\n  - title: Nothing\n    items: []\n").unwrap();
    assert_eq!(config.palette, default_groups());
}

#[test]
fn test_load_fixture_file() {
    let config = config::load(Some(Path::new("fixtures/config.yaml"))).unwrap();

    assert_eq!(config.blur_debounce_ms, 250);
    assert_eq!(config.palette.len(), 1);
    assert_eq!(config.palette[0].title, "Calculus");
    assert_eq!(config.palette[0].items[0].symbol, r"\int");
    assert_eq!(config.palette[0].items[2].symbol, r"\lim_{\square}");
}

#[test]
fn test_configured_auto_commands_reach_the_field() {
    let config = config::load(Some(Path::new("fixtures/config.yaml"))).unwrap();
    let mut field = ExpressionField::new("", Rc::new(config.auto_commands()));
    for c in "2mu".chars() {
        field.insert_char(c);
    }
    assert_eq!(field.text(), "2\\mu ");

    // Operator names were not overridden
    for c in "sin".chars() {
        field.insert_char(c);
    }
    assert_eq!(field.text(), "2\\mu \\sin ");
}

#[test]
fn test_missing_explicit_config_is_error() {
    let err = config::load(Some(Path::new("fixtures/nope.yaml"))).unwrap_err();
    assert!(err.contains("nope.yaml"));
}
