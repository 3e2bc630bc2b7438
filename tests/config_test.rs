use indoc::indoc;
use policygate::config::{load_config_from_path, parse_and_validate_config, ProfileName};
use policygate::core::Axis;
use policygate::selection::{McdaMethod, Selector};
use policygate::{Candidate, Error, PolicyGateConfig};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("policygate.toml");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_full_config_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        indoc! {r#"
            [gate]
            tau_reject = 0.7
            tau_repair = 0.25
            max_repairs = 3

            [selection]
            p_best_threshold = 0.6
            n_samples = 500
            method = "topsis"
            seed = 7
            profile = "newsroom"

            [profiles.newsroom]
            safety = { e_min = 0.5, e_target = 0.9, weight_range = [0.2, 0.4] }
            fairness = { e_min = 0.5, e_target = 0.9, weight_range = [0.2, 0.3] }
            privacy = { e_min = 0.3, e_target = 0.8, weight_range = [0.1, 0.2] }
            autonomy = { e_min = 0.3, e_target = 0.8, weight_range = [0.1, 0.2] }
            harm_avoidance = { e_min = 0.4, e_target = 0.9, weight_range = [0.1, 0.3] }
        "#},
    );

    let config = load_config_from_path(&path).unwrap();
    assert_eq!(config.gate.max_repairs, 3);
    assert_eq!(config.selection.method, McdaMethod::Topsis);
    assert_eq!(config.selection.seed, 7);

    let profile = config.active_profile().unwrap();
    assert_eq!(profile.name, "newsroom");
    assert_eq!(profile.axis(Axis::Safety).weight_range, (0.2, 0.4));

    let selector = Selector::from_config(&config).unwrap();
    assert_eq!(selector.gate().config().tau_reject, 0.7);
}

#[test]
fn test_custom_profile_shadows_builtin() {
    let config = parse_and_validate_config(indoc! {r#"
        [profiles.medical]
        safety = { e_min = 0.7, e_target = 0.95, weight_range = [0.3, 0.4] }
        fairness = { e_min = 0.4, e_target = 0.9, weight_range = [0.1, 0.2] }
        privacy = { e_min = 0.7, e_target = 0.95, weight_range = [0.3, 0.4] }
        autonomy = { e_min = 0.5, e_target = 0.9, weight_range = [0.1, 0.2] }
        harm_avoidance = { e_min = 0.5, e_target = 0.95, weight_range = [0.1, 0.2] }
    "#})
    .unwrap();

    let resolved = config.resolve_profile("medical").unwrap();
    assert_eq!(resolved.axis(Axis::Privacy).e_min, 0.7);
    assert_ne!(resolved, ProfileName::Medical.to_profile());
    assert_eq!(config.profile_names().len(), 4);
}

#[test]
fn test_partial_profile_fills_missing_axes() {
    let config = parse_and_validate_config(indoc! {r#"
        [selection]
        profile = "custom"

        [profiles.custom.safety]
        e_min = 0.5
        e_target = 0.9
        weight_range = [0.2, 0.4]
    "#})
    .unwrap();

    let profile = config.active_profile().unwrap();
    let base = ProfileName::Default.to_profile();
    assert_eq!(profile.name, "custom");
    assert_eq!(profile.axis(Axis::Safety).weight_range, (0.2, 0.4));
    assert_eq!(profile.axis(Axis::Fairness), base.axis(Axis::Fairness));
    assert_eq!(profile.axis(Axis::HarmAvoidance), base.axis(Axis::HarmAvoidance));
}

#[test]
fn test_partial_builtin_override_keeps_other_axes() {
    let config = parse_and_validate_config(indoc! {r#"
        [profiles.medical.privacy]
        e_min = 0.75
        e_target = 0.95
        weight_range = [0.3, 0.4]
    "#})
    .unwrap();

    let resolved = config.resolve_profile("medical").unwrap();
    let medical = ProfileName::Medical.to_profile();
    assert_eq!(resolved.axis(Axis::Privacy).e_min, 0.75);
    assert_eq!(resolved.axis(Axis::Safety), medical.axis(Axis::Safety));
}

#[test]
fn test_misspelled_axis_is_rejected() {
    assert!(matches!(
        parse_and_validate_config(indoc! {r#"
            [profiles.custom.saftey]
            e_min = 0.5
            e_target = 0.9
            weight_range = [0.2, 0.4]
        "#}),
        Err(Error::Toml(_))
    ));
}

#[test]
fn test_unknown_profile_fails_fast() {
    let err = parse_and_validate_config(indoc! {r#"
        [selection]
        profile = "orbital"
    "#})
    .unwrap_err();
    match err {
        Error::UnknownProfile { name, available } => {
            assert_eq!(name, "orbital");
            assert_eq!(available, vec!["default", "disaster", "medical", "education"]);
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn test_invalid_profile_values_fail_fast() {
    let result = parse_and_validate_config(indoc! {r#"
        [profiles.broken]
        safety = { e_min = 0.9, e_target = 0.5, weight_range = [0.2, 0.3] }
        fairness = { e_min = 0.4, e_target = 0.9, weight_range = [0.1, 0.2] }
        privacy = { e_min = 0.4, e_target = 0.9, weight_range = [0.1, 0.2] }
        autonomy = { e_min = 0.4, e_target = 0.9, weight_range = [0.1, 0.2] }
        harm_avoidance = { e_min = 0.4, e_target = 0.9, weight_range = [0.1, 0.2] }
    "#});
    assert!(matches!(result, Err(Error::Configuration(_))));
}

#[test]
fn test_wrong_value_type_is_toml_error() {
    assert!(matches!(
        parse_and_validate_config("[gate]\ntau_reject = \"high\"\n"),
        Err(Error::Toml(_))
    ));
}

#[test]
fn test_missing_explicit_file_is_error() {
    let dir = TempDir::new().unwrap();
    let err = load_config_from_path(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, Error::ConfigFile { .. }));
}

#[test]
fn test_gate_thresholds_from_config_change_decisions() {
    // A stricter repair threshold turns a tolerated mention into a repair
    let config = parse_and_validate_config(indoc! {r#"
        [gate]
        tau_repair = 0.1
        max_repairs = 1
    "#})
    .unwrap();
    let selector = Selector::from_config(&config).unwrap();
    let result = selector
        .gate()
        .check(&Candidate::new("c", "The archive is kept forever."), None);
    assert!(!result.repair_log.is_empty());

    let defaults = Selector::from_config(&PolicyGateConfig::default()).unwrap();
    let result = defaults
        .gate()
        .check(&Candidate::new("c", "The archive is kept forever."), None);
    assert!(result.repair_log.is_empty());
}
