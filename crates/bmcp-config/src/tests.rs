//! Tests for solver configuration.

use std::io::Write;

use super::*;

#[test]
fn test_toml_parsing() {
    let toml = r#"
        environment_mode = "reproducible"
        random_seed = 42

        [termination]
        seconds_spent_limit = 30
        iteration_count_limit = 100

        [cc_search]
        iteration_limit = 2000
        lambda = 0.7
        timestamp_gap = 12
        sample_size = 20

        [deep_optimize]
        iteration_limit = 1500
        tabu_length = 8
        block_list_size = 4
    "#;

    let config = SolverConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.environment_mode, EnvironmentMode::Reproducible);
    assert_eq!(config.random_seed, Some(42));
    assert_eq!(config.termination.seconds_spent_limit, Some(30));
    assert_eq!(config.termination.iteration_count_limit, Some(100));
    assert_eq!(config.cc_search.iteration_limit, 2000);
    assert_eq!(config.cc_search.lambda, 0.7);
    assert_eq!(config.cc_search.timestamp_gap, 12);
    assert_eq!(config.cc_search.sample_size, 20);
    assert_eq!(config.deep_optimize.iteration_limit, 1500);
    assert_eq!(config.deep_optimize.tabu_length, 8);
    assert_eq!(config.deep_optimize.block_list_size, 4);
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        environment_mode: full_assert
        random_seed: 42
        termination:
          millis_spent_limit: 250
        cc_search:
          lambda: 0.25
        deep_optimize:
          block_list_size: 3
    "#;

    let config = SolverConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.environment_mode, EnvironmentMode::FullAssert);
    assert_eq!(config.random_seed, Some(42));
    assert_eq!(config.time_limit(), Duration::from_millis(250));
    assert_eq!(config.cc_search.lambda, 0.25);
    assert_eq!(config.cc_search.iteration_limit, 1000);
    assert_eq!(config.deep_optimize.block_list_size, 3);
    assert_eq!(config.deep_optimize.tabu_length, 10);
}

#[test]
fn test_empty_config_uses_defaults() {
    let config = SolverConfig::from_toml_str("").unwrap();
    assert_eq!(config, SolverConfig::default());
    assert_eq!(
        config.time_limit(),
        Duration::from_secs(DEFAULT_TIME_LIMIT_SECS)
    );
    assert_eq!(config.environment_mode, EnvironmentMode::NonReproducible);
    assert!(config.validate().is_ok());
}

#[test]
fn test_time_limit_combines_seconds_and_millis() {
    let termination = TerminationConfig {
        seconds_spent_limit: Some(2),
        millis_spent_limit: Some(500),
        iteration_count_limit: None,
    };
    assert_eq!(termination.time_limit(), Duration::from_millis(2500));

    let zero = TerminationConfig {
        seconds_spent_limit: Some(0),
        ..TerminationConfig::default()
    };
    assert_eq!(zero.time_limit(), Duration::ZERO);
}

#[test]
fn test_builder() {
    let config = SolverConfig::new()
        .with_random_seed(123)
        .with_time_limit_secs(60)
        .with_iteration_count_limit(5)
        .with_environment_mode(EnvironmentMode::FastAssert)
        .with_deep_optimize(DeepOptimizeConfig {
            tabu_length: 3,
            ..DeepOptimizeConfig::default()
        });

    assert_eq!(config.random_seed, Some(123));
    assert_eq!(config.time_limit(), Duration::from_secs(60));
    assert_eq!(config.termination.iteration_count_limit, Some(5));
    assert!(config.environment_mode.is_reproducible());
    assert!(config.environment_mode.is_asserted());
    assert!(!config.environment_mode.is_full_assert());
    assert_eq!(config.deep_optimize.tabu_length, 3);

    let config = config.with_time_limit_millis(10);
    assert_eq!(config.time_limit(), Duration::from_millis(10));
}

#[test]
fn test_validate_rejects_bad_parameters() {
    let config = SolverConfig::new().with_cc_search(CcSearchConfig {
        lambda: -0.1,
        ..CcSearchConfig::default()
    });
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    let config = SolverConfig::new().with_cc_search(CcSearchConfig {
        lambda: f64::NAN,
        ..CcSearchConfig::default()
    });
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    let config = SolverConfig::new().with_cc_search(CcSearchConfig {
        sample_size: 0,
        ..CcSearchConfig::default()
    });
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_unknown_mode_is_an_error() {
    let err = SolverConfig::from_toml_str(r#"environment_mode = "sometimes""#).unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
}

#[test]
fn test_from_file_picks_format_by_extension() {
    let mut yaml = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    yaml.write_all(b"random_seed: 9\n").unwrap();
    let config = SolverConfig::from_file(yaml.path()).unwrap();
    assert_eq!(config.random_seed, Some(9));

    let mut toml = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    toml.write_all(b"random_seed = 11\n").unwrap();
    let config = SolverConfig::from_file(toml.path()).unwrap();
    assert_eq!(config.random_seed, Some(11));

    assert!(matches!(
        SolverConfig::load("does/not/exist.toml"),
        Err(ConfigError::Io(_))
    ));
}
