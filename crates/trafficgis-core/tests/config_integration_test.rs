//! Integration tests for layered configuration
//!
//! These tests verify that configuration loading follows the correct precedence:
//! Overrides > Environment variables > Config file > Defaults

use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};
use trafficgis_core::config::{ConfigOverrides, ConfigSource, LayeredConfig};
use trafficgis_core::models::TierThresholds;
use trafficgis_core::TrafficGisError;

const ENV_VARS: [&str; 5] = [
    "TRAFFICGIS_HEATMAP_CELL_KM",
    "TRAFFICGIS_CLUSTER_RADIUS_M",
    "TRAFFICGIS_CLUSTER_MEDIUM",
    "TRAFFICGIS_CLUSTER_LARGE",
    "TRAFFICGIS_KML_NAME",
];

fn clear_env() {
    for var in ENV_VARS {
        env::remove_var(var);
    }
}

#[test]
fn test_default_configuration() {
    let config = LayeredConfig::with_defaults();

    assert_eq!(config.heatmap_cell_km.value, 1.0);
    assert_eq!(config.heatmap_cell_km.source, ConfigSource::Default);
    assert_eq!(config.cluster_radius_m.value, 500.0);
    assert_eq!(config.cluster_radius_m.source, ConfigSource::Default);
    assert_eq!(config.tier_thresholds(), TierThresholds::default());
    assert_eq!(config.kml_document_name.value, "Traffic Data");
}

#[test]
fn test_partial_file_configuration() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
cluster_radius_m = 750.0
# Only override the radius, leave others as defaults
"#
    )
    .unwrap();

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

    assert_eq!(config.cluster_radius_m.value, 750.0);
    assert_eq!(config.cluster_radius_m.source, ConfigSource::File);
    // These should still be defaults
    assert_eq!(config.heatmap_cell_km.source, ConfigSource::Default);
    assert_eq!(config.kml_document_name.source, ConfigSource::Default);
}

#[test]
fn test_config_file_in_directory() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trafficgis.toml");
    std::fs::write(&path, "kml_document_name = \"Ring Road\"\n").unwrap();

    let config = LayeredConfig::with_defaults().load_from_file(&path).unwrap();
    assert_eq!(config.kml_document_name.value, "Ring Road");
}

#[test]
fn test_malformed_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "heatmap_cell_km = \"wide\"").unwrap();

    let result = LayeredConfig::with_defaults().load_from_file(file.path());
    assert!(matches!(result, Err(TrafficGisError::ConfigInvalid { .. })));
}

#[test]
fn test_file_with_inverted_tiers() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "cluster_medium_threshold = 200\ncluster_large_threshold = 20").unwrap();

    let result = LayeredConfig::with_defaults().load_from_file(file.path());
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_env();

    env::set_var("TRAFFICGIS_HEATMAP_CELL_KM", "2.5");
    env::set_var("TRAFFICGIS_CLUSTER_MEDIUM", "4");
    env::set_var("TRAFFICGIS_KML_NAME", "From Env");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
heatmap_cell_km = 0.5
cluster_medium_threshold = 8
kml_document_name = "From File"
"#
    )
    .unwrap();

    let config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    // Environment should override file
    assert_eq!(config.heatmap_cell_km.value, 2.5);
    assert_eq!(config.heatmap_cell_km.source, ConfigSource::Environment);
    assert_eq!(config.cluster_medium_threshold.value, 4);
    assert_eq!(config.cluster_medium_threshold.source, ConfigSource::Environment);
    assert_eq!(config.kml_document_name.value, "From Env");

    clear_env();
}

#[test]
#[serial]
fn test_invalid_environment_values_are_ignored() {
    clear_env();

    env::set_var("TRAFFICGIS_HEATMAP_CELL_KM", "-3");
    env::set_var("TRAFFICGIS_CLUSTER_RADIUS_M", "wide");
    env::set_var("TRAFFICGIS_CLUSTER_LARGE", "many");

    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.heatmap_cell_km.value, 1.0);
    assert_eq!(config.heatmap_cell_km.source, ConfigSource::Default);
    assert_eq!(config.cluster_radius_m.source, ConfigSource::Default);
    assert_eq!(config.cluster_large_threshold.value, 100);

    clear_env();
}

#[test]
#[serial]
fn test_inverted_environment_tiers_are_reverted() {
    clear_env();

    env::set_var("TRAFFICGIS_CLUSTER_MEDIUM", "200");
    env::set_var("TRAFFICGIS_CLUSTER_LARGE", "20");
    env::set_var("TRAFFICGIS_CLUSTER_RADIUS_M", "300");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "cluster_medium_threshold = 5\ncluster_large_threshold = 50").unwrap();

    let config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    // The thresholds keep their file values; unrelated variables still apply
    assert_eq!(config.tier_thresholds(), TierThresholds {
        medium: 5,
        large: 50,
    });
    assert_eq!(config.cluster_medium_threshold.source, ConfigSource::File);
    assert_eq!(config.cluster_large_threshold.source, ConfigSource::File);
    assert_eq!(config.cluster_radius_m.value, 300.0);
    assert_eq!(config.cluster_radius_m.source, ConfigSource::Environment);
    assert!(config.validate().is_ok());

    clear_env();
}

#[test]
#[serial]
fn test_environment_medium_above_default_large() {
    clear_env();

    env::set_var("TRAFFICGIS_CLUSTER_MEDIUM", "150");

    let config = LayeredConfig::with_defaults().load_from_env();
    assert_eq!(config.tier_thresholds(), TierThresholds::default());
    assert_eq!(config.cluster_medium_threshold.source, ConfigSource::Default);

    clear_env();
}

#[test]
#[serial]
fn test_configuration_precedence_order() {
    clear_env();
    env::set_var("TRAFFICGIS_CLUSTER_RADIUS_M", "300");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "cluster_radius_m = 200.0").unwrap();

    let mut config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    // At this point, environment should have overridden file
    assert_eq!(config.cluster_radius_m.value, 300.0);
    assert_eq!(config.cluster_radius_m.source, ConfigSource::Environment);

    // Now explicit overrides should win
    config
        .apply_overrides(ConfigOverrides {
            cluster_radius_m: Some(100.0),
            ..Default::default()
        })
        .unwrap();

    assert_eq!(config.cluster_radius_m.value, 100.0);
    assert_eq!(config.cluster_radius_m.source, ConfigSource::Override);

    // Verify precedence levels
    assert!(ConfigSource::Override.precedence() > ConfigSource::Environment.precedence());
    assert!(ConfigSource::Environment.precedence() > ConfigSource::File.precedence());
    assert!(ConfigSource::File.precedence() > ConfigSource::Default.precedence());

    clear_env();
}

#[test]
fn test_configuration_source_tracking() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "heatmap_cell_km = 2.0").unwrap();

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();
    let inspection_map = config.to_inspection_map();

    assert_eq!(inspection_map.len(), 5);

    let (cell_value, cell_source) = &inspection_map["heatmap_cell_km"];
    assert_eq!(cell_value, "2 km");
    assert_eq!(*cell_source, ConfigSource::File);

    let (name_value, name_source) = &inspection_map["kml_document_name"];
    assert_eq!(name_value, "Traffic Data");
    assert_eq!(*name_source, ConfigSource::Default);
}
