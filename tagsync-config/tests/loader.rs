use std::fs;
use std::time::Duration;

use tagsync_config::{ConfigGuardRailError, ConfigLoadError, ConfigLoader};

fn base_vars() -> Vec<(&'static str, &'static str)> {
    vec![
        ("STASHBOX_ENDPOINT", "https://stashdb.org/graphql"),
        ("STASHBOX_API_KEY", "remote-key"),
        ("STASHAPP_URL", "http://localhost:9999"),
        ("STASHAPP_API_KEY", "local-key"),
    ]
}

fn missing_env_file() -> std::path::PathBuf {
    std::path::PathBuf::from("/nonexistent/tagsync/.env")
}

#[test]
fn loads_defaults_from_minimal_environment() {
    let load = ConfigLoader::new()
        .with_vars(base_vars())
        .load()
        .expect("config should load");
    let config = load.config;

    assert_eq!(config.stashbox.endpoint.as_str(), "https://stashdb.org/graphql");
    assert_eq!(config.stash.host, "localhost");
    assert_eq!(config.stash.port, 9999);
    assert_eq!(
        config.stash.graphql_endpoint().unwrap().as_str(),
        "http://localhost:9999/graphql"
    );
    assert_eq!(config.fetch.page_size, 100);
    assert_eq!(config.fetch.page_delay, Duration::from_millis(750));
    assert_eq!(config.cache_path(), std::path::Path::new("tags.json"));
    assert_eq!(
        config.log_file(),
        std::path::Path::new("stashdb_tag_importer.log")
    );
    assert!(load.warnings.is_empty());
}

#[test]
fn stash_port_defaults_from_scheme() {
    let mut vars = base_vars();
    vars.retain(|(k, _)| *k != "STASHAPP_URL");
    vars.push(("STASHAPP_URL", "https://stash.lan/some/path"));

    let config = ConfigLoader::new().with_vars(vars).load().unwrap().config;
    assert_eq!(config.stash.port, 443);
    assert_eq!(
        config.stash.graphql_endpoint().unwrap().as_str(),
        "https://stash.lan/graphql"
    );
}

#[test]
fn missing_required_variable_is_reported_by_name() {
    let mut vars = base_vars();
    vars.retain(|(k, _)| *k != "STASHBOX_API_KEY");

    let err = ConfigLoader::new().with_vars(vars).load().unwrap_err();
    assert!(matches!(
        err,
        ConfigLoadError::MissingVar {
            key: "STASHBOX_API_KEY"
        }
    ));
}

#[test]
fn missing_local_api_key_is_a_warning() {
    let mut vars = base_vars();
    vars.retain(|(k, _)| *k != "STASHAPP_API_KEY");

    let load = ConfigLoader::new().with_vars(vars).load().unwrap();
    assert!(load.config.stash.api_key.is_none());
    assert_eq!(load.warnings.len(), 1);
    assert!(load.warnings.items[0].message.contains("STASHAPP_API_KEY"));
}

#[test]
fn env_file_fills_gaps_but_environment_wins() {
    let dir = tempfile::tempdir().unwrap();
    let env_path = dir.path().join("sync.env");
    fs::write(
        &env_path,
        "STASHBOX_API_KEY=from-file\nTAGSYNC_CACHE_PATH=/tmp/cache.json\nTAGSYNC_PAGE_DELAY=2s\n",
    )
    .unwrap();

    let load = ConfigLoader::new()
        .with_env_file(&env_path)
        .with_vars(base_vars())
        .load()
        .unwrap();

    assert_eq!(load.config.stashbox.api_key, "remote-key");
    assert_eq!(
        load.config.cache_path(),
        std::path::Path::new("/tmp/cache.json")
    );
    assert_eq!(load.config.fetch.page_delay, Duration::from_secs(2));
    assert!(load.config.metadata.env_file_loaded);
}

#[test]
fn explicit_env_file_must_exist() {
    let err = ConfigLoader::new()
        .with_env_file(missing_env_file())
        .with_vars(base_vars())
        .load()
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::EnvFileMissing { .. }));
}

#[test]
fn oversized_page_is_rejected() {
    let mut vars = base_vars();
    vars.push(("TAGSYNC_PAGE_SIZE", "250"));

    let err = ConfigLoader::new().with_vars(vars).load().unwrap_err();
    assert!(matches!(
        err,
        ConfigLoadError::GuardRail(ConfigGuardRailError::PageSizeOutOfRange {
            value: 250,
            ..
        })
    ));
}

#[test]
fn short_page_delay_warns() {
    let mut vars = base_vars();
    vars.push(("TAGSYNC_PAGE_DELAY", "0"));

    let load = ConfigLoader::new().with_vars(vars).load().unwrap();
    assert_eq!(load.config.fetch.page_delay, Duration::ZERO);
    assert!(
        load.warnings
            .items
            .iter()
            .any(|w| w.message.contains("TAGSYNC_PAGE_DELAY"))
    );
}
