//! Integration tests for the layered configuration store.
//!
//! Each test builds its own working directory in a TempDir and injects the
//! environment through `EnvOverrides`, so nothing touches the process state.

use iptv_settings::config::{
    ALL_REGIONS, ConfigStore, CopyOutcome, DEFAULT_CONFIG_FILE, EnvOverrides, USER_CONFIG_FILE,
};
use iptv_settings::error::ConfigError;
use iptv_settings::paths::PathResolver;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const DEFAULT_INI: &str = "[Settings]
open_service = false
ipv_type = ipv4
urls_limit = 20
min_resolution = 1280x720
";

const USER_INI: &str = "[Settings]
open_service = true
ipv_type = 全部
urls_limit = 50
";

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn load(root: &Path, env: EnvOverrides) -> ConfigStore {
    ConfigStore::load_with(PathResolver::new(root, None), env)
}

/// Working directory holding both the default and the user file.
fn layered_dir() -> TempDir {
    let temp = TempDir::new().unwrap();
    write(temp.path(), DEFAULT_CONFIG_FILE, DEFAULT_INI);
    write(temp.path(), USER_CONFIG_FILE, USER_INI);
    temp
}

#[test]
fn user_config_overrides_defaults() {
    let temp = layered_dir();
    let store = load(temp.path(), EnvOverrides::default());

    assert!(store.open_service());
    assert_eq!(store.ipv_type(), "全部");
    assert_eq!(store.urls_limit(), 50);
    // Only in the default file
    assert_eq!(store.min_resolution(), "1280x720");
    assert_eq!(store.min_resolution_value(), 1280 * 720);
}

#[test]
fn empty_working_dir_uses_every_fallback() {
    let temp = TempDir::new().unwrap();
    let store = load(temp.path(), EnvOverrides::default());

    assert!(store.open_service());
    assert!(store.open_update());
    assert!(store.open_use_cache());
    assert!(!store.open_request());
    assert_eq!(store.ipv_type(), ALL_REGIONS);
    assert_eq!(store.ipv4_num(), 5);
    assert_eq!(store.ipv6_num(), 5);
    assert!(!store.ipv6_support());
    assert_eq!(store.min_resolution(), "1920x1080");
    assert_eq!(store.min_resolution_value(), 1920 * 1080);
    assert_eq!(store.app_port(), 8000);
    assert!(store.open_driver());
    assert_eq!(store.urls_limit(), 20);
    assert_eq!(store.cdn_url(), "");

    assert!(store.open_filter_speed());
    assert!(store.open_filter_resolution());
    assert_eq!(store.hotel_num(), 10);
    assert_eq!(store.multicast_num(), 10);
    assert_eq!(store.subscribe_num(), 10);
    assert_eq!(store.online_search_num(), 10);
    assert_eq!(store.sort_timeout(), 10);
    assert_eq!(store.request_timeout(), 10);
    assert!(!store.open_proxy());
    assert_eq!(store.hotel_page_num(), 1);
    assert_eq!(store.multicast_page_num(), 1);
    assert_eq!(store.online_search_page_num(), 1);
    assert!(store.open_empty_category());

    assert_eq!(store.update_time_position(), "top");
    assert_eq!(store.time_zone(), "Asia/Shanghai");
    assert!(!store.open_rtmp());
}

#[test]
fn list_fallbacks_differ_between_prefer_and_region_lists() {
    let temp = TempDir::new().unwrap();
    let store = load(temp.path(), EnvOverrides::default());

    assert!(store.ipv_type_prefer().is_empty());
    assert!(store.origin_type_prefer().is_empty());
    assert_eq!(store.multicast_region_list(), vec![ALL_REGIONS]);
    assert_eq!(store.hotel_region_list(), vec![ALL_REGIONS]);
}

#[test]
fn open_ipv6_follows_merged_ipv_type() {
    let temp = layered_dir();
    let store = load(temp.path(), EnvOverrides::default());
    assert!(store.open_ipv6());

    fs::remove_file(temp.path().join(USER_CONFIG_FILE)).unwrap();
    let store = load(temp.path(), EnvOverrides::default());
    assert!(!store.open_ipv6());
}

#[test]
fn app_port_prefers_environment() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), DEFAULT_CONFIG_FILE, "[Settings]\napp_port = 9000\n");

    let from_env = load(temp.path(), EnvOverrides::default().with_app_port("12345"));
    assert_eq!(from_env.app_port(), 12345);

    let from_file = load(temp.path(), EnvOverrides::default());
    assert_eq!(from_file.app_port(), 9000);
}

#[test]
fn lite_mode_disables_driver() {
    let temp = layered_dir();
    write(temp.path(), USER_CONFIG_FILE, "[Settings]\nopen_driver = true\n");

    assert!(load(temp.path(), EnvOverrides::default()).open_driver());
    assert!(!load(temp.path(), EnvOverrides::default().with_lite(true)).open_driver());
}

#[test]
fn open_method_has_every_method() {
    let temp = layered_dir();
    let store = load(temp.path(), EnvOverrides::default());

    let methods = store.open_method().to_map();
    for key in [
        "local",
        "subscribe",
        "hotel",
        "multicast",
        "online_search",
        "hotel_fofa",
        "hotel_foodie",
        "multicast_fofa",
        "multicast_foodie",
    ] {
        assert_eq!(methods.get(key), Some(&true), "{key}");
    }
}

#[test]
fn explicit_accessor_reads_undeclared_keys() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        DEFAULT_CONFIG_FILE,
        "[Settings]\nsome_dummy_attr = dummy_value\n[Extra]\nlimit = 3\n",
    );
    let store = load(temp.path(), EnvOverrides::default());

    assert_eq!(store.get("Settings", "some_dummy_attr"), Some("dummy_value"));
    assert_eq!(store.get_parsed_or("Extra", "limit", 0u32), 3);
    assert_eq!(store.get_str_or("Extra", "missing", "none"), "none");
}

#[test]
fn set_and_save_persists_to_user_file() {
    let temp = layered_dir();
    let mut store = load(temp.path(), EnvOverrides::default());

    store.set("Settings", "test_key", "test_value").unwrap();
    // Not written yet
    let before = fs::read_to_string(temp.path().join(USER_CONFIG_FILE)).unwrap();
    assert!(!before.contains("test_key"));

    let path = store.save().unwrap();
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("test_key = test_value"));

    let reloaded = load(temp.path(), EnvOverrides::default());
    assert_eq!(reloaded.get("Settings", "test_key"), Some("test_value"));
    assert_eq!(reloaded.urls_limit(), 50);
}

#[test]
fn multi_line_value_cannot_inject_sections() {
    let temp = layered_dir();
    let mut store = load(temp.path(), EnvOverrides::default());

    let err = store
        .set("Settings", "cdn_url", "https://cdn\n[Injected]\nopen_service = false")
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEntry { .. }));
    store.set("Settings", "cdn_url", "https://cdn").unwrap();
    store.save().unwrap();

    let reloaded = load(temp.path(), EnvOverrides::default());
    assert_eq!(reloaded.get("Settings", "cdn_url"), Some("https://cdn"));
    assert!(!reloaded.has_section("Injected"));
    assert_eq!(reloaded.document(), store.document());
}

#[test]
fn save_targets_working_dir_even_when_running_from_bundle() {
    let temp = TempDir::new().unwrap();
    let bundle = temp.path().join("bundle");
    let cwd = temp.path().join("cwd");
    write(&bundle, DEFAULT_CONFIG_FILE, DEFAULT_INI);
    fs::create_dir_all(&cwd).unwrap();

    let mut store = ConfigStore::load_with(
        PathResolver::new(&cwd, Some(bundle.clone())),
        EnvOverrides::default(),
    );
    assert_eq!(store.min_resolution(), "1280x720");

    store.set("Settings", "cdn_url", "https://cdn.example").unwrap();
    store.save().unwrap();

    assert!(cwd.join(USER_CONFIG_FILE).exists());
    assert!(!bundle.join(USER_CONFIG_FILE).exists());
}

#[test]
fn copy_bootstraps_config_directory() {
    let temp = TempDir::new().unwrap();
    let bundle = temp.path().join("bundle");
    write(&bundle, "config/dummy.txt", "dummy data");
    let cwd = temp.path().join("dest");
    fs::create_dir_all(&cwd).unwrap();

    let store = ConfigStore::load_with(PathResolver::new(&cwd, Some(bundle)), EnvOverrides::default());

    assert!(store.copy().is_success());
    assert_eq!(
        fs::read_to_string(cwd.join("config/dummy.txt")).unwrap(),
        "dummy data"
    );
}

#[test]
fn copy_without_template_reports_failure() {
    let temp = TempDir::new().unwrap();
    let store = load(temp.path(), EnvOverrides::default());

    let mut printed = Vec::new();
    let outcome = store.copy_reporting_to(&mut printed);
    let CopyOutcome::Failed { message } = outcome else {
        panic!("expected a failure, got {:?}", outcome);
    };
    assert!(message.contains("Failed to copy files"));
    assert_eq!(String::from_utf8(printed).unwrap().trim_end(), message);
}

#[test]
fn shipped_defaults_match_fallbacks() {
    let temp = TempDir::new().unwrap();
    let shipped = ConfigStore::load_with(
        PathResolver::new(temp.path(), Some(env!("CARGO_MANIFEST_DIR").into())),
        EnvOverrides::default(),
    );
    assert_eq!(shipped.loaded_files().len(), 1);

    let empty = load(temp.path(), EnvOverrides::default());
    assert_eq!(shipped.snapshot(), empty.snapshot());
}
