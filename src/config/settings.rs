//! Typed settings.
//!
//! Every accessor reads one key from the `[Settings]` section, coerces it and
//! falls back to a fixed value when the key is absent, empty or invalid.

use super::loader::{ConfigStore, SETTINGS_SECTION};
use regex_lite::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Region list used when no region is configured.
pub const ALL_REGIONS: &str = "全部";

const RESOLUTION_PATTERN: &str = r"(\d+)[xX*](\d+)";

/// Pixel count of a `<width>x<height>` string.
///
/// The separator may be `x`, `X` or `*`. Returns 0 when the text holds no
/// such pattern; callers treat 0 as "unknown", not as a real resolution.
pub fn get_resolution_value(text: &str) -> u64 {
    let Ok(re) = Regex::new(RESOLUTION_PATTERN) else {
        return 0;
    };
    let Some(caps) = re.captures(text) else {
        return 0;
    };
    let width = caps[1].parse::<u64>().ok();
    let height = caps[2].parse::<u64>().ok();
    match (width, height) {
        (Some(w), Some(h)) => w.checked_mul(h).unwrap_or(0),
        _ => 0,
    }
}

/// Split a `,`/`，` separated list, trimming items and dropping empty ones.
pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split([',', '，'])
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Which discovery methods are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OpenMethods {
    pub local: bool,
    pub subscribe: bool,
    pub hotel: bool,
    pub multicast: bool,
    pub online_search: bool,
    pub hotel_fofa: bool,
    pub hotel_foodie: bool,
    pub multicast_fofa: bool,
    pub multicast_foodie: bool,
}

impl OpenMethods {
    /// Method name → enabled, keyed by the names used across the pipeline.
    pub fn to_map(&self) -> BTreeMap<&'static str, bool> {
        BTreeMap::from([
            ("local", self.local),
            ("subscribe", self.subscribe),
            ("hotel", self.hotel),
            ("multicast", self.multicast),
            ("online_search", self.online_search),
            ("hotel_fofa", self.hotel_fofa),
            ("hotel_foodie", self.hotel_foodie),
            ("multicast_fofa", self.multicast_fofa),
            ("multicast_foodie", self.multicast_foodie),
        ])
    }

    pub fn is_enabled(&self, method: &str) -> bool {
        self.to_map().get(method).copied().unwrap_or(false)
    }
}

impl ConfigStore {
    fn setting_bool(&self, key: &str, fallback: bool) -> bool {
        self.get_bool_or(SETTINGS_SECTION, key, fallback)
    }

    fn setting_str(&self, key: &str, fallback: &str) -> String {
        self.get_str_or(SETTINGS_SECTION, key, fallback)
    }

    fn setting<T: FromStr + std::fmt::Debug>(&self, key: &str, fallback: T) -> T {
        self.get_parsed_or(SETTINGS_SECTION, key, fallback)
    }

    fn setting_list(&self, key: &str) -> Vec<String> {
        parse_list(&self.setting_str(key, ""))
    }

    fn setting_regions(&self, key: &str) -> Vec<String> {
        let regions = self.setting_list(key);
        if regions.is_empty() {
            vec![ALL_REGIONS.to_string()]
        } else {
            regions
        }
    }

    // Service and update flow

    pub fn open_service(&self) -> bool {
        self.setting_bool("open_service", true)
    }

    pub fn open_update(&self) -> bool {
        self.setting_bool("open_update", true)
    }

    pub fn open_use_cache(&self) -> bool {
        self.setting_bool("open_use_cache", true)
    }

    pub fn open_request(&self) -> bool {
        self.setting_bool("open_request", false)
    }

    /// Browser driver for scraping. Always off in lite mode.
    pub fn open_driver(&self) -> bool {
        if self.env().lite {
            return false;
        }
        self.setting_bool("open_driver", true)
    }

    pub fn open_proxy(&self) -> bool {
        self.setting_bool("open_proxy", false)
    }

    pub fn open_sort(&self) -> bool {
        self.setting_bool("open_sort", true)
    }

    pub fn open_history(&self) -> bool {
        self.setting_bool("open_history", true)
    }

    pub fn open_supply(&self) -> bool {
        self.setting_bool("open_supply", true)
    }

    pub fn open_use_old_result(&self) -> bool {
        self.setting_bool("open_use_old_result", true)
    }

    pub fn open_keep_all(&self) -> bool {
        self.setting_bool("open_keep_all", false)
    }

    pub fn open_update_time(&self) -> bool {
        self.setting_bool("open_update_time", true)
    }

    pub fn open_url_info(&self) -> bool {
        self.setting_bool("open_url_info", true)
    }

    pub fn open_m3u_result(&self) -> bool {
        self.setting_bool("open_m3u_result", true)
    }

    /// Keep categories that ended up with no channels.
    pub fn open_empty_category(&self) -> bool {
        self.setting_bool("open_empty_category", true)
    }

    pub fn open_filter_speed(&self) -> bool {
        self.setting_bool("open_filter_speed", true)
    }

    pub fn open_filter_resolution(&self) -> bool {
        self.setting_bool("open_filter_resolution", true)
    }

    pub fn open_rtmp(&self) -> bool {
        self.setting_bool("open_rtmp", false)
    }

    pub fn speed_test_filter_host(&self) -> bool {
        self.setting_bool("speed_test_filter_host", false)
    }

    // Discovery methods

    pub fn open_local(&self) -> bool {
        self.setting_bool("open_local", true)
    }

    pub fn open_subscribe(&self) -> bool {
        self.setting_bool("open_subscribe", true)
    }

    pub fn open_hotel(&self) -> bool {
        self.setting_bool("open_hotel", true)
    }

    pub fn open_multicast(&self) -> bool {
        self.setting_bool("open_multicast", true)
    }

    pub fn open_online_search(&self) -> bool {
        self.setting_bool("open_online_search", true)
    }

    pub fn open_hotel_fofa(&self) -> bool {
        self.setting_bool("open_hotel_fofa", true)
    }

    pub fn open_hotel_foodie(&self) -> bool {
        self.setting_bool("open_hotel_foodie", true)
    }

    pub fn open_multicast_fofa(&self) -> bool {
        self.setting_bool("open_multicast_fofa", true)
    }

    pub fn open_multicast_foodie(&self) -> bool {
        self.setting_bool("open_multicast_foodie", true)
    }

    pub fn open_method(&self) -> OpenMethods {
        OpenMethods {
            local: self.open_local(),
            subscribe: self.open_subscribe(),
            hotel: self.open_hotel(),
            multicast: self.open_multicast(),
            online_search: self.open_online_search(),
            hotel_fofa: self.open_hotel_fofa(),
            hotel_foodie: self.open_hotel_foodie(),
            multicast_fofa: self.open_multicast_fofa(),
            multicast_foodie: self.open_multicast_foodie(),
        }
    }

    // IP protocol

    /// `ipv4`, `ipv6` or `全部`/`all`, lower-cased.
    pub fn ipv_type(&self) -> String {
        self.setting_str("ipv_type", ALL_REGIONS).to_lowercase()
    }

    /// Whether IPv6 sources are wanted at all.
    pub fn open_ipv6(&self) -> bool {
        let ipv_type = self.ipv_type();
        ["ipv6", ALL_REGIONS, "all"]
            .into_iter()
            .any(|needle| ipv_type.contains(needle))
    }

    pub fn ipv6_support(&self) -> bool {
        self.setting_bool("ipv6_support", false)
    }

    pub fn ipv4_num(&self) -> usize {
        self.setting("ipv4_num", 5)
    }

    pub fn ipv6_num(&self) -> usize {
        self.setting("ipv6_num", 5)
    }

    pub fn ipv_type_prefer(&self) -> Vec<String> {
        self.setting_list("ipv_type_prefer")
            .into_iter()
            .map(|item| item.to_lowercase())
            .collect()
    }

    pub fn origin_type_prefer(&self) -> Vec<String> {
        self.setting_list("origin_type_prefer")
            .into_iter()
            .map(|item| item.to_lowercase())
            .collect()
    }

    // Result limits

    pub fn urls_limit(&self) -> usize {
        self.setting("urls_limit", 20)
    }

    pub fn local_num(&self) -> usize {
        self.setting("local_num", 10)
    }

    pub fn hotel_num(&self) -> usize {
        self.setting("hotel_num", 10)
    }

    pub fn multicast_num(&self) -> usize {
        self.setting("multicast_num", 10)
    }

    pub fn subscribe_num(&self) -> usize {
        self.setting("subscribe_num", 10)
    }

    pub fn online_search_num(&self) -> usize {
        self.setting("online_search_num", 10)
    }

    pub fn hotel_page_num(&self) -> usize {
        self.setting("hotel_page_num", 1)
    }

    pub fn multicast_page_num(&self) -> usize {
        self.setting("multicast_page_num", 1)
    }

    pub fn online_search_page_num(&self) -> usize {
        self.setting("online_search_page_num", 1)
    }

    pub fn hotel_region_list(&self) -> Vec<String> {
        self.setting_regions("hotel_region_list")
    }

    pub fn multicast_region_list(&self) -> Vec<String> {
        self.setting_regions("multicast_region_list")
    }

    pub fn recent_days(&self) -> u32 {
        self.setting("recent_days", 30)
    }

    // Speed test

    /// Seconds.
    pub fn sort_timeout(&self) -> u64 {
        self.setting("sort_timeout", 10)
    }

    /// Seconds.
    pub fn request_timeout(&self) -> u64 {
        self.setting("request_timeout", 10)
    }

    /// Seconds.
    pub fn speed_test_timeout(&self) -> u64 {
        self.setting("speed_test_timeout", 10)
    }

    pub fn speed_test_limit(&self) -> usize {
        self.setting("speed_test_limit", 10)
    }

    /// Minimum accepted speed in MB/s.
    pub fn min_speed(&self) -> f64 {
        self.setting("min_speed", 0.5)
    }

    pub fn min_resolution(&self) -> String {
        self.setting_str("min_resolution", "1920x1080")
    }

    pub fn min_resolution_value(&self) -> u64 {
        get_resolution_value(&self.min_resolution())
    }

    // Service

    /// `APP_PORT` wins over the file when it holds a valid port.
    pub fn app_port(&self) -> u16 {
        if let Some(ref raw) = self.env().app_port {
            match raw.parse() {
                Ok(port) => return port,
                Err(_) => tracing::warn!(value = %raw, "Ignoring invalid APP_PORT"),
            }
        }
        self.setting("app_port", 8000)
    }

    pub fn app_host(&self) -> String {
        self.setting_str("app_host", "http://localhost")
    }

    pub fn cdn_url(&self) -> String {
        self.setting_str("cdn_url", "")
    }

    // Files and output

    pub fn source_file(&self) -> String {
        self.setting_str("source_file", "config/demo.txt")
    }

    pub fn final_file(&self) -> String {
        self.setting_str("final_file", "output/result.txt")
    }

    pub fn update_time_position(&self) -> String {
        self.setting_str("update_time_position", "top")
    }

    pub fn time_zone(&self) -> String {
        self.setting_str("time_zone", "Asia/Shanghai")
    }

    /// Every typed setting at once.
    pub fn snapshot(&self) -> SettingsSnapshot {
        SettingsSnapshot {
            open_service: self.open_service(),
            open_update: self.open_update(),
            open_use_cache: self.open_use_cache(),
            open_request: self.open_request(),
            open_driver: self.open_driver(),
            open_proxy: self.open_proxy(),
            open_sort: self.open_sort(),
            open_history: self.open_history(),
            open_supply: self.open_supply(),
            open_use_old_result: self.open_use_old_result(),
            open_keep_all: self.open_keep_all(),
            open_update_time: self.open_update_time(),
            open_url_info: self.open_url_info(),
            open_m3u_result: self.open_m3u_result(),
            open_empty_category: self.open_empty_category(),
            open_filter_speed: self.open_filter_speed(),
            open_filter_resolution: self.open_filter_resolution(),
            open_rtmp: self.open_rtmp(),
            speed_test_filter_host: self.speed_test_filter_host(),
            open_method: self.open_method(),
            ipv_type: self.ipv_type(),
            open_ipv6: self.open_ipv6(),
            ipv6_support: self.ipv6_support(),
            ipv4_num: self.ipv4_num(),
            ipv6_num: self.ipv6_num(),
            ipv_type_prefer: self.ipv_type_prefer(),
            origin_type_prefer: self.origin_type_prefer(),
            urls_limit: self.urls_limit(),
            local_num: self.local_num(),
            hotel_num: self.hotel_num(),
            multicast_num: self.multicast_num(),
            subscribe_num: self.subscribe_num(),
            online_search_num: self.online_search_num(),
            hotel_page_num: self.hotel_page_num(),
            multicast_page_num: self.multicast_page_num(),
            online_search_page_num: self.online_search_page_num(),
            hotel_region_list: self.hotel_region_list(),
            multicast_region_list: self.multicast_region_list(),
            recent_days: self.recent_days(),
            sort_timeout: self.sort_timeout(),
            request_timeout: self.request_timeout(),
            speed_test_timeout: self.speed_test_timeout(),
            speed_test_limit: self.speed_test_limit(),
            min_speed: self.min_speed(),
            min_resolution: self.min_resolution(),
            min_resolution_value: self.min_resolution_value(),
            app_port: self.app_port(),
            app_host: self.app_host(),
            cdn_url: self.cdn_url(),
            source_file: self.source_file(),
            final_file: self.final_file(),
            update_time_position: self.update_time_position(),
            time_zone: self.time_zone(),
        }
    }
}

/// Effective value of every typed setting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingsSnapshot {
    pub open_service: bool,
    pub open_update: bool,
    pub open_use_cache: bool,
    pub open_request: bool,
    pub open_driver: bool,
    pub open_proxy: bool,
    pub open_sort: bool,
    pub open_history: bool,
    pub open_supply: bool,
    pub open_use_old_result: bool,
    pub open_keep_all: bool,
    pub open_update_time: bool,
    pub open_url_info: bool,
    pub open_m3u_result: bool,
    pub open_empty_category: bool,
    pub open_filter_speed: bool,
    pub open_filter_resolution: bool,
    pub open_rtmp: bool,
    pub speed_test_filter_host: bool,
    pub open_method: OpenMethods,
    pub ipv_type: String,
    pub open_ipv6: bool,
    pub ipv6_support: bool,
    pub ipv4_num: usize,
    pub ipv6_num: usize,
    pub ipv_type_prefer: Vec<String>,
    pub origin_type_prefer: Vec<String>,
    pub urls_limit: usize,
    pub local_num: usize,
    pub hotel_num: usize,
    pub multicast_num: usize,
    pub subscribe_num: usize,
    pub online_search_num: usize,
    pub hotel_page_num: usize,
    pub multicast_page_num: usize,
    pub online_search_page_num: usize,
    pub hotel_region_list: Vec<String>,
    pub multicast_region_list: Vec<String>,
    pub recent_days: u32,
    pub sort_timeout: u64,
    pub request_timeout: u64,
    pub speed_test_timeout: u64,
    pub speed_test_limit: usize,
    pub min_speed: f64,
    pub min_resolution: String,
    pub min_resolution_value: u64,
    pub app_port: u16,
    pub app_host: String,
    pub cdn_url: String,
    pub source_file: String,
    pub final_file: String,
    pub update_time_position: String,
    pub time_zone: String,
}
