//! Record shapes exchanged with the fetch and speed-test pipeline.
//!
//! Records are open: fields not listed here are kept in `extra` and written
//! back out unchanged.

use crate::error::{RecordError, RecordResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use std::str::FromStr;

/// How a channel source was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OriginType {
    Local,
    Whitelist,
    Subscribe,
    Hotel,
    Multicast,
    OnlineSearch,
}

impl OriginType {
    pub const ALL: [OriginType; 6] = [
        OriginType::Local,
        OriginType::Whitelist,
        OriginType::Subscribe,
        OriginType::Hotel,
        OriginType::Multicast,
        OriginType::OnlineSearch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OriginType::Local => "local",
            OriginType::Whitelist => "whitelist",
            OriginType::Subscribe => "subscribe",
            OriginType::Hotel => "hotel",
            OriginType::Multicast => "multicast",
            OriginType::OnlineSearch => "online_search",
        }
    }
}

impl std::fmt::Display for OriginType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OriginType {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|origin| origin.as_str() == s)
            .ok_or_else(|| RecordError::InvalidOrigin(s.to_string()))
    }
}

/// Network layer of a source URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpvType {
    Ipv4,
    Ipv6,
}

impl IpvType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IpvType::Ipv4 => "ipv4",
            IpvType::Ipv6 => "ipv6",
        }
    }
}

impl std::fmt::Display for IpvType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IpvType {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ipv4" => Ok(IpvType::Ipv4),
            "ipv6" => Ok(IpvType::Ipv6),
            other => Err(RecordError::InvalidIpvType(other.to_string())),
        }
    }
}

/// A single discovered stream source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelData {
    pub id: i64,
    pub url: String,
    pub host: String,
    /// Capture date as reported by the source.
    pub date: Option<String>,
    /// Resolution label such as `1920x1080`.
    pub resolution: Option<String>,
    pub origin: OriginType,
    pub ipv_type: Option<IpvType>,
    /// Unlisted fields, preserved as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChannelData {
    pub fn new(id: i64, url: impl Into<String>, host: impl Into<String>, origin: OriginType) -> Self {
        Self {
            id,
            url: url.into(),
            host: host.into(),
            date: None,
            resolution: None,
            origin,
            ipv_type: None,
            extra: Map::new(),
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_resolution(mut self, resolution: impl Into<String>) -> Self {
        self.resolution = Some(resolution.into());
        self
    }

    pub fn with_ipv_type(mut self, ipv_type: IpvType) -> Self {
        self.ipv_type = Some(ipv_type);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// One speed/latency measurement of a channel.
///
/// Measurements stay `Number`s so integers are written back as integers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// Download speed in MB/s.
    pub speed: Option<Number>,
    /// Latency in milliseconds.
    pub delay: Option<Number>,
    pub resolution: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TestResult {
    pub fn new(speed: Option<Number>, delay: Option<Number>, resolution: Option<String>) -> Self {
        Self {
            speed,
            delay,
            resolution,
            extra: Map::new(),
        }
    }

    pub fn speed_value(&self) -> Option<f64> {
        self.speed.as_ref().and_then(Number::as_f64)
    }

    pub fn delay_value(&self) -> Option<f64> {
        self.delay.as_ref().and_then(Number::as_f64)
    }
}

/// Category → subcategory → channels, in presentation order within each list.
pub type CategoryChannelData = BTreeMap<String, BTreeMap<String, Vec<ChannelData>>>;

/// Channel key → test results, oldest first.
pub type TestResultCacheData = BTreeMap<String, Vec<TestResult>>;

/// Either a channel or a measurement, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChannelTestResult {
    Channel(ChannelData),
    Result(TestResult),
}

impl ChannelTestResult {
    /// Classify an untagged record by its keys.
    ///
    /// `id` marks a channel and `speed` a test result. A record carrying both
    /// is rejected rather than guessed.
    pub fn classify(value: Value) -> RecordResult<Self> {
        let Value::Object(ref map) = value else {
            return Err(RecordError::Unrecognized);
        };
        match (map.contains_key("id"), map.contains_key("speed")) {
            (true, true) => Err(RecordError::Ambiguous),
            (true, false) => Ok(Self::Channel(serde_json::from_value(value)?)),
            (false, true) => Ok(Self::Result(serde_json::from_value(value)?)),
            (false, false) => Err(RecordError::Unrecognized),
        }
    }

    pub fn as_channel(&self) -> Option<&ChannelData> {
        match self {
            Self::Channel(channel) => Some(channel),
            Self::Result(_) => None,
        }
    }

    pub fn as_result(&self) -> Option<&TestResult> {
        match self {
            Self::Result(result) => Some(result),
            Self::Channel(_) => None,
        }
    }
}
