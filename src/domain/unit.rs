// Display units understood by Grafana field configs
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Unit {
    #[serde(rename = "decbytes")]
    BytesSi,
    #[serde(rename = "Bps")]
    BytesPerSecSi,
    #[serde(rename = "s")]
    Seconds,
    #[serde(rename = "short")]
    Short,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::BytesSi => "decbytes",
            Unit::BytesPerSecSi => "Bps",
            Unit::Seconds => "s",
            Unit::Short => "short",
        }
    }
}
