#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Direction of a series over a flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    pub fn as_str(self) -> &'static str {
        match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Stable => "stable",
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trend classification of one named series
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrendAnalysisResult {
    pub trend: Trend,
    /// 0..=100
    pub confidence: u8,
    pub slope: f64,
    /// Pearson correlation, -1..=1
    pub correlation: f64,
    /// Set when the direction is physically suspicious (e.g. battery voltage rising)
    pub anomalous: bool,
}

impl TrendAnalysisResult {
    /// Result for a missing or too-short series
    pub fn no_data() -> Self {
        Self {
            trend: Trend::Stable,
            confidence: 0,
            slope: 0.0,
            correlation: 0.0,
            anomalous: false,
        }
    }

    /// Result for a static scalar that cannot trend
    pub fn static_scalar() -> Self {
        Self {
            confidence: 100,
            ..Self::no_data()
        }
    }
}

/// One trend per tracked dashboard metric
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FlightTrends {
    pub altitude: TrendAnalysisResult,
    pub battery: TrendAnalysisResult,
    pub gps: TrendAnalysisResult,
    pub duration: TrendAnalysisResult,
    pub distance: TrendAnalysisResult,
    pub file_size: TrendAnalysisResult,
}
