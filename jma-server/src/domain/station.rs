//! Station identifier and classification types.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Error returned when parsing an invalid station code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station code {input:?}: {reason}")]
pub struct InvalidStationCode {
    input: String,
    reason: &'static str,
}

/// A valid 5-digit AMeDAS station code.
///
/// Station codes are assigned by JMA and never regenerated. The first two
/// digits are the regional block number, which identifies the prefecture.
///
/// # Examples
///
/// ```
/// use jma_server::domain::StationCode;
///
/// let tokyo = StationCode::parse("44132").unwrap();
/// assert_eq!(tokyo.as_str(), "44132");
/// assert_eq!(tokyo.block(), 44);
///
/// // Wrong length is rejected
/// assert!(StationCode::parse("4413").is_err());
///
/// // Non-digits are rejected
/// assert!(StationCode::parse("4413A").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationCode([u8; 5]);

impl StationCode {
    /// Parse a station code from a string.
    ///
    /// The input must be exactly 5 ASCII digits. Surrounding whitespace is
    /// not trimmed.
    pub fn parse(s: &str) -> Result<Self, InvalidStationCode> {
        let bytes = s.as_bytes();

        if bytes.len() != 5 {
            return Err(InvalidStationCode {
                input: s.to_string(),
                reason: "must be exactly 5 characters",
            });
        }

        if !bytes.iter().all(u8::is_ascii_digit) {
            return Err(InvalidStationCode {
                input: s.to_string(),
                reason: "must be ASCII digits 0-9",
            });
        }

        Ok(StationCode([bytes[0], bytes[1], bytes[2], bytes[3], bytes[4]]))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        // Only ASCII digits are ever stored.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// The two-digit regional block number (e.g. 44 for Tokyo).
    pub fn block(&self) -> u8 {
        (self.0[0] - b'0') * 10 + (self.0[1] - b'0')
    }
}

impl FromStr for StationCode {
    type Err = InvalidStationCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Debug for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationCode({})", self.as_str())
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StationCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Error returned when parsing a station type letter outside A-F.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station type {0:?}: must be one of A, B, C, D, E, F")]
pub struct InvalidStationType(pub String);

/// Station classification.
///
/// The type determines which sensors a station carries. Rain gauges (D) and
/// regional rain stations (F) have no thermometer, so observation payloads
/// for them lack temperature fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StationType {
    /// Staffed local meteorological observatory.
    A,
    /// Special regional observation station (formerly staffed).
    B,
    /// Four-element AMeDAS station.
    C,
    /// Rain gauge.
    D,
    /// Snow depth station.
    E,
    /// Regional rain station.
    F,
}

impl StationType {
    /// All station types in letter order.
    pub const ALL: [StationType; 6] = [
        StationType::A,
        StationType::B,
        StationType::C,
        StationType::D,
        StationType::E,
        StationType::F,
    ];

    /// The single-letter code.
    pub fn as_str(&self) -> &'static str {
        match self {
            StationType::A => "A",
            StationType::B => "B",
            StationType::C => "C",
            StationType::D => "D",
            StationType::E => "E",
            StationType::F => "F",
        }
    }

    /// Human-readable description of the station class.
    pub fn description(&self) -> &'static str {
        match self {
            StationType::A => "Staffed observatory",
            StationType::B => "Special regional station",
            StationType::C => "AMeDAS",
            StationType::D => "Rain gauge",
            StationType::E => "Snow depth",
            StationType::F => "Regional rain",
        }
    }
}

impl FromStr for StationType {
    type Err = InvalidStationType;

    /// Parses an uppercase type letter. Anything else, lowercase included,
    /// is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(StationType::A),
            "B" => Ok(StationType::B),
            "C" => Ok(StationType::C),
            "D" => Ok(StationType::D),
            "E" => Ok(StationType::E),
            "F" => Ok(StationType::F),
            _ => Err(InvalidStationType(s.to_string())),
        }
    }
}

impl fmt::Display for StationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StationType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
