//! Movement report enumerations.
//!
//! TRUST sends these as fixed uppercase strings. Each enum pairs a sum
//! type with an exact-match mapping from the wire form, so an unmapped
//! value is a decode error rather than a silent default.

use std::fmt;

use super::error::DecodeError;

/// The kind of event a movement report describes.
///
/// One of `"ARRIVAL"`, `"DEPARTURE"` or `"DESTINATION"` on the wire.
///
/// # Examples
///
/// ```
/// use movement_listener::domain::EventType;
///
/// assert_eq!(EventType::from_wire("ARRIVAL").unwrap(), EventType::Arrival);
/// assert!(EventType::from_wire("arrival").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Arrival,
    Departure,
    Destination,
}

impl EventType {
    /// Map the uppercase wire string to a variant.
    pub fn from_wire(s: &str) -> Result<Self, DecodeError> {
        match s {
            "ARRIVAL" => Ok(EventType::Arrival),
            "DEPARTURE" => Ok(EventType::Departure),
            "DESTINATION" => Ok(EventType::Destination),
            _ => Err(DecodeError::UnknownEnumValue {
                enum_name: "EventType",
                value: s.to_string(),
            }),
        }
    }

    /// Lowercase name used in rendered output.
    pub fn name(&self) -> &'static str {
        match self {
            EventType::Arrival => "arrival",
            EventType::Departure => "departure",
            EventType::Destination => "destination",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How the reported time compares against the schedule.
///
/// One of `"ON TIME"`, `"EARLY"`, `"LATE"` or `"OFF ROUTE"` on the wire.
///
/// # Examples
///
/// ```
/// use movement_listener::domain::VariationStatus;
///
/// assert_eq!(
///     VariationStatus::from_wire("ON TIME").unwrap(),
///     VariationStatus::OnTime
/// );
/// assert!(VariationStatus::from_wire("ONTIME").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariationStatus {
    OnTime,
    Early,
    Late,
    OffRoute,
}

impl VariationStatus {
    /// Map the uppercase wire string to a variant.
    pub fn from_wire(s: &str) -> Result<Self, DecodeError> {
        match s {
            "ON TIME" => Ok(VariationStatus::OnTime),
            "EARLY" => Ok(VariationStatus::Early),
            "LATE" => Ok(VariationStatus::Late),
            "OFF ROUTE" => Ok(VariationStatus::OffRoute),
            _ => Err(DecodeError::UnknownEnumValue {
                enum_name: "VariationStatus",
                value: s.to_string(),
            }),
        }
    }

    /// Lowercase name used in rendered output.
    pub fn name(&self) -> &'static str {
        match self {
            VariationStatus::OnTime => "on_time",
            VariationStatus::Early => "early",
            VariationStatus::Late => "late",
            VariationStatus::OffRoute => "off_route",
        }
    }
}

impl fmt::Display for VariationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
