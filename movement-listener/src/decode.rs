//! Field decoders for raw movement report values.
//!
//! Every value on the wire is a string, including booleans and epoch
//! timestamps. The decoders here are pure: each one either produces a
//! typed value or fails with a [`DecodeError`] carrying the offending
//! input. Lookup-backed decoders delegate resolution to the injected
//! lookup service and treat a miss as `None`, not a failure.

use chrono::{DateTime, Utc};

use crate::domain::DecodeError;
use crate::lookup::{Company, CompanyLookup, Location, LocationLookup};

/// Unit of the integer epoch timestamps on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampUnit {
    Seconds,
    Milliseconds,
}

/// The feed's timestamp unit.
///
/// The feed documentation does not state the unit, but observed values
/// only make sense as milliseconds (`"1455883470000"` would be the year
/// 48105 as seconds). If that ever turns out wrong, correcting this
/// constant is the whole fix; no decoder logic refers to the unit
/// directly.
pub const WIRE_TIMESTAMP_UNIT: TimestampUnit = TimestampUnit::Milliseconds;

/// TOC code that means "no operator" rather than an unknown one.
const NO_OPERATOR_CODE: &str = "00";

/// Decode a wire boolean.
///
/// Exactly `"true"` or `"false"`; anything else is a decode failure.
///
/// # Examples
///
/// ```
/// use movement_listener::decode::decode_boolean;
///
/// assert!(decode_boolean("true").unwrap());
/// assert!(!decode_boolean("false").unwrap());
/// assert!(decode_boolean("True").is_err());
/// ```
pub fn decode_boolean(s: &str) -> Result<bool, DecodeError> {
    match s {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(DecodeError::InvalidBoolean(s.to_string())),
    }
}

/// Decode a wire epoch timestamp.
///
/// The empty string means the field was intentionally left blank and
/// decodes to `None`. Anything else must be an integer count of
/// [`WIRE_TIMESTAMP_UNIT`] ticks since the Unix epoch.
///
/// # Examples
///
/// ```
/// use movement_listener::decode::decode_timestamp;
///
/// let decoded = decode_timestamp("1455883470000").unwrap().unwrap();
/// assert_eq!(decoded.timestamp_millis(), 1455883470000);
///
/// assert_eq!(decode_timestamp("").unwrap(), None);
/// assert!(decode_timestamp("abc").is_err());
/// ```
pub fn decode_timestamp(s: &str) -> Result<Option<DateTime<Utc>>, DecodeError> {
    if s.is_empty() {
        return Ok(None);
    }

    let ticks: i64 = s
        .parse()
        .map_err(|_| DecodeError::InvalidTimestamp(s.to_string()))?;

    let decoded = match WIRE_TIMESTAMP_UNIT {
        TimestampUnit::Seconds => DateTime::from_timestamp(ticks, 0),
        TimestampUnit::Milliseconds => DateTime::from_timestamp_millis(ticks),
    };

    // Out-of-range instants are as undecodable as non-numeric input
    decoded
        .map(Some)
        .ok_or_else(|| DecodeError::InvalidTimestamp(s.to_string()))
}

/// Resolve a STANOX code against the location lookup.
///
/// Total: an unresolved code (including the empty string) is a legitimate
/// miss, not an error. A station may be unknown to the static table while
/// the report itself is perfectly valid.
pub fn decode_location(stanox: &str, locations: &dyn LocationLookup) -> Option<Location> {
    locations.from_stanox(stanox)
}

/// Decode a wire operating company code and resolve it.
///
/// `"00"` is the documented "no operator" sentinel and decodes to `None`.
/// Any other value must parse as a numeric TOC code, which is then
/// resolved against the company lookup; a lookup miss is `None`.
///
/// # Examples
///
/// ```
/// use movement_listener::decode::decode_operating_company;
/// use movement_listener::lookup::CompanyDirectory;
///
/// let companies = CompanyDirectory::empty();
/// assert_eq!(decode_operating_company("00", &companies).unwrap(), None);
/// assert!(decode_operating_company("xx", &companies).is_err());
/// ```
pub fn decode_operating_company(
    s: &str,
    companies: &dyn CompanyLookup,
) -> Result<Option<Company>, DecodeError> {
    if s == NO_OPERATOR_CODE {
        return Ok(None);
    }

    let code: u16 = s
        .parse()
        .map_err(|_| DecodeError::InvalidOperatingCompanyCode(s.to_string()))?;

    Ok(companies.from_numeric_code(code))
}
