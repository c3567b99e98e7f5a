//! Decoded view over a train movement report body.

use std::convert::Infallible;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::decode::{decode_boolean, decode_location, decode_operating_company, decode_timestamp};
use crate::lookup::{Company, CompanyLookup, Location, LocationLookup};

use super::error::{DecodeError, ValidationError};
use super::event::{EventType, VariationStatus};

/// Rendered when either timestamp needed for the lateness figure is blank.
const UNKNOWN_VARIATION: &str = "[unknown]";

/// A decoded train movement report.
///
/// Holds the raw body as received and decodes fields on access, so a
/// report with one undecodable field can still serve every other field.
/// The only eager work at construction is the schema assumption check:
/// `division_code` and `toc_id` must resolve to the same operating
/// company.
///
/// A raw body looks like:
///
/// ```json
/// {
///     "event_type": "DEPARTURE",
///     "variation_status": "LATE",
///     "planned_timestamp": "1455883470000",
///     "actual_timestamp": "1455883560000",
///     "loc_stanox": "87701",
///     "toc_id": "88",
///     "division_code": "88",
///     "train_id": "892A39MI19",
///     ...
/// }
/// ```
pub struct MovementRecord {
    raw: Map<String, Value>,
    locations: Arc<dyn LocationLookup>,
    companies: Arc<dyn CompanyLookup>,
}

impl std::fmt::Debug for MovementRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MovementRecord")
            .field("raw", &self.raw)
            .finish_non_exhaustive()
    }
}

impl MovementRecord {
    /// Construct a record over a raw body, validating the schema
    /// assumption eagerly.
    ///
    /// A mismatch between the decoded `division_code` and `toc_id` rejects
    /// the whole report; so does a decode failure on either field, since
    /// the invariant cannot be established without them.
    pub fn from_body(
        raw: Map<String, Value>,
        locations: Arc<dyn LocationLookup>,
        companies: Arc<dyn CompanyLookup>,
    ) -> Result<Self, ValidationError> {
        let record = Self {
            raw,
            locations,
            companies,
        };
        record.validate_assumptions()?;
        Ok(record)
    }

    fn validate_assumptions(&self) -> Result<(), ValidationError> {
        if self.operating_company()? != self.division_code()? {
            return Err(ValidationError::SchemaAssumptionViolated {
                toc_id: self.field("toc_id")?.to_string(),
                division_code: self.field("division_code")?.to_string(),
            });
        }
        Ok(())
    }

    /// Fetch a mandatory raw field as a string.
    fn field(&self, name: &'static str) -> Result<&str, DecodeError> {
        match self.raw.get(name) {
            Some(Value::String(s)) => Ok(s),
            _ => Err(DecodeError::MissingField(name)),
        }
    }

    /// The kind of event the schedule planned at this location.
    pub fn planned_event_type(&self) -> Result<EventType, DecodeError> {
        EventType::from_wire(self.field("planned_event_type")?)
    }

    /// The kind of event that actually happened.
    pub fn event_type(&self) -> Result<EventType, DecodeError> {
        EventType::from_wire(self.field("event_type")?)
    }

    /// How the reported time compares against the schedule.
    pub fn status(&self) -> Result<VariationStatus, DecodeError> {
        VariationStatus::from_wire(self.field("variation_status")?)
    }

    /// When the event was planned to happen.
    pub fn planned_datetime(&self) -> Result<Option<DateTime<Utc>>, DecodeError> {
        decode_timestamp(self.field("planned_timestamp")?)
    }

    /// When the event actually happened.
    pub fn actual_datetime(&self) -> Result<Option<DateTime<Utc>>, DecodeError> {
        decode_timestamp(self.field("actual_timestamp")?)
    }

    /// The planned time in the Great Britain passenger timetable.
    pub fn planned_timetable_datetime(&self) -> Result<Option<DateTime<Utc>>, DecodeError> {
        decode_timestamp(self.field("gbtt_timestamp")?)
    }

    /// The location on the rail network at which this event happened,
    /// if the static table knows its STANOX code.
    pub fn location(&self) -> Result<Option<Location>, DecodeError> {
        Ok(decode_location(
            self.field("loc_stanox")?,
            self.locations.as_ref(),
        ))
    }

    /// The raw STANOX code for the event location, always present.
    pub fn location_stanox(&self) -> Result<&str, DecodeError> {
        self.field("loc_stanox")
    }

    /// Whether this report corrects an earlier one.
    pub fn is_correction(&self) -> Result<bool, DecodeError> {
        decode_boolean(self.field("correction_ind")?)
    }

    /// Whether the train has completed its journey.
    pub fn train_terminated(&self) -> Result<bool, DecodeError> {
        decode_boolean(self.field("train_terminated")?)
    }

    /// Whether this report is for a location not in the schedule.
    pub fn is_off_route(&self) -> Result<bool, DecodeError> {
        decode_boolean(self.field("offroute_ind")?)
    }

    /// The operating company responsible for the train.
    pub fn operating_company(&self) -> Result<Option<Company>, DecodeError> {
        decode_operating_company(self.field("toc_id")?, self.companies.as_ref())
    }

    /// Operating company as carried in `division_code`. Must match
    /// [`Self::operating_company`]; construction enforces this.
    pub fn division_code(&self) -> Result<Option<Company>, DecodeError> {
        decode_operating_company(self.field("division_code")?, self.companies.as_ref())
    }

    /// Train service code as per schedule, e.g. `"24745000"`.
    pub fn train_service_code(&self) -> Result<&str, DecodeError> {
        self.field("train_service_code")
    }

    /// The 10-character unique identity for this train at activation time.
    pub fn train_id(&self) -> Result<&str, DecodeError> {
        self.field("train_id")
    }

    /// Where a train has had its identity changed, the current
    /// 10-character unique identity. Empty when unchanged.
    pub fn current_train_id(&self) -> Result<&str, DecodeError> {
        self.field("current_train_id")
    }

    /// If the location has been revised, the location in the schedule at
    /// activation time.
    pub fn original_location(&self) -> Result<Option<Location>, DecodeError> {
        Ok(decode_location(
            self.field("original_loc_stanox")?,
            self.locations.as_ref(),
        ))
    }

    /// The planned departure time associated with the original location.
    pub fn original_location_planned_departure(
        &self,
    ) -> Result<Option<DateTime<Utc>>, DecodeError> {
        decode_timestamp(self.field("original_loc_timestamp")?)
    }

    /// Direction of travel for automatic reports, `"UP"` or `"DOWN"`.
    ///
    /// The wire encoding is not understood yet, so access can never
    /// succeed; it fails with [`DecodeError::Unsupported`], which is
    /// deliberately distinct from the field being absent.
    pub fn direction(&self) -> Result<Infallible, DecodeError> {
        Err(DecodeError::Unsupported("direction_ind"))
    }

    /// Whether an automatic report is expected for this location.
    ///
    /// No decoding rule yet; see [`Self::direction`].
    pub fn auto_expected(&self) -> Result<Infallible, DecodeError> {
        Err(DecodeError::Unsupported("auto_expected"))
    }

    /// Whether the event came from SMART automatically or was entered
    /// manually via TOPS or TRUST SDR.
    ///
    /// No decoding rule yet; see [`Self::direction`].
    pub fn event_source(&self) -> Result<Infallible, DecodeError> {
        Err(DecodeError::Unsupported("event_source"))
    }

    /// The location that generated this report.
    ///
    /// No decoding rule yet; see [`Self::direction`].
    pub fn reporting_location(&self) -> Result<Infallible, DecodeError> {
        Err(DecodeError::Unsupported("reporting_stanox"))
    }

    /// Platform number associated with the movement.
    ///
    /// No decoding rule yet; see [`Self::direction`].
    pub fn platform(&self) -> Result<Infallible, DecodeError> {
        Err(DecodeError::Unsupported("platform"))
    }

    /// Minutes of variation from the scheduled time at this location.
    ///
    /// No decoding rule yet; see [`Self::direction`].
    pub fn timetable_variation(&self) -> Result<Infallible, DecodeError> {
        Err(DecodeError::Unsupported("timetable_variation"))
    }

    /// Whether this location is a delay monitoring point.
    ///
    /// No decoding rule yet; see [`Self::direction`].
    pub fn delay_monitoring_point(&self) -> Result<Infallible, DecodeError> {
        Err(DecodeError::Unsupported("delay_monitoring_point"))
    }

    /// The line the train is travelling on, e.g. F = Fast, S = Slow.
    ///
    /// No decoding rule yet; see [`Self::direction`].
    pub fn line_indicator(&self) -> Result<Infallible, DecodeError> {
        Err(DecodeError::Unsupported("line_ind"))
    }

    /// The location at which the next report for this train is due.
    ///
    /// No decoding rule yet; see [`Self::direction`].
    pub fn next_report_location(&self) -> Result<Infallible, DecodeError> {
        Err(DecodeError::Unsupported("next_report_stanox"))
    }

    /// The running time to the next report location.
    ///
    /// No decoding rule yet; see [`Self::direction`].
    pub fn next_report_run_time(&self) -> Result<Infallible, DecodeError> {
        Err(DecodeError::Unsupported("next_report_run_time"))
    }

    /// The exit route from this location.
    ///
    /// No decoding rule yet; see [`Self::direction`].
    pub fn route(&self) -> Result<Infallible, DecodeError> {
        Err(DecodeError::Unsupported("route"))
    }

    /// The TOPS train file address, if applicable.
    ///
    /// No decoding rule yet; see [`Self::direction`]. The wire value may
    /// also be JSON null rather than a string.
    pub fn train_file_address(&self) -> Result<Infallible, DecodeError> {
        Err(DecodeError::Unsupported("train_file_address"))
    }

    /// Human-readable description of how early or late the event was.
    ///
    /// `"[unknown]"` when either the planned or actual timestamp is
    /// blank. Otherwise the signed difference in minutes (fractions
    /// kept), rendered according to the variation status; an off-route
    /// report has no meaningful schedule delta, so it renders as
    /// `"off route"`.
    pub fn early_late_description(&self) -> Result<String, DecodeError> {
        let (Some(actual), Some(planned)) = (self.actual_datetime()?, self.planned_datetime()?)
        else {
            return Ok(UNKNOWN_VARIATION.to_string());
        };

        let mins_late = (actual - planned).num_milliseconds() as f64 / 60_000.0;

        Ok(match self.status()? {
            VariationStatus::Late => format!("{} mins late", mins_late),
            VariationStatus::Early => format!("{} mins early", -mins_late),
            VariationStatus::OnTime => "on time".to_string(),
            VariationStatus::OffRoute => "off route".to_string(),
        })
    }

    /// Render the report as a JSON object with a fixed key order.
    ///
    /// The key order is part of the output contract; downstream
    /// consumers diff rendered records textually.
    pub fn serialize(&self) -> Result<Value, DecodeError> {
        let mut out = Map::new();
        out.insert(
            "planned_event_type".to_string(),
            Value::String(self.planned_event_type()?.name().to_string()),
        );
        out.insert(
            "status".to_string(),
            Value::String(self.status()?.name().to_string()),
        );
        out.insert(
            "planned_datetime".to_string(),
            timestamp_value(self.planned_datetime()?),
        );
        out.insert(
            "actual_datetime".to_string(),
            timestamp_value(self.actual_datetime()?),
        );
        out.insert(
            "planned_timetable_datetime".to_string(),
            timestamp_value(self.planned_timetable_datetime()?),
        );
        out.insert(
            "early_late_description".to_string(),
            Value::String(self.early_late_description()?),
        );
        out.insert(
            "location".to_string(),
            self.location()?
                .map(|l| Value::String(l.name))
                .unwrap_or(Value::Null),
        );
        out.insert(
            "location_stanox".to_string(),
            Value::String(self.location_stanox()?.to_string()),
        );
        out.insert(
            "operating_company".to_string(),
            self.operating_company()?
                .map(|c| Value::String(c.name))
                .unwrap_or(Value::Null),
        );
        out.insert(
            "is_correction".to_string(),
            Value::Bool(self.is_correction()?),
        );
        Ok(Value::Object(out))
    }
}

fn timestamp_value(timestamp: Option<DateTime<Utc>>) -> Value {
    match timestamp {
        Some(t) => Value::String(t.to_rfc3339_opts(SecondsFormat::Secs, true)),
        None => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::{CompanyDirectory, StationDirectory};
    use serde_json::json;

    fn locations() -> Arc<dyn LocationLookup> {
        Arc::new(StationDirectory::from_entries([
            Location {
                stanox: "87701".to_string(),
                name: "Clapham Junction".to_string(),
            },
            Location {
                stanox: "72410".to_string(),
                name: "London Euston".to_string(),
            },
        ]))
    }

    fn companies() -> Arc<dyn CompanyLookup> {
        Arc::new(CompanyDirectory::from_entries([Company {
            code: 88,
            name: "Southeastern".to_string(),
        }]))
    }

    /// The sample body from the feed documentation, lightly trimmed.
    fn sample_body() -> Map<String, Value> {
        let body = json!({
            "event_type": "DEPARTURE",
            "planned_event_type": "DEPARTURE",
            "variation_status": "LATE",
            "planned_timestamp": "1455883470000",
            "actual_timestamp": "1455883560000",
            "gbtt_timestamp": "1455883440000",
            "loc_stanox": "87701",
            "original_loc_stanox": "",
            "original_loc_timestamp": "",
            "correction_ind": "false",
            "train_terminated": "false",
            "offroute_ind": "false",
            "toc_id": "88",
            "division_code": "88",
            "train_service_code": "24745000",
            "train_id": "892A39MI19",
            "current_train_id": "",
            "direction_ind": "UP",
            "auto_expected": "true",
            "event_source": "AUTOMATIC",
            "reporting_stanox": "87701",
            "platform": " 1",
            "timetable_variation": "2",
            "delay_monitoring_point": "true",
            "line_ind": "F",
            "next_report_stanox": "87700",
            "next_report_run_time": "1",
            "route": "2",
            "train_file_address": null,
        });
        match body {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn record_from(body: Map<String, Value>) -> Result<MovementRecord, ValidationError> {
        MovementRecord::from_body(body, locations(), companies())
    }

    fn sample_record() -> MovementRecord {
        record_from(sample_body()).unwrap()
    }

    #[test]
    fn decodes_typed_fields() {
        let record = sample_record();

        assert_eq!(record.event_type().unwrap(), EventType::Departure);
        assert_eq!(record.planned_event_type().unwrap(), EventType::Departure);
        assert_eq!(record.status().unwrap(), VariationStatus::Late);
        assert!(!record.is_correction().unwrap());
        assert!(!record.train_terminated().unwrap());
        assert!(!record.is_off_route().unwrap());
        assert_eq!(record.train_id().unwrap(), "892A39MI19");
        assert_eq!(record.train_service_code().unwrap(), "24745000");
        assert_eq!(record.current_train_id().unwrap(), "");
        assert_eq!(record.location_stanox().unwrap(), "87701");
    }

    #[test]
    fn decodes_timestamps() {
        let record = sample_record();

        let planned = record.planned_datetime().unwrap().unwrap();
        let actual = record.actual_datetime().unwrap().unwrap();
        assert_eq!(planned.timestamp_millis(), 1_455_883_470_000);
        assert_eq!(actual.timestamp_millis(), 1_455_883_560_000);

        // Blank wire value decodes to None, not an error
        assert_eq!(record.original_location_planned_departure().unwrap(), None);
    }

    #[test]
    fn resolves_locations_and_companies() {
        let record = sample_record();

        assert_eq!(
            record.location().unwrap().map(|l| l.name),
            Some("Clapham Junction".to_string())
        );
        // Blank original location is a lookup miss, not an error
        assert_eq!(record.original_location().unwrap(), None);
        assert_eq!(
            record.operating_company().unwrap().map(|c| c.name),
            Some("Southeastern".to_string())
        );
    }

    #[test]
    fn construction_rejects_division_company_mismatch() {
        let mut body = sample_body();
        body.insert("division_code".to_string(), json!("25"));

        let err = record_from(body).unwrap_err();
        assert_eq!(
            err,
            ValidationError::SchemaAssumptionViolated {
                toc_id: "88".to_string(),
                division_code: "25".to_string(),
            }
        );
    }

    #[test]
    fn construction_accepts_matching_no_operator_sentinels() {
        let mut body = sample_body();
        body.insert("toc_id".to_string(), json!("00"));
        body.insert("division_code".to_string(), json!("00"));

        let record = record_from(body).unwrap();
        assert_eq!(record.operating_company().unwrap(), None);
    }

    #[test]
    fn construction_rejects_undecodable_invariant_fields() {
        let mut body = sample_body();
        body.insert("toc_id".to_string(), json!("xx"));

        let err = record_from(body).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Decode(DecodeError::InvalidOperatingCompanyCode("xx".to_string()))
        );
    }

    #[test]
    fn construction_rejects_missing_invariant_fields() {
        let mut body = sample_body();
        body.remove("toc_id");

        let err = record_from(body).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Decode(DecodeError::MissingField("toc_id"))
        );
    }

    #[test]
    fn bad_field_does_not_poison_the_rest() {
        let mut body = sample_body();
        body.insert("event_type".to_string(), json!("TELEPORT"));

        // Construction only checks the invariant, so this still succeeds
        let record = record_from(body).unwrap();
        assert!(record.event_type().is_err());
        assert_eq!(record.status().unwrap(), VariationStatus::Late);
    }

    #[test]
    fn unsupported_fields_fail_distinctly() {
        let record = sample_record();

        assert_eq!(
            record.direction().unwrap_err(),
            DecodeError::Unsupported("direction_ind")
        );
        assert_eq!(
            record.auto_expected().unwrap_err(),
            DecodeError::Unsupported("auto_expected")
        );
        assert_eq!(
            record.event_source().unwrap_err(),
            DecodeError::Unsupported("event_source")
        );
        assert_eq!(
            record.reporting_location().unwrap_err(),
            DecodeError::Unsupported("reporting_stanox")
        );
        assert_eq!(
            record.platform().unwrap_err(),
            DecodeError::Unsupported("platform")
        );
        assert_eq!(
            record.timetable_variation().unwrap_err(),
            DecodeError::Unsupported("timetable_variation")
        );
        assert_eq!(
            record.delay_monitoring_point().unwrap_err(),
            DecodeError::Unsupported("delay_monitoring_point")
        );
        assert_eq!(
            record.line_indicator().unwrap_err(),
            DecodeError::Unsupported("line_ind")
        );
        assert_eq!(
            record.next_report_location().unwrap_err(),
            DecodeError::Unsupported("next_report_stanox")
        );
        assert_eq!(
            record.next_report_run_time().unwrap_err(),
            DecodeError::Unsupported("next_report_run_time")
        );
        assert_eq!(record.route().unwrap_err(), DecodeError::Unsupported("route"));
        assert_eq!(
            record.train_file_address().unwrap_err(),
            DecodeError::Unsupported("train_file_address")
        );
    }

    #[test]
    fn unsupported_is_not_missing() {
        // The field is present on the wire with a perfectly good value;
        // access must still fail with the unsupported kind.
        let record = sample_record();
        assert!(matches!(
            record.platform().unwrap_err(),
            DecodeError::Unsupported(_)
        ));

        let mut body = sample_body();
        body.remove("platform");
        let record = record_from(body).unwrap();
        assert!(matches!(
            record.platform().unwrap_err(),
            DecodeError::Unsupported(_)
        ));
    }

    #[test]
    fn early_late_description_late() {
        // Sample body: actual is 90 seconds after planned
        let record = sample_record();
        assert_eq!(record.early_late_description().unwrap(), "1.5 mins late");

        let mut body = sample_body();
        body.insert("actual_timestamp".to_string(), json!("1455883770000"));
        let record = record_from(body).unwrap();
        assert_eq!(record.early_late_description().unwrap(), "5 mins late");
    }

    #[test]
    fn early_late_description_early_flips_sign() {
        let mut body = sample_body();
        body.insert("variation_status".to_string(), json!("EARLY"));
        body.insert("actual_timestamp".to_string(), json!("1455883170000"));

        let record = record_from(body).unwrap();
        assert_eq!(record.early_late_description().unwrap(), "5 mins early");
    }

    #[test]
    fn early_late_description_on_time() {
        let mut body = sample_body();
        body.insert("variation_status".to_string(), json!("ON TIME"));
        body.insert("actual_timestamp".to_string(), json!("1455883470000"));

        let record = record_from(body).unwrap();
        assert_eq!(record.early_late_description().unwrap(), "on time");
    }

    #[test]
    fn early_late_description_off_route() {
        let mut body = sample_body();
        body.insert("variation_status".to_string(), json!("OFF ROUTE"));

        let record = record_from(body).unwrap();
        assert_eq!(record.early_late_description().unwrap(), "off route");
    }

    #[test]
    fn early_late_description_unknown_when_timestamp_blank() {
        for field in ["planned_timestamp", "actual_timestamp"] {
            let mut body = sample_body();
            body.insert(field.to_string(), json!(""));

            let record = record_from(body).unwrap();
            assert_eq!(record.early_late_description().unwrap(), "[unknown]");
        }
    }

    #[test]
    fn serialize_has_fixed_key_order() {
        let record = sample_record();
        let rendered = record.serialize().unwrap();

        let keys: Vec<&str> = rendered
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(
            keys,
            [
                "planned_event_type",
                "status",
                "planned_datetime",
                "actual_datetime",
                "planned_timetable_datetime",
                "early_late_description",
                "location",
                "location_stanox",
                "operating_company",
                "is_correction",
            ]
        );
    }

    #[test]
    fn serialize_renders_values() {
        let record = sample_record();
        let rendered = record.serialize().unwrap();

        assert_eq!(rendered["planned_event_type"], json!("departure"));
        assert_eq!(rendered["status"], json!("late"));
        assert_eq!(rendered["planned_datetime"], json!("2016-02-19T12:04:30Z"));
        assert_eq!(rendered["actual_datetime"], json!("2016-02-19T12:06:00Z"));
        assert_eq!(rendered["early_late_description"], json!("1.5 mins late"));
        assert_eq!(rendered["location"], json!("Clapham Junction"));
        assert_eq!(rendered["location_stanox"], json!("87701"));
        assert_eq!(rendered["operating_company"], json!("Southeastern"));
        assert_eq!(rendered["is_correction"], json!(false));
    }

    #[test]
    fn serialize_renders_unresolved_as_null() {
        let mut body = sample_body();
        body.insert("loc_stanox".to_string(), json!("99999"));
        body.insert("toc_id".to_string(), json!("00"));
        body.insert("division_code".to_string(), json!("00"));

        let record = record_from(body).unwrap();
        let rendered = record.serialize().unwrap();

        assert_eq!(rendered["location"], json!(null));
        assert_eq!(rendered["location_stanox"], json!("99999"));
        assert_eq!(rendered["operating_company"], json!(null));
    }

    #[test]
    fn serialize_surfaces_decode_errors() {
        let mut body = sample_body();
        body.insert("correction_ind".to_string(), json!("maybe"));

        let record = record_from(body).unwrap();
        assert_eq!(
            record.serialize().unwrap_err(),
            DecodeError::InvalidBoolean("maybe".to_string())
        );
    }
}
