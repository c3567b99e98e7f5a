//! Domain error types.
//!
//! `DecodeError` covers a single wire field; `ValidationError` covers a
//! whole report. Field-level failures surface to whoever accesses that
//! field, record-level failures reject the report outright.

/// Failure to decode one raw wire field into a typed value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The wire value was neither `"true"` nor `"false"`
    #[error("invalid boolean: `{0}`")]
    InvalidBoolean(String),

    /// The wire value was not an epoch timestamp we can represent
    #[error("invalid timestamp: `{0}`")]
    InvalidTimestamp(String),

    /// The wire value was not a numeric operating company code
    #[error("invalid operating company code: `{0}`")]
    InvalidOperatingCompanyCode(String),

    /// The wire value matched no variant of the named enum
    #[error("unknown {enum_name} value: `{value}`")]
    UnknownEnumValue {
        enum_name: &'static str,
        value: String,
    },

    /// The decoding rule for this field is intentionally absent.
    ///
    /// Not the same thing as a missing value: the field may well be on the
    /// wire, but its encoding is not understood yet.
    #[error("no decoding rule defined for field `{0}`")]
    Unsupported(&'static str),

    /// A mandatory field was absent from the body (or not a string)
    #[error("missing field `{0}`")]
    MissingField(&'static str),
}

/// Failure to accept a movement report as a whole.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// `division_code` and `toc_id` decoded to different operating
    /// companies. Both are documented as the operating company, so a
    /// divergence means we have misunderstood the schema.
    #[error("division code `{division_code}` does not match operating company `{toc_id}`")]
    SchemaAssumptionViolated {
        toc_id: String,
        division_code: String,
    },

    /// A field needed by the eager invariant check failed to decode
    #[error(transparent)]
    Decode(#[from] DecodeError),
}
