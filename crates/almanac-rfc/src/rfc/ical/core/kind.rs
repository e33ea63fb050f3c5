//! Kind registries (RFC 5545 §3.6, §3.8, §3.2, §3.3).
//!
//! Each enumeration maps to exactly one canonical token. The generic `X`
//! kinds carry an empty token; the actual extension name lives on the
//! owning property, parameter or component.
//!
//! Token lookups are exact and case-sensitive. Unknown tokens that start
//! with `X-` resolve to the generic `X` kind; any other unknown token
//! resolves to `None`.

use std::fmt;

use almanac_core::constants::{EXTENSION_PREFIX, LIBRARY_PREFIX};

fn lookup<T: Copy>(all: &[T], token: &str, as_str: fn(T) -> &'static str, x: T) -> Option<T> {
    if token.is_empty() {
        return None;
    }
    all.iter()
        .copied()
        .find(|k| as_str(*k) == token)
        .or_else(|| token.starts_with(EXTENSION_PREFIX).then_some(x))
}

/// Component kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Vevent,
    Vtodo,
    Vjournal,
    Vcalendar,
    Vfreebusy,
    Vtimezone,
    Valarm,
    Standard,
    Daylight,
    X,
    Vschedule,
    Vquery,
    Vcar,
    Vcommand,
    XLicInvalid,
    XLicMimePart,
    Any,
    XRoot,
}

impl ComponentKind {
    pub const ALL: [Self; 18] = [
        Self::Vevent,
        Self::Vtodo,
        Self::Vjournal,
        Self::Vcalendar,
        Self::Vfreebusy,
        Self::Vtimezone,
        Self::Valarm,
        Self::Standard,
        Self::Daylight,
        Self::X,
        Self::Vschedule,
        Self::Vquery,
        Self::Vcar,
        Self::Vcommand,
        Self::XLicInvalid,
        Self::XLicMimePart,
        Self::Any,
        Self::XRoot,
    ];

    /// Returns the canonical token (empty for `X`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vevent => "VEVENT",
            Self::Vtodo => "VTODO",
            Self::Vjournal => "VJOURNAL",
            Self::Vcalendar => "VCALENDAR",
            Self::Vfreebusy => "VFREEBUSY",
            Self::Vtimezone => "VTIMEZONE",
            Self::Valarm => "VALARM",
            Self::Standard => "STANDARD",
            Self::Daylight => "DAYLIGHT",
            Self::X => "",
            Self::Vschedule => "SCHEDULE",
            Self::Vquery => "VQUERY",
            Self::Vcar => "VCAR",
            Self::Vcommand => "VCOMMAND",
            Self::XLicInvalid => "X-LIC-UNKNOWN",
            Self::XLicMimePart => "X-LIC-MIME-PART",
            Self::Any => "ANY",
            Self::XRoot => "XROOT",
        }
    }

    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        lookup(&Self::ALL, token, Self::as_str, Self::X)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value kinds.
///
/// `Geo` renders as `FLOAT`, so `FLOAT` always resolves to `Float`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Binary,
    Boolean,
    CalAddress,
    Date,
    DateTime,
    Duration,
    Float,
    Integer,
    Period,
    Recur,
    Text,
    Time,
    Uri,
    UtcOffset,
    Method,
    Status,
    Geo,
    Attach,
    DateTimeDate,
    DateTimePeriod,
    Query,
    String,
    X,
}

impl ValueKind {
    pub const ALL: [Self; 23] = [
        Self::Binary,
        Self::Boolean,
        Self::CalAddress,
        Self::Date,
        Self::DateTime,
        Self::Duration,
        Self::Float,
        Self::Integer,
        Self::Period,
        Self::Recur,
        Self::Text,
        Self::Time,
        Self::Uri,
        Self::UtcOffset,
        Self::Method,
        Self::Status,
        Self::Geo,
        Self::Attach,
        Self::DateTimeDate,
        Self::DateTimePeriod,
        Self::Query,
        Self::String,
        Self::X,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Binary => "BINARY",
            Self::Boolean => "BOOLEAN",
            Self::CalAddress => "CAL-ADDRESS",
            Self::Date => "DATE",
            Self::DateTime => "DATE-TIME",
            Self::Duration => "DURATION",
            Self::Float | Self::Geo => "FLOAT",
            Self::Integer => "INTEGER",
            Self::Period => "PERIOD",
            Self::Recur => "RECUR",
            Self::Text => "TEXT",
            Self::Time => "TIME",
            Self::Uri => "URI",
            Self::UtcOffset => "UTC-OFFSET",
            Self::Method => "METHOD",
            Self::Status => "STATUS",
            Self::Attach => "XATTACH",
            Self::DateTimeDate => "XDATETIMEDATE",
            Self::DateTimePeriod => "XDATETIMEPERIOD",
            Self::Query => "QUERY",
            Self::String => "STRING",
            Self::X => "",
        }
    }

    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        lookup(&Self::ALL, token, Self::as_str, Self::X)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Property kinds, including the CAP and library-private ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Action,
    Attach,
    Attendee,
    Calscale,
    Categories,
    Class,
    Comment,
    Completed,
    Contact,
    Created,
    Description,
    Dtend,
    Dtstamp,
    Dtstart,
    Due,
    Duration,
    Exdate,
    Exrule,
    Freebusy,
    Geo,
    LastModified,
    Location,
    Method,
    Organizer,
    PercentComplete,
    Priority,
    Prodid,
    Rdate,
    RecurrenceId,
    RelatedTo,
    Repeat,
    RequestStatus,
    Resources,
    Rrule,
    Sequence,
    Status,
    Summary,
    Transp,
    Trigger,
    Tzid,
    Tzname,
    Tzoffsetfrom,
    Tzoffsetto,
    Tzurl,
    Uid,
    Url,
    Version,
    X,
    Scope,
    MaxResults,
    MaxResultsSize,
    Query,
    QueryName,
    Target,
    XLicError,
    XLicMimeContentType,
    XLicMimeEncoding,
    XLicMimeOptInfo,
    XLicMimeCharset,
    XLicClusterCount,
}

impl PropertyKind {
    pub const ALL: [Self; 60] = [
        Self::Action,
        Self::Attach,
        Self::Attendee,
        Self::Calscale,
        Self::Categories,
        Self::Class,
        Self::Comment,
        Self::Completed,
        Self::Contact,
        Self::Created,
        Self::Description,
        Self::Dtend,
        Self::Dtstamp,
        Self::Dtstart,
        Self::Due,
        Self::Duration,
        Self::Exdate,
        Self::Exrule,
        Self::Freebusy,
        Self::Geo,
        Self::LastModified,
        Self::Location,
        Self::Method,
        Self::Organizer,
        Self::PercentComplete,
        Self::Priority,
        Self::Prodid,
        Self::Rdate,
        Self::RecurrenceId,
        Self::RelatedTo,
        Self::Repeat,
        Self::RequestStatus,
        Self::Resources,
        Self::Rrule,
        Self::Sequence,
        Self::Status,
        Self::Summary,
        Self::Transp,
        Self::Trigger,
        Self::Tzid,
        Self::Tzname,
        Self::Tzoffsetfrom,
        Self::Tzoffsetto,
        Self::Tzurl,
        Self::Uid,
        Self::Url,
        Self::Version,
        Self::X,
        Self::Scope,
        Self::MaxResults,
        Self::MaxResultsSize,
        Self::Query,
        Self::QueryName,
        Self::Target,
        Self::XLicError,
        Self::XLicMimeContentType,
        Self::XLicMimeEncoding,
        Self::XLicMimeOptInfo,
        Self::XLicMimeCharset,
        Self::XLicClusterCount,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Action => "ACTION",
            Self::Attach => "ATTACH",
            Self::Attendee => "ATTENDEE",
            Self::Calscale => "CALSCALE",
            Self::Categories => "CATEGORIES",
            Self::Class => "CLASS",
            Self::Comment => "COMMENT",
            Self::Completed => "COMPLETED",
            Self::Contact => "CONTACT",
            Self::Created => "CREATED",
            Self::Description => "DESCRIPTION",
            Self::Dtend => "DTEND",
            Self::Dtstamp => "DTSTAMP",
            Self::Dtstart => "DTSTART",
            Self::Due => "DUE",
            Self::Duration => "DURATION",
            Self::Exdate => "EXDATE",
            Self::Exrule => "EXRULE",
            Self::Freebusy => "FREEBUSY",
            Self::Geo => "GEO",
            Self::LastModified => "LAST-MODIFIED",
            Self::Location => "LOCATION",
            Self::Method => "METHOD",
            Self::Organizer => "ORGANIZER",
            Self::PercentComplete => "PERCENT-COMPLETE",
            Self::Priority => "PRIORITY",
            Self::Prodid => "PRODID",
            Self::Rdate => "RDATE",
            Self::RecurrenceId => "RECURRENCE-ID",
            Self::RelatedTo => "RELATED-TO",
            Self::Repeat => "REPEAT",
            Self::RequestStatus => "REQUEST-STATUS",
            Self::Resources => "RESOURCES",
            Self::Rrule => "RRULE",
            Self::Sequence => "SEQUENCE",
            Self::Status => "STATUS",
            Self::Summary => "SUMMARY",
            Self::Transp => "TRANSP",
            Self::Trigger => "TRIGGER",
            Self::Tzid => "TZID",
            Self::Tzname => "TZNAME",
            Self::Tzoffsetfrom => "TZOFFSETFROM",
            Self::Tzoffsetto => "TZOFFSETTO",
            Self::Tzurl => "TZURL",
            Self::Uid => "UID",
            Self::Url => "URL",
            Self::Version => "VERSION",
            Self::X => "",
            Self::Scope => "SCOPE",
            Self::MaxResults => "MAXRESULTS",
            Self::MaxResultsSize => "MAXRESULTSSIZE",
            Self::Query => "QUERY",
            Self::QueryName => "QUERYNAME",
            Self::Target => "TARGET",
            Self::XLicError => "X-LIC-ERROR",
            Self::XLicMimeContentType => "X-LIC-MIME-CONTENT-TYPE",
            Self::XLicMimeEncoding => "X-LIC-MIME-ENCODING",
            Self::XLicMimeOptInfo => "X-LIC-MIME-OPT-INFO",
            Self::XLicMimeCharset => "X-LIC-MIME-CHARSET",
            Self::XLicClusterCount => "X-LIC-CLUSTERCOUNT",
        }
    }

    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        lookup(&Self::ALL, token, Self::as_str, Self::X)
    }

    /// Returns whether this is one of the `X-LIC-*` kinds.
    #[must_use]
    pub fn is_library_private(self) -> bool {
        self.as_str().starts_with(LIBRARY_PREFIX)
    }

    /// ## Summary
    /// Returns the value kind a property of this kind carries when no
    /// `VALUE` parameter says otherwise.
    #[must_use]
    pub const fn default_value_kind(self) -> Option<ValueKind> {
        Some(match self {
            Self::Action
            | Self::Calscale
            | Self::Categories
            | Self::Class
            | Self::Comment
            | Self::Contact
            | Self::Description
            | Self::Location
            | Self::Prodid
            | Self::RelatedTo
            | Self::Resources
            | Self::Summary
            | Self::Transp
            | Self::Tzid
            | Self::Tzname
            | Self::Uid
            | Self::Version
            | Self::X
            | Self::Scope
            | Self::QueryName
            | Self::XLicError => ValueKind::Text,
            Self::Attach | Self::Tzurl | Self::Url => ValueKind::Uri,
            Self::Attendee | Self::Organizer | Self::Target => ValueKind::CalAddress,
            Self::Completed
            | Self::Created
            | Self::Dtend
            | Self::Dtstamp
            | Self::Dtstart
            | Self::Due
            | Self::Exdate
            | Self::LastModified
            | Self::Rdate
            | Self::RecurrenceId => ValueKind::DateTime,
            Self::Duration | Self::Trigger => ValueKind::Duration,
            Self::Exrule | Self::Rrule => ValueKind::Recur,
            Self::Freebusy => ValueKind::Period,
            Self::Geo => ValueKind::Geo,
            Self::Method => ValueKind::Method,
            Self::PercentComplete
            | Self::Priority
            | Self::Repeat
            | Self::Sequence
            | Self::MaxResults
            | Self::MaxResultsSize
            | Self::XLicClusterCount => ValueKind::Integer,
            Self::RequestStatus => ValueKind::String,
            Self::Status => ValueKind::Status,
            Self::Tzoffsetfrom | Self::Tzoffsetto => ValueKind::UtcOffset,
            Self::Query => ValueKind::Query,
            Self::XLicMimeContentType
            | Self::XLicMimeEncoding
            | Self::XLicMimeOptInfo
            | Self::XLicMimeCharset => return None,
        })
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameter kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    Altrep,
    Cn,
    Cutype,
    DelegatedFrom,
    DelegatedTo,
    Dir,
    Encoding,
    Fbtype,
    Fmttype,
    Language,
    Member,
    Partstat,
    Range,
    Related,
    Reltype,
    Role,
    Rsvp,
    SentBy,
    Tzid,
    Value,
    X,
    XLicErrorType,
    XLicCompareType,
}

impl ParameterKind {
    pub const ALL: [Self; 23] = [
        Self::Altrep,
        Self::Cn,
        Self::Cutype,
        Self::DelegatedFrom,
        Self::DelegatedTo,
        Self::Dir,
        Self::Encoding,
        Self::Fbtype,
        Self::Fmttype,
        Self::Language,
        Self::Member,
        Self::Partstat,
        Self::Range,
        Self::Related,
        Self::Reltype,
        Self::Role,
        Self::Rsvp,
        Self::SentBy,
        Self::Tzid,
        Self::Value,
        Self::X,
        Self::XLicErrorType,
        Self::XLicCompareType,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Altrep => "ALTREP",
            Self::Cn => "CN",
            Self::Cutype => "CUTYPE",
            Self::DelegatedFrom => "DELEGATED-FROM",
            Self::DelegatedTo => "DELEGATED-TO",
            Self::Dir => "DIR",
            Self::Encoding => "ENCODING",
            Self::Fbtype => "FBTYPE",
            Self::Fmttype => "FMTTYPE",
            Self::Language => "LANGUAGE",
            Self::Member => "MEMBER",
            Self::Partstat => "PARTSTAT",
            Self::Range => "RANGE",
            Self::Related => "RELATED",
            Self::Reltype => "RELTYPE",
            Self::Role => "ROLE",
            Self::Rsvp => "RSVP",
            Self::SentBy => "SENT-BY",
            Self::Tzid => "TZID",
            Self::Value => "VALUE",
            Self::X => "",
            Self::XLicErrorType => "X-LIC-ERRORTYPE",
            Self::XLicCompareType => "X-LIC-COMPARETYPE",
        }
    }

    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        lookup(&Self::ALL, token, Self::as_str, Self::X)
    }

    /// ## Summary
    /// Returns the registered values of an enumerated parameter kind, or
    /// `None` for free-form kinds. `VALUE` is checked against
    /// [`ValueKind`] instead.
    #[must_use]
    pub const fn enumerated_values(self) -> Option<&'static [&'static str]> {
        Some(match self {
            Self::Cutype => &["INDIVIDUAL", "GROUP", "RESOURCE", "ROOM", "UNKNOWN"],
            Self::Encoding => &["8BIT", "BASE64"],
            Self::Fbtype => &["FREE", "BUSY", "BUSY-UNAVAILABLE", "BUSY-TENTATIVE"],
            Self::Partstat => &[
                "NEEDS-ACTION",
                "ACCEPTED",
                "DECLINED",
                "TENTATIVE",
                "DELEGATED",
                "COMPLETED",
                "IN-PROCESS",
            ],
            Self::Range => &["THISANDPRIOR", "THISANDFUTURE"],
            Self::Related => &["START", "END"],
            Self::Reltype => &["PARENT", "CHILD", "SIBLING"],
            Self::Role => &[
                "CHAIR",
                "REQ-PARTICIPANT",
                "OPT-PARTICIPANT",
                "NON-PARTICIPANT",
            ],
            Self::Rsvp => &["TRUE", "FALSE"],
            Self::XLicErrorType => &[
                "COMPONENT-PARSE-ERROR",
                "PROPERTY-PARSE-ERROR",
                "PARAMETER-NAME-PARSE-ERROR",
                "PARAMETER-VALUE-PARSE-ERROR",
                "VALUE-PARSE-ERROR",
                "INVALID-ITIP",
                "UNKNOWN-VCAL-PROP-ERROR",
                "MIME-PARSE-ERROR",
            ],
            Self::XLicCompareType => &[
                "EQUAL",
                "NOTEQUAL",
                "LESS",
                "GREATER",
                "LESSEQUAL",
                "GREATEREQUAL",
                "REGEX",
            ],
            _ => return None,
        })
    }

    /// Kinds whose value is a comma-separated list.
    #[must_use]
    pub const fn is_multi_valued(self) -> bool {
        matches!(self, Self::DelegatedFrom | Self::DelegatedTo | Self::Member)
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// iTIP methods (RFC 5546) plus the CAP methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Publish,
    Request,
    Reply,
    Add,
    Cancel,
    Refresh,
    Counter,
    DeclineCounter,
    Create,
    Read,
    Response,
    Move,
    Modify,
    GenerateUid,
    Delete,
    None,
}

impl Method {
    pub const ALL: [Self; 16] = [
        Self::Publish,
        Self::Request,
        Self::Reply,
        Self::Add,
        Self::Cancel,
        Self::Refresh,
        Self::Counter,
        Self::DeclineCounter,
        Self::Create,
        Self::Read,
        Self::Response,
        Self::Move,
        Self::Modify,
        Self::GenerateUid,
        Self::Delete,
        Self::None,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Publish => "PUBLISH",
            Self::Request => "REQUEST",
            Self::Reply => "REPLY",
            Self::Add => "ADD",
            Self::Cancel => "CANCEL",
            Self::Refresh => "REFRESH",
            Self::Counter => "COUNTER",
            Self::DeclineCounter => "DECLINECOUNTER",
            Self::Create => "CREATE",
            Self::Read => "READ",
            Self::Response => "RESPONSE",
            Self::Move => "MOVE",
            Self::Modify => "MODIFY",
            Self::GenerateUid => "GENERATEUID",
            Self::Delete => "DELETE",
            Self::None => "NONE",
        }
    }

    /// ## Summary
    /// Resolves a method token, ignoring leading spaces. Unknown tokens
    /// resolve to `Method::None`.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        let token = token.trim_start_matches(' ');
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == token)
            .unwrap_or(Self::None)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// STATUS property values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Tentative,
    Confirmed,
    Cancelled,
    NeedsAction,
    Completed,
    InProcess,
    Draft,
    Final,
    None,
}

impl Status {
    pub const ALL: [Self; 9] = [
        Self::Tentative,
        Self::Confirmed,
        Self::Cancelled,
        Self::NeedsAction,
        Self::Completed,
        Self::InProcess,
        Self::Draft,
        Self::Final,
        Self::None,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tentative => "TENTATIVE",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
            Self::NeedsAction => "NEEDS-ACTION",
            Self::Completed => "COMPLETED",
            Self::InProcess => "IN-PROCESS",
            Self::Draft => "DRAFT",
            Self::Final => "FINAL",
            Self::None => "NONE",
        }
    }

    /// Resolves a status token, ignoring leading spaces.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        let token = token.trim_start_matches(' ');
        Self::ALL
            .into_iter()
            .find(|s| s.as_str() == token)
            .unwrap_or(Self::None)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// REQUEST-STATUS codes (RFC 5546 §3.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestStatus {
    Success,
    Fallback,
    IgnoredProperty,
    IgnoredParameter,
    IgnoredXProperty,
    IgnoredXParameter,
    IgnoredComponent,
    Forwarded,
    OneEvent,
    Truncated,
    OneTodo,
    TruncatedRrule,
    InvalidPropertyName,
    InvalidPropertyValue,
    InvalidParameter,
    InvalidParameterValue,
    InvalidComponent,
    InvalidTime,
    InvalidRule,
    InvalidCalendarUser,
    NoAuthority,
    BadVersion,
    TooBig,
    MissingRequired,
    UnknownComponent,
    BadComponent,
    NoCapability,
    Busy,
    Maybe,
    Unavailable,
    NoService,
    NoScheduling,
}

/// (status, major, minor, description)
const REQUEST_STATUS_TABLE: [(RequestStatus, u8, u8, &str); 32] = [
    (RequestStatus::Success, 2, 0, "Success."),
    (
        RequestStatus::Fallback,
        2,
        1,
        "Success but fallback taken on one or more property values.",
    ),
    (
        RequestStatus::IgnoredProperty,
        2,
        2,
        "Success, invalid property ignored.",
    ),
    (
        RequestStatus::IgnoredParameter,
        2,
        3,
        "Success, invalid property parameter ignored.",
    ),
    (
        RequestStatus::IgnoredXProperty,
        2,
        4,
        "Success, unknown non-standard property ignored.",
    ),
    (
        RequestStatus::IgnoredXParameter,
        2,
        5,
        "Success, unknown non standard property value ignored.",
    ),
    (
        RequestStatus::IgnoredComponent,
        2,
        6,
        "Success, invalid calendar component ignored.",
    ),
    (
        RequestStatus::Forwarded,
        2,
        7,
        "Success, request forwarded to Calendar User.",
    ),
    (
        RequestStatus::OneEvent,
        2,
        8,
        "Success, repeating event ignored. Scheduled as a single component.",
    ),
    (
        RequestStatus::Truncated,
        2,
        9,
        "Success, truncated end date time to date boundary.",
    ),
    (
        RequestStatus::OneTodo,
        2,
        10,
        "Success, repeating VTODO ignored. Scheduled as a single VTODO.",
    ),
    (
        RequestStatus::TruncatedRrule,
        2,
        11,
        "Success, unbounded RRULE clipped at some finite number of instances.",
    ),
    (RequestStatus::InvalidPropertyName, 3, 0, "Invalid property name."),
    (RequestStatus::InvalidPropertyValue, 3, 1, "Invalid property value."),
    (RequestStatus::InvalidParameter, 3, 2, "Invalid property parameter."),
    (
        RequestStatus::InvalidParameterValue,
        3,
        3,
        "Invalid property parameter value.",
    ),
    (RequestStatus::InvalidComponent, 3, 4, "Invalid calendar component."),
    (RequestStatus::InvalidTime, 3, 5, "Invalid date or time."),
    (RequestStatus::InvalidRule, 3, 6, "Invalid rule."),
    (RequestStatus::InvalidCalendarUser, 3, 7, "Invalid Calendar User."),
    (RequestStatus::NoAuthority, 3, 8, "No authority."),
    (RequestStatus::BadVersion, 3, 9, "Unsupported version."),
    (RequestStatus::TooBig, 3, 10, "Request entity too large."),
    (
        RequestStatus::MissingRequired,
        3,
        11,
        "Required component or property missing.",
    ),
    (
        RequestStatus::UnknownComponent,
        3,
        12,
        "Unknown component or property found.",
    ),
    (
        RequestStatus::BadComponent,
        3,
        13,
        "Unsupported component or property found.",
    ),
    (RequestStatus::NoCapability, 3, 14, "Unsupported capability."),
    (RequestStatus::Busy, 4, 0, "Event conflict. Date/time is busy."),
    (RequestStatus::Maybe, 5, 0, "Request MAY supported."),
    (RequestStatus::Unavailable, 5, 1, "Service unavailable."),
    (RequestStatus::NoService, 5, 2, "Invalid calendar service."),
    (
        RequestStatus::NoScheduling,
        5,
        3,
        "No scheduling support for user.",
    ),
];

impl RequestStatus {
    fn entry(self) -> (RequestStatus, u8, u8, &'static str) {
        REQUEST_STATUS_TABLE
            .into_iter()
            .find(|(status, ..)| *status == self)
            .unwrap_or(REQUEST_STATUS_TABLE[0])
    }

    #[must_use]
    pub fn major(self) -> u8 {
        self.entry().1
    }

    #[must_use]
    pub fn minor(self) -> u8 {
        self.entry().2
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        self.entry().3
    }

    #[must_use]
    pub fn from_code(major: u8, minor: u8) -> Option<Self> {
        REQUEST_STATUS_TABLE
            .into_iter()
            .find(|(_, ma, mi, _)| *ma == major && *mi == minor)
            .map(|(status, ..)| status)
    }

    /// ## Summary
    /// Resolves a `major.minor` code such as `"3.6"`.
    #[must_use]
    pub fn from_code_str(code: &str) -> Option<Self> {
        let (major, minor) = code.trim().split_once('.')?;
        Self::from_code(major.parse().ok()?, minor.parse().ok()?)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major(), self.minor())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_tokens_round_trip() {
        for kind in PropertyKind::ALL {
            if kind == PropertyKind::X {
                continue;
            }
            assert_eq!(PropertyKind::from_token(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn unknown_tokens() {
        assert_eq!(PropertyKind::from_token("X-FOO"), Some(PropertyKind::X));
        assert_eq!(PropertyKind::from_token("BOGUS"), None);
        assert_eq!(PropertyKind::from_token(""), None);
        assert_eq!(ParameterKind::from_token("X-PARAM"), Some(ParameterKind::X));
        assert_eq!(ParameterKind::from_token("NOPE"), None);
        assert_eq!(ComponentKind::from_token("X-WIDGET"), Some(ComponentKind::X));
        assert_eq!(ValueKind::from_token("X-BLOB"), Some(ValueKind::X));
    }

    #[test]
    fn lookups_are_case_sensitive() {
        assert_eq!(PropertyKind::from_token("dtstart"), None);
        assert_eq!(PropertyKind::from_token("DTSTART"), Some(PropertyKind::Dtstart));
    }

    #[test]
    fn private_kinds_match_before_extension_fallback() {
        assert_eq!(
            PropertyKind::from_token("X-LIC-ERROR"),
            Some(PropertyKind::XLicError)
        );
        assert!(PropertyKind::XLicError.is_library_private());
        assert!(!PropertyKind::Summary.is_library_private());
        assert_eq!(
            ParameterKind::from_token("X-LIC-COMPARETYPE"),
            Some(ParameterKind::XLicCompareType)
        );
    }

    #[test]
    fn x_kinds_have_empty_tokens() {
        assert_eq!(PropertyKind::X.as_str(), "");
        assert_eq!(ParameterKind::X.as_str(), "");
        assert_eq!(ValueKind::X.as_str(), "");
        assert_eq!(ComponentKind::X.as_str(), "");
    }

    #[test]
    fn geo_renders_as_float() {
        assert_eq!(ValueKind::Geo.as_str(), "FLOAT");
        assert_eq!(ValueKind::from_token("FLOAT"), Some(ValueKind::Float));
    }

    #[test]
    fn default_value_kinds() {
        assert_eq!(
            PropertyKind::Dtstart.default_value_kind(),
            Some(ValueKind::DateTime)
        );
        assert_eq!(PropertyKind::Rrule.default_value_kind(), Some(ValueKind::Recur));
        assert_eq!(
            PropertyKind::Attendee.default_value_kind(),
            Some(ValueKind::CalAddress)
        );
        assert_eq!(PropertyKind::X.default_value_kind(), Some(ValueKind::Text));
        assert_eq!(PropertyKind::XLicMimeCharset.default_value_kind(), None);
    }

    #[test]
    fn method_and_status_lookup() {
        assert_eq!(Method::from_token("  REQUEST"), Method::Request);
        assert_eq!(Method::from_token("SHOUT"), Method::None);
        assert_eq!(Status::from_token("IN-PROCESS"), Status::InProcess);
        assert_eq!(Status::from_token("maybe"), Status::None);
    }

    #[test]
    fn request_status_codes() {
        assert_eq!(RequestStatus::InvalidRule.major(), 3);
        assert_eq!(RequestStatus::InvalidRule.minor(), 6);
        assert_eq!(RequestStatus::InvalidRule.description(), "Invalid rule.");
        assert_eq!(RequestStatus::from_code(2, 0), Some(RequestStatus::Success));
        assert_eq!(RequestStatus::from_code(9, 9), None);
        assert_eq!(
            RequestStatus::from_code_str("5.3"),
            Some(RequestStatus::NoScheduling)
        );
        assert_eq!(RequestStatus::TruncatedRrule.to_string(), "2.11");
    }

    #[test]
    fn enumerated_parameter_values() {
        let roles = ParameterKind::Role.enumerated_values().expect("role is enumerated");
        assert!(roles.contains(&"CHAIR"));
        assert!(ParameterKind::Cn.enumerated_values().is_none());
        assert!(ParameterKind::Member.is_multi_valued());
        assert!(!ParameterKind::Tzid.is_multi_valued());
    }
}
