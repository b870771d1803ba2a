use std::fmt;

/// Why a candidate URL was not admitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// Too similar to a recently identified trap
    NearDuplicateTrap { similar_to: String, score: usize },

    /// URL longer than the configured maximum
    TooLong { length: usize },

    /// A path segment occurs more than once
    RepeatedPathSegment { segment: String },

    /// A query parameter repeats one of its values
    RepeatedQueryValue { param: String },

    /// A query parameter name looks like a calendar/pagination control
    CalendarParameter { param: String },

    /// More distinct query parameters than allowed
    TooManyQueryParams { count: usize },

    /// Link differing from its source page only by fragment
    SelfFragmentLoop,

    /// Scheme other than http/https
    UnsupportedScheme { scheme: String },

    /// Hostname outside the target domain
    OffDomain { host: String },

    /// Path ends in a binary/media/document extension
    BlockedExtension { extension: String },

    /// The URL could not be parsed
    Malformed,
}

impl RejectReason {
    /// Returns true if this rejection identifies a crawler trap
    ///
    /// Trap rejections are recorded in the trap log; plain policy rejections
    /// (scheme, domain, extension, repeated values, malformed) are not.
    pub fn is_trap(&self) -> bool {
        matches!(
            self,
            Self::NearDuplicateTrap { .. }
                | Self::TooLong { .. }
                | Self::RepeatedPathSegment { .. }
                | Self::CalendarParameter { .. }
                | Self::TooManyQueryParams { .. }
                | Self::SelfFragmentLoop
        )
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NearDuplicateTrap { similar_to, score } => {
                write!(f, "near-duplicate of trap {} (score {})", similar_to, score)
            }
            Self::TooLong { length } => write!(f, "url too long ({} chars)", length),
            Self::RepeatedPathSegment { segment } => {
                write!(f, "repeated path segment '{}'", segment)
            }
            Self::RepeatedQueryValue { param } => {
                write!(f, "repeated value for query parameter '{}'", param)
            }
            Self::CalendarParameter { param } => write!(f, "calendar parameter '{}'", param),
            Self::TooManyQueryParams { count } => write!(f, "{} query parameters", count),
            Self::SelfFragmentLoop => write!(f, "self-fragment loop"),
            Self::UnsupportedScheme { scheme } => write!(f, "unsupported scheme '{}'", scheme),
            Self::OffDomain { host } => write!(f, "off-domain host '{}'", host),
            Self::BlockedExtension { extension } => {
                write!(f, "blocked extension '.{}'", extension)
            }
            Self::Malformed => write!(f, "malformed url"),
        }
    }
}
