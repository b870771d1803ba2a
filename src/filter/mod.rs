//! Trap-aware admission filter
//!
//! Every candidate outlink passes through [`TrapFilter::evaluate`] before it
//! may reach the frontier. Checks run in a fixed order and stop at the first
//! match:
//!
//! 1. Near-duplicate of a recently identified trap
//! 2. URL length cap
//! 3. Repeated path segment
//! 4. Repeated query parameter value
//! 5. Calendar/pagination parameter names
//! 6. Too many query parameters
//! 7. Scheme restriction (http/https)
//! 8. Target domain and extension blocklist
//!
//! Trap rejections are appended to the [`TrapLog`] passed in; it holds both
//! the unbounded trap list and the bounded window used by check 1.

mod checks;
mod extensions;
mod reason;

pub use checks::{calendar_parameter, repeated_path_segment, similarity_score};
pub use extensions::{blocked_extension, BLOCKED_EXTENSIONS};
pub use reason::RejectReason;

use crate::analytics::{TrapLog, TrapRecord};
use crate::config::FilterConfig;
use crate::url::{extract_host, parse_absolute, QueryParams};

/// Result of evaluating a candidate URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Accept,
    Reject(RejectReason),
}

impl Admission {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accept)
    }

    /// The rejection reason, if any
    pub fn reason(&self) -> Option<&RejectReason> {
        match self {
            Self::Accept => None,
            Self::Reject(reason) => Some(reason),
        }
    }
}

/// Admission filter for one crawl
#[derive(Debug, Clone)]
pub struct TrapFilter {
    target_domain: String,
    config: FilterConfig,
}

impl TrapFilter {
    /// Creates a filter admitting hosts that contain `target_domain`
    pub fn new(target_domain: impl Into<String>, config: FilterConfig) -> Self {
        Self {
            target_domain: target_domain.into().to_lowercase(),
            config,
        }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Returns true if the URL should be fetched
    ///
    /// Shorthand for [`TrapFilter::evaluate`] that drops the reason.
    pub fn is_valid(&self, url: &str, traps: &mut TrapLog) -> bool {
        self.evaluate(url, traps).is_accepted()
    }

    /// Evaluates a candidate URL, recording trap rejections in `traps`
    pub fn evaluate(&self, url: &str, traps: &mut TrapLog) -> Admission {
        let admission = self.check(url, traps);

        if let Admission::Reject(reason) = &admission {
            if reason.is_trap() {
                tracing::debug!("Trap identified: {} ({})", url, reason);
                traps.record_trap(TrapRecord::new(url, reason.clone()));
            } else {
                tracing::trace!("Rejected {}: {}", url, reason);
            }
        }

        admission
    }

    fn check(&self, raw: &str, traps: &TrapLog) -> Admission {
        let url = match parse_absolute(raw) {
            Ok(url) => url,
            Err(_) => return Admission::Reject(RejectReason::Malformed),
        };

        if let Some(reason) = self.near_duplicate(raw, traps) {
            return Admission::Reject(reason);
        }

        let length = raw.chars().count();
        if length > self.config.max_url_length {
            return Admission::Reject(RejectReason::TooLong { length });
        }

        if let Some(segment) = repeated_path_segment(&url) {
            return Admission::Reject(RejectReason::RepeatedPathSegment { segment });
        }

        let params = QueryParams::from_url(&url);

        if let Some(param) = params.first_repeated_value() {
            return Admission::Reject(RejectReason::RepeatedQueryValue {
                param: param.to_string(),
            });
        }

        if let Some(param) = calendar_parameter(&params, &self.config.calendar_params) {
            return Admission::Reject(RejectReason::CalendarParameter { param });
        }

        if params.len() > self.config.max_query_params {
            return Admission::Reject(RejectReason::TooManyQueryParams {
                count: params.len(),
            });
        }

        if url.scheme() != "http" && url.scheme() != "https" {
            return Admission::Reject(RejectReason::UnsupportedScheme {
                scheme: url.scheme().to_string(),
            });
        }

        let host = match extract_host(&url) {
            Some(host) => host,
            None => return Admission::Reject(RejectReason::Malformed),
        };
        if !host.contains(&self.target_domain) {
            return Admission::Reject(RejectReason::OffDomain { host });
        }

        if let Some(extension) = blocked_extension(url.path()) {
            return Admission::Reject(RejectReason::BlockedExtension {
                extension: extension.to_string(),
            });
        }

        Admission::Accept
    }

    fn near_duplicate(&self, raw: &str, traps: &TrapLog) -> Option<RejectReason> {
        traps.recent().find_map(|trap| {
            let score = similarity_score(raw, trap);
            (score <= self.config.similarity_threshold).then(|| RejectReason::NearDuplicateTrap {
                similar_to: trap.to_string(),
                score,
            })
        })
    }
}
