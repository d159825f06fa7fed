//! Optional observability helpers for token and request calls.
//!
//! # Feature Flags
//!
//! - `tracing` (default) emits spans named `atomik.call` with the `operation` and `stage` fields,
//!   and `status` once a verified response arrives, plus debug/warn events for token refreshes and
//!   rejected signatures.
//! - `metrics` increments the `atomik_call_total` counter for every attempt and outcome, labeled
//!   by `operation` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Network operations observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
	/// Client-credentials exchange at the token endpoint.
	TokenFetch,
	/// Signed call to a service endpoint.
	SignedRequest,
}
impl CallKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallKind::TokenFetch => "token_fetch",
			CallKind::SignedRequest => "signed_request",
		}
	}
}
impl Display for CallKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to a call.
	Attempt,
	/// Verified success response.
	Success,
	/// Verified response carrying a business-level error.
	Rejected,
	/// Protocol or transport failure propagated to the caller.
	Failure,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::Rejected => "rejected",
			CallOutcome::Failure => "failure",
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
