// self
use crate::obs::{CallKind, CallOutcome};

/// Bumps `atomik_call_total` for one token fetch or signed request.
///
/// Every call records `attempt` first and then exactly one of `success`, `rejected` (the server
/// answered with a verified business error), or `failure`. Compiles to nothing unless the
/// `metrics` feature is enabled.
pub fn record_call_outcome(kind: CallKind, outcome: CallOutcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!(
		"atomik_call_total",
		"operation" => kind.as_str(),
		"outcome" => outcome.as_str()
	)
	.increment(1);

	#[cfg(not(feature = "metrics"))]
	let _ = (kind, outcome);
}
