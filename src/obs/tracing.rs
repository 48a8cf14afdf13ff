// crates.io
use tracing::{Instrument, Span, instrument::Instrumented};
// self
use crate::{_prelude::*, obs::Operation};

/// Span wrapper used by gateway operations.
#[derive(Clone, Debug)]
pub struct OpSpan {
	span: Span,
}
impl OpSpan {
	/// Creates a new span tagged with the provided operation + stage.
	pub fn new(op: Operation, stage: &'static str) -> Self {
		Self { span: tracing::info_span!("catalog_gateway.op", op = op.as_str(), stage) }
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> Instrumented<Fut>
	where
		Fut: Future,
	{
		fut.instrument(self.span.clone())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::{OpSpan, Operation};

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = OpSpan::new(Operation::ListCatalog, "instrument_wraps_future");
		let value = span.instrument(async { 9 }).await;

		assert_eq!(value, 9);
	}
}
