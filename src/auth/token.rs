//! The cached access token and its freshness rules.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Access token held by the [`TokenManager`](crate::auth::TokenManager).
///
/// Values are immutable; a refresh builds a new `CachedToken` and swaps it into the cache so
/// readers that already cloned the previous one keep a usable token.
#[derive(Clone)]
pub struct CachedToken {
	/// Bearer token value; callers must avoid logging it.
	pub access_token: TokenSecret,
	/// Instant the exchange completed.
	pub issued_at: OffsetDateTime,
	/// Instant derived from `issued_at + expires_in`.
	pub expires_at: OffsetDateTime,
}
impl CachedToken {
	/// Builds a token that expires `expires_in` after `issued_at`.
	pub fn new(
		access_token: impl Into<String>,
		issued_at: OffsetDateTime,
		expires_in: Duration,
	) -> Self {
		Self {
			access_token: TokenSecret::new(access_token),
			issued_at,
			expires_at: issued_at + expires_in,
		}
	}

	/// Returns `true` while `instant` is strictly before `expires_at - safety_margin`.
	pub fn is_fresh_at(&self, instant: OffsetDateTime, safety_margin: Duration) -> bool {
		instant < self.expires_at - safety_margin
	}

	/// Lifetime left at `instant`, clamped to zero.
	pub fn remaining_at(&self, instant: OffsetDateTime) -> Duration {
		let remaining = self.expires_at - instant;

		if remaining.is_negative() { Duration::ZERO } else { remaining }
	}
}
impl Debug for CachedToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CachedToken")
			.field("access_token", &"<redacted>")
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}
