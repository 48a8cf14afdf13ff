//! Redacted wrapper for access tokens so they never reach logs.

// self
use crate::_prelude::*;

/// Opaque access token issued by the identity provider.
///
/// Formatting through [`Debug`] or [`Display`] always yields `<redacted>`; only
/// [`TokenSecret::expose`] hands out the raw value, and its sole caller should be the code
/// that attaches the `Authorization` header.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenSecret(Arc<str>);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(Arc::from(value.into()))
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn formatters_redact_the_token() {
		let secret = TokenSecret::new("catalog-access");

		assert_eq!(format!("{secret:?}"), "TokenSecret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
		assert_eq!(secret.expose(), "catalog-access");
	}

	#[test]
	fn clones_share_the_value() {
		let secret = TokenSecret::new("shared");

		assert_eq!(secret.clone(), secret);
	}
}
