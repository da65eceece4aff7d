//! Session token checks before protected navigation.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use reqwest::Url;
use serde_json::Value;
use time::OffsetDateTime;

pub const LOGIN_PATH: &str = "/login";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionCheck {
	Valid { expires_at: OffsetDateTime },
	/// Navigation must go to the login screen; `redirect` returns there afterwards.
	Expired { redirect: String },
}

/// Reads the `exp` claim of a JWT without verifying it. Anything unreadable is `None`.
pub fn token_expiry(token: &str) -> Option<OffsetDateTime> {
	let payload = token.trim().split('.').nth(1)?;
	let decoded = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
	let claims: Value = serde_json::from_slice(&decoded).ok()?;
	let exp = claims.get("exp")?.as_i64()?;

	OffsetDateTime::from_unix_timestamp(exp).ok()
}

/// A missing token, a token without a readable expiry, and an expired token all require login.
pub fn check_session(token: Option<&str>, path: &str, now: OffsetDateTime) -> SessionCheck {
	match token.and_then(token_expiry) {
		Some(expires_at) if expires_at > now => SessionCheck::Valid { expires_at },
		_ => SessionCheck::Expired { redirect: login_redirect(path) },
	}
}

/// `/login?redirect=<path>`, with the originating path query-encoded.
pub fn login_redirect(path: &str) -> String {
	let encoded = Url::parse("http://localhost/")
		.map(|mut url| {
			url.set_path(LOGIN_PATH);
			url.query_pairs_mut().append_pair("redirect", path);

			url.query().map(str::to_string).unwrap_or_default()
		})
		.unwrap_or_default();

	if encoded.is_empty() { LOGIN_PATH.to_string() } else { format!("{LOGIN_PATH}?{encoded}") }
}

#[cfg(test)]
mod tests {
	use time::macros::datetime;

	use super::*;

	fn token(claims: &str) -> String {
		format!("eyJhbGciOiJIUzI1NiJ9.{}.sig", URL_SAFE_NO_PAD.encode(claims))
	}

	#[test]
	fn reads_the_expiry_claim() {
		assert_eq!(token_expiry(&token(r#"{"exp":1700000000}"#)), Some(datetime!(2023-11-14 22:13:20 UTC)));
		assert_eq!(token_expiry(&token(r#"{"sub":"u1"}"#)), None);
		assert_eq!(token_expiry("not-a-jwt"), None);
	}

	#[test]
	fn valid_tokens_pass_and_expired_ones_redirect() {
		let now = datetime!(2023-11-14 00:00 UTC);

		assert!(matches!(
			check_session(Some(&token(r#"{"exp":1700000000}"#)), "/acme", now),
			SessionCheck::Valid { .. }
		));
		assert_eq!(
			check_session(Some(&token(r#"{"exp":1600000000}"#)), "/acme/research/reports?tab=1", now),
			SessionCheck::Expired { redirect: "/login?redirect=%2Facme%2Fresearch%2Freports%3Ftab%3D1".to_string() }
		);
		assert!(matches!(check_session(None, "/", now), SessionCheck::Expired { .. }));
		assert!(matches!(
			check_session(Some(&token(r#"{"name":"no exp"}"#)), "/", now),
			SessionCheck::Expired { .. }
		));
	}
}
