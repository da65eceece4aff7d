//! Onboarding progress updates.
//!
//! The local checklist is updated optimistically and never rolled back. Each update carries an
//! `Idempotency-Key` derived from the user and the payload, so retried deliveries of the same state
//! are safe, and is retried with capped exponential backoff on transport errors and 5xx responses.

use std::time::Duration;

use reqwest::Method;

use kyso_domain::{OnboardingProgress, OnboardingStep};

use crate::{ApiClient, BoxFuture, Result, api};

pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

const MAX_BACKOFF_EXPONENT: u32 = 6;

pub trait ProgressSink
where
	Self: Send + Sync,
{
	fn send_progress<'a>(
		&'a self,
		user_id: &'a str,
		progress: &'a OnboardingProgress,
		idempotency_key: &'a str,
	) -> BoxFuture<'a, Result<()>>;
}

impl ProgressSink for ApiClient {
	fn send_progress<'a>(
		&'a self,
		user_id: &'a str,
		progress: &'a OnboardingProgress,
		idempotency_key: &'a str,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			let url = self.url(&["users", user_id]);
			let body = serde_json::json!({ "onboarding_progress": progress });
			let res = self
				.request(Method::PUT, url)?
				.header(IDEMPOTENCY_KEY_HEADER, idempotency_key)
				.json(&body)
				.send()
				.await?;

			api::check_status(res).await?;

			Ok(())
		})
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
	pub max_attempts: u32,
	pub base_backoff_ms: u64,
	pub max_backoff_ms: u64,
}
impl RetryPolicy {
	pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
		let exp = attempt.max(1).saturating_sub(1).min(MAX_BACKOFF_EXPONENT);
		let base = self.base_backoff_ms.saturating_mul(1 << exp);

		Duration::from_millis(base.min(self.max_backoff_ms))
	}
}
impl From<&kyso_config::Mutations> for RetryPolicy {
	fn from(cfg: &kyso_config::Mutations) -> Self {
		Self {
			max_attempts: cfg.max_attempts,
			base_backoff_ms: cfg.base_backoff_ms,
			max_backoff_ms: cfg.max_backoff_ms,
		}
	}
}

pub fn idempotency_key(user_id: &str, progress: &OnboardingProgress) -> Result<String> {
	let payload = serde_json::json!({ "user_id": user_id, "onboarding_progress": progress });
	let raw = serde_json::to_vec(&payload)?;

	Ok(blake3::hash(&raw).to_hex().to_string())
}

/// Delivers `progress`, retrying retryable failures. Returns the number of attempts used.
pub async fn deliver_progress<S>(
	sink: &S,
	user_id: &str,
	progress: &OnboardingProgress,
	policy: &RetryPolicy,
) -> Result<u32>
where
	S: ProgressSink + ?Sized,
{
	let key = idempotency_key(user_id, progress)?;
	let max_attempts = policy.max_attempts.max(1);
	let mut attempt = 1;

	loop {
		match sink.send_progress(user_id, progress, &key).await {
			Ok(()) => return Ok(attempt),
			Err(err) if err.is_retryable() && attempt < max_attempts => {
				let delay = policy.backoff_for_attempt(attempt);

				tracing::warn!(
					attempt,
					delay_ms = delay.as_millis() as u64,
					error = %err,
					"Onboarding update failed. Retrying."
				);
				tokio::time::sleep(delay).await;

				attempt += 1;
			},
			Err(err) => return Err(err),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MutationOutcome {
	/// The local checklist changed.
	pub changed: bool,
	/// The server acknowledged the new state.
	pub delivered: bool,
}

/// The user's checklist plus the channel that persists it.
pub struct OnboardingTracker<S> {
	user_id: String,
	progress: OnboardingProgress,
	sink: S,
	policy: RetryPolicy,
}
impl<S> OnboardingTracker<S>
where
	S: ProgressSink,
{
	pub fn new(
		user_id: impl Into<String>,
		progress: OnboardingProgress,
		sink: S,
		policy: RetryPolicy,
	) -> Self {
		Self { user_id: user_id.into(), progress, sink, policy }
	}

	pub fn progress(&self) -> &OnboardingProgress {
		&self.progress
	}

	pub fn percent(&self) -> u8 {
		self.progress.percent()
	}

	pub async fn mark_done(&mut self, step: OnboardingStep) -> MutationOutcome {
		if !self.progress.mark_done(step) {
			return MutationOutcome { changed: false, delivered: false };
		}

		self.persist().await
	}

	pub async fn finish_and_remove(&mut self) -> MutationOutcome {
		if self.progress.is_finished() {
			return MutationOutcome { changed: false, delivered: false };
		}

		self.progress.finish_and_remove();

		self.persist().await
	}

	async fn persist(&self) -> MutationOutcome {
		match deliver_progress(&self.sink, &self.user_id, &self.progress, &self.policy).await {
			Ok(_) => MutationOutcome { changed: true, delivered: true },
			Err(err) => {
				tracing::warn!(user_id = %self.user_id, error = %err, "Onboarding update was not persisted.");

				MutationOutcome { changed: true, delivered: false }
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn backoff_doubles_up_to_the_cap() {
		let policy = RetryPolicy { max_attempts: 5, base_backoff_ms: 100, max_backoff_ms: 350 };

		assert_eq!(policy.backoff_for_attempt(1), Duration::from_millis(100));
		assert_eq!(policy.backoff_for_attempt(2), Duration::from_millis(200));
		assert_eq!(policy.backoff_for_attempt(3), Duration::from_millis(350));
		assert_eq!(policy.backoff_for_attempt(40), Duration::from_millis(350));
	}

	#[test]
	fn idempotency_keys_follow_the_payload() {
		let mut progress = OnboardingProgress::default();
		let before = idempotency_key("u1", &progress).expect("Key must hash.");

		assert_eq!(before, idempotency_key("u1", &progress).expect("Key must hash."));
		assert_ne!(before, idempotency_key("u2", &progress).expect("Key must hash."));

		progress.mark_done(OnboardingStep::ExploreReports);

		assert_ne!(before, idempotency_key("u1", &progress).expect("Key must hash."));
	}
}
