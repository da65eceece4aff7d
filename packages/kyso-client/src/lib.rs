pub mod api;
pub mod comments;
pub mod common;
pub mod onboarding;
pub mod session;
pub mod settings;

mod error;

pub use api::{ApiClient, auth_headers};
pub use error::{Error, Result};
pub use onboarding::{
	MutationOutcome, OnboardingTracker, ProgressSink, RetryPolicy, deliver_progress, idempotency_key,
};
pub use session::{SessionCheck, check_session, login_redirect, token_expiry};
pub use settings::{
	PublicSettings, SettingEntry, SettingsCache, SettingsLookup, SettingsOrigin, SettingsSource,
};

use std::{future::Future, pin::Pin};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
