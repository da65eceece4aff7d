use std::time::Duration;

use reqwest::{
	Client, Method, RequestBuilder, Response, Url,
	header::{AUTHORIZATION, HeaderMap},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{Error, Result};

#[derive(Clone, Debug)]
pub struct ApiClient {
	http: Client,
	base_url: Url,
	token: Option<String>,
}
impl ApiClient {
	pub fn new(cfg: &kyso_config::Api) -> Result<Self> {
		let http = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
		let base_url = parse_base_url(&cfg.base_url)?;

		Ok(Self { http, base_url, token: cfg.token.clone() })
	}

	pub fn with_token(mut self, token: Option<String>) -> Self {
		self.token = token.filter(|token| !token.trim().is_empty());

		self
	}

	pub fn token(&self) -> Option<&str> {
		self.token.as_deref()
	}

	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Appends `segments` to the base URL, keeping the base path (`/api/v1`). Each segment is
	/// percent-encoded as a single path segment, so ids cannot add or remove levels.
	pub fn url(&self, segments: &[&str]) -> Url {
		let mut url = self.base_url.clone();

		if let Ok(mut path) = url.path_segments_mut() {
			path.pop_if_empty().extend(segments);
		}

		url
	}

	pub fn headers(&self) -> Result<HeaderMap> {
		auth_headers(self.token.as_deref())
	}

	pub(crate) fn request(&self, method: Method, url: Url) -> Result<RequestBuilder> {
		Ok(self.http.request(method, url).headers(self.headers()?))
	}

	/// GETs `url` and decodes the `data` member of the platform response envelope.
	pub async fn get_data<T>(&self, url: Url) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let res = self.request(Method::GET, url)?.send().await?;
		let body: Value = check_status(res).await?.json().await?;

		Ok(serde_json::from_value(unwrap_data(body))?)
	}
}

/// Bearer authorization when a token is present, empty headers otherwise.
pub fn auth_headers(token: Option<&str>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	if let Some(token) = token.filter(|token| !token.trim().is_empty()) {
		headers.insert(AUTHORIZATION, format!("Bearer {token}").parse()?);
	}

	Ok(headers)
}

/// Turns a non-success response into [`Error::Api`] carrying the server-provided message.
pub(crate) async fn check_status(res: Response) -> Result<Response> {
	let status = res.status();

	if status.is_success() {
		return Ok(res);
	}

	let text = res.text().await.unwrap_or_default();
	let message = serde_json::from_str::<Value>(&text)
		.ok()
		.and_then(|body| body.get("message").and_then(Value::as_str).map(str::to_string))
		.filter(|message| !message.trim().is_empty())
		.unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

	Err(Error::Api { status: status.as_u16(), message })
}

/// Platform responses wrap payloads as `{ "data": ..., "relations": ... }`; bare bodies pass through.
pub(crate) fn unwrap_data(body: Value) -> Value {
	match body {
		Value::Object(mut map) if map.contains_key("data") => map.remove("data").unwrap_or(Value::Null),
		other => other,
	}
}

fn parse_base_url(raw: &str) -> Result<Url> {
	Url::parse(raw).map_err(|err| Error::InvalidConfig { message: format!("api.base_url is invalid: {err}.") })
}
