use reqwest::Url;

use kyso_domain::InlineComment;
use kyso_filter::TaskQuery;

use crate::{ApiClient, Result};

pub const INLINE_COMMENT_SEARCH_PATH: [&str; 2] = ["inline-comments", "search"];

impl ApiClient {
	/// The search URL for a settled task filter.
	pub fn inline_comment_search_url(&self, query: &TaskQuery) -> Url {
		let mut url = self.url(&INLINE_COMMENT_SEARCH_PATH);

		url.query_pairs_mut().extend_pairs(query.pairs());

		url
	}

	pub async fn search_inline_comments(&self, query: &TaskQuery) -> Result<Vec<InlineComment>> {
		let url = self.inline_comment_search_url(query);

		tracing::debug!(url = %url, "Searching inline comments.");

		self.get_data(url).await
	}

	pub async fn report_inline_comments(&self, report_id: &str) -> Result<Vec<InlineComment>> {
		let mut url = self.url(&["inline-comments"]);

		url.query_pairs_mut().append_pair("report_id", report_id);

		self.get_data(url).await
	}
}
