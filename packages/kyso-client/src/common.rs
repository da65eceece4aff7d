use kyso_domain::{CommonData, Organization, Permissions, Team, User};

use crate::{ApiClient, Error, Result};

impl ApiClient {
	/// Resolves route slugs and the caller's identity into a [`CommonData`] bundle.
	///
	/// Anonymous callers (no token, or a rejected token) resolve with no user and the permissions
	/// granted to the public.
	pub async fn resolve_common_data(
		&self,
		organization: Option<&str>,
		team: Option<&str>,
	) -> Result<CommonData> {
		let user = self.current_user().await?;
		let organization = match organization {
			Some(slug) => {
				let url = self.url(&["organizations", "slug", slug]);

				Some(self.get_data::<Organization>(url).await?)
			},
			None => None,
		};
		let team = match (organization.as_ref(), team) {
			(Some(org), Some(slug)) => {
				let url = self.url(&["organizations", &org.id, "teams", "slug", slug]);

				Some(self.get_data::<Team>(url).await?)
			},
			(None, Some(slug)) =>
				return Err(Error::InvalidConfig {
					message: format!("team '{slug}' requires an organization."),
				}),
			_ => None,
		};
		let mut url = self.url(&["auth", "permissions"]);

		if let Some(org) = organization.as_ref() {
			url.query_pairs_mut().append_pair("organization_id", &org.id);
		}
		if let Some(team) = team.as_ref() {
			url.query_pairs_mut().append_pair("team_id", &team.id);
		}

		let permissions: Permissions = self.get_data(url).await?;

		tracing::debug!(
			authenticated = user.is_some(),
			permissions = permissions.len(),
			"Resolved common data."
		);

		Ok(CommonData::new(user, permissions, organization, team))
	}

	async fn current_user(&self) -> Result<Option<User>> {
		if self.token().is_none() {
			return Ok(None);
		}

		match self.get_data::<User>(self.url(&["user"])).await {
			Ok(user) => Ok(Some(user)),
			Err(Error::Api { status: 401 | 403, message }) => {
				tracing::warn!(error = %message, "Session token was rejected. Continuing anonymously.");

				Ok(None)
			},
			Err(err) => Err(err),
		}
	}
}
