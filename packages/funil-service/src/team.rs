use funil_domain::Role;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use funil_storage::{models::TeamMember, queries};

use crate::{FunilService, ServiceError, ServiceResult, time_serde};

#[derive(Debug, Deserialize)]
pub struct CreateMemberRequest {
	pub name: String,
	pub role: Role,
	pub ote_base: f64,
	pub ote_bonus: f64,
	pub commission_mrr_percent: Option<f64>,
	pub commission_projeto_percent: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMemberRequest {
	pub member_id: Uuid,
	pub name: Option<String>,
	pub role: Option<Role>,
	/// `false` soft-deactivates; members are never hard-deleted.
	pub is_active: Option<bool>,
	pub ote_base: Option<f64>,
	pub ote_bonus: Option<f64>,
	pub commission_mrr_percent: Option<f64>,
	pub commission_projeto_percent: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct MemberView {
	pub member_id: Uuid,
	pub name: String,
	pub role: String,
	pub is_active: bool,
	pub ote_base: f64,
	pub ote_bonus: f64,
	pub commission_mrr_percent: Option<f64>,
	pub commission_projeto_percent: Option<f64>,
	#[serde(with = "time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "time_serde")]
	pub updated_at: OffsetDateTime,
}
impl From<TeamMember> for MemberView {
	fn from(member: TeamMember) -> Self {
		Self {
			member_id: member.member_id,
			name: member.name,
			role: member.role,
			is_active: member.is_active,
			ote_base: member.ote_base,
			ote_bonus: member.ote_bonus,
			commission_mrr_percent: member.commission_mrr_percent,
			commission_projeto_percent: member.commission_projeto_percent,
			created_at: member.created_at,
			updated_at: member.updated_at,
		}
	}
}

fn validate_amount(label: &str, value: f64) -> ServiceResult<()> {
	if !value.is_finite() || value < 0. {
		return Err(ServiceError::InvalidRequest {
			message: format!("{label} must be a non-negative number."),
		});
	}

	Ok(())
}

fn validate_percent(label: &str, value: Option<f64>) -> ServiceResult<()> {
	if let Some(value) = value
		&& (!value.is_finite() || !(0. ..=100.).contains(&value))
	{
		return Err(ServiceError::InvalidRequest {
			message: format!("{label} must be between 0 and 100."),
		});
	}

	Ok(())
}

impl FunilService {
	pub async fn create_member(&self, request: CreateMemberRequest) -> ServiceResult<MemberView> {
		let name = request.name.trim();

		if name.is_empty() {
			return Err(ServiceError::InvalidRequest {
				message: "name must not be empty.".to_string(),
			});
		}

		validate_amount("ote_base", request.ote_base)?;
		validate_amount("ote_bonus", request.ote_bonus)?;
		validate_percent("commission_mrr_percent", request.commission_mrr_percent)?;
		validate_percent("commission_projeto_percent", request.commission_projeto_percent)?;

		let now = OffsetDateTime::now_utc();
		let member = TeamMember {
			member_id: Uuid::new_v4(),
			name: name.to_string(),
			role: request.role.as_str().to_string(),
			is_active: true,
			ote_base: request.ote_base,
			ote_bonus: request.ote_bonus,
			commission_mrr_percent: request.commission_mrr_percent,
			commission_projeto_percent: request.commission_projeto_percent,
			created_at: now,
			updated_at: now,
		};

		queries::insert_team_member(&self.db, &member).await?;
		tracing::info!(member_id = %member.member_id, role = member.role, "Team member created.");

		Ok(member.into())
	}

	pub async fn update_member(&self, request: UpdateMemberRequest) -> ServiceResult<MemberView> {
		let mut member = queries::fetch_team_member(&self.db, request.member_id)
			.await?
			.ok_or_else(|| ServiceError::NotFound {
				message: format!("Team member {} does not exist.", request.member_id),
			})?;

		if let Some(name) = request.name {
			let name = name.trim();

			if name.is_empty() {
				return Err(ServiceError::InvalidRequest {
					message: "name must not be empty.".to_string(),
				});
			}

			member.name = name.to_string();
		}
		if let Some(role) = request.role {
			member.role = role.as_str().to_string();
		}
		if let Some(is_active) = request.is_active {
			member.is_active = is_active;
		}
		if let Some(ote_base) = request.ote_base {
			validate_amount("ote_base", ote_base)?;

			member.ote_base = ote_base;
		}
		if let Some(ote_bonus) = request.ote_bonus {
			validate_amount("ote_bonus", ote_bonus)?;

			member.ote_bonus = ote_bonus;
		}
		if request.commission_mrr_percent.is_some() {
			validate_percent("commission_mrr_percent", request.commission_mrr_percent)?;

			member.commission_mrr_percent = request.commission_mrr_percent;
		}
		if request.commission_projeto_percent.is_some() {
			validate_percent("commission_projeto_percent", request.commission_projeto_percent)?;

			member.commission_projeto_percent = request.commission_projeto_percent;
		}

		member.updated_at = OffsetDateTime::now_utc();

		queries::update_team_member(&self.db, &member).await?;
		tracing::info!(member_id = %member.member_id, "Team member updated.");

		Ok(member.into())
	}

	pub async fn list_members(&self) -> ServiceResult<Vec<MemberView>> {
		let members = queries::list_active_team_members(&self.db).await?;

		Ok(members.into_iter().map(MemberView::from).collect())
	}
}
