use funil_domain::{GoalType, Role, ote, period};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use funil_storage::{
	models::{Goal, TeamMember},
	queries,
};

use crate::{FunilService, ServiceError, ServiceResult, commissions::RevenueTotals};

#[derive(Debug, Deserialize)]
pub struct CreateGoalRequest {
	/// Scopes the goal to one member; `None` creates a team-wide goal.
	pub team_member_id: Option<Uuid>,
	pub month: u8,
	pub year: i32,
	#[serde(rename = "type")]
	pub goal_type: GoalType,
	pub target_value: f64,
}

#[derive(Debug, Serialize)]
pub struct CreateGoalResponse {
	pub goal_id: Uuid,
}

impl FunilService {
	pub async fn create_goal(&self, request: CreateGoalRequest) -> ServiceResult<CreateGoalResponse> {
		if period::month_bounds(request.year, request.month).is_none() {
			return Err(ServiceError::InvalidRequest {
				message: format!("Invalid period {}/{}.", request.month, request.year),
			});
		}
		if !request.target_value.is_finite() || request.target_value < 0. {
			return Err(ServiceError::InvalidRequest {
				message: "target_value must be a non-negative number.".to_string(),
			});
		}
		if let Some(member_id) = request.team_member_id
			&& queries::fetch_team_member(&self.db, member_id).await?.is_none()
		{
			return Err(ServiceError::NotFound {
				message: format!("Team member {member_id} does not exist."),
			});
		}

		let goal = Goal {
			goal_id: Uuid::new_v4(),
			team_member_id: request.team_member_id,
			month: request.month.into(),
			year: request.year,
			r#type: request.goal_type.as_str().to_string(),
			target_value: request.target_value,
			created_at: OffsetDateTime::now_utc(),
		};

		queries::insert_goal(&self.db, &goal).await?;
		tracing::info!(
			goal_id = %goal.goal_id,
			scope = goal.team_member_id.map(|id| id.to_string()).unwrap_or_else(|| "team".to_string()),
			r#type = goal.r#type,
			"Goal created.",
		);

		Ok(CreateGoalResponse { goal_id: goal.goal_id })
	}
}

/// Member-scoped goal first, then the team-wide row for the same period and
/// type. The most recently created row wins within each scope.
pub(crate) async fn resolve_target(
	service: &FunilService,
	member_id: Uuid,
	month: i32,
	year: i32,
	goal_type: GoalType,
) -> ServiceResult<Option<f64>> {
	if let Some(target) =
		queries::latest_goal_target(&service.db, Some(member_id), month, year, goal_type.as_str())
			.await?
	{
		return Ok(Some(target));
	}

	Ok(queries::latest_goal_target(&service.db, None, month, year, goal_type.as_str()).await?)
}

/// Role-dependent progress for the month. SDRs are measured on attended
/// meetings; closers and admins walk the vendas -> clientes -> faturamento
/// chain, stopping at the first type that resolves a positive target.
pub(crate) async fn goal_progress_for(
	service: &FunilService,
	member: &TeamMember,
	month: i32,
	year: i32,
	start: OffsetDateTime,
	end: OffsetDateTime,
	totals: &RevenueTotals,
) -> ServiceResult<f64> {
	// Rows with an unknown role are measured like closers.
	let role = Role::parse(&member.role).unwrap_or(Role::Closer);

	if role == Role::Sdr {
		let target = resolve_target(service, member.member_id, month, year, GoalType::Reunioes)
			.await?
			.unwrap_or(0.);
		let attended =
			queries::attended_meeting_count(&service.db, member.member_id, start, end).await?;

		return Ok(ote::goal_progress(attended as f64, target));
	}

	let sale_count = totals.sales_count as f64;

	for goal_type in [GoalType::Vendas, GoalType::Clientes] {
		if let Some(target) =
			resolve_target(service, member.member_id, month, year, goal_type).await?
			&& target > 0.
		{
			return Ok(ote::goal_progress(sale_count, target));
		}
	}

	if let Some(target) =
		resolve_target(service, member.member_id, month, year, GoalType::Faturamento).await?
		&& target > 0.
	{
		return Ok(ote::goal_progress(totals.revenue(), target));
	}

	// No goal configured anywhere in the chain.
	Ok(0.)
}
