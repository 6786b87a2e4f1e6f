use funil_config::Commissions;
use funil_domain::{ProductType, ote};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use funil_storage::{
	models::{Proposal, TeamMember},
	queries,
};

use crate::{FunilService, ServiceError, ServiceResult, goals};

#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
	pub team_member_id: Uuid,
	pub month: u8,
	pub year: i32,
}

/// Derived earnings breakdown for one member and month. Never persisted;
/// recomputed from sold proposals and goal rows on every request.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionSummary {
	#[serde(rename = "totalMRR")]
	pub total_mrr: f64,
	pub total_projeto: f64,
	#[serde(rename = "commissionMRR")]
	pub commission_mrr: f64,
	pub commission_projeto: f64,
	pub total_commission: f64,
	pub ote_base: f64,
	pub ote_bonus: f64,
	pub goal_progress: f64,
	pub calculated_bonus: f64,
	pub total_earnings: f64,
	pub sales_count: usize,
}

#[derive(Debug, Default, PartialEq)]
pub(crate) struct RevenueTotals {
	pub(crate) total_mrr: f64,
	pub(crate) total_projeto: f64,
	pub(crate) sales_count: usize,
}
impl RevenueTotals {
	pub(crate) fn revenue(&self) -> f64 {
		self.total_mrr + self.total_projeto
	}
}

/// Buckets sold proposals by product type. Rows with an unknown or missing
/// product type count toward `sales_count` but toward neither revenue bucket.
pub(crate) fn split_revenue(proposals: &[Proposal]) -> RevenueTotals {
	let mut totals = RevenueTotals { sales_count: proposals.len(), ..Default::default() };

	for proposal in proposals {
		let value = proposal.sale_value.unwrap_or(0.);

		match proposal.product_type.as_deref().and_then(ProductType::parse) {
			Some(ProductType::Mrr) => totals.total_mrr += value,
			Some(ProductType::Projeto) => totals.total_projeto += value,
			None => {},
		}
	}

	totals
}

pub(crate) fn build_summary(
	member: &TeamMember,
	defaults: &Commissions,
	totals: &RevenueTotals,
	goal_progress: f64,
) -> CommissionSummary {
	let mrr_percent = member.commission_mrr_percent.unwrap_or(defaults.default_mrr_percent);
	let projeto_percent =
		member.commission_projeto_percent.unwrap_or(defaults.default_projeto_percent);
	let commission_mrr = totals.total_mrr * (mrr_percent / 100.);
	let commission_projeto = totals.total_projeto * (projeto_percent / 100.);
	let total_commission = commission_mrr + commission_projeto;
	let calculated_bonus = ote::calculate_ote_bonus(goal_progress, member.ote_bonus);

	CommissionSummary {
		total_mrr: totals.total_mrr,
		total_projeto: totals.total_projeto,
		commission_mrr,
		commission_projeto,
		total_commission,
		ote_base: member.ote_base,
		ote_bonus: member.ote_bonus,
		goal_progress,
		calculated_bonus,
		total_earnings: member.ote_base + calculated_bonus + total_commission,
		sales_count: totals.sales_count,
	}
}

impl FunilService {
	pub async fn commission_summary(
		&self,
		request: SummaryRequest,
	) -> ServiceResult<CommissionSummary> {
		let (start, end) =
			funil_domain::period::month_bounds(request.year, request.month).ok_or_else(|| {
				ServiceError::InvalidRequest {
					message: format!(
						"Invalid period {}/{}.",
						request.month, request.year
					),
				}
			})?;
		let member = queries::fetch_team_member(&self.db, request.team_member_id)
			.await?
			.ok_or_else(|| ServiceError::NotFound {
				message: format!("Team member {} does not exist.", request.team_member_id),
			})?;
		let proposals =
			queries::sold_proposals_in_month(&self.db, member.member_id, start, end).await?;
		let totals = split_revenue(&proposals);
		let goal_progress = goals::goal_progress_for(
			self,
			&member,
			request.month.into(),
			request.year,
			start,
			end,
			&totals,
		)
		.await?;
		let summary = build_summary(&member, &self.cfg.commissions, &totals, goal_progress);

		tracing::debug!(
			member_id = %member.member_id,
			month = request.month,
			year = request.year,
			sales = summary.sales_count,
			"Commission summary computed.",
		);

		Ok(summary)
	}
}
