use funil_domain::{ProductType, status::ProposalStatus};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use funil_storage::{models::Proposal, queries};

use crate::{FunilService, ServiceError, ServiceResult, time_serde};

#[derive(Debug, Deserialize)]
pub struct CreateProposalRequest {
	pub lead_id: Option<Uuid>,
	pub closer_id: Option<Uuid>,
	pub title: String,
	pub product_type: Option<ProductType>,
	/// Deal heat on a 0..=10 scale.
	pub calor: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct CreateProposalResponse {
	pub proposal_id: Uuid,
	pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
	pub proposal_id: Uuid,
	pub status: String,
	/// Required when closing as `vendido`; rejected otherwise.
	pub sale_value: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct UpdateStatusResponse {
	pub proposal_id: Uuid,
	pub status: String,
	#[serde(with = "time_serde::option")]
	pub closed_at: Option<OffsetDateTime>,
}

impl FunilService {
	pub async fn create_proposal(
		&self,
		request: CreateProposalRequest,
	) -> ServiceResult<CreateProposalResponse> {
		let title = request.title.trim();

		if title.is_empty() {
			return Err(ServiceError::InvalidRequest {
				message: "title must not be empty.".to_string(),
			});
		}
		if let Some(calor) = request.calor
			&& !(0..=10).contains(&calor)
		{
			return Err(ServiceError::InvalidRequest {
				message: "calor must be between 0 and 10.".to_string(),
			});
		}
		if let Some(closer_id) = request.closer_id
			&& queries::fetch_team_member(&self.db, closer_id).await?.is_none()
		{
			return Err(ServiceError::NotFound {
				message: format!("Team member {closer_id} does not exist."),
			});
		}
		if let Some(lead_id) = request.lead_id
			&& queries::fetch_lead(&self.db, lead_id).await?.is_none()
		{
			return Err(ServiceError::NotFound {
				message: format!("Lead {lead_id} does not exist."),
			});
		}

		let now = OffsetDateTime::now_utc();
		let proposal = Proposal {
			proposal_id: Uuid::new_v4(),
			lead_id: request.lead_id,
			closer_id: request.closer_id,
			title: title.to_string(),
			sale_value: None,
			product_type: request.product_type.map(|pt| pt.as_str().to_string()),
			status: ProposalStatus::MarcarCompromisso.as_str().to_string(),
			calor: request.calor,
			created_at: now,
			updated_at: now,
			closed_at: None,
		};

		queries::insert_proposal(&self.db, &proposal).await?;
		tracing::info!(proposal_id = %proposal.proposal_id, "Proposal created.");

		Ok(CreateProposalResponse { proposal_id: proposal.proposal_id, status: proposal.status })
	}

	/// Moves a proposal along its lifecycle. The row is locked for the span of
	/// the check-then-write so two concurrent updates cannot both pass the
	/// transition guard.
	pub async fn update_proposal_status(
		&self,
		request: UpdateStatusRequest,
	) -> ServiceResult<UpdateStatusResponse> {
		let to = ProposalStatus::parse(&request.status).ok_or_else(|| {
			ServiceError::InvalidRequest {
				message: format!("Unknown proposal status `{}`.", request.status),
			}
		})?;

		if request.sale_value.is_some() && to != ProposalStatus::Vendido {
			return Err(ServiceError::InvalidRequest {
				message: "sale_value may only be set when closing as vendido.".to_string(),
			});
		}

		let now = OffsetDateTime::now_utc();
		let mut tx = self.db.pool.begin().await.map_err(ServiceError::from)?;
		let proposal = queries::fetch_proposal_for_update_tx(&mut tx, request.proposal_id)
			.await?
			.ok_or_else(|| ServiceError::NotFound {
				message: format!("Proposal {} does not exist.", request.proposal_id),
			})?;
		let from = ProposalStatus::parse(&proposal.status).ok_or_else(|| {
			ServiceError::Storage {
				message: format!(
					"Proposal {} carries unknown status `{}`.",
					proposal.proposal_id, proposal.status
				),
			}
		})?;

		if !from.can_transition(to) {
			return Err(ServiceError::InvalidTransition {
				message: format!(
					"Cannot move a proposal from `{}` to `{}`.",
					from.as_str(),
					to.as_str()
				),
			});
		}

		let (sale_value, closed_at) = if to == ProposalStatus::Vendido {
			let value = request.sale_value.ok_or_else(|| ServiceError::InvalidRequest {
				message: "sale_value is required when closing as vendido.".to_string(),
			})?;

			if !value.is_finite() || value < 0. {
				return Err(ServiceError::InvalidRequest {
					message: "sale_value must be a non-negative number.".to_string(),
				});
			}

			(Some(value), Some(now))
		} else {
			(proposal.sale_value, proposal.closed_at)
		};

		queries::update_proposal_status_tx(
			&mut tx,
			proposal.proposal_id,
			to.as_str(),
			sale_value,
			closed_at,
			now,
		)
		.await?;
		tx.commit().await.map_err(ServiceError::from)?;
		tracing::info!(
			proposal_id = %proposal.proposal_id,
			from = from.as_str(),
			to = to.as_str(),
			"Proposal status updated.",
		);

		Ok(UpdateStatusResponse {
			proposal_id: proposal.proposal_id,
			status: to.as_str().to_string(),
			closed_at,
		})
	}
}
