use funil_domain::{GoalType, ProductType, Role};
use funil_service::{
	CreateGoalRequest, CreateMemberRequest, CreateProposalRequest, SummaryRequest,
	UpdateStatusRequest,
};
use funil_storage::queries;
use serde_json::json;
use time::OffsetDateTime;

#[tokio::test]
#[ignore = "Requires external Postgres. Set FUNIL_PG_DSN to run."]
async fn vendas_wins_when_all_three_goal_types_are_configured() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping goal chain test; set FUNIL_PG_DSN to run.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, super::stub_providers("{}"))
		.await
		.expect("Failed to build service.");
	let member = service
		.create_member(CreateMemberRequest {
			name: "Alice".to_string(),
			role: Role::Closer,
			ote_base: 3_000.,
			ote_bonus: 2_000.,
			commission_mrr_percent: None,
			commission_projeto_percent: None,
		})
		.await
		.expect("Failed to create member.");
	let now = OffsetDateTime::now_utc();
	let (month, year) = (u8::from(now.month()), now.year());

	// All three chain types exist for the same member and month. `vendas` is
	// first in the chain, so the others must never be consulted.
	for (goal_type, target_value) in [
		(GoalType::Vendas, 4.),
		(GoalType::Clientes, 2.),
		(GoalType::Faturamento, 100_000.),
	] {
		service
			.create_goal(CreateGoalRequest {
				team_member_id: Some(member.member_id),
				month,
				year,
				goal_type,
				target_value,
			})
			.await
			.expect("Failed to create goal.");
	}

	let proposal = service
		.create_proposal(CreateProposalRequest {
			lead_id: None,
			closer_id: Some(member.member_id),
			title: "Renovacao".to_string(),
			product_type: Some(ProductType::Mrr),
			calor: None,
		})
		.await
		.expect("Failed to create proposal.");

	service
		.update_proposal_status(UpdateStatusRequest {
			proposal_id: proposal.proposal_id,
			status: "compromisso_marcado".to_string(),
			sale_value: None,
		})
		.await
		.expect("Failed to book the meeting.");
	service
		.update_proposal_status(UpdateStatusRequest {
			proposal_id: proposal.proposal_id,
			status: "vendido".to_string(),
			sale_value: Some(10_000.),
		})
		.await
		.expect("Failed to close the proposal.");

	let summary = service
		.commission_summary(SummaryRequest { team_member_id: member.member_id, month, year })
		.await
		.expect("Failed to compute summary.");

	// One sale against the `vendas` target of four. Had `clientes` won the
	// progress would be 50, and 10 had `faturamento` won.
	assert_eq!(summary.goal_progress, 25.);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set FUNIL_PG_DSN to run."]
async fn team_wide_clientes_goal_beats_member_faturamento_goal() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping goal chain test; set FUNIL_PG_DSN to run.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, super::stub_providers("{}"))
		.await
		.expect("Failed to build service.");
	let member = service
		.create_member(CreateMemberRequest {
			name: "Bruno".to_string(),
			role: Role::Closer,
			ote_base: 3_000.,
			ote_bonus: 2_000.,
			commission_mrr_percent: None,
			commission_projeto_percent: None,
		})
		.await
		.expect("Failed to create member.");
	let now = OffsetDateTime::now_utc();
	let (month, year) = (u8::from(now.month()), now.year());

	// No `vendas` goal anywhere, so the chain falls through to `clientes`
	// resolved at team scope, and the member's `faturamento` goal is never
	// consulted.
	service
		.create_goal(CreateGoalRequest {
			team_member_id: None,
			month,
			year,
			goal_type: GoalType::Clientes,
			target_value: 2.,
		})
		.await
		.expect("Failed to create team goal.");
	service
		.create_goal(CreateGoalRequest {
			team_member_id: Some(member.member_id),
			month,
			year,
			goal_type: GoalType::Faturamento,
			target_value: 100_000.,
		})
		.await
		.expect("Failed to create member goal.");

	let proposal = service
		.create_proposal(CreateProposalRequest {
			lead_id: None,
			closer_id: Some(member.member_id),
			title: "Expansao".to_string(),
			product_type: Some(ProductType::Mrr),
			calor: None,
		})
		.await
		.expect("Failed to create proposal.");

	service
		.update_proposal_status(UpdateStatusRequest {
			proposal_id: proposal.proposal_id,
			status: "compromisso_marcado".to_string(),
			sale_value: None,
		})
		.await
		.expect("Failed to book the meeting.");
	service
		.update_proposal_status(UpdateStatusRequest {
			proposal_id: proposal.proposal_id,
			status: "vendido".to_string(),
			sale_value: Some(10_000.),
		})
		.await
		.expect("Failed to close the proposal.");

	let summary = service
		.commission_summary(SummaryRequest { team_member_id: member.member_id, month, year })
		.await
		.expect("Failed to compute summary.");

	// One sale against a target of two clients.
	assert_eq!(summary.goal_progress, 50.);
	assert_eq!(summary.calculated_bonus, 0.);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set FUNIL_PG_DSN to run."]
async fn sdrs_are_measured_on_attended_meetings() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping goal chain test; set FUNIL_PG_DSN to run.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, super::stub_providers("{}"))
		.await
		.expect("Failed to build service.");
	let sdr = service
		.create_member(CreateMemberRequest {
			name: "Clara".to_string(),
			role: Role::Sdr,
			ote_base: 2_000.,
			ote_bonus: 1_000.,
			commission_mrr_percent: None,
			commission_projeto_percent: None,
		})
		.await
		.expect("Failed to create member.");
	let now = OffsetDateTime::now_utc();
	let (month, year) = (u8::from(now.month()), now.year());

	service
		.create_goal(CreateGoalRequest {
			team_member_id: Some(sdr.member_id),
			month,
			year,
			goal_type: GoalType::Reunioes,
			target_value: 4.,
		})
		.await
		.expect("Failed to create goal.");

	let ingested = service
		.ingest_lead(json!({
			"name": "Lead Reuniao",
			"email": "lead@empresa.com",
			"origin": "whatsapp",
		}))
		.await
		.expect("Failed to ingest lead.");
	let lead_id = ingested.lead_id.expect("Lead id missing.");
	let mut tx = service.db.pool.begin().await.expect("Failed to begin transaction.");

	for status in ["compareceu", "compareceu", "faltou"] {
		queries::insert_meeting_tx(&mut tx, lead_id, Some(sdr.member_id), status, now, now)
			.await
			.expect("Failed to insert meeting.");
	}

	tx.commit().await.expect("Failed to commit.");

	let summary = service
		.commission_summary(SummaryRequest { team_member_id: sdr.member_id, month, year })
		.await
		.expect("Failed to compute summary.");

	// Two attended meetings against a target of four.
	assert_eq!(summary.goal_progress, 50.);
	assert_eq!(summary.sales_count, 0);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
