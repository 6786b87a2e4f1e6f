use funil_domain::{GoalType, Role};
use funil_service::{
	CreateGoalRequest, CreateMemberRequest, CreateProposalRequest, ServiceError, SummaryRequest,
	UpdateStatusRequest,
};
use time::OffsetDateTime;

#[tokio::test]
#[ignore = "Requires external Postgres. Set FUNIL_PG_DSN to run."]
async fn sold_proposal_rolls_into_the_monthly_summary() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping commission flow test; set FUNIL_PG_DSN to run.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, super::stub_providers("{}"))
		.await
		.expect("Failed to build service.");
	let member = service
		.create_member(CreateMemberRequest {
			name: "Ana".to_string(),
			role: Role::Closer,
			ote_base: 3_000.,
			ote_bonus: 2_000.,
			commission_mrr_percent: None,
			commission_projeto_percent: None,
		})
		.await
		.expect("Failed to create member.");
	let now = OffsetDateTime::now_utc();

	service
		.create_goal(CreateGoalRequest {
			team_member_id: Some(member.member_id),
			month: u8::from(now.month()),
			year: now.year(),
			goal_type: GoalType::Vendas,
			target_value: 1.,
		})
		.await
		.expect("Failed to create goal.");

	let proposal = service
		.create_proposal(CreateProposalRequest {
			lead_id: None,
			closer_id: Some(member.member_id),
			title: "Plano anual".to_string(),
			product_type: Some(funil_domain::ProductType::Mrr),
			calor: Some(8),
		})
		.await
		.expect("Failed to create proposal.");

	assert_eq!(proposal.status, "marcar_compromisso");

	// Selling straight out of `marcar_compromisso` is not a legal move.
	let premature = service
		.update_proposal_status(UpdateStatusRequest {
			proposal_id: proposal.proposal_id,
			status: "vendido".to_string(),
			sale_value: Some(50_000.),
		})
		.await;

	assert!(matches!(premature, Err(ServiceError::InvalidTransition { .. })));

	service
		.update_proposal_status(UpdateStatusRequest {
			proposal_id: proposal.proposal_id,
			status: "compromisso_marcado".to_string(),
			sale_value: None,
		})
		.await
		.expect("Failed to book the meeting.");

	let sold = service
		.update_proposal_status(UpdateStatusRequest {
			proposal_id: proposal.proposal_id,
			status: "vendido".to_string(),
			sale_value: Some(50_000.),
		})
		.await
		.expect("Failed to close the proposal.");

	assert!(sold.closed_at.is_some());

	let summary = service
		.commission_summary(SummaryRequest {
			team_member_id: member.member_id,
			month: u8::from(now.month()),
			year: now.year(),
		})
		.await
		.expect("Failed to compute summary.");

	assert_eq!(summary.sales_count, 1);
	assert_eq!(summary.total_mrr, 50_000.);
	assert_eq!(summary.total_commission, 500.);
	assert_eq!(summary.goal_progress, 100.);
	assert_eq!(summary.calculated_bonus, 2_000.);
	assert_eq!(summary.total_earnings, 5_500.);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set FUNIL_PG_DSN to run."]
async fn terminal_proposals_reject_further_updates() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping commission flow test; set FUNIL_PG_DSN to run.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, super::stub_providers("{}"))
		.await
		.expect("Failed to build service.");
	let proposal = service
		.create_proposal(CreateProposalRequest {
			lead_id: None,
			closer_id: None,
			title: "Projeto piloto".to_string(),
			product_type: Some(funil_domain::ProductType::Projeto),
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
			status: "perdido".to_string(),
			sale_value: None,
		})
		.await
		.expect("Failed to lose the proposal.");

	let revived = service
		.update_proposal_status(UpdateStatusRequest {
			proposal_id: proposal.proposal_id,
			status: "compromisso_marcado".to_string(),
			sale_value: None,
		})
		.await;

	assert!(matches!(revived, Err(ServiceError::InvalidTransition { .. })));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
