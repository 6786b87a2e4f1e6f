use funil_service::ScoreLeadRequest;
use funil_storage::queries;
use serde_json::json;

#[tokio::test]
#[ignore = "Requires external Postgres. Set FUNIL_PG_DSN to run."]
async fn scoring_persists_the_score_and_a_history_row() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping lead scoring test; set FUNIL_PG_DSN to run.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let content = r#"{"score": 8, "predicted_conversion": "alta", "factors": ["icp"], "recommended_action": "Agendar demo."}"#;
	let service = super::build_service(cfg, super::stub_providers(content))
		.await
		.expect("Failed to build service.");
	let ingested = service
		.ingest_lead(json!({ "name": "Carla", "email": "carla@empresa.com", "origin": "indicacao" }))
		.await
		.expect("Failed to ingest lead.");
	let lead_id = ingested.lead_id.expect("Lead id missing.");
	let response = service
		.score_lead(ScoreLeadRequest { lead_id })
		.await
		.expect("Failed to score lead.");

	assert_eq!(response.assessment.score, 8);
	assert_eq!(response.assessment.predicted_conversion, "alta");

	let lead = queries::fetch_lead(&service.db, lead_id)
		.await
		.expect("Failed to fetch lead.")
		.expect("Lead missing.");

	assert_eq!(lead.score, Some(8));

	let history = sqlx::query_scalar::<_, i64>(
		"SELECT COUNT(*) FROM lead_history WHERE lead_id = $1 AND action = 'lead_scored'",
	)
	.bind(lead_id)
	.fetch_one(&service.db.pool)
	.await
	.expect("Failed to count history.");

	assert_eq!(history, 1);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set FUNIL_PG_DSN to run."]
async fn unparsable_model_output_falls_back_instead_of_failing() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping lead scoring test; set FUNIL_PG_DSN to run.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, super::stub_providers("o lead parece promissor"))
		.await
		.expect("Failed to build service.");
	let ingested = service
		.ingest_lead(json!({ "name": "Davi", "email": "davi@empresa.com", "origin": "outro" }))
		.await
		.expect("Failed to ingest lead.");
	let lead_id = ingested.lead_id.expect("Lead id missing.");
	let response = service
		.score_lead(ScoreLeadRequest { lead_id })
		.await
		.expect("Failed to score lead.");

	assert_eq!(response.assessment.score, 5);
	assert_eq!(response.assessment.predicted_conversion, "media");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
