use funil_storage::queries;
use serde_json::json;

async fn count_rows(pool: &sqlx::PgPool, sql: &str, lead_id: uuid::Uuid) -> i64 {
	sqlx::query_scalar::<_, i64>(sql)
		.bind(lead_id)
		.fetch_one(pool)
		.await
		.expect("Failed to count rows.")
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set FUNIL_PG_DSN to run."]
async fn calendly_booking_moves_a_whatsapp_lead_into_confirmation() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping webhook flow test; set FUNIL_PG_DSN to run.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, super::stub_providers("{}"))
		.await
		.expect("Failed to build service.");
	let first = service
		.ingest_lead(json!({
			"name": "Maria Silva",
			"email": "maria@empresa.com",
			"origin": "whatsapp",
		}))
		.await
		.expect("Failed to ingest generic lead.");

	assert_eq!(first.created, Some(true));

	let lead_id = first.lead_id.expect("Lead id missing.");

	assert_eq!(
		count_rows(&service.db.pool, "SELECT COUNT(*) FROM pipe_whatsapp WHERE lead_id = $1", lead_id)
			.await,
		1
	);

	let booked = service
		.ingest_calendly(json!({
			"event": "invitee.created",
			"payload": {
				"email": "maria@empresa.com",
				"name": "Maria Silva",
				"scheduled_event": { "start_time": "2026-09-01T14:00:00Z" },
			},
		}))
		.await
		.expect("Failed to ingest Calendly delivery.");

	// Same email, so the existing lead is updated rather than duplicated.
	assert_eq!(booked.lead_id, Some(lead_id));
	assert_eq!(booked.created, Some(false));

	let lead = queries::fetch_lead(&service.db, lead_id)
		.await
		.expect("Failed to fetch lead.")
		.expect("Lead missing.");

	assert_eq!(lead.origin, "calendly");
	assert_eq!(
		count_rows(&service.db.pool, "SELECT COUNT(*) FROM pipe_whatsapp WHERE lead_id = $1", lead_id)
			.await,
		0
	);
	assert_eq!(
		count_rows(
			&service.db.pool,
			"SELECT COUNT(*) FROM pipe_confirmacao WHERE lead_id = $1",
			lead_id
		)
		.await,
		1
	);
	assert_eq!(
		count_rows(&service.db.pool, "SELECT COUNT(*) FROM lead_history WHERE lead_id = $1", lead_id)
			.await,
		2
	);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set FUNIL_PG_DSN to run."]
async fn non_tracked_calendly_events_are_acknowledged_without_writes() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping webhook flow test; set FUNIL_PG_DSN to run.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, super::stub_providers("{}"))
		.await
		.expect("Failed to build service.");
	let response = service
		.ingest_calendly(json!({ "event": "invitee.canceled", "payload": {} }))
		.await
		.expect("Failed to handle delivery.");

	assert!(response.success);
	assert_eq!(response.ignored, Some(true));
	assert!(response.lead_id.is_none());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set FUNIL_PG_DSN to run."]
async fn repeated_generic_deliveries_update_in_place() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping webhook flow test; set FUNIL_PG_DSN to run.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, super::stub_providers("{}"))
		.await
		.expect("Failed to build service.");
	let first = service
		.ingest_lead(json!({ "name": "Joao", "email": "joao@empresa.com", "origin": "indicacao" }))
		.await
		.expect("Failed to ingest lead.");
	let second = service
		.ingest_lead(json!({
			"name": "Joao Souza",
			"email": "joao@empresa.com",
			"phone": "+55 11 99999-0000",
			"origin": "feira",
		}))
		.await
		.expect("Failed to ingest lead.");

	assert_eq!(second.lead_id, first.lead_id);
	assert_eq!(second.created, Some(false));

	let lead = queries::fetch_lead_by_email(&service.db, "joao@empresa.com")
		.await
		.expect("Failed to fetch lead.")
		.expect("Lead missing.");

	assert_eq!(lead.name, "Joao Souza");
	assert_eq!(lead.phone.as_deref(), Some("+55 11 99999-0000"));
	// `feira` is not in the configured allow-list.
	assert_eq!(lead.origin, "outro");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
