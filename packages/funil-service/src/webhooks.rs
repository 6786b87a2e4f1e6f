use funil_domain::origin;
use serde::Serialize;
use serde_json::{Value, json};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use uuid::Uuid;

use funil_storage::queries::{self, LeadUpsert};

use crate::{FunilService, ServiceError, ServiceResult};

const CALENDLY_EVENT: &str = "invitee.created";
const CALCOM_EVENT: &str = "BOOKING_CREATED";

#[derive(Debug, Serialize)]
pub struct WebhookResponse {
	pub success: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub lead_id: Option<Uuid>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub created: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub ignored: Option<bool>,
}
impl WebhookResponse {
	fn ingested(lead_id: Uuid, created: bool) -> Self {
		Self { success: true, lead_id: Some(lead_id), created: Some(created), ignored: None }
	}

	fn ignored() -> Self {
		Self { success: true, lead_id: None, created: None, ignored: Some(true) }
	}
}

/// Normalized lead fields pulled out of a provider payload.
#[derive(Debug, PartialEq)]
pub(crate) struct LeadIntake {
	pub(crate) name: String,
	pub(crate) email: String,
	pub(crate) phone: Option<String>,
	pub(crate) company: Option<String>,
	pub(crate) meeting_start: Option<OffsetDateTime>,
}

fn required_str<'a>(value: &'a Value, field: &str, provider: &str) -> ServiceResult<&'a str> {
	value
		.get(field)
		.and_then(Value::as_str)
		.map(str::trim)
		.filter(|raw| !raw.is_empty())
		.ok_or_else(|| ServiceError::InvalidRequest {
			message: format!("{provider} payload is missing `{field}`."),
		})
}

fn optional_str(value: &Value, field: &str) -> Option<String> {
	value
		.get(field)
		.and_then(Value::as_str)
		.map(str::trim)
		.filter(|raw| !raw.is_empty())
		.map(str::to_string)
}

fn parse_start(raw: &str, provider: &str) -> ServiceResult<OffsetDateTime> {
	OffsetDateTime::parse(raw, &Rfc3339).map_err(|_| ServiceError::InvalidRequest {
		message: format!("{provider} payload carries an invalid meeting start `{raw}`."),
	})
}

/// `None` means the delivery is for an event this pipeline does not track.
pub(crate) fn parse_calendly(body: &Value) -> ServiceResult<Option<LeadIntake>> {
	if body.get("event").and_then(Value::as_str) != Some(CALENDLY_EVENT) {
		return Ok(None);
	}

	let payload = body.get("payload").ok_or_else(|| ServiceError::InvalidRequest {
		message: "Calendly payload is missing `payload`.".to_string(),
	})?;
	let email = required_str(payload, "email", "Calendly")?.to_lowercase();
	let name = required_str(payload, "name", "Calendly")?.to_string();
	let start = payload
		.get("scheduled_event")
		.and_then(|event| event.get("start_time"))
		.and_then(Value::as_str)
		.ok_or_else(|| ServiceError::InvalidRequest {
			message: "Calendly payload is missing `scheduled_event.start_time`.".to_string(),
		})?;

	Ok(Some(LeadIntake {
		name,
		email,
		phone: None,
		company: None,
		meeting_start: Some(parse_start(start, "Calendly")?),
	}))
}

pub(crate) fn parse_calcom(body: &Value) -> ServiceResult<Option<LeadIntake>> {
	if body.get("triggerEvent").and_then(Value::as_str) != Some(CALCOM_EVENT) {
		return Ok(None);
	}

	let payload = body.get("payload").ok_or_else(|| ServiceError::InvalidRequest {
		message: "Cal.com payload is missing `payload`.".to_string(),
	})?;
	let attendee = payload
		.get("attendees")
		.and_then(Value::as_array)
		.and_then(|attendees| attendees.first())
		.ok_or_else(|| ServiceError::InvalidRequest {
			message: "Cal.com payload carries no attendees.".to_string(),
		})?;
	let email = required_str(attendee, "email", "Cal.com")?.to_lowercase();
	// The attendee name wins; the booking form response is the fallback. Both
	// get the same trim-and-reject-blank treatment.
	let name = optional_str(attendee, "name")
		.or_else(|| {
			payload
				.get("responses")
				.and_then(|responses| responses.get("name"))
				.and_then(|name| optional_str(name, "value"))
		})
		.ok_or_else(|| ServiceError::InvalidRequest {
			message: "Cal.com payload is missing `name`.".to_string(),
		})?;
	let start = payload.get("startTime").and_then(Value::as_str).ok_or_else(|| {
		ServiceError::InvalidRequest {
			message: "Cal.com payload is missing `startTime`.".to_string(),
		}
	})?;

	Ok(Some(LeadIntake {
		name,
		email,
		phone: None,
		company: None,
		meeting_start: Some(parse_start(start, "Cal.com")?),
	}))
}

pub(crate) fn parse_generic(
	body: &Value,
	known_origins: &[String],
) -> ServiceResult<(LeadIntake, String)> {
	let email = required_str(body, "email", "Lead")?.to_lowercase();
	let name = required_str(body, "name", "Lead")?.to_string();
	let origin =
		origin::normalize_origin(body.get("origin").and_then(Value::as_str), known_origins);

	Ok((
		LeadIntake {
			name,
			email,
			phone: optional_str(body, "phone"),
			company: optional_str(body, "company"),
			meeting_start: None,
		},
		origin,
	))
}

impl FunilService {
	pub async fn ingest_calendly(&self, body: Value) -> ServiceResult<WebhookResponse> {
		let Some(intake) = parse_calendly(&body)? else {
			return Ok(WebhookResponse::ignored());
		};

		self.ingest_meeting_lead(intake, "calendly", "webhook_calendly").await
	}

	pub async fn ingest_calcom(&self, body: Value) -> ServiceResult<WebhookResponse> {
		let Some(intake) = parse_calcom(&body)? else {
			return Ok(WebhookResponse::ignored());
		};

		self.ingest_meeting_lead(intake, "calcom", "webhook_calcom").await
	}

	/// Generic n8n-style delivery with flat lead fields. New leads also get an
	/// initial `pipe_whatsapp` entry.
	pub async fn ingest_lead(&self, body: Value) -> ServiceResult<WebhookResponse> {
		let (intake, origin) = parse_generic(&body, &self.cfg.webhooks.known_origins)?;
		let now = OffsetDateTime::now_utc();
		let mut tx = self.db.pool.begin().await.map_err(ServiceError::from)?;
		let upsert = LeadUpsert {
			lead_id: Uuid::new_v4(),
			name: &intake.name,
			email: &intake.email,
			phone: intake.phone.as_deref(),
			company: intake.company.as_deref(),
			origin: &origin,
			now,
		};
		let (lead_id, created) = queries::upsert_lead_tx(&mut tx, &upsert).await?;

		if created {
			queries::insert_whatsapp_entry_tx(&mut tx, lead_id, "novo", now).await?;
		}

		queries::insert_history_tx(
			&mut tx,
			lead_id,
			"webhook_lead",
			json!({ "email": intake.email, "origin": origin, "created": created }),
			now,
		)
		.await?;
		tx.commit().await.map_err(ServiceError::from)?;
		tracing::info!(%lead_id, origin, created, "Webhook lead ingested.");

		Ok(WebhookResponse::ingested(lead_id, created))
	}

	/// Scheduling providers land the lead in the confirmation pipeline: the
	/// origin is overwritten, any WhatsApp pipeline rows are dropped, and an
	/// `agendado` meeting is recorded. One transaction end to end.
	async fn ingest_meeting_lead(
		&self,
		intake: LeadIntake,
		origin: &str,
		action: &str,
	) -> ServiceResult<WebhookResponse> {
		let now = OffsetDateTime::now_utc();
		let mut tx = self.db.pool.begin().await.map_err(ServiceError::from)?;
		let upsert = LeadUpsert {
			lead_id: Uuid::new_v4(),
			name: &intake.name,
			email: &intake.email,
			phone: intake.phone.as_deref(),
			company: intake.company.as_deref(),
			origin,
			now,
		};
		let (lead_id, created) = queries::upsert_lead_tx(&mut tx, &upsert).await?;
		let removed_whatsapp = queries::delete_whatsapp_entries_tx(&mut tx, lead_id).await?;
		let meeting_date = intake.meeting_start.ok_or_else(|| ServiceError::InvalidRequest {
			message: format!("{origin} delivery carries no meeting start."),
		})?;

		queries::insert_meeting_tx(&mut tx, lead_id, None, "agendado", meeting_date, now).await?;
		queries::insert_history_tx(
			&mut tx,
			lead_id,
			action,
			json!({
				"email": intake.email,
				"origin": origin,
				"created": created,
				"removed_whatsapp": removed_whatsapp,
			}),
			now,
		)
		.await?;
		tx.commit().await.map_err(ServiceError::from)?;
		tracing::info!(%lead_id, origin, created, "Webhook meeting lead ingested.");

		Ok(WebhookResponse::ingested(lead_id, created))
	}
}
