use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TeamMember {
	pub member_id: Uuid,
	pub name: String,
	pub role: String,
	pub is_active: bool,
	pub ote_base: f64,
	pub ote_bonus: f64,
	pub commission_mrr_percent: Option<f64>,
	pub commission_projeto_percent: Option<f64>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Lead {
	pub lead_id: Uuid,
	pub name: String,
	pub email: String,
	pub phone: Option<String>,
	pub company: Option<String>,
	pub origin: String,
	pub score: Option<i32>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, sqlx::FromRow)]
pub struct LeadHistoryEntry {
	pub history_id: Uuid,
	pub lead_id: Uuid,
	pub action: String,
	pub detail: Value,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Proposal {
	pub proposal_id: Uuid,
	pub lead_id: Option<Uuid>,
	pub closer_id: Option<Uuid>,
	pub title: String,
	pub sale_value: Option<f64>,
	pub product_type: Option<String>,
	pub status: String,
	pub calor: Option<i32>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
	pub closed_at: Option<OffsetDateTime>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct Meeting {
	pub meeting_id: Uuid,
	pub lead_id: Option<Uuid>,
	pub sdr_id: Option<Uuid>,
	pub status: String,
	pub meeting_date: OffsetDateTime,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, sqlx::FromRow)]
pub struct Goal {
	pub goal_id: Uuid,
	pub team_member_id: Option<Uuid>,
	pub month: i32,
	pub year: i32,
	pub r#type: String,
	pub target_value: f64,
	pub created_at: OffsetDateTime,
}
