use serde_json::Value;
use sqlx::{Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
	Result,
	db::Db,
	models::{Goal, Lead, Proposal, TeamMember},
};

/// Fields applied when a webhook delivery lands on a lead, keyed on email.
#[derive(Debug)]
pub struct LeadUpsert<'a> {
	pub lead_id: Uuid,
	pub name: &'a str,
	pub email: &'a str,
	pub phone: Option<&'a str>,
	pub company: Option<&'a str>,
	pub origin: &'a str,
	pub now: OffsetDateTime,
}

pub async fn insert_team_member(db: &Db, member: &TeamMember) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO team_members (
	member_id,
	name,
	role,
	is_active,
	ote_base,
	ote_bonus,
	commission_mrr_percent,
	commission_projeto_percent,
	created_at,
	updated_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
	)
	.bind(member.member_id)
	.bind(member.name.as_str())
	.bind(member.role.as_str())
	.bind(member.is_active)
	.bind(member.ote_base)
	.bind(member.ote_bonus)
	.bind(member.commission_mrr_percent)
	.bind(member.commission_projeto_percent)
	.bind(member.created_at)
	.bind(member.updated_at)
	.execute(&db.pool)
	.await?;

	Ok(())
}

pub async fn update_team_member(db: &Db, member: &TeamMember) -> Result<()> {
	sqlx::query(
		"\
UPDATE team_members
SET
	name = $1,
	role = $2,
	is_active = $3,
	ote_base = $4,
	ote_bonus = $5,
	commission_mrr_percent = $6,
	commission_projeto_percent = $7,
	updated_at = $8
WHERE member_id = $9",
	)
	.bind(member.name.as_str())
	.bind(member.role.as_str())
	.bind(member.is_active)
	.bind(member.ote_base)
	.bind(member.ote_bonus)
	.bind(member.commission_mrr_percent)
	.bind(member.commission_projeto_percent)
	.bind(member.updated_at)
	.bind(member.member_id)
	.execute(&db.pool)
	.await?;

	Ok(())
}

pub async fn fetch_team_member(db: &Db, member_id: Uuid) -> Result<Option<TeamMember>> {
	let member = sqlx::query_as::<_, TeamMember>(
		"SELECT * FROM team_members WHERE member_id = $1",
	)
	.bind(member_id)
	.fetch_optional(&db.pool)
	.await?;

	Ok(member)
}

pub async fn list_active_team_members(db: &Db) -> Result<Vec<TeamMember>> {
	let members = sqlx::query_as::<_, TeamMember>(
		"SELECT * FROM team_members WHERE is_active ORDER BY name",
	)
	.fetch_all(&db.pool)
	.await?;

	Ok(members)
}

/// Inserts or updates a lead keyed on its email in a single statement, so
/// concurrent deliveries for the same address cannot race a search-then-insert
/// sequence. Returns the lead id and whether the row was created.
pub async fn upsert_lead_tx(
	tx: &mut Transaction<'_, Postgres>,
	lead: &LeadUpsert<'_>,
) -> Result<(Uuid, bool)> {
	// xmax = 0 only holds for rows created by this statement.
	let row = sqlx::query_as::<_, (Uuid, bool)>(
		"\
INSERT INTO leads (lead_id, name, email, phone, company, origin, score, created_at, updated_at)
VALUES ($1, $2, $3, $4, $5, $6, NULL, $7, $7)
ON CONFLICT (email) DO UPDATE
SET
	name = EXCLUDED.name,
	phone = COALESCE(EXCLUDED.phone, leads.phone),
	company = COALESCE(EXCLUDED.company, leads.company),
	origin = EXCLUDED.origin,
	updated_at = EXCLUDED.updated_at
RETURNING lead_id, (xmax = 0)",
	)
	.bind(lead.lead_id)
	.bind(lead.name)
	.bind(lead.email)
	.bind(lead.phone)
	.bind(lead.company)
	.bind(lead.origin)
	.bind(lead.now)
	.fetch_one(&mut **tx)
	.await?;

	Ok(row)
}

pub async fn fetch_lead(db: &Db, lead_id: Uuid) -> Result<Option<Lead>> {
	let lead = sqlx::query_as::<_, Lead>("SELECT * FROM leads WHERE lead_id = $1")
		.bind(lead_id)
		.fetch_optional(&db.pool)
		.await?;

	Ok(lead)
}

pub async fn fetch_lead_by_email(db: &Db, email: &str) -> Result<Option<Lead>> {
	let lead = sqlx::query_as::<_, Lead>("SELECT * FROM leads WHERE email = $1")
		.bind(email)
		.fetch_optional(&db.pool)
		.await?;

	Ok(lead)
}

pub async fn update_lead_score(
	db: &Db,
	lead_id: Uuid,
	score: i32,
	now: OffsetDateTime,
) -> Result<()> {
	sqlx::query("UPDATE leads SET score = $1, updated_at = $2 WHERE lead_id = $3")
		.bind(score)
		.bind(now)
		.bind(lead_id)
		.execute(&db.pool)
		.await?;

	Ok(())
}

pub async fn insert_history(
	db: &Db,
	lead_id: Uuid,
	action: &str,
	detail: Value,
	now: OffsetDateTime,
) -> Result<()> {
	insert_history_stmt(&db.pool, lead_id, action, detail, now).await
}

pub async fn insert_history_tx(
	tx: &mut Transaction<'_, Postgres>,
	lead_id: Uuid,
	action: &str,
	detail: Value,
	now: OffsetDateTime,
) -> Result<()> {
	insert_history_stmt(&mut **tx, lead_id, action, detail, now).await
}

async fn insert_history_stmt<'e, E>(
	executor: E,
	lead_id: Uuid,
	action: &str,
	detail: Value,
	now: OffsetDateTime,
) -> Result<()>
where
	E: sqlx::Executor<'e, Database = Postgres>,
{
	sqlx::query(
		"\
INSERT INTO lead_history (history_id, lead_id, action, detail, created_at)
VALUES ($1, $2, $3, $4, $5)",
	)
	.bind(Uuid::new_v4())
	.bind(lead_id)
	.bind(action)
	.bind(detail)
	.bind(now)
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn delete_whatsapp_entries_tx(
	tx: &mut Transaction<'_, Postgres>,
	lead_id: Uuid,
) -> Result<u64> {
	let result = sqlx::query("DELETE FROM pipe_whatsapp WHERE lead_id = $1")
		.bind(lead_id)
		.execute(&mut **tx)
		.await?;

	Ok(result.rows_affected())
}

pub async fn insert_whatsapp_entry_tx(
	tx: &mut Transaction<'_, Postgres>,
	lead_id: Uuid,
	status: &str,
	now: OffsetDateTime,
) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO pipe_whatsapp (entry_id, lead_id, status, created_at)
VALUES ($1, $2, $3, $4)",
	)
	.bind(Uuid::new_v4())
	.bind(lead_id)
	.bind(status)
	.bind(now)
	.execute(&mut **tx)
	.await?;

	Ok(())
}

pub async fn insert_meeting_tx(
	tx: &mut Transaction<'_, Postgres>,
	lead_id: Uuid,
	sdr_id: Option<Uuid>,
	status: &str,
	meeting_date: OffsetDateTime,
	now: OffsetDateTime,
) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO pipe_confirmacao (meeting_id, lead_id, sdr_id, status, meeting_date, created_at)
VALUES ($1, $2, $3, $4, $5, $6)",
	)
	.bind(Uuid::new_v4())
	.bind(lead_id)
	.bind(sdr_id)
	.bind(status)
	.bind(meeting_date)
	.bind(now)
	.execute(&mut **tx)
	.await?;

	Ok(())
}

pub async fn attended_meeting_count(
	db: &Db,
	sdr_id: Uuid,
	start: OffsetDateTime,
	end: OffsetDateTime,
) -> Result<i64> {
	let count = sqlx::query_scalar::<_, i64>(
		"\
SELECT COUNT(*)
FROM pipe_confirmacao
WHERE sdr_id = $1
	AND status = 'compareceu'
	AND meeting_date >= $2
	AND meeting_date < $3",
	)
	.bind(sdr_id)
	.bind(start)
	.bind(end)
	.fetch_one(&db.pool)
	.await?;

	Ok(count)
}

pub async fn insert_proposal(db: &Db, proposal: &Proposal) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO pipe_propostas (
	proposal_id,
	lead_id,
	closer_id,
	title,
	sale_value,
	product_type,
	status,
	calor,
	created_at,
	updated_at,
	closed_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
	)
	.bind(proposal.proposal_id)
	.bind(proposal.lead_id)
	.bind(proposal.closer_id)
	.bind(proposal.title.as_str())
	.bind(proposal.sale_value)
	.bind(proposal.product_type.as_deref())
	.bind(proposal.status.as_str())
	.bind(proposal.calor)
	.bind(proposal.created_at)
	.bind(proposal.updated_at)
	.bind(proposal.closed_at)
	.execute(&db.pool)
	.await?;

	Ok(())
}

pub async fn fetch_proposal(db: &Db, proposal_id: Uuid) -> Result<Option<Proposal>> {
	let proposal =
		sqlx::query_as::<_, Proposal>("SELECT * FROM pipe_propostas WHERE proposal_id = $1")
			.bind(proposal_id)
			.fetch_optional(&db.pool)
			.await?;

	Ok(proposal)
}

pub async fn fetch_proposal_for_update_tx(
	tx: &mut Transaction<'_, Postgres>,
	proposal_id: Uuid,
) -> Result<Option<Proposal>> {
	let proposal = sqlx::query_as::<_, Proposal>(
		"SELECT * FROM pipe_propostas WHERE proposal_id = $1 FOR UPDATE",
	)
	.bind(proposal_id)
	.fetch_optional(&mut **tx)
	.await?;

	Ok(proposal)
}

pub async fn update_proposal_status_tx(
	tx: &mut Transaction<'_, Postgres>,
	proposal_id: Uuid,
	status: &str,
	sale_value: Option<f64>,
	closed_at: Option<OffsetDateTime>,
	now: OffsetDateTime,
) -> Result<()> {
	sqlx::query(
		"\
UPDATE pipe_propostas
SET
	status = $1,
	sale_value = $2,
	closed_at = $3,
	updated_at = $4
WHERE proposal_id = $5",
	)
	.bind(status)
	.bind(sale_value)
	.bind(closed_at)
	.bind(now)
	.bind(proposal_id)
	.execute(&mut **tx)
	.await?;

	Ok(())
}

pub async fn sold_proposals_in_month(
	db: &Db,
	closer_id: Uuid,
	start: OffsetDateTime,
	end: OffsetDateTime,
) -> Result<Vec<Proposal>> {
	let proposals = sqlx::query_as::<_, Proposal>(
		"\
SELECT *
FROM pipe_propostas
WHERE closer_id = $1
	AND status = 'vendido'
	AND closed_at >= $2
	AND closed_at < $3
ORDER BY closed_at",
	)
	.bind(closer_id)
	.bind(start)
	.bind(end)
	.fetch_all(&db.pool)
	.await?;

	Ok(proposals)
}

pub async fn insert_goal(db: &Db, goal: &Goal) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO goals (goal_id, team_member_id, month, year, type, target_value, created_at)
VALUES ($1, $2, $3, $4, $5, $6, $7)",
	)
	.bind(goal.goal_id)
	.bind(goal.team_member_id)
	.bind(goal.month)
	.bind(goal.year)
	.bind(goal.r#type.as_str())
	.bind(goal.target_value)
	.bind(goal.created_at)
	.execute(&db.pool)
	.await?;

	Ok(())
}

/// Most recently created goal target for a member (or the team when `member`
/// is `None`). Several rows may exist per scope; the latest wins.
pub async fn latest_goal_target(
	db: &Db,
	member: Option<Uuid>,
	month: i32,
	year: i32,
	goal_type: &str,
) -> Result<Option<f64>> {
	let target = match member {
		Some(member_id) => {
			sqlx::query_scalar::<_, f64>(
				"\
SELECT target_value
FROM goals
WHERE team_member_id = $1 AND month = $2 AND year = $3 AND type = $4
ORDER BY created_at DESC
LIMIT 1",
			)
			.bind(member_id)
			.bind(month)
			.bind(year)
			.bind(goal_type)
			.fetch_optional(&db.pool)
			.await?
		},
		None => {
			sqlx::query_scalar::<_, f64>(
				"\
SELECT target_value
FROM goals
WHERE team_member_id IS NULL AND month = $1 AND year = $2 AND type = $3
ORDER BY created_at DESC
LIMIT 1",
			)
			.bind(month)
			.bind(year)
			.bind(goal_type)
			.fetch_optional(&db.pool)
			.await?
		},
	};

	Ok(target)
}
