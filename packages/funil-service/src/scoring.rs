use funil_providers::llm;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use time::OffsetDateTime;
use uuid::Uuid;

use funil_storage::{models::Lead, queries};

use crate::{FunilService, ServiceError, ServiceResult};

#[derive(Debug, Deserialize)]
pub struct ScoreLeadRequest {
	pub lead_id: Uuid,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct LeadAssessment {
	pub score: i32,
	pub predicted_conversion: String,
	pub factors: Vec<String>,
	pub recommended_action: String,
}

#[derive(Debug, Serialize)]
pub struct ScoreLeadResponse {
	pub lead_id: Uuid,
	#[serde(flatten)]
	pub assessment: LeadAssessment,
}

#[derive(Debug, Deserialize)]
pub struct CoachProposalRequest {
	pub proposal_id: Uuid,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct CoachAdvice {
	pub problema: String,
	pub tarefa: String,
}

fn fallback_assessment() -> LeadAssessment {
	LeadAssessment {
		score: 5,
		predicted_conversion: "media".to_string(),
		factors: Vec::new(),
		recommended_action: "Entrar em contato para qualificar o lead.".to_string(),
	}
}

fn fallback_advice() -> CoachAdvice {
	CoachAdvice {
		problema: "Proposta parada sem proximo passo definido.".to_string(),
		tarefa: "Agendar um follow-up com o lead ainda esta semana.".to_string(),
	}
}

/// Best-effort parse of model output. Anything missing or out of range falls
/// back field by field; a completely unparsable body falls back wholesale.
pub(crate) fn parse_assessment(content: &str) -> LeadAssessment {
	let Some(value) = llm::extract_json_object(content) else {
		return fallback_assessment();
	};
	let fallback = fallback_assessment();
	let score = value
		.get("score")
		.and_then(Value::as_i64)
		.map(|score| score.clamp(0, 10) as i32)
		.unwrap_or(fallback.score);
	let predicted_conversion = value
		.get("predicted_conversion")
		.and_then(Value::as_str)
		.map(str::to_string)
		.unwrap_or(fallback.predicted_conversion);
	let factors = value
		.get("factors")
		.and_then(Value::as_array)
		.map(|factors| {
			factors.iter().filter_map(Value::as_str).map(str::to_string).collect()
		})
		.unwrap_or(fallback.factors);
	let recommended_action = value
		.get("recommended_action")
		.and_then(Value::as_str)
		.map(str::to_string)
		.unwrap_or(fallback.recommended_action);

	LeadAssessment { score, predicted_conversion, factors, recommended_action }
}

pub(crate) fn parse_advice(content: &str) -> CoachAdvice {
	let Some(value) = llm::extract_json_object(content) else {
		return fallback_advice();
	};
	let fallback = fallback_advice();
	let problema = value
		.get("problema")
		.and_then(Value::as_str)
		.map(str::to_string)
		.unwrap_or(fallback.problema);
	let tarefa =
		value.get("tarefa").and_then(Value::as_str).map(str::to_string).unwrap_or(fallback.tarefa);

	CoachAdvice { problema, tarefa }
}

fn score_messages(lead: &Lead) -> Vec<Value> {
	vec![
		json!({
			"role": "system",
			"content": "Voce e um analista de vendas B2B. Avalie o lead e responda somente com um objeto JSON no formato {\"score\": 0-10, \"predicted_conversion\": \"alta\"|\"media\"|\"baixa\", \"factors\": [string], \"recommended_action\": string}.",
		}),
		json!({
			"role": "user",
			"content": format!(
				"Lead: {}\nEmail: {}\nEmpresa: {}\nOrigem: {}",
				lead.name,
				lead.email,
				lead.company.as_deref().unwrap_or("desconhecida"),
				lead.origin,
			),
		}),
	]
}

fn coach_messages(title: &str, status: &str, calor: Option<i32>, lead_name: Option<&str>) -> Vec<Value> {
	vec![
		json!({
			"role": "system",
			"content": "Voce e um coach de vendas B2B. Analise a proposta e responda somente com um objeto JSON no formato {\"problema\": string, \"tarefa\": string}.",
		}),
		json!({
			"role": "user",
			"content": format!(
				"Proposta: {title}\nStatus: {status}\nCalor: {}\nLead: {}",
				calor.map(|calor| calor.to_string()).unwrap_or_else(|| "desconhecido".to_string()),
				lead_name.unwrap_or("desconhecido"),
			),
		}),
	]
}

impl FunilService {
	/// Scores a lead via the configured model, persists the score on the lead
	/// row, and records a history entry.
	pub async fn score_lead(&self, request: ScoreLeadRequest) -> ServiceResult<ScoreLeadResponse> {
		let lead =
			queries::fetch_lead(&self.db, request.lead_id).await?.ok_or_else(|| {
				ServiceError::NotFound {
					message: format!("Lead {} does not exist.", request.lead_id),
				}
			})?;
		let messages = score_messages(&lead);
		let content = self.providers.llm.chat(&self.cfg.providers.llm, &messages).await?;
		let assessment = parse_assessment(&content);
		let now = OffsetDateTime::now_utc();

		queries::update_lead_score(&self.db, lead.lead_id, assessment.score, now).await?;
		queries::insert_history(
			&self.db,
			lead.lead_id,
			"lead_scored",
			json!({
				"score": assessment.score,
				"predicted_conversion": assessment.predicted_conversion,
			}),
			now,
		)
		.await?;
		tracing::info!(lead_id = %lead.lead_id, score = assessment.score, "Lead scored.");

		Ok(ScoreLeadResponse { lead_id: lead.lead_id, assessment })
	}

	/// Next-step advice for a stalled proposal. Nothing is persisted.
	pub async fn coach_proposal(&self, request: CoachProposalRequest) -> ServiceResult<CoachAdvice> {
		let proposal =
			queries::fetch_proposal(&self.db, request.proposal_id).await?.ok_or_else(|| {
				ServiceError::NotFound {
					message: format!("Proposal {} does not exist.", request.proposal_id),
				}
			})?;
		let lead = match proposal.lead_id {
			Some(lead_id) => queries::fetch_lead(&self.db, lead_id).await?,
			None => None,
		};
		let messages = coach_messages(
			&proposal.title,
			&proposal.status,
			proposal.calor,
			lead.as_ref().map(|lead| lead.name.as_str()),
		);
		let content = self.providers.llm.chat(&self.cfg.providers.llm, &messages).await?;

		Ok(parse_advice(&content))
	}
}
