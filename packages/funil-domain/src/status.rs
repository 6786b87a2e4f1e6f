use serde::{Deserialize, Serialize};

/// Proposal lifecycle. `vendido` and `perdido` are terminal; `esfriou`,
/// `futuro`, and `reativar` are holding states that can return to
/// `compromisso_marcado`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
	MarcarCompromisso,
	CompromissoMarcado,
	Vendido,
	Perdido,
	Esfriou,
	Futuro,
	Reativar,
}
impl ProposalStatus {
	pub fn parse(raw: &str) -> Option<Self> {
		match raw {
			"marcar_compromisso" => Some(Self::MarcarCompromisso),
			"compromisso_marcado" => Some(Self::CompromissoMarcado),
			"vendido" => Some(Self::Vendido),
			"perdido" => Some(Self::Perdido),
			"esfriou" => Some(Self::Esfriou),
			"futuro" => Some(Self::Futuro),
			"reativar" => Some(Self::Reativar),
			_ => None,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::MarcarCompromisso => "marcar_compromisso",
			Self::CompromissoMarcado => "compromisso_marcado",
			Self::Vendido => "vendido",
			Self::Perdido => "perdido",
			Self::Esfriou => "esfriou",
			Self::Futuro => "futuro",
			Self::Reativar => "reativar",
		}
	}

	pub fn is_terminal(&self) -> bool {
		matches!(self, Self::Vendido | Self::Perdido)
	}

	pub fn can_transition(&self, to: Self) -> bool {
		match self {
			Self::MarcarCompromisso => to == Self::CompromissoMarcado,
			Self::CompromissoMarcado => matches!(
				to,
				Self::Vendido | Self::Perdido | Self::Esfriou | Self::Futuro | Self::Reativar
			),
			Self::Esfriou | Self::Futuro | Self::Reativar => to == Self::CompromissoMarcado,
			Self::Vendido | Self::Perdido => false,
		}
	}
}
