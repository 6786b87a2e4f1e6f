pub mod origin;
pub mod ote;
pub mod period;
pub mod status;

use serde::{Deserialize, Serialize};

/// Sales roles. SDRs are measured on attended meetings, closers (and admins)
/// on the revenue-oriented goal chain.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
	Sdr,
	Closer,
	Admin,
}
impl Role {
	pub fn parse(raw: &str) -> Option<Self> {
		match raw {
			"sdr" => Some(Self::Sdr),
			"closer" => Some(Self::Closer),
			"admin" => Some(Self::Admin),
			_ => None,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Sdr => "sdr",
			Self::Closer => "closer",
			Self::Admin => "admin",
		}
	}
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
	Mrr,
	Projeto,
}
impl ProductType {
	pub fn parse(raw: &str) -> Option<Self> {
		match raw {
			"mrr" => Some(Self::Mrr),
			"projeto" => Some(Self::Projeto),
			_ => None,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Mrr => "mrr",
			Self::Projeto => "projeto",
		}
	}
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
	Reunioes,
	Vendas,
	Clientes,
	Faturamento,
}
impl GoalType {
	pub fn parse(raw: &str) -> Option<Self> {
		match raw {
			"reunioes" => Some(Self::Reunioes),
			"vendas" => Some(Self::Vendas),
			"clientes" => Some(Self::Clientes),
			"faturamento" => Some(Self::Faturamento),
			_ => None,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Reunioes => "reunioes",
			Self::Vendas => "vendas",
			Self::Clientes => "clientes",
			Self::Faturamento => "faturamento",
		}
	}
}
