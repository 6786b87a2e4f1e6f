use std::sync::Arc;

use funil_service::FunilService;
use funil_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<FunilService>,
}
impl AppState {
	pub async fn new(config: funil_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let service = FunilService::new(config, db);

		Ok(Self { service: Arc::new(service) })
	}
}
