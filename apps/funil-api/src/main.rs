use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = funil_api::Args::parse();

	funil_api::run(args).await
}
