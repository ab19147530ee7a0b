use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = noteful_api::Args::parse();

	noteful_api::run(args).await
}
