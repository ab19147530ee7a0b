use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = noteful_seed::Args::parse();

	noteful_seed::run(args).await
}
