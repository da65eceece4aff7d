use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = kyso_report::Args::parse();
	kyso_report::run(args).await
}
