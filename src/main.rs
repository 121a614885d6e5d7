use ideaspark::{Client, Config, repl};
use tracing_subscriber::EnvFilter;

fn main() -> eyre::Result<()> {
	color_eyre::install()?;
	// stdout belongs to the conversation
	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
	tracing_subscriber::fmt().with_env_filter(env_filter).with_writer(std::io::stderr).init();

	let config = match Config::from_env() {
		Ok(config) => config,
		Err(e) => {
			println!("{e}");
			std::process::exit(1);
		}
	};
	tracing::debug!(?config);

	let mut client = Client::new(config)?;
	let stdin = std::io::stdin();
	let stdout = std::io::stdout();
	repl::run(stdin.lock(), &mut stdout.lock(), &mut client)?;
	Ok(())
}
