use code2md::{AcceptAll, Prompt, cli::parse_args, run_code2md};
use env_logger::Env;
use log::error;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = parse_args();

    let level = match config.verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    let result = if config.include_all {
        run_code2md(&config, &mut AcceptAll).await
    } else {
        run_code2md(&config, &mut Prompt::stdio()).await
    };

    if let Err(err) = result {
        error!("An error occurred: {err:#}");
        std::process::exit(1);
    }
}
