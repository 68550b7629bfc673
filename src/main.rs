use std::{env, fs, process};

use inft_transfer::command::parse_script;
use inft_transfer::render::render;
use inft_transfer::{Config, Wizard};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse().unwrap()))
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: inft-transfer <commands-file> [config.yaml]");
        process::exit(2);
    };

    let config = match args.next() {
        Some(config_path) => Config::load(&config_path).unwrap_or_else(|e| {
            error!("{e}");
            process::exit(1);
        }),
        None => Config::default(),
    };

    let script = fs::read_to_string(&path).unwrap_or_else(|e| {
        error!(path, "failed to read commands: {e}");
        process::exit(1);
    });

    let mut wizard = Wizard::from_config(&config);
    let (action_sender, action_receiver) = tokio::sync::mpsc::channel(16);

    tokio::spawn(async move {
        for result in parse_script(&script) {
            match result {
                Ok(action) => {
                    if action_sender.send(action).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("{e}");
                }
            }
        }
    });

    print!("{}", render(&wizard));
    wizard
        .run(ReceiverStream::new(action_receiver), |w| print!("{}", render(w)))
        .await;
}
