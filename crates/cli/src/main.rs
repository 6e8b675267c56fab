//! lingod - local translation worker over a Unix domain socket

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use daemon::{Daemon, RuntimeConfig};
use ipc::{TranslateRequest, translate_once};

mod logging;

use logging::init_logging;

#[derive(Parser)]
#[command(name = "lingod")]
#[command(about = "Local translation worker over a Unix domain socket")]
#[command(after_help = "\
QUICK START:
  lingod serve --socket /run/lingod.sock        # Start the worker
  lingod translate \"Hello\" --socket /run/lingod.sock

The worker delegates translation to an Argos-compatible service
(default http://127.0.0.1:5000) and answers one request per connection.")]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Run the worker until interrupted
  Serve {
    /// Path of the Unix socket to listen on
    #[arg(long)]
    socket: PathBuf,
    /// Base URL of the Argos-compatible translation service
    #[arg(long, default_value = engine::DEFAULT_ARGOS_URL)]
    engine_url: String,
    /// Log level: error, warn, info, debug, trace
    #[arg(long, default_value = "info")]
    log_level: String,
  },
  /// Send one translation request to a running worker
  Translate {
    /// Text to translate
    text: String,
    /// Path of the worker's Unix socket
    #[arg(long)]
    socket: PathBuf,
    /// Source language code
    #[arg(long, default_value = ipc::DEFAULT_SOURCE_LANG)]
    from: String,
    /// Target language code
    #[arg(long, default_value = ipc::DEFAULT_TARGET_LANG)]
    to: String,
    /// Print the raw JSON response
    #[arg(long)]
    json: bool,
  },
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  match cli.command {
    Commands::Serve {
      socket,
      engine_url,
      log_level,
    } => {
      init_logging(&log_level);
      let config = RuntimeConfig::new(socket).with_engine_url(engine_url);
      Daemon::new(config).run().await?;
      Ok(())
    }

    Commands::Translate {
      text,
      socket,
      from,
      to,
      json,
    } => {
      init_logging("warn");
      let request = TranslateRequest::with_langs(text, from, to);
      let response = translate_once(&socket, &request).await?;

      if json {
        println!("{}", serde_json::to_string(&response)?);
        return Ok(());
      }

      match response.translated_text {
        Some(translated) => {
          println!("{translated}");
          Ok(())
        }
        None => anyhow::bail!(response.error.unwrap_or_else(|| "unknown error".to_string())),
      }
    }
  }
}
