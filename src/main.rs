use clap::{Parser, Subcommand};
use eeon::app::{self, AskFormat};
use eeon::core::config::{self, CliOverrides, DEFAULT_DATABASE_URL, EeonConfig};
use eeon::core::emoji::EmojiLimit;
use log::{error, info, warn};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(
    name = "eeon",
    about = "Ask anything, get a heading, a short answer, and a row of emoji"
)]
struct Args {
    /// Maximum emojis per reply (1-10, larger values are clamped)
    #[arg(long, global = true)]
    emojis: Option<EmojiLimit>,

    /// Verbose logging for `ask` and `serve`
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone)]
enum Command {
    /// Interactive terminal chat (default)
    Chat,
    /// Ask one question and print the reply
    Ask {
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,
        /// Print the rendered HTML instead of plain text
        #[arg(long)]
        html: bool,
    },
    /// Serve the visitor-logging endpoint
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
}

fn init_logging(command: &Command, verbose: bool) {
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    match command {
        // The terminal belongs to the UI, so chat logs go to a file
        Command::Chat => {
            if let Ok(log_file) = File::create("eeon.log") {
                let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
            }
        }
        _ => {
            let level = if verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Info
            };
            let _ = TermLogger::init(level, log_config, TerminalMode::Stderr, ColorChoice::Auto);
        }
    }
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    let command = args.command.clone().unwrap_or(Command::Chat);
    init_logging(&command, args.verbose);

    let file_config = config::load_config().unwrap_or_else(|e| {
        warn!("{}; using defaults", e);
        EeonConfig::default()
    });

    let (host, port) = match &command {
        Command::Serve { host, port } => (host.clone(), *port),
        _ => (None, None),
    };
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            emoji_limit: args.emojis,
            host,
            port,
        },
    );
    info!(
        "eeon starting up (model={}, emoji_limit={})",
        resolved.gemini_model, resolved.emoji_limit
    );

    match command {
        Command::Chat => {
            let composer = app::build_composer(&resolved);
            let visitors = app::optional_visitor_log(&resolved).await;
            eeon::tui::run(composer, resolved, visitors)
        }
        Command::Ask { prompt, html } => {
            let composer = app::build_composer(&resolved);
            let format = if html { AskFormat::Html } else { AskFormat::Plain };
            match app::ask(composer, &resolved, &prompt.join(" "), format).await {
                Some(reply) => println!("{reply}"),
                None => eprintln!("Nothing to ask: the prompt is blank."),
            }
            Ok(())
        }
        Command::Serve { .. } => {
            let url = resolved
                .database_url
                .clone()
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
            let visitors = match app::connect_visitor_log(&resolved, &url).await {
                Ok(visitors) => visitors,
                Err(e) => {
                    error!("Cannot open visitor database {}: {}", url, e);
                    return Err(std::io::Error::other(e.to_string()));
                }
            };
            eeon::server::serve(&resolved.host, resolved.port, visitors).await
        }
    }
}
