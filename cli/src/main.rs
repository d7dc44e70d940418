mod listen;
mod table;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use voxtask_core::config::parse_time_zone;
use voxtask_core::{
    CommandInterpreter, DispatchService, FileEventRepository, FileTaskRepository, Settings,
};

#[derive(Parser)]
#[command(name = "voxtask")]
#[command(about = "Turns spoken Russian commands into tasks and calendar events", long_about = None)]
struct Cli {
    /// Time zone used to resolve dates (overrides TIME_ZONE)
    #[arg(long, global = true)]
    tz: Option<String>,

    /// Directory holding tasks.json and events.json (overrides VOXTASK_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Interpret one utterance without saving anything (usage: parse создай задачу ...)
    Parse {
        /// Print the intent as JSON
        #[arg(long)]
        json: bool,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        words: Vec<String>,
    },
    /// Read transcribed utterances from stdin, one per line, and dispatch them
    Listen,
    /// List saved tasks
    Tasks,
    /// List saved calendar events
    Events,
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::from_env()?;
    if let Some(tz) = &cli.tz {
        settings.time_zone = parse_time_zone(tz)?;
    }
    if let Some(dir) = cli.data_dir {
        settings.data_dir = Some(dir);
    }

    init_tracing(&settings);
    tracing::debug!(time_zone = %settings.time_zone, "settings loaded");

    let interpreter = CommandInterpreter::with_time_zone(settings.time_zone);

    match cli.command {
        Some(Commands::Parse { json, words }) => {
            let utterance = words.join(" ");
            let intent = interpreter.interpret(&utterance);
            if json {
                println!("{}", serde_json::to_string_pretty(&intent)?);
            } else {
                match intent {
                    Some(intent) => {
                        println!("Задача: '{}'", intent.task);
                        println!("{}", listen::describe_due(intent.due.as_ref()));
                    }
                    None => println!("Не команда"),
                }
            }
        }
        Some(Commands::Listen) | None => {
            let service = open_service(&settings)?;
            let stdin = io::stdin();
            listen::run(&interpreter, &service, stdin.lock(), &mut io::stdout())?;
        }
        Some(Commands::Tasks) => {
            let service = open_service(&settings)?;
            println!("{}", table::render_tasks(&service.list_tasks()?));
        }
        Some(Commands::Events) => {
            let service = open_service(&settings)?;
            println!("{}", table::render_events(&service.list_events()?));
        }
    }
    Ok(())
}

fn open_service(settings: &Settings) -> Result<DispatchService<FileTaskRepository, FileEventRepository>> {
    let tasks = FileTaskRepository::new(settings.data_dir.clone())?;
    let events = FileEventRepository::new(settings.data_dir.clone())?;
    Ok(DispatchService::new(tasks, events, settings))
}
