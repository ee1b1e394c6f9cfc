use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;
use todo_store::cli::{Cli, Commands, ConfigCommands};
use todo_store::config::{resolve_config_path, ConfigError, ConfigManager};
use todo_store::logging::init_logging;
use todo_store::session::Session;
use todo_store::store::TodoStore;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, ConfigError> {
    let path = resolve_config_path(cli.config.as_deref())?;
    let mut manager = ConfigManager::new(&path)?;

    match cli.command.unwrap_or(Commands::Session) {
        Commands::Session => {
            let config = manager.config();
            let mut session = Session::new(
                TodoStore::with_policy(config.store_policy()),
                config.output_format(),
            );
            let stdin = io::stdin();
            let summary = session.run(stdin.lock(), &mut io::stdout(), &mut io::stderr())?;
            if summary.failures > 0 {
                Ok(ExitCode::FAILURE)
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
        Commands::Config { command } => {
            match command {
                ConfigCommands::Get { key } => match manager.get(&key) {
                    Some(value) => println!("{}", value),
                    None => println!("{} is not set", key),
                },
                ConfigCommands::Set { key, value } => {
                    manager.set(&key, &value)?;
                    println!("Set {} = {}", key, value);
                }
                ConfigCommands::Unset { key } => {
                    manager.unset(&key)?;
                    println!("Unset {}", key);
                }
                ConfigCommands::List => {
                    let mut stdout = io::stdout().lock();
                    for (key, value, is_default) in manager.list() {
                        let suffix = if is_default { " (default)" } else { "" };
                        writeln!(stdout, "{} = {}{}", key, value, suffix)?;
                    }
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
