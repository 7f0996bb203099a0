use std::env;
use std::io;
use std::process::ExitCode;

use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use vend_eng::Machine;
use vend_eng::csv::{read_commands, write_stock};

const DEFAULT_NAME: &str = "vend-eng";

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let path = args
        .next()
        .expect("usage: vend-eng <session.csv> [machine-name]");
    let name = args.next().unwrap_or_else(|| DEFAULT_NAME.to_string());

    if !path.ends_with(".csv") {
        warn!(path, "input file seems to not be a csv file");
    }

    let commands = match read_commands(path.clone()) {
        Ok(commands) => commands,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut machine = Machine::new(name);
    let (command_sender, command_receiver) = tokio::sync::mpsc::channel(16);

    let reader = tokio::task::spawn_blocking(move || {
        for result in commands {
            match result {
                Ok(command) => {
                    if command_sender.blocking_send(command).is_err() {
                        // machine stopped consuming
                        break;
                    }
                }
                Err(e) => {
                    warn!("{e}");
                }
            }
        }
    });

    machine.run(ReceiverStream::new(command_receiver)).await;

    let mut exit = ExitCode::SUCCESS;
    if let Err(e) = reader.await {
        error!(reason = %e, "command reader failed, session is incomplete");
        exit = ExitCode::FAILURE;
    }

    let status = machine.status();
    info!(
        machine = %status.name,
        state = %status.state,
        balance = %status.balance,
        revenue = %status.revenue,
        "session finished"
    );
    if status.balance.is_positive() {
        warn!(balance = %status.balance, "session ended with an unrefunded balance");
    }

    if let Err(e) = write_stock(io::stdout().lock(), &status.inventory) {
        error!(reason = %e, "failed to write stock csv");
        return ExitCode::FAILURE;
    }

    exit
}
