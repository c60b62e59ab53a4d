use std::{future::Future, io::Write, time::Duration};

use anyhow::Context;
use clap::Parser;
use registry::{
    consts::consts::DEFAULT_ENDPOINT,
    controller::controller::{Controller, SubmitError},
    gateway::{http::HttpGateway, memory::MemoryGateway, PersonApi},
    model::validation::ValidationPolicy,
    options::ClientOptions,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
    command::{Command, HELP},
    terminal::{direction_label, render_form, render_status, render_table, TerminalNotifier},
};

mod command;
mod terminal;

/// 📋 Padron, terminal ABM client for the citizen / foreigner registry
///
/// Loads the remote collection, then reads one command per line. Type `help` for the list.
#[derive(Parser, Debug)]
struct Cli {
    /// URL of the person resource. GET, POST, PUT and DELETE all target it
    #[clap(short, long, env = "PADRON_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Upper bound in seconds for a whole request
    #[clap(long, env = "PADRON_TIMEOUT_SECS", default_value = "10")]
    timeout_secs: u64,

    /// Upper bound in seconds for establishing the connection
    #[clap(long, env = "PADRON_CONNECT_TIMEOUT_SECS", default_value = "5")]
    connect_timeout_secs: u64,

    /// Work against an empty in-memory collection instead of the server
    #[clap(long)]
    offline: bool,
}

enum Flow {
    Continue,
    Quit,
}

type TerminalController<G> = Controller<G, TerminalNotifier>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = Cli::parse();
    let policy = ValidationPolicy::default();

    if args.offline {
        log::info!("Running offline against an in-memory collection");

        return run(Controller::new(MemoryGateway::new(), TerminalNotifier, policy)).await;
    }

    let options = ClientOptions::default()
        .set_endpoint(args.endpoint)
        .set_timeout(Duration::from_secs(args.timeout_secs))
        .set_connect_timeout(Duration::from_secs(args.connect_timeout_secs));

    let gateway = HttpGateway::new(&options).context("Unable to build the HTTP client")?;

    log::info!("Using endpoint {}", gateway.endpoint());

    run(Controller::new(gateway, TerminalNotifier, policy)).await
}

async fn run<G: PersonApi>(mut controller: TerminalController<G>) -> anyhow::Result<()> {
    if let Some(Ok(_)) = cancellable(controller.load()).await {
        print_table(&controller);
    }

    println!("Escriba 'help' para ver los comandos.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };

        // End of input or Ctrl-C at the prompt
        let Some(line) = line else {
            println!();
            break;
        };

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(command::CommandError::Empty) => continue,
            Err(e) => {
                println!("[error] {}", e);
                continue;
            }
        };

        log::debug!("Command: {:?}", command);

        if let Flow::Quit = execute(&mut controller, command).await {
            break;
        }
    }

    Ok(())
}

async fn execute<G: PersonApi>(controller: &mut TerminalController<G>, command: Command) -> Flow {
    match command {
        Command::List => print_table(controller),
        Command::Reload => {
            if let Some(Ok(_)) = cancellable(controller.load()).await {
                print_table(controller);
            }
        }
        Command::Filter(filter) => {
            controller.set_filter(filter);
            print_table(controller);
        }
        Command::Sort(column) => {
            let direction = controller.sort(column);
            println!("Ordenado por {} ({})", column, direction_label(direction));
            print_table(controller);
        }
        Command::ToggleColumn(column) => match controller.toggle_column(column) {
            Ok(_) => print_table(controller),
            Err(e) => println!("[error] {}", e),
        },
        Command::Add => {
            controller.open_create();
            print_form(controller);
        }
        Command::Edit(id) => match controller.open_update(id) {
            Ok(()) => print_form(controller),
            Err(e) => println!("[error] {}", e),
        },
        Command::Delete(id) => match controller.open_delete(id) {
            Ok(()) => print_form(controller),
            Err(e) => println!("[error] {}", e),
        },
        Command::Kind(kind) => match controller.set_kind(kind) {
            Ok(()) => print_form(controller),
            Err(e) => println!("[error] {}", e),
        },
        Command::Set(field, value) => {
            if let Err(e) = controller.set_field(field, value) {
                println!("[error] {}", e);
            }
        }
        Command::ShowForm => print_form(controller),
        Command::Accept => match cancellable(controller.confirm()).await {
            Some(Ok(())) => print_table(controller),
            // Validation and gateway failures were already notified
            Some(Err(SubmitError::Form(e))) => println!("[error] {}", e),
            Some(Err(e)) => log::debug!("Form kept open: {}", e),
            None => {}
        },
        Command::Cancel => controller.cancel(),
        Command::Help => println!("{}", HELP),
        Command::Quit => return Flow::Quit,
    }

    Flow::Continue
}

/// Races a request against Ctrl-C. Dropping the losing request cancels it and leaves the store
/// untouched.
async fn cancellable<T>(operation: impl Future<Output = T>) -> Option<T> {
    tokio::select! {
        result = operation => Some(result),
        _ = tokio::signal::ctrl_c() => {
            log::warn!("Request cancelled by the user");
            println!("Operación cancelada.");
            None
        }
    }
}

fn print_table<G: PersonApi>(controller: &TerminalController<G>) {
    println!(
        "{}",
        render_status(
            controller.active_filter(),
            controller.sort_direction(),
            controller.columns()
        )
    );
    println!("{}", render_table(&controller.table()));
}

fn print_form<G: PersonApi>(controller: &TerminalController<G>) {
    match controller.form() {
        Some(form) => println!("{}", render_form(form)),
        None => println!("No hay ningún formulario abierto."),
    }
}
