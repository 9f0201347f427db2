mod config;
mod service;

use anyhow::Result;
use crate::config::Config;
use crate::service::{parse_argument, GatewayService};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "skillgate-gateway", version, about = "Invoke assistant skills by name")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the skill catalog handed to the orchestrator
    List,
    /// Invoke a skill once and print its JSON result
    Invoke {
        /// Skill name, e.g. GetBaseballStats
        name: String,
        /// JSON argument; anything that is not valid JSON is sent as a string
        argument: Option<String>,
    },
    /// Add a task to the local todo store
    AddTodo {
        title: String,
    },
    /// Mark a task in the local todo store as done
    CompleteTodo {
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load()?;
    let gateway = GatewayService::start(&config).await?;

    match cli.command {
        Command::List => println!("{}", gateway.catalog()),
        Command::Invoke { name, argument } => {
            let result = gateway
                .invoke(&name, parse_argument(argument.as_deref()))
                .await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::AddTodo { title } => {
            let item = gateway.add_todo(&title).await?;
            println!("{}", serde_json::to_string_pretty(&item)?);
        }
        Command::CompleteTodo { id } => {
            gateway.complete_todo(&id).await?;
            println!("Completed {id}");
        }
    }

    Ok(())
}
