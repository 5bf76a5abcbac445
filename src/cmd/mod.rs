use crate::{pkg::internal::auth, pkg::server::listen, prelude::Result};
use clap::{Parser, Subcommand};

pub mod migrate;

#[derive(Parser)]
#[command(about = "starts the jobdesk web services")]
struct Cmd {
    #[command(subcommand)]
    command: Option<SubCommandType>,
}

#[derive(Subcommand)]
enum SubCommandType {
    Listen,
    Migrate,
    /// Mints a signed bearer token, for development and smoke tests.
    Token {
        #[arg(long)]
        username: String,
        #[arg(long)]
        admin: bool,
    },
}

pub async fn run() -> Result<()> {
    let args = Cmd::parse();
    match args.command {
        Some(SubCommandType::Listen) => {
            listen().await?;
        }
        Some(SubCommandType::Migrate) => {
            migrate::apply().await?;
        }
        Some(SubCommandType::Token { username, admin }) => {
            println!("{}", auth::create_token(&username, admin)?);
        }
        None => {
            tracing::error!("no subcommand passed");
        }
    }
    Ok(())
}
