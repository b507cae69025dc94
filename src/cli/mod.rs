use clap::Parser;
use error_stack::Result;

pub mod server;

/// Command line options for roster.
#[derive(Debug, Parser)]
#[command(about = "User account service", version)]
pub struct Cli {
    #[clap(subcommand)]
    pub subcommand: Subcommand,
}

impl Cli {
    pub fn run(self) -> Result<(), server::StartServerError> {
        match self.subcommand {
            Subcommand::Server(args) => server::run(args),
        }
    }
}

#[derive(Debug, Parser)]
pub enum Subcommand {
    Server(server::ServerCommand),
}
