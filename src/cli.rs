use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "examen",
    version,
    about = "Deterministic exam assembly from a question repository"
)]
pub struct Cli {
    #[arg(
        short,
        long,
        global = true,
        default_value = "config.json",
        help = "Config file input (JSON format)"
    )]
    pub config: PathBuf,
    #[arg(
        short,
        long,
        global = true,
        action = ArgAction::Count,
        help = "Increase log verbosity (most verbose: -vvv)"
    )]
    pub verbose: u8,
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        short,
        long,
        global = true,
        value_name = "KEY=VALUE",
        help = "Override a replacement token of the typeset source"
    )]
    pub replace: Vec<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the personalized test booklet and the answer key for the roster
    Generate,
    /// Build one document containing every question, rendered for a fixed id
    All {
        #[arg(long)]
        id: String,
    },
    /// List the loaded question repository
    List,
    /// Show one rendered answer. Arg: <group>:<question>:<id>
    Question { target: String },
    /// Run a question's algorithm with raw args. Arg: <group>:<question>:<arg>[:<arg>...]
    Debug { target: String },
    /// Resolve assignments for participant ids read from stdin
    Interactive,
    /// Create a dummy project in the current directory
    Init,
}
