// Command-line interface

pub mod commands;

use clap::{Parser, Subcommand};

use crate::router::Tool;

#[derive(Parser, Debug)]
#[command(name = "dapoer")]
#[command(about = "Dapoer - Asisten resep masakan Indonesia", long_about = None)]
pub struct Cli {
    /// Recipe CSV path or URL (overrides DATASET_SOURCE)
    #[arg(long, global = true)]
    pub dataset: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long, env = "HOST")]
        host: Option<String>,
    },

    /// Answer a single question
    Ask {
        /// Free-text question
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Interactive chat on the terminal
    Chat,

    /// Run one rule-based tool directly
    Tool {
        /// title, ingredients, method or easy
        #[arg(value_parser = parse_tool)]
        tool: Tool,

        /// Free-text question
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Load the dataset and print a summary
    Inspect,
}

fn parse_tool(value: &str) -> Result<Tool, String> {
    value.parse()
}
