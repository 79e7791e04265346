// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowc contributors

//! CLI command definitions and handlers
//!
//! Defines the command-line interface for flowc.

pub mod graph;
pub mod validate;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Flow pipeline checker
///
/// Validate Flow pipeline declarations before anything tries to run them.
#[derive(Parser, Debug)]
#[clap(
    name = "flowc",
    version,
    about = "Pipeline definition checker for the Flow workflow language",
    long_about = None,
    after_help = "Examples:\n\
        flowc validate                  Check the pipeline in ./flow.yaml\n\
        flowc validate ci.yaml          Check a specific declaration file\n\
        flowc graph --format dot        Render the validated pipeline as DOT\n\n\
        See 'flowc <command> --help' for more information on a specific command."
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[clap(short, long, global = true)]
    pub verbose: bool,

    /// Change to directory before executing
    #[clap(short = 'C', long, global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a pipeline declaration
    Validate {
        /// Pipeline declaration file
        #[clap(default_value = "flow.yaml")]
        pipeline: PathBuf,

        /// Output format
        #[clap(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show the validated pipeline as a graph
    Graph {
        /// Pipeline declaration file
        #[clap(default_value = "flow.yaml")]
        pipeline: PathBuf,

        /// Output format
        #[clap(short, long, default_value = "text")]
        format: GraphFormat,
    },
}

/// Output format for the validate command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Graph output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphFormat {
    Text,
    Dot,
    Mermaid,
}

impl std::str::FromStr for GraphFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "dot" => Ok(Self::Dot),
            "mermaid" => Ok(Self::Mermaid),
            _ => Err(format!("Unknown graph format: {}", s)),
        }
    }
}
