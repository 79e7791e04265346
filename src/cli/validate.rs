// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowc contributors

//! Validate command - check a pipeline declaration

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;
use tracing::debug;

use crate::cli::OutputFormat;
use crate::definition::PipelineDoc;
use crate::validate::StaticValidator;

/// Run the validate command
pub fn run(pipeline_path: PathBuf, format: OutputFormat, verbose: bool) -> Result<()> {
    if format == OutputFormat::Text {
        println!("{}", "Validating pipeline...".bold());
        println!();
    }

    let doc = PipelineDoc::from_file(&pipeline_path)?;
    if format == OutputFormat::Text {
        println!("  {} Declaration file is valid YAML", "✓".green());
    }

    let builder = doc.lower()?;
    debug!(
        nodes = builder.nodes().len(),
        channels = builder.channels().len(),
        "lowered pipeline declaration"
    );

    match StaticValidator::validate(builder.freeze()) {
        Ok(pipeline) => {
            match format {
                OutputFormat::Json => {
                    let order: Vec<&str> = pipeline
                        .topological_order()
                        .iter()
                        .filter_map(|id| pipeline.node(*id).map(|n| n.name()))
                        .collect();
                    let summary = serde_json::json!({
                        "valid": true,
                        "pipeline": doc.name,
                        "nodes": pipeline.nodes().len(),
                        "channels": pipeline.channels().len(),
                        "order": order,
                        "fingerprint": pipeline.fingerprint(),
                    });
                    println!("{}", serde_json::to_string_pretty(&summary).map_err(
                        |e| miette::miette!("Failed to render JSON: {}", e)
                    )?);
                }
                OutputFormat::Text => {
                    println!(
                        "  {} Graph is structurally closed and well-typed",
                        "✓".green()
                    );
                    println!();

                    if verbose {
                        println!("{}:", "Pipeline summary".bold());
                        println!("  Name: {}", doc.name);
                        println!("  Nodes: {}", pipeline.nodes().len());
                        println!("  Channels: {}", pipeline.channels().len());
                        println!("  Fingerprint: {}", pipeline.fingerprint().dimmed());
                        println!();
                        println!("{}:", "Execution order".bold());
                        print!("{}", pipeline.to_text());
                        println!();
                    }

                    println!("{}", "Pipeline is valid!".green().bold());
                }
            }
            Ok(())
        }
        Err(failure) => {
            match format {
                OutputFormat::Json => {
                    let report = serde_json::json!({
                        "valid": false,
                        "pipeline": doc.name,
                        "diagnostics": failure.diagnostics(),
                    });
                    println!("{}", serde_json::to_string_pretty(&report).map_err(
                        |e| miette::miette!("Failed to render JSON: {}", e)
                    )?);
                }
                OutputFormat::Text => {
                    println!();
                    println!("{}:", "Errors".red().bold());
                    for diagnostic in failure.iter() {
                        println!("  {} {}", "✗".red(), diagnostic);
                    }
                    println!();
                }
            }
            Err(miette::miette!(
                "Pipeline validation failed with {} diagnostic(s)",
                failure.len()
            ))
        }
    }
}
