// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowc contributors

//! Graph command - render the validated pipeline

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;

use crate::cli::GraphFormat;
use crate::definition::PipelineDoc;
use crate::validate::StaticValidator;

/// Run the graph command
pub fn run(pipeline_path: PathBuf, format: GraphFormat, _verbose: bool) -> Result<()> {
    let doc = PipelineDoc::from_file(&pipeline_path)?;
    let builder = doc.lower()?;

    let pipeline = match StaticValidator::validate(builder.freeze()) {
        Ok(pipeline) => pipeline,
        Err(failure) => {
            // Only a valid graph has a meaningful rendering
            eprintln!("{}:", "Errors".red().bold());
            for diagnostic in failure.iter() {
                eprintln!("  {} {}", "✗".red(), diagnostic);
            }
            return Err(miette::miette!(
                "Cannot render an invalid pipeline ({} diagnostic(s))",
                failure.len()
            ));
        }
    };

    match format {
        GraphFormat::Text => print!("{}", pipeline.to_text()),
        GraphFormat::Dot => print!("{}", pipeline.to_dot()),
        GraphFormat::Mermaid => print!("{}", pipeline.to_mermaid()),
    }

    Ok(())
}
