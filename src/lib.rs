// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowc contributors

//! # flowc - Flow Pipeline Checker
//!
//! `flowc` is the pipeline definition model and static validator for the
//! Flow workflow language: it turns a set of type, node, and channel
//! declarations into a typed directed graph and proves it sound before
//! anything tries to execute it.
//!
//! ## Features
//!
//! - **Typed channels** - structural type compatibility, no implicit widening
//! - **Whole-graph diagnostics** - one run reports every problem it can find
//! - **Deterministic output** - stable diagnostic order and topological order
//! - **Feedback edges** - cycles are illegal unless explicitly tagged
//! - **Container placement** - nodes carry the image their stage runs in
//!
//! ## Quick Start
//!
//! ```
//! use flowc::graph::{GraphBuilder, NodeSpec};
//! use flowc::validate::StaticValidator;
//!
//! let mut builder = GraphBuilder::new();
//! let text = builder.types().lookup("text").unwrap();
//!
//! let source = builder
//!     .declare(NodeSpec::new("source").output("data", text))
//!     .unwrap();
//! let sink = builder
//!     .declare(NodeSpec::new("sink").input("data", text))
//!     .unwrap();
//! builder.bind(source, "data", sink, "data").unwrap();
//!
//! let pipeline = StaticValidator::validate(builder.freeze()).unwrap();
//! assert_eq!(pipeline.topological_order().len(), 2);
//! ```
//!
//! Declarations can also be loaded from a flow.yaml document via
//! [`definition::PipelineDoc`], which is what the `flowc` binary does.

pub mod cli;
pub mod container;
pub mod definition;
pub mod errors;
pub mod graph;
pub mod types;
pub mod validate;

// Re-export commonly used types
pub use container::ImageSelector;
pub use definition::PipelineDoc;
pub use errors::{FlowError, FlowResult};
pub use graph::{CandidateGraph, GraphBuilder, NodeSpec};
pub use types::{TypeDef, TypeRegistry};
pub use validate::{Diagnostic, DiagnosticKind, StaticValidator, ValidatedPipeline, ValidationFailure};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
