// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowc contributors

//! Error types for pipeline construction
//!
//! Construction-time failures (duplicate names, malformed references) fail
//! the single operation that caused them and leave prior state untouched.
//! Validation-time problems are not errors in this sense; the validator
//! collects them as [`Diagnostic`](crate::validate::Diagnostic) batches.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

use crate::graph::PortDirection;

/// Result type for flowc operations
pub type FlowResult<T> = Result<T, FlowError>;

/// Main error type for flowc
#[derive(Error, Debug, Diagnostic)]
pub enum FlowError {
    // ─────────────────────────────────────────────────────────────────────────
    // Type Registry Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Type '{name}' is already registered")]
    #[diagnostic(
        code(flowc::duplicate_type),
        help("Type names are unique per registry; pick a different name or reuse the existing id")
    )]
    DuplicateType { name: String },

    #[error("Unknown type '{name}'")]
    #[diagnostic(
        code(flowc::unknown_type),
        help("Declare '{name}' in the types section, or use one of the builtin primitives")
    )]
    UnknownType { name: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Graph Construction Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Node '{name}' is already declared")]
    #[diagnostic(code(flowc::duplicate_node_name))]
    DuplicateNodeName { name: String },

    #[error("Node '{node}' declares {direction} port '{port}' more than once")]
    #[diagnostic(
        code(flowc::duplicate_port_name),
        help("Port names are unique per node and direction")
    )]
    DuplicatePortName {
        node: String,
        port: String,
        direction: PortDirection,
    },

    #[error("Channel from '{node}.{port}' back into the same port is not allowed")]
    #[diagnostic(
        code(flowc::self_binding),
        help("A port cannot feed itself; route through another node instead")
    )]
    SelfBindingNotAllowed { node: String, port: String },

    #[error("Channel endpoint references unknown node '{name}'")]
    #[diagnostic(code(flowc::unknown_node))]
    UnknownNode { name: String },

    #[error("Invalid channel endpoint '{endpoint}'")]
    #[diagnostic(
        code(flowc::invalid_endpoint),
        help("Endpoints are written as 'node.port'")
    )]
    InvalidEndpoint { endpoint: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Container Image Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Image reference '{reference}' is missing a repository")]
    #[diagnostic(
        code(flowc::missing_image_repository),
        help("Image references follow '[registry/][namespace/]repository[:tag][@algorithm=hash]'")
    )]
    MissingImageRepository { reference: String },

    #[error("Invalid image digest format: {digest}")]
    #[diagnostic(
        code(flowc::invalid_image_digest),
        help("Digests are written as 'algorithm=hash', e.g. 'sha256=a1b2c3'")
    )]
    InvalidImageDigest { digest: String },

    // ─────────────────────────────────────────────────────────────────────────
    // IO/Format Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Pipeline file not found: {path}")]
    #[diagnostic(code(flowc::pipeline_not_found))]
    PipelineNotFound { path: PathBuf },

    #[error("Failed to read file '{path}': {error}")]
    #[diagnostic(code(flowc::file_read_error))]
    FileReadError { path: PathBuf, error: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(flowc::io_error))]
    Io { message: String },

    #[error("YAML parsing error: {message}")]
    #[diagnostic(code(flowc::yaml_error))]
    Yaml { message: String },

    #[error("JSON error: {message}")]
    #[diagnostic(code(flowc::json_error))]
    Json { message: String },
}

impl From<std::io::Error> for FlowError {
    fn from(e: std::io::Error) -> Self {
        Self::Io {
            message: e.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for FlowError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Yaml {
            message: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for FlowError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json {
            message: e.to_string(),
        }
    }
}
