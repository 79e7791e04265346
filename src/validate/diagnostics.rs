// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowc contributors

//! Validation diagnostics
//!
//! One diagnostic per reported problem, carrying the offending node, port,
//! and channel identities so a reporting layer can render precise errors
//! without re-walking the graph. A validation run never short-circuits:
//! every problem it can find lands in one batch.

use std::fmt;

use miette::Diagnostic as MietteDiagnostic;
use serde::Serialize;
use thiserror::Error;

use crate::graph::ChannelId;

/// Category of a validation problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A channel references a nonexistent node or port.
    DanglingEndpoint,
    /// An input port receives more than one channel.
    MultipleInputsToPort,
    /// A channel's port types are not compatible.
    TypeMismatch,
    /// A required input port has no channel.
    UnboundRequiredInput,
    /// A cycle exists with no edge tagged as feedback.
    IllegalCycle,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DanglingEndpoint => "dangling endpoint",
            Self::MultipleInputsToPort => "multiple inputs to port",
            Self::TypeMismatch => "type mismatch",
            Self::UnboundRequiredInput => "unbound required input",
            Self::IllegalCycle => "illegal cycle",
        };
        f.write_str(name)
    }
}

/// One reported validation problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,

    /// Name of the offending node, when one can be named.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,

    /// Name of the offending port, when one can be named.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,

    /// Bind-order index of the offending channel, when one is involved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<usize>,

    /// Human-readable description.
    pub message: String,
}

impl Diagnostic {
    pub(crate) fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            node: None,
            port: None,
            channel: None,
            message: message.into(),
        }
    }

    pub(crate) fn node(mut self, name: impl Into<String>) -> Self {
        self.node = Some(name.into());
        self
    }

    pub(crate) fn port(mut self, name: impl Into<String>) -> Self {
        self.port = Some(name.into());
        self
    }

    pub(crate) fn channel(mut self, id: ChannelId) -> Self {
        self.channel = Some(id.index());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Non-empty batch of diagnostics from one validation run.
///
/// Returned as the `Err` arm of
/// [`StaticValidator::validate`](crate::validate::StaticValidator::validate),
/// which makes it structurally impossible to hold a validated pipeline and
/// diagnostics at the same time.
#[derive(Debug, Clone, Error, MietteDiagnostic)]
#[error("pipeline validation failed with {} diagnostic(s)", .diagnostics.len())]
#[diagnostic(
    code(flowc::validation_failed),
    help("fix the reported problems; an invalid pipeline must not be executed")
)]
pub struct ValidationFailure {
    diagnostics: Vec<Diagnostic>,
}

impl ValidationFailure {
    pub(crate) fn new(diagnostics: Vec<Diagnostic>) -> Self {
        debug_assert!(!diagnostics.is_empty());
        Self { diagnostics }
    }

    /// The batch, in deterministic report order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Always false: an empty batch is a successful validation.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }
}
