// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowc contributors

//! Static validation
//!
//! Turns a [`CandidateGraph`](crate::graph::CandidateGraph) into either a
//! [`ValidatedPipeline`] or a non-empty, deterministic batch of
//! [`Diagnostic`]s. Pure and synchronous; no I/O.

mod diagnostics;
mod order;
mod passes;
mod pipeline;

pub use diagnostics::{Diagnostic, DiagnosticKind, ValidationFailure};
pub use passes::StaticValidator;
pub use pipeline::ValidatedPipeline;
