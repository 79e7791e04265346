// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowc contributors

//! Validation passes
//!
//! Five ordered passes over a frozen candidate: reference resolution,
//! fan-in, type compatibility, completeness, cycle detection. Passes do
//! not short-circuit each other; independent diagnostics are all collected
//! so one run reports every problem it can find. Channels whose endpoints
//! do not resolve are excluded from the passes that need both ends, and an
//! input port with a dangling source still counts as bound so the
//! completeness pass does not pile a second diagnostic onto the same
//! mistake.

use std::collections::{HashMap, HashSet};

use petgraph::graph::NodeIndex;
use tracing::debug;

use crate::graph::{CandidateGraph, Channel, ChannelKind};
use crate::types::TypeId;
use crate::validate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::validate::order::{find_cycles, topological_order, FlowGraph};
use crate::validate::{ValidatedPipeline, ValidationFailure};

/// The static validator.
///
/// Pure function over an immutable snapshot: no I/O, no shared state.
/// Validating independent candidates concurrently needs no coordination.
pub struct StaticValidator;

/// Per-channel endpoint resolution, computed once by the first pass.
struct Resolution {
    from_ok: bool,
    to_ok: bool,
    source_type: Option<TypeId>,
    dest_type: Option<TypeId>,
}

impl Resolution {
    fn fully_resolved(&self) -> bool {
        self.from_ok && self.to_ok
    }
}

impl StaticValidator {
    /// Validate a candidate graph.
    ///
    /// Consumes the candidate: on success its contents move into the
    /// returned [`ValidatedPipeline`]; on failure the non-empty diagnostic
    /// batch is all that remains. The two outcomes are mutually exclusive
    /// by construction.
    pub fn validate(candidate: CandidateGraph) -> Result<ValidatedPipeline, ValidationFailure> {
        let mut diagnostics = Vec::new();

        let resolutions = Self::resolve_references(&candidate, &mut diagnostics);
        Self::check_fan_in(&candidate, &resolutions, &mut diagnostics);
        Self::check_types(&candidate, &resolutions, &mut diagnostics);
        Self::check_completeness(&candidate, &resolutions, &mut diagnostics);
        let graph = Self::check_cycles(&candidate, &resolutions, &mut diagnostics);

        debug!(
            nodes = candidate.nodes().len(),
            channels = candidate.channels().len(),
            diagnostics = diagnostics.len(),
            "validation finished"
        );

        if !diagnostics.is_empty() {
            return Err(ValidationFailure::new(diagnostics));
        }

        let order = topological_order(&graph);
        let (types, nodes, channels) = candidate.into_parts();
        Ok(ValidatedPipeline::new(types, nodes, channels, graph, order))
    }

    /// Pass 1: resolve every channel endpoint against the declared nodes
    /// and their ports.
    fn resolve_references(
        candidate: &CandidateGraph,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<Resolution> {
        let mut resolutions = Vec::with_capacity(candidate.channels().len());

        for channel in candidate.channels() {
            let (from_ok, source_type) =
                Self::resolve_source(candidate, channel, diagnostics);
            let (to_ok, dest_type) = Self::resolve_dest(candidate, channel, diagnostics);
            resolutions.push(Resolution {
                from_ok,
                to_ok,
                source_type,
                dest_type,
            });
        }

        let resolved = resolutions.iter().filter(|r| r.fully_resolved()).count();
        debug!(
            resolved,
            total = resolutions.len(),
            "resolved channel endpoints"
        );
        resolutions
    }

    fn resolve_source(
        candidate: &CandidateGraph,
        channel: &Channel,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> (bool, Option<TypeId>) {
        let Some(node) = candidate.node(channel.from.node) else {
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticKind::DanglingEndpoint,
                    format!(
                        "channel #{} source references unknown node #{}",
                        channel.id.index(),
                        channel.from.node.index()
                    ),
                )
                .port(&channel.from.port)
                .channel(channel.id),
            );
            return (false, None);
        };

        match node.output_port(&channel.from.port) {
            Some(port) => (true, Some(port.ty())),
            None => {
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticKind::DanglingEndpoint,
                        format!(
                            "node '{}' has no output port '{}'",
                            node.name(),
                            channel.from.port
                        ),
                    )
                    .node(node.name())
                    .port(&channel.from.port)
                    .channel(channel.id),
                );
                (false, None)
            }
        }
    }

    fn resolve_dest(
        candidate: &CandidateGraph,
        channel: &Channel,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> (bool, Option<TypeId>) {
        let Some(node) = candidate.node(channel.to.node) else {
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticKind::DanglingEndpoint,
                    format!(
                        "channel #{} destination references unknown node #{}",
                        channel.id.index(),
                        channel.to.node.index()
                    ),
                )
                .port(&channel.to.port)
                .channel(channel.id),
            );
            return (false, None);
        };

        match node.input_port(&channel.to.port) {
            Some(port) => (true, Some(port.ty())),
            None => {
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticKind::DanglingEndpoint,
                        format!(
                            "node '{}' has no input port '{}'",
                            node.name(),
                            channel.to.port
                        ),
                    )
                    .node(node.name())
                    .port(&channel.to.port)
                    .channel(channel.id),
                );
                (false, None)
            }
        }
    }

    /// Pass 2: each input port accepts at most one channel. Fan-out from
    /// an output port is unrestricted.
    fn check_fan_in(
        candidate: &CandidateGraph,
        resolutions: &[Resolution],
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let mut incoming: HashMap<(usize, &str), usize> = HashMap::new();
        for (channel, resolution) in candidate.channels().iter().zip(resolutions) {
            if resolution.to_ok {
                *incoming
                    .entry((channel.to.node.index(), channel.to.port.as_str()))
                    .or_default() += 1;
            }
        }

        // Walk nodes and ports in declaration order for a stable report
        for (node_index, node) in candidate.nodes().iter().enumerate() {
            for port in node.inputs() {
                let count = incoming
                    .get(&(node_index, port.name()))
                    .copied()
                    .unwrap_or(0);
                if count > 1 {
                    diagnostics.push(
                        Diagnostic::new(
                            DiagnosticKind::MultipleInputsToPort,
                            format!(
                                "input port '{}.{}' receives {} channels; at most one is allowed",
                                node.name(),
                                port.name(),
                                count
                            ),
                        )
                        .node(node.name())
                        .port(port.name()),
                    );
                }
            }
        }
    }

    /// Pass 3: the source and destination types of every fully-resolved
    /// channel must be compatible.
    fn check_types(
        candidate: &CandidateGraph,
        resolutions: &[Resolution],
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let types = candidate.types();

        for (channel, resolution) in candidate.channels().iter().zip(resolutions) {
            let (Some(source), Some(dest)) = (resolution.source_type, resolution.dest_type)
            else {
                continue;
            };
            if types.compatible(source, dest) {
                continue;
            }

            let from_name = Self::node_name(candidate, channel.from.node.index());
            let to_name = Self::node_name(candidate, channel.to.node.index());
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticKind::TypeMismatch,
                    format!(
                        "channel '{}.{}' -> '{}.{}' connects incompatible types '{}' and '{}'",
                        from_name,
                        channel.from.port,
                        to_name,
                        channel.to.port,
                        types.name_of(source),
                        types.name_of(dest)
                    ),
                )
                .node(to_name)
                .port(&channel.to.port)
                .channel(channel.id),
            );
        }
    }

    /// Pass 4: every required input port must be bound.
    ///
    /// A channel whose destination resolved counts even when its source
    /// dangles; that channel's problem is already reported as a dangling
    /// endpoint.
    fn check_completeness(
        candidate: &CandidateGraph,
        resolutions: &[Resolution],
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let mut bound: HashSet<(usize, &str)> = HashSet::new();
        for (channel, resolution) in candidate.channels().iter().zip(resolutions) {
            if resolution.to_ok {
                bound.insert((channel.to.node.index(), channel.to.port.as_str()));
            }
        }

        for (node_index, node) in candidate.nodes().iter().enumerate() {
            for port in node.inputs() {
                if port.is_optional() || bound.contains(&(node_index, port.name())) {
                    continue;
                }
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticKind::UnboundRequiredInput,
                        format!(
                            "required input '{}.{}' is not bound",
                            node.name(),
                            port.name()
                        ),
                    )
                    .node(node.name())
                    .port(port.name()),
                );
            }
        }
    }

    /// Pass 5: the node graph induced by fully-resolved, non-feedback
    /// channels must be acyclic. Returns the adjacency structure for the
    /// topological ordering on the success path.
    fn check_cycles(
        candidate: &CandidateGraph,
        resolutions: &[Resolution],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> FlowGraph {
        let mut graph = FlowGraph::new();
        for (index, _) in candidate.nodes().iter().enumerate() {
            graph.add_node(crate::graph::NodeId::from_index(index));
        }
        for (channel, resolution) in candidate.channels().iter().zip(resolutions) {
            if resolution.fully_resolved() && channel.kind == ChannelKind::Forward {
                graph.add_edge(
                    NodeIndex::new(channel.from.node.index()),
                    NodeIndex::new(channel.to.node.index()),
                    channel.id,
                );
            }
        }

        for cycle in find_cycles(&graph) {
            let names: Vec<&str> = cycle
                .iter()
                .map(|id| Self::node_name(candidate, id.index()))
                .collect();
            let first = names.first().copied().unwrap_or("<unknown>");
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticKind::IllegalCycle,
                    format!(
                        "cycle detected with no feedback edge: {} -> {}",
                        names.join(" -> "),
                        first
                    ),
                )
                .node(first),
            );
        }

        graph
    }

    fn node_name(candidate: &CandidateGraph, index: usize) -> &str {
        candidate
            .nodes()
            .get(index)
            .map(|n| n.name())
            .unwrap_or("<unknown>")
    }
}
