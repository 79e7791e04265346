// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowc contributors

//! Graph builder
//!
//! Accumulates node descriptors and channel bindings with append-only
//! bookkeeping. Uniqueness is enforced at insertion; everything structural
//! is deferred to the validator. `freeze()` takes a copy-on-read snapshot,
//! so the builder stays usable for assembling the next candidate.

use std::collections::{HashMap, HashSet};

use crate::errors::FlowError;
use crate::graph::{Channel, ChannelId, ChannelKind, Endpoint, NodeId, NodeSpec, PortDirection};
use crate::types::TypeRegistry;

/// Single-owner builder for a candidate pipeline graph.
///
/// Owns the [`TypeRegistry`] the graph's ports are typed against, so a
/// frozen candidate always carries exactly the types it was built with.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    types: TypeRegistry,
    nodes: Vec<NodeSpec>,
    channels: Vec<Channel>,
    node_index: HashMap<String, NodeId>,
}

impl GraphBuilder {
    /// A builder whose registry starts with the builtin primitives.
    pub fn new() -> Self {
        Self::with_types(TypeRegistry::with_builtins())
    }

    /// A builder over a caller-provided registry.
    pub fn with_types(types: TypeRegistry) -> Self {
        Self {
            types,
            nodes: Vec::new(),
            channels: Vec::new(),
            node_index: HashMap::new(),
        }
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn types_mut(&mut self) -> &mut TypeRegistry {
        &mut self.types
    }

    /// Declare a node.
    ///
    /// Fails with [`FlowError::DuplicateNodeName`] or
    /// [`FlowError::DuplicatePortName`]; the builder is unchanged on
    /// failure.
    pub fn declare(&mut self, spec: NodeSpec) -> Result<NodeId, FlowError> {
        if self.node_index.contains_key(spec.name()) {
            return Err(FlowError::DuplicateNodeName {
                name: spec.name().to_string(),
            });
        }

        Self::check_unique_ports(&spec, PortDirection::Input)?;
        Self::check_unique_ports(&spec, PortDirection::Output)?;

        let id = NodeId::from_index(self.nodes.len());
        self.node_index.insert(spec.name().to_string(), id);
        self.nodes.push(spec);
        Ok(id)
    }

    fn check_unique_ports(spec: &NodeSpec, direction: PortDirection) -> Result<(), FlowError> {
        let ports = match direction {
            PortDirection::Input => spec.inputs(),
            PortDirection::Output => spec.outputs(),
        };

        let mut seen = HashSet::new();
        for port in ports {
            if !seen.insert(port.name()) {
                return Err(FlowError::DuplicatePortName {
                    node: spec.name().to_string(),
                    port: port.name().to_string(),
                    direction,
                });
            }
        }
        Ok(())
    }

    /// Id of a declared node by name.
    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.node_index.get(name).copied()
    }

    /// Connect an output port to an input port.
    ///
    /// Endpoints may reference ports that do not exist yet; resolution is
    /// the validator's first pass. The only eager rejection is a channel
    /// from a port directly back into itself, which can never be legal.
    pub fn bind(
        &mut self,
        from: NodeId,
        output: &str,
        to: NodeId,
        input: &str,
    ) -> Result<ChannelId, FlowError> {
        self.bind_inner(from, output, to, input, ChannelKind::Forward)
    }

    /// Like [`bind`](Self::bind), but tags the channel as a feedback edge
    /// that is allowed to close a cycle.
    pub fn bind_feedback(
        &mut self,
        from: NodeId,
        output: &str,
        to: NodeId,
        input: &str,
    ) -> Result<ChannelId, FlowError> {
        self.bind_inner(from, output, to, input, ChannelKind::Feedback)
    }

    fn bind_inner(
        &mut self,
        from: NodeId,
        output: &str,
        to: NodeId,
        input: &str,
        kind: ChannelKind,
    ) -> Result<ChannelId, FlowError> {
        if from == to && output == input {
            let node = self
                .nodes
                .get(from.index())
                .map(|n| n.name().to_string())
                .unwrap_or_else(|| format!("#{}", from.index()));
            return Err(FlowError::SelfBindingNotAllowed {
                node,
                port: output.to_string(),
            });
        }

        let id = ChannelId::from_index(self.channels.len());
        self.channels.push(Channel {
            id,
            from: Endpoint::new(from, output),
            to: Endpoint::new(to, input),
            kind,
        });
        Ok(id)
    }

    /// Declared nodes in declaration order.
    pub fn nodes(&self) -> &[NodeSpec] {
        &self.nodes
    }

    /// Bound channels in bind order.
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Take an immutable snapshot for validation.
    ///
    /// The snapshot copies types, nodes, and channels, so later mutation of
    /// the builder cannot affect a validation already in flight.
    pub fn freeze(&self) -> CandidateGraph {
        CandidateGraph {
            types: self.types.clone(),
            nodes: self.nodes.clone(),
            channels: self.channels.clone(),
        }
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable snapshot of a builder, ready for validation.
#[derive(Debug, Clone)]
pub struct CandidateGraph {
    types: TypeRegistry,
    nodes: Vec<NodeSpec>,
    channels: Vec<Channel>,
}

impl CandidateGraph {
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn nodes(&self) -> &[NodeSpec] {
        &self.nodes
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeSpec> {
        self.nodes.get(id.index())
    }

    pub(crate) fn into_parts(self) -> (TypeRegistry, Vec<NodeSpec>, Vec<Channel>) {
        (self.types, self.nodes, self.channels)
    }
}
