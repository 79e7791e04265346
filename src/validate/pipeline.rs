// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowc contributors

//! Validated pipelines
//!
//! The immutable result of a successful validation: the frozen node and
//! channel sets, the precomputed topological order, and derived views
//! (dependency queries, fingerprint, diagram rendering) for downstream
//! schedulers and tooling.

use petgraph::algo::has_path_connecting;
use petgraph::graph::NodeIndex;
use petgraph::Direction;

use crate::graph::{Channel, NodeId, NodeSpec};
use crate::types::TypeRegistry;
use crate::validate::order::FlowGraph;

/// A fully-checked, frozen pipeline.
///
/// Only obtainable from
/// [`StaticValidator::validate`](crate::validate::StaticValidator::validate);
/// holding one is proof the graph is structurally closed, type-consistent,
/// and acyclic outside its feedback edges.
#[derive(Debug, Clone)]
pub struct ValidatedPipeline {
    types: TypeRegistry,
    nodes: Vec<NodeSpec>,
    channels: Vec<Channel>,
    /// Adjacency over non-feedback channels only.
    graph: FlowGraph,
    topo_order: Vec<NodeId>,
}

impl ValidatedPipeline {
    pub(crate) fn new(
        types: TypeRegistry,
        nodes: Vec<NodeSpec>,
        channels: Vec<Channel>,
        graph: FlowGraph,
        topo_order: Vec<NodeId>,
    ) -> Self {
        Self {
            types,
            nodes,
            channels,
            graph,
            topo_order,
        }
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Frozen node set in declaration order.
    pub fn nodes(&self) -> &[NodeSpec] {
        &self.nodes
    }

    /// Frozen channel set in bind order, feedback edges included.
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeSpec> {
        self.nodes.get(id.index())
    }

    /// Precomputed topological order over non-feedback channels; ties were
    /// broken by declaration order. Schedulers can launch stages in this
    /// order without recomputation.
    pub fn topological_order(&self) -> &[NodeId] {
        &self.topo_order
    }

    fn node_id(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.name() == name)
            .map(NodeId::from_index)
    }

    /// Names of the nodes that must run before the named node.
    pub fn dependencies(&self, name: &str) -> Option<Vec<&str>> {
        let id = self.node_id(name)?;
        let mut deps: Vec<&str> = self
            .graph
            .neighbors_directed(NodeIndex::new(id.index()), Direction::Incoming)
            .filter_map(|n| self.nodes.get(n.index()).map(NodeSpec::name))
            .collect();
        deps.reverse();
        deps.dedup();
        Some(deps)
    }

    /// Names of the nodes that consume the named node's outputs.
    pub fn dependents(&self, name: &str) -> Option<Vec<&str>> {
        let id = self.node_id(name)?;
        let mut deps: Vec<&str> = self
            .graph
            .neighbors_directed(NodeIndex::new(id.index()), Direction::Outgoing)
            .filter_map(|n| self.nodes.get(n.index()).map(NodeSpec::name))
            .collect();
        deps.reverse();
        deps.dedup();
        Some(deps)
    }

    /// Whether `a` depends (directly or transitively) on `b` through
    /// non-feedback channels.
    pub fn depends_on(&self, a: &str, b: &str) -> bool {
        let (Some(node_a), Some(node_b)) = (self.node_id(a), self.node_id(b)) else {
            return false;
        };
        has_path_connecting(
            &self.graph,
            NodeIndex::new(node_b.index()),
            NodeIndex::new(node_a.index()),
            None,
        )
    }

    /// Stable content fingerprint of the frozen graph.
    ///
    /// Hashes the node set (names, images, port names and structural type
    /// signatures), the channel set, and the topological order. Two
    /// candidates that validate to the same structure share a fingerprint,
    /// which lets downstream caching skip recomputation of unchanged
    /// pipelines.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();

        for node in &self.nodes {
            hasher.update(b"node");
            hasher.update(node.name().as_bytes());
            if let Some(image) = node.container_image() {
                hasher.update(b"image");
                hasher.update(image.to_string().as_bytes());
            }
            for port in node.inputs() {
                hasher.update(b"in");
                hasher.update(port.name().as_bytes());
                hasher.update(self.types.render(port.ty()).as_bytes());
                hasher.update(&[port.is_optional() as u8]);
            }
            for port in node.outputs() {
                hasher.update(b"out");
                hasher.update(port.name().as_bytes());
                hasher.update(self.types.render(port.ty()).as_bytes());
            }
        }

        for channel in &self.channels {
            hasher.update(b"channel");
            hasher.update(self.endpoint_label(channel.from.node, &channel.from.port).as_bytes());
            hasher.update(self.endpoint_label(channel.to.node, &channel.to.port).as_bytes());
            hasher.update(&[channel.is_feedback() as u8]);
        }

        for id in &self.topo_order {
            hasher.update(b"order");
            if let Some(node) = self.node(*id) {
                hasher.update(node.name().as_bytes());
            }
        }

        hasher.finalize().to_hex().to_string()
    }

    fn endpoint_label(&self, node: NodeId, port: &str) -> String {
        let name = self
            .node(node)
            .map(NodeSpec::name)
            .unwrap_or("<unknown>");
        format!("{}.{}", name, port)
    }

    /// Render the pipeline as a Mermaid diagram.
    pub fn to_mermaid(&self) -> String {
        let mut out = String::from("graph TD\n");

        for node in &self.nodes {
            out.push_str(&format!("    {}[{}]\n", node.name(), node.name()));
        }

        for channel in &self.channels {
            let from = self
                .node(channel.from.node)
                .map(NodeSpec::name)
                .unwrap_or("<unknown>");
            let to = self
                .node(channel.to.node)
                .map(NodeSpec::name)
                .unwrap_or("<unknown>");
            if channel.is_feedback() {
                out.push_str(&format!("    {} -.-> {}\n", from, to));
            } else {
                out.push_str(&format!("    {} --> {}\n", from, to));
            }
        }

        out
    }

    /// Render the pipeline as a Graphviz DOT digraph.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph pipeline {\n");
        out.push_str("    rankdir=TB;\n");
        out.push_str("    node [shape=box, style=rounded];\n\n");

        for channel in &self.channels {
            let from = self
                .node(channel.from.node)
                .map(NodeSpec::name)
                .unwrap_or("<unknown>");
            let to = self
                .node(channel.to.node)
                .map(NodeSpec::name)
                .unwrap_or("<unknown>");
            let label = format!("{} -> {}", channel.from.port, channel.to.port);
            if channel.is_feedback() {
                out.push_str(&format!(
                    "    \"{}\" -> \"{}\" [label=\"{}\", style=dashed];\n",
                    from, to, label
                ));
            } else {
                out.push_str(&format!(
                    "    \"{}\" -> \"{}\" [label=\"{}\"];\n",
                    from, to, label
                ));
            }
        }

        // Isolated nodes carry no channels; list them explicitly
        for (index, node) in self.nodes.iter().enumerate() {
            let isolated = !self.channels.iter().any(|c| {
                c.from.node.index() == index || c.to.node.index() == index
            });
            if isolated {
                out.push_str(&format!("    \"{}\";\n", node.name()));
            }
        }

        out.push_str("}\n");
        out
    }

    /// Render the execution order as numbered text.
    pub fn to_text(&self) -> String {
        let mut out = String::new();

        for (position, id) in self.topo_order.iter().enumerate() {
            let Some(node) = self.node(*id) else {
                continue;
            };

            out.push_str(&format!("{}. {} ({})", position + 1, node.name(), node.kind()));
            if let Some(image) = node.container_image() {
                out.push_str(&format!(" [{}]", image));
            }
            if let Some(deps) = self.dependencies(node.name()) {
                if !deps.is_empty() {
                    out.push_str(&format!(" [depends: {}]", deps.join(", ")));
                }
            }
            out.push('\n');
        }

        out
    }
}
