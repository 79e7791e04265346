// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowc contributors

//! Node descriptors
//!
//! A node is a named processing stage with ordered, typed input and output
//! ports. Descriptors are pure data; behavior belongs to the execution
//! engine that consumes the validated pipeline.

use std::fmt;

use crate::container::ImageSelector;
use crate::types::TypeId;

/// Identifier of a declared node, assigned by the builder in declaration
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    /// Position of this node in its graph's declaration order.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Which side of a node a port sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortDirection {
    Input,
    Output,
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => f.write_str("input"),
            Self::Output => f.write_str("output"),
        }
    }
}

/// Role of a node, derived from its port counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// No inputs: produces data
    Source,
    /// Inputs and outputs: processes data
    Transform,
    /// No outputs: consumes data
    Sink,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => f.write_str("source"),
            Self::Transform => f.write_str("transform"),
            Self::Sink => f.write_str("sink"),
        }
    }
}

/// A typed port on a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    name: String,
    ty: TypeId,
    optional: bool,
}

impl Port {
    pub(crate) fn new(name: impl Into<String>, ty: TypeId, optional: bool) -> Self {
        Self {
            name: name.into(),
            ty,
            optional,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The type this port carries.
    pub fn ty(&self) -> TypeId {
        self.ty
    }

    /// Optional ports are exempt from the completeness check. Only
    /// meaningful on inputs.
    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

/// Declaration of a processing stage.
///
/// Built fluently, then handed to
/// [`GraphBuilder::declare`](crate::graph::GraphBuilder::declare), which
/// enforces name uniqueness and freezes the descriptor.
///
/// ```
/// use flowc::graph::{GraphBuilder, NodeSpec};
///
/// let mut builder = GraphBuilder::new();
/// let text = builder.types().lookup("text").unwrap();
/// let node = NodeSpec::new("tokenize")
///     .input("in", text)
///     .output("out", text);
/// builder.declare(node).unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSpec {
    name: String,
    inputs: Vec<Port>,
    outputs: Vec<Port>,
    image: Option<ImageSelector>,
}

impl NodeSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            image: None,
        }
    }

    /// Append a required input port.
    pub fn input(mut self, name: impl Into<String>, ty: TypeId) -> Self {
        self.inputs.push(Port::new(name, ty, false));
        self
    }

    /// Append an input port that may legally stay unbound.
    pub fn optional_input(mut self, name: impl Into<String>, ty: TypeId) -> Self {
        self.inputs.push(Port::new(name, ty, true));
        self
    }

    /// Append an output port.
    pub fn output(mut self, name: impl Into<String>, ty: TypeId) -> Self {
        self.outputs.push(Port::new(name, ty, false));
        self
    }

    /// Name the container image this stage runs in.
    pub fn image(mut self, image: ImageSelector) -> Self {
        self.image = Some(image);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Input ports in declaration order.
    pub fn inputs(&self) -> &[Port] {
        &self.inputs
    }

    /// Output ports in declaration order.
    pub fn outputs(&self) -> &[Port] {
        &self.outputs
    }

    pub fn container_image(&self) -> Option<&ImageSelector> {
        self.image.as_ref()
    }

    /// Role derived from port counts. A node with no ports at all counts
    /// as a source.
    pub fn kind(&self) -> NodeKind {
        if self.inputs.is_empty() {
            NodeKind::Source
        } else if self.outputs.is_empty() {
            NodeKind::Sink
        } else {
            NodeKind::Transform
        }
    }

    pub fn input_port(&self, name: &str) -> Option<&Port> {
        self.inputs.iter().find(|p| p.name() == name)
    }

    pub fn output_port(&self, name: &str) -> Option<&Port> {
        self.outputs.iter().find(|p| p.name() == name)
    }
}
