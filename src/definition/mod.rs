// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowc contributors

//! Pipeline declaration documents
//!
//! Defines the schema for flow.yaml files: a fully-resolved set of type,
//! node, and channel declarations that lowers into a [`GraphBuilder`].
//! This is the front door a grammar front end would also target; flowc
//! itself never sees raw Flow source text.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::container::ImageSelector;
use crate::errors::FlowError;
use crate::graph::{GraphBuilder, NodeSpec};
use crate::types::{Primitive, TypeDef, TypeId};

/// Pipeline declaration loaded from a flow.yaml document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDoc {
    /// Document version (for future compatibility)
    #[serde(default = "default_version")]
    pub version: String,

    /// Pipeline name
    pub name: String,

    /// Pipeline description
    #[serde(default)]
    pub description: Option<String>,

    /// Type declarations, on top of the builtin primitives
    #[serde(default)]
    pub types: Vec<TypeDoc>,

    /// Node declarations
    pub nodes: Vec<NodeDoc>,

    /// Channel declarations
    #[serde(default)]
    pub channels: Vec<ChannelDoc>,
}

fn default_version() -> String {
    "1".to_string()
}

/// A declared type.
///
/// Declarations may reference builtins and previously declared types;
/// forward references are not allowed, so declaration order matters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDoc {
    /// Type name (must be unique, builtins included)
    pub name: String,

    #[serde(flatten)]
    pub shape: TypeShapeDoc,
}

/// Shape of a declared type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TypeShapeDoc {
    /// Alias of a builtin primitive
    Primitive {
        /// Primitive name (integer, float, boolean, text, bytes)
        of: String,
    },

    /// List of an element type
    List {
        /// Element type name
        of: String,
    },

    /// Record with ordered fields
    Record { fields: Vec<FieldDoc> },
}

/// One record field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDoc {
    pub name: String,

    /// Field type name
    #[serde(rename = "type")]
    pub ty: String,
}

/// A declared node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDoc {
    /// Node name (must be unique within the pipeline)
    pub name: String,

    /// Container image the stage runs in
    #[serde(default)]
    pub image: Option<String>,

    /// Input ports in order
    #[serde(default)]
    pub inputs: Vec<PortDoc>,

    /// Output ports in order
    #[serde(default)]
    pub outputs: Vec<PortDoc>,
}

/// One declared port.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortDoc {
    pub name: String,

    /// Port type name
    #[serde(rename = "type")]
    pub ty: String,

    /// Whether the port may legally stay unbound (inputs only)
    #[serde(default)]
    pub optional: bool,
}

/// A declared channel, endpoints written as `node.port`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelDoc {
    /// Source endpoint (`node.output_port`)
    pub from: String,

    /// Destination endpoint (`node.input_port`)
    pub to: String,

    /// Tag this channel as a feedback edge
    #[serde(default)]
    pub feedback: bool,
}

impl PipelineDoc {
    /// Load a declaration document from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, FlowError> {
        if !path.exists() {
            return Err(FlowError::PipelineNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|e| FlowError::FileReadError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        Self::from_yaml(&content)
    }

    /// Parse a declaration document from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, FlowError> {
        serde_yaml::from_str(yaml).map_err(Into::into)
    }

    /// Serialize the document back to YAML.
    pub fn to_yaml(&self) -> Result<String, FlowError> {
        serde_yaml::to_string(self).map_err(Into::into)
    }

    /// Lower the declarations into a graph builder.
    ///
    /// Registers declared types on top of the builtins, declares nodes,
    /// then binds channels; the result is ready to freeze and validate.
    /// Name resolution failures and duplicate declarations surface as
    /// construction errors here, while structural problems (dangling
    /// ports, type mismatches, cycles) are left for the validator.
    pub fn lower(&self) -> Result<GraphBuilder, FlowError> {
        let mut builder = GraphBuilder::new();

        for doc in &self.types {
            let def = Self::lower_type(&builder, doc)?;
            builder.types_mut().register(def)?;
        }

        for doc in &self.nodes {
            let mut spec = NodeSpec::new(&doc.name);
            if let Some(ref image) = doc.image {
                spec = spec.image(ImageSelector::parse(image)?);
            }
            for port in &doc.inputs {
                let ty = Self::lookup_type(&builder, &port.ty)?;
                spec = if port.optional {
                    spec.optional_input(&port.name, ty)
                } else {
                    spec.input(&port.name, ty)
                };
            }
            for port in &doc.outputs {
                let ty = Self::lookup_type(&builder, &port.ty)?;
                spec = spec.output(&port.name, ty);
            }
            builder.declare(spec)?;
        }

        for doc in &self.channels {
            let (from_node, from_port) = Self::parse_endpoint(&doc.from)?;
            let (to_node, to_port) = Self::parse_endpoint(&doc.to)?;
            let from = builder
                .node_id(from_node)
                .ok_or_else(|| FlowError::UnknownNode {
                    name: from_node.to_string(),
                })?;
            let to = builder.node_id(to_node).ok_or_else(|| FlowError::UnknownNode {
                name: to_node.to_string(),
            })?;
            if doc.feedback {
                builder.bind_feedback(from, from_port, to, to_port)?;
            } else {
                builder.bind(from, from_port, to, to_port)?;
            }
        }

        Ok(builder)
    }

    fn lower_type(builder: &GraphBuilder, doc: &TypeDoc) -> Result<TypeDef, FlowError> {
        match &doc.shape {
            TypeShapeDoc::Primitive { of } => {
                let primitive: Primitive = of
                    .parse()
                    .map_err(|_| FlowError::UnknownType { name: of.clone() })?;
                Ok(TypeDef::primitive(&doc.name, primitive))
            }
            TypeShapeDoc::List { of } => {
                let element = Self::lookup_type(builder, of)?;
                Ok(TypeDef::list(&doc.name, element))
            }
            TypeShapeDoc::Record { fields } => {
                let fields = fields
                    .iter()
                    .map(|f| Ok((f.name.clone(), Self::lookup_type(builder, &f.ty)?)))
                    .collect::<Result<Vec<_>, FlowError>>()?;
                Ok(TypeDef::record(&doc.name, fields))
            }
        }
    }

    fn lookup_type(builder: &GraphBuilder, name: &str) -> Result<TypeId, FlowError> {
        builder.types().lookup(name).ok_or_else(|| FlowError::UnknownType {
            name: name.to_string(),
        })
    }

    fn parse_endpoint(endpoint: &str) -> Result<(&str, &str), FlowError> {
        match endpoint.split_once('.') {
            Some((node, port)) if !node.is_empty() && !port.is_empty() => Ok((node, port)),
            _ => Err(FlowError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::StaticValidator;

    const GENOMICS: &str = r#"
version: "1"
name: "genomics-qc"
types:
  - name: reads
    kind: list
    of: text
  - name: report
    kind: record
    fields:
      - name: sample
        type: text
      - name: score
        type: float
nodes:
  - name: fetch
    image: "biocontainers/sra-tools:3.0.0"
    outputs:
      - name: reads
        type: reads
  - name: qc
    image: "biocontainers/fastqc:0.11.9"
    inputs:
      - name: reads
        type: reads
    outputs:
      - name: report
        type: report
  - name: publish
    inputs:
      - name: report
        type: report
channels:
  - from: fetch.reads
    to: qc.reads
  - from: qc.report
    to: publish.report
"#;

    #[test]
    fn test_parse_and_lower() {
        let doc = PipelineDoc::from_yaml(GENOMICS).unwrap();
        assert_eq!(doc.name, "genomics-qc");
        assert_eq!(doc.nodes.len(), 3);

        let builder = doc.lower().unwrap();
        assert_eq!(builder.nodes().len(), 3);
        assert_eq!(builder.channels().len(), 2);
        assert_eq!(
            builder.nodes()[0].container_image().unwrap().to_string(),
            "biocontainers/sra-tools:3.0.0"
        );

        let pipeline = StaticValidator::validate(builder.freeze()).unwrap();
        let order: Vec<&str> = pipeline
            .topological_order()
            .iter()
            .map(|id| pipeline.node(*id).unwrap().name())
            .collect();
        assert_eq!(order, vec!["fetch", "qc", "publish"]);
    }

    #[test]
    fn test_unknown_type_in_port() {
        let yaml = r#"
name: "bad"
nodes:
  - name: stage
    inputs:
      - name: in
        type: no_such_type
"#;
        let doc = PipelineDoc::from_yaml(yaml).unwrap();
        let result = doc.lower();
        assert!(
            matches!(result, Err(FlowError::UnknownType { name }) if name == "no_such_type")
        );
    }

    #[test]
    fn test_unknown_node_in_channel() {
        let yaml = r#"
name: "bad"
nodes:
  - name: stage
    outputs:
      - name: out
        type: text
channels:
  - from: stage.out
    to: ghost.in
"#;
        let doc = PipelineDoc::from_yaml(yaml).unwrap();
        let result = doc.lower();
        assert!(matches!(result, Err(FlowError::UnknownNode { name }) if name == "ghost"));
    }

    #[test]
    fn test_malformed_endpoint() {
        let yaml = r#"
name: "bad"
nodes:
  - name: stage
    outputs:
      - name: out
        type: text
channels:
  - from: stage
    to: stage.out
"#;
        let doc = PipelineDoc::from_yaml(yaml).unwrap();
        let result = doc.lower();
        assert!(
            matches!(result, Err(FlowError::InvalidEndpoint { endpoint }) if endpoint == "stage")
        );
    }

    #[test]
    fn test_feedback_flag_lowered() {
        let yaml = r#"
name: "loop"
nodes:
  - name: a
    inputs:
      - name: in
        type: text
    outputs:
      - name: out
        type: text
  - name: b
    inputs:
      - name: in
        type: text
    outputs:
      - name: out
        type: text
channels:
  - from: a.out
    to: b.in
  - from: b.out
    to: a.in
    feedback: true
"#;
        let doc = PipelineDoc::from_yaml(yaml).unwrap();
        let builder = doc.lower().unwrap();
        assert!(builder.channels()[1].is_feedback());
        assert!(StaticValidator::validate(builder.freeze()).is_ok());
    }

    #[test]
    fn test_round_trip_yaml() {
        let doc = PipelineDoc::from_yaml(GENOMICS).unwrap();
        let yaml = doc.to_yaml().unwrap();
        let parsed = PipelineDoc::from_yaml(&yaml).unwrap();

        assert_eq!(parsed.name, doc.name);
        assert_eq!(parsed.nodes.len(), doc.nodes.len());
        assert_eq!(parsed.channels.len(), doc.channels.len());
    }
}
