// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowc contributors

//! End-to-end validation scenarios against the public API.

use flowc::graph::{GraphBuilder, NodeSpec};
use flowc::types::{TypeDef, TypeId};
use flowc::validate::{DiagnosticKind, StaticValidator, ValidatedPipeline};
use flowc::PipelineDoc;

fn text(builder: &GraphBuilder) -> TypeId {
    builder.types().lookup("text").unwrap()
}

fn names(pipeline: &ValidatedPipeline) -> Vec<&str> {
    pipeline
        .topological_order()
        .iter()
        .map(|id| pipeline.node(*id).unwrap().name())
        .collect()
}

/// Source -> Transform -> Sink validates and orders as declared.
#[test]
fn linear_pipeline_validates() {
    let mut builder = GraphBuilder::new();
    let text = text(&builder);

    let source = builder
        .declare(NodeSpec::new("Source").output("data", text))
        .unwrap();
    let transform = builder
        .declare(NodeSpec::new("Transform").input("in", text).output("out", text))
        .unwrap();
    let sink = builder
        .declare(NodeSpec::new("Sink").input("data", text))
        .unwrap();
    builder.bind(source, "data", transform, "in").unwrap();
    builder.bind(transform, "out", sink, "data").unwrap();

    let pipeline = StaticValidator::validate(builder.freeze()).unwrap();
    assert_eq!(names(&pipeline), vec!["Source", "Transform", "Sink"]);
}

/// Leaving Sink.data unbound yields exactly one diagnostic naming it.
#[test]
fn unbound_sink_input_is_reported_precisely() {
    let mut builder = GraphBuilder::new();
    let text = text(&builder);

    let source = builder
        .declare(NodeSpec::new("Source").output("data", text))
        .unwrap();
    let transform = builder
        .declare(NodeSpec::new("Transform").input("in", text).output("out", text))
        .unwrap();
    builder
        .declare(NodeSpec::new("Sink").input("data", text))
        .unwrap();
    builder.bind(source, "data", transform, "in").unwrap();

    let failure = StaticValidator::validate(builder.freeze()).unwrap_err();
    assert_eq!(failure.len(), 1);

    let diagnostic = &failure.diagnostics()[0];
    assert_eq!(diagnostic.kind, DiagnosticKind::UnboundRequiredInput);
    assert_eq!(diagnostic.node.as_deref(), Some("Sink"));
    assert_eq!(diagnostic.port.as_deref(), Some("data"));
}

/// A.out -> B.in plus B.out2 -> A.in, neither tagged feedback: exactly one
/// cycle naming A and B.
#[test]
fn untagged_two_node_cycle_is_reported_once() {
    let mut builder = GraphBuilder::new();
    let text = text(&builder);

    let a = builder
        .declare(NodeSpec::new("A").input("in", text).output("out", text))
        .unwrap();
    let b = builder
        .declare(NodeSpec::new("B").input("in", text).output("out2", text))
        .unwrap();
    builder.bind(a, "out", b, "in").unwrap();
    builder.bind(b, "out2", a, "in").unwrap();

    let failure = StaticValidator::validate(builder.freeze()).unwrap_err();
    let cycles: Vec<_> = failure
        .iter()
        .filter(|d| d.kind == DiagnosticKind::IllegalCycle)
        .collect();

    assert_eq!(cycles.len(), 1);
    assert!(cycles[0].message.contains("A -> B"));
}

/// The same cycle with the back edge tagged feedback is legal, and the
/// feedback edge stays out of the topological order.
#[test]
fn feedback_edge_permits_the_cycle() {
    let mut builder = GraphBuilder::new();
    let text = text(&builder);

    let a = builder
        .declare(NodeSpec::new("A").input("in", text).output("out", text))
        .unwrap();
    let b = builder
        .declare(NodeSpec::new("B").input("in", text).output("out2", text))
        .unwrap();
    builder.bind(a, "out", b, "in").unwrap();
    builder.bind_feedback(b, "out2", a, "in").unwrap();

    let pipeline = StaticValidator::validate(builder.freeze()).unwrap();
    assert_eq!(names(&pipeline), vec!["A", "B"]);
    assert!(pipeline.channels().iter().any(|c| c.is_feedback()));
}

/// A dangling endpoint is reported and its channel is excluded from type
/// and cycle analysis.
#[test]
fn dangling_endpoint_does_not_cascade() {
    let mut builder = GraphBuilder::new();
    let text = text(&builder);

    let a = builder
        .declare(NodeSpec::new("A").input("in", text).output("out", text))
        .unwrap();
    let b = builder
        .declare(NodeSpec::new("B").input("in", text).output("out", text))
        .unwrap();
    builder.bind(a, "out", b, "in").unwrap();
    // Would close a cycle if its port existed
    builder.bind(b, "ghost", a, "in").unwrap();

    let failure = StaticValidator::validate(builder.freeze()).unwrap_err();

    let kinds: Vec<DiagnosticKind> = failure.iter().map(|d| d.kind).collect();
    assert_eq!(kinds, vec![DiagnosticKind::DanglingEndpoint]);
    assert_eq!(failure.diagnostics()[0].node.as_deref(), Some("B"));
    assert_eq!(failure.diagnostics()[0].port.as_deref(), Some("ghost"));
}

/// Structurally identical composites registered under different names bind
/// cleanly; structurally different ones never do.
#[test]
fn structural_compatibility_governs_binding() {
    let mut builder = GraphBuilder::new();
    let text = text(&builder);
    let integer = builder.types().lookup("integer").unwrap();

    let record_a = builder
        .types_mut()
        .register(TypeDef::record("sample_a", vec![("id", text), ("n", integer)]))
        .unwrap();
    let record_b = builder
        .types_mut()
        .register(TypeDef::record("sample_b", vec![("id", text), ("n", integer)]))
        .unwrap();
    let record_c = builder
        .types_mut()
        .register(TypeDef::record("sample_c", vec![("id", text), ("n", text)]))
        .unwrap();

    let source = builder
        .declare(
            NodeSpec::new("source")
                .output("good", record_a)
                .output("bad", record_a),
        )
        .unwrap();
    let sink = builder
        .declare(
            NodeSpec::new("sink")
                .input("good", record_b)
                .input("bad", record_c),
        )
        .unwrap();
    builder.bind(source, "good", sink, "good").unwrap();
    builder.bind(source, "bad", sink, "bad").unwrap();

    let failure = StaticValidator::validate(builder.freeze()).unwrap_err();

    // Only the structurally different pair is rejected
    assert_eq!(failure.len(), 1);
    let diagnostic = &failure.diagnostics()[0];
    assert_eq!(diagnostic.kind, DiagnosticKind::TypeMismatch);
    assert_eq!(diagnostic.port.as_deref(), Some("bad"));
    assert!(diagnostic.message.contains("'sample_a'"));
    assert!(diagnostic.message.contains("'sample_c'"));
}

/// Validating the same frozen candidate twice yields identical batches.
#[test]
fn diagnostics_are_deterministic() {
    let mut builder = GraphBuilder::new();
    let text = text(&builder);
    let integer = builder.types().lookup("integer").unwrap();

    let a = builder
        .declare(NodeSpec::new("a").input("in", integer).output("out", text))
        .unwrap();
    let b = builder
        .declare(NodeSpec::new("b").input("in", integer).output("out", text))
        .unwrap();
    let c = builder
        .declare(NodeSpec::new("c").input("one", text).input("two", integer))
        .unwrap();
    builder.bind(a, "out", b, "in").unwrap();
    builder.bind(b, "out", a, "in").unwrap();
    builder.bind(a, "out", c, "one").unwrap();
    builder.bind(b, "ghost", c, "one").unwrap();

    let candidate = builder.freeze();
    let first = StaticValidator::validate(candidate.clone()).unwrap_err();
    let second = StaticValidator::validate(candidate).unwrap_err();

    assert_eq!(first.diagnostics(), second.diagnostics());
}

/// Every channel in a validated pipeline points from an earlier to a later
/// element of the topological order (feedback edges aside).
#[test]
fn topological_order_linearizes_every_forward_channel() {
    let mut builder = GraphBuilder::new();
    let text = text(&builder);

    let fetch = builder
        .declare(NodeSpec::new("fetch").output("raw", text))
        .unwrap();
    let clean = builder
        .declare(NodeSpec::new("clean").input("raw", text).output("tidy", text))
        .unwrap();
    let split = builder
        .declare(NodeSpec::new("split").input("tidy", text).output("left", text).output("right", text))
        .unwrap();
    let merge_left = builder
        .declare(NodeSpec::new("merge_left").input("in", text).output("out", text))
        .unwrap();
    let merge_right = builder
        .declare(NodeSpec::new("merge_right").input("in", text).output("out", text))
        .unwrap();
    let store = builder
        .declare(NodeSpec::new("store").input("a", text).input("b", text))
        .unwrap();

    builder.bind(fetch, "raw", clean, "raw").unwrap();
    builder.bind(clean, "tidy", split, "tidy").unwrap();
    builder.bind(split, "left", merge_left, "in").unwrap();
    builder.bind(split, "right", merge_right, "in").unwrap();
    builder.bind(merge_left, "out", store, "a").unwrap();
    builder.bind(merge_right, "out", store, "b").unwrap();

    let pipeline = StaticValidator::validate(builder.freeze()).unwrap();

    let position: std::collections::HashMap<usize, usize> = pipeline
        .topological_order()
        .iter()
        .enumerate()
        .map(|(pos, id)| (id.index(), pos))
        .collect();

    for channel in pipeline.channels() {
        assert!(
            position[&channel.from.node.index()] < position[&channel.to.node.index()],
            "channel #{} violates the order",
            channel.id.index()
        );
    }
}

/// A declaration document validates end to end and fingerprints stably
/// across loads.
#[test]
fn document_round_trip_fingerprint_is_stable() {
    let yaml = r#"
name: "etl"
types:
  - name: rows
    kind: list
    of: text
nodes:
  - name: extract
    image: "etl/extract:1.0"
    outputs:
      - name: rows
        type: rows
  - name: load
    inputs:
      - name: rows
        type: rows
channels:
  - from: extract.rows
    to: load.rows
"#;

    let first = StaticValidator::validate(
        PipelineDoc::from_yaml(yaml).unwrap().lower().unwrap().freeze(),
    )
    .unwrap();
    let second = StaticValidator::validate(
        PipelineDoc::from_yaml(yaml).unwrap().lower().unwrap().freeze(),
    )
    .unwrap();

    assert_eq!(first.fingerprint(), second.fingerprint());
}
