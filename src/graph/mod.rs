// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowc contributors

//! Pipeline graph model
//!
//! Nodes (typed processing stages), channels (directed port-to-port
//! connections), and the builder that accumulates both into a candidate
//! graph for validation.

mod binding;
mod builder;
mod node;

pub use binding::{Channel, ChannelId, ChannelKind, Endpoint};
pub use builder::{CandidateGraph, GraphBuilder};
pub use node::{NodeId, NodeKind, NodeSpec, Port, PortDirection};
