// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowc contributors

//! Channel data types and their compatibility rules
//!
//! Every port carries a registered type. Compatibility is structural and
//! strict: no implicit widening, no subtyping.

mod registry;

pub use registry::{Primitive, RecordField, TypeDef, TypeId, TypeRegistry, TypeShape};
