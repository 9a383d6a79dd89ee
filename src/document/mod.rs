// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! File-backed design documents
//!
//! A [`DesignDocument`] is a small component tree with user parameters and
//! parametric box and cylinder bodies, loaded from JSON or TOML. It
//! implements every host capability, so the export engine can run against
//! it without a CAD application.

mod expression;
mod host;
mod model;
mod tessellate;

pub use expression::evaluate;
pub use model::{Body, BodyRef, Component, DesignDocument, OccurrenceSpec, Shape, UserParameter};
pub use tessellate::{segments, Solid};
