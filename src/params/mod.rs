// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Parameter table parsing and combination expansion

mod combination;
mod table;

pub use combination::{Combination, CombinationSet, ParameterAssignment};
pub use table::{CombinationMap, ParameterTable, TargetParameters};

use crate::error::Result;
use std::path::Path;
use tracing::info;

/// Read a parameter table and expand it into per-target combination sets
pub fn load_combinations(path: impl AsRef<Path>) -> Result<CombinationMap> {
    let table = ParameterTable::from_path(path.as_ref())?;
    let combinations = table.combinations();

    info!(
        path = %path.as_ref().display(),
        targets = combinations.len(),
        combinations = combinations.total_combinations(),
        "parameter combinations loaded"
    );

    Ok(combinations)
}
