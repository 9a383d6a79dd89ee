// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Output file naming

use crate::params::ParameterAssignment;
use std::path::{Component, Path, PathBuf};

/// File name under construction: `<target>_<body>[_<param>_<value>]*`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputName {
    stem: String,
}

impl OutputName {
    pub fn new(target: &str, body: &str) -> Self {
        Self {
            stem: format!("{}_{}", target, body),
        }
    }

    /// Append an applied assignment
    pub fn push(&mut self, assignment: &ParameterAssignment) {
        self.stem.push('_');
        self.stem.push_str(&assignment.name);
        self.stem.push('_');
        self.stem.push_str(&assignment.value);
    }

    pub fn as_str(&self) -> &str {
        &self.stem
    }

    /// `<dir>/<stem>.<extension>`, lexically normalized
    pub fn path_in(&self, dir: &Path, extension: &str) -> PathBuf {
        normalize_path(&dir.join(format!("{}.{}", self.stem, extension)))
    }
}

/// Resolve `.` and `..` components without touching the filesystem
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(
                    normalized.components().next_back(),
                    Some(Component::Normal(_))
                );
                if can_pop {
                    normalized.pop();
                } else if !matches!(
                    normalized.components().next_back(),
                    Some(Component::RootDir | Component::Prefix(_))
                ) {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }

    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}
