// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Host command lifecycle
//!
//! [`ExportCommand`] is the "Export With Parameters" command a CAD host
//! shows in its UI. The host owns registration, dialogs and input widgets;
//! they are reached through [`CommandRegistry`] and [`Prompter`].

use crate::config::RunConfig;
use crate::error::{HostError, Result};
use crate::export::MeshRefinement;
use crate::host::DesignHost;
use crate::report::RunReport;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const COMMAND_ID: &str = "paramexport.ExportWithParameters";
pub const COMMAND_NAME: &str = "Export With Parameters";
pub const COMMAND_DESCRIPTION: &str =
    "Export every visible body as a mesh, once per parameter combination";

/// Placeholder label shown before a path is chosen
const UNSET_LABEL: &str = "Select...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl CommandDefinition {
    pub fn export_with_parameters() -> Self {
        Self {
            id: COMMAND_ID.to_string(),
            name: COMMAND_NAME.to_string(),
            description: COMMAND_DESCRIPTION.to_string(),
        }
    }
}

/// The host's table of command definitions
pub trait CommandRegistry {
    fn contains(&self, id: &str) -> bool;

    fn add(&mut self, definition: CommandDefinition) -> std::result::Result<(), HostError>;

    /// Returns false when nothing was registered under `id`
    fn remove(&mut self, id: &str) -> bool;
}

/// Host file and folder dialogs; `None` means the user cancelled
pub trait Prompter {
    fn pick_file(&mut self, title: &str, filter: &str) -> Option<PathBuf>;

    fn pick_folder(&mut self, title: &str) -> Option<PathBuf>;
}

/// Events the command subscribes to while its dialog is open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handler {
    Execute,
    InputChanged,
    Validate,
    Destroy,
}

/// A change in the command dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    SelectTable,
    SelectOutputDir,
    /// Index into the refinement drop-down
    RefinementSelected(usize),
}

/// Command state between dialog creation and destruction
#[derive(Debug, Default)]
pub struct ExportCommand {
    config: RunConfig,
    handlers: Vec<Handler>,
}

impl ExportCommand {
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            handlers: Vec::new(),
        }
    }

    /// Add the command definition unless the host already has one
    pub fn register(registry: &mut impl CommandRegistry) -> std::result::Result<(), HostError> {
        if registry.contains(COMMAND_ID) {
            debug!(id = COMMAND_ID, "command already registered");
            return Ok(());
        }
        registry.add(CommandDefinition::export_with_parameters())?;
        info!(id = COMMAND_ID, "command registered");
        Ok(())
    }

    pub fn unregister(registry: &mut impl CommandRegistry) {
        if registry.remove(COMMAND_ID) {
            info!(id = COMMAND_ID, "command unregistered");
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn handlers(&self) -> &[Handler] {
        &self.handlers
    }

    /// Dialog created: subscribe to its events
    pub fn on_created(&mut self) {
        self.handlers = vec![
            Handler::Execute,
            Handler::InputChanged,
            Handler::Validate,
            Handler::Destroy,
        ];
    }

    pub fn on_destroy(&mut self) {
        self.handlers.clear();
    }

    pub fn on_input_changed(&mut self, event: InputEvent, prompter: &mut impl Prompter) {
        match event {
            InputEvent::SelectTable => {
                if let Some(path) = prompter.pick_file("Select parameter table", "*.csv") {
                    debug!(path = %path.display(), "parameter table selected");
                    self.config.table = Some(path);
                }
            }
            InputEvent::SelectOutputDir => {
                if let Some(path) = prompter.pick_folder("Select output folder") {
                    debug!(path = %path.display(), "output folder selected");
                    self.config.output_dir = Some(path);
                }
            }
            InputEvent::RefinementSelected(index) => match MeshRefinement::from_index(index) {
                Some(refinement) => self.config.refinement = refinement,
                None => warn!(index, "unknown refinement option ignored"),
            },
        }
    }

    /// OK is enabled once both paths are chosen
    pub fn on_validate(&self) -> bool {
        self.config.is_complete()
    }

    pub fn on_execute<H: DesignHost>(&self, host: &mut H) -> Result<RunReport> {
        crate::run(host, &self.config)
    }

    pub fn table_label(&self) -> String {
        label(self.config.table.as_deref())
    }

    pub fn output_label(&self) -> String {
        label(self.config.output_dir.as_deref())
    }
}

fn label(path: Option<&Path>) -> String {
    path.and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| UNSET_LABEL.to_string())
}
