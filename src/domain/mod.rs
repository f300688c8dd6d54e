//! Core types shared by the parser, the config resolver and the launcher

pub mod coerce;
mod field;
mod value;

pub use field::{FieldKind, FieldSpec, GroupSpec};
pub use value::Value;

use serde::Serialize;
use std::fmt;

/// Training method selected by the subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainingMode {
    Sft,
    Dpo,
}

impl TrainingMode {
    pub fn name(&self) -> &'static str {
        match self {
            TrainingMode::Sft => "sft",
            TrainingMode::Dpo => "dpo",
        }
    }

    /// Argument groups in the order the training script declares them.
    pub fn groups(&self) -> &'static [&'static GroupSpec] {
        crate::schema::groups_for(*self)
    }

    /// Find the group and field owning `key`.
    pub fn lookup(&self, key: &str) -> Option<(&'static GroupSpec, &'static FieldSpec)> {
        self.groups().iter().find_map(|group| {
            let group: &'static GroupSpec = *group;
            group.field(key).map(|field| (group, field))
        })
    }
}

impl fmt::Display for TrainingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Option names treat `-` and `_` alike; the canonical form uses underscores.
pub fn normalize_key(key: &str) -> String {
    key.trim().replace('-', "_")
}
