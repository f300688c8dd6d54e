//! Recognized option set for each training mode
//!
//! Mirrors the argument dataclasses the training scripts parse. Defaults are
//! the ones the training framework applies when an option is left unset.

mod model;
mod script;
mod training;

use once_cell::sync::Lazy;

use crate::domain::{GroupSpec, TrainingMode};

pub use model::MODEL_CONFIG;
pub use script::{DPO_SCRIPT_ARGUMENTS, SFT_SCRIPT_ARGUMENTS};
pub use training::TRAINING_ARGUMENTS;

static SFT_GROUPS: Lazy<Vec<&'static GroupSpec>> =
    Lazy::new(|| vec![&*SFT_SCRIPT_ARGUMENTS, &*TRAINING_ARGUMENTS, &*MODEL_CONFIG]);

static DPO_GROUPS: Lazy<Vec<&'static GroupSpec>> =
    Lazy::new(|| vec![&*DPO_SCRIPT_ARGUMENTS, &*TRAINING_ARGUMENTS, &*MODEL_CONFIG]);

pub fn groups_for(mode: TrainingMode) -> &'static [&'static GroupSpec] {
    match mode {
        TrainingMode::Sft => SFT_GROUPS.as_slice(),
        TrainingMode::Dpo => DPO_GROUPS.as_slice(),
    }
}
