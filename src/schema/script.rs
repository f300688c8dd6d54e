//! Script-level arguments for the SFT and DPO entry points

use once_cell::sync::Lazy;

use crate::domain::{FieldKind, FieldSpec, GroupSpec};

fn config_field() -> FieldSpec {
    FieldSpec::optional("config", FieldKind::Str, "Path to the optional config file").internal()
}

fn use_reentrant_field() -> FieldSpec {
    FieldSpec::new(
        "gradient_checkpointing_use_reentrant",
        FieldKind::Bool,
        false,
        "Whether to apply `use_reentrant` for gradient_checkpointing",
    )
}

pub static SFT_SCRIPT_ARGUMENTS: Lazy<GroupSpec> = Lazy::new(|| {
    GroupSpec::new(
        "SftScriptArguments",
        vec![
            FieldSpec::new(
                "dataset_name",
                FieldKind::Str,
                "timdettmers/openassistant-guanaco",
                "the dataset name",
            ),
            FieldSpec::new(
                "dataset_text_field",
                FieldKind::Str,
                "text",
                "the text field of the dataset",
            ),
            FieldSpec::new(
                "max_seq_length",
                FieldKind::Int,
                512,
                "The maximum sequence length for SFT Trainer",
            ),
            FieldSpec::new(
                "packing",
                FieldKind::Bool,
                false,
                "Whether to apply data packing or not during training",
            ),
            config_field(),
            use_reentrant_field(),
        ],
    )
});

pub static DPO_SCRIPT_ARGUMENTS: Lazy<GroupSpec> = Lazy::new(|| {
    GroupSpec::new(
        "DpoScriptArguments",
        vec![
            FieldSpec::optional("dataset_name", FieldKind::Str, "the dataset name"),
            FieldSpec::new("beta", FieldKind::Float, 0.1, "the beta parameter for DPO loss"),
            FieldSpec::new("max_length", FieldKind::Int, 512, "max length of each sample"),
            FieldSpec::new(
                "max_prompt_length",
                FieldKind::Int,
                128,
                "max length of each sample's prompt",
            ),
            FieldSpec::new(
                "max_target_length",
                FieldKind::Int,
                128,
                "Only used for encoder decoder model. Max target of each sample's prompt",
            ),
            FieldSpec::new("sanity_check", FieldKind::Bool, true, "only train on 1000 samples"),
            FieldSpec::new(
                "ignore_bias_buffers",
                FieldKind::Bool,
                false,
                "debug argument for distributed training; fix for DDP issues with LM bias/mask buffers",
            ),
            FieldSpec::new(
                "generate_during_eval",
                FieldKind::Bool,
                false,
                "Generate during evaluation",
            ),
            config_field(),
            use_reentrant_field(),
        ],
    )
});
