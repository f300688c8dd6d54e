//! Model loading, PEFT and quantization options

use once_cell::sync::Lazy;

use crate::domain::{FieldKind, FieldSpec, GroupSpec};

pub const TORCH_DTYPES: &[&str] = &["auto", "bfloat16", "float16", "float32"];

pub const BNB_4BIT_QUANT_TYPES: &[&str] = &["fp4", "nf4"];

pub static MODEL_CONFIG: Lazy<GroupSpec> = Lazy::new(|| {
    use FieldKind::*;

    GroupSpec::new(
        "ModelConfig",
        vec![
            FieldSpec::optional(
                "model_name_or_path",
                Str,
                "The model checkpoint for weights initialization",
            )
            .required(),
            FieldSpec::new(
                "model_revision",
                Str,
                "main",
                "The specific model version to use (can be a branch name, tag name or commit id)",
            ),
            FieldSpec::optional(
                "torch_dtype",
                Choice(TORCH_DTYPES),
                "Override the default `torch.dtype` and load the model under this dtype",
            ),
            FieldSpec::new(
                "trust_remote_code",
                Bool,
                false,
                "Trust remote code when loading a model",
            ),
            FieldSpec::optional(
                "attn_implementation",
                Str,
                "Which attention implementation to use",
            ),
            FieldSpec::new("use_peft", Bool, false, "Whether to use PEFT or not for training"),
            FieldSpec::new("lora_r", Int, 16, "LoRA R value"),
            FieldSpec::new("lora_alpha", Int, 32, "LoRA alpha"),
            FieldSpec::new("lora_dropout", Float, 0.05, "LoRA dropout"),
            FieldSpec::optional("lora_target_modules", StrList, "LoRA target modules"),
            FieldSpec::optional(
                "lora_modules_to_save",
                StrList,
                "Model layers to unfreeze & train",
            ),
            FieldSpec::new(
                "load_in_8bit",
                Bool,
                false,
                "use 8 bit precision for the base model - works only with LoRA",
            ),
            FieldSpec::new(
                "load_in_4bit",
                Bool,
                false,
                "use 4 bit precision for the base model - works only with LoRA",
            ),
            FieldSpec::new(
                "bnb_4bit_quant_type",
                Choice(BNB_4BIT_QUANT_TYPES),
                "nf4",
                "precise the quantization type (fp4 or nf4)",
            ),
            FieldSpec::new("use_bnb_nested_quant", Bool, false, "use nested quantization"),
        ],
    )
});
