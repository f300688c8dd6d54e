//! Trainer arguments shared by both modes

use once_cell::sync::Lazy;

use crate::domain::{FieldKind, FieldSpec, GroupSpec, Value};

pub const SCHEDULER_TYPES: &[&str] = &[
    "linear",
    "cosine",
    "cosine_with_restarts",
    "polynomial",
    "constant",
    "constant_with_warmup",
    "inverse_sqrt",
    "reduce_lr_on_plateau",
];

pub const INTERVAL_STRATEGIES: &[&str] = &["no", "steps", "epoch"];

pub const LOG_LEVELS: &[&str] = &["debug", "info", "warning", "error", "critical", "passive"];

pub static TRAINING_ARGUMENTS: Lazy<GroupSpec> = Lazy::new(|| {
    use FieldKind::*;

    GroupSpec::new(
        "TrainingArguments",
        vec![
            FieldSpec::optional(
                "output_dir",
                Str,
                "The output directory where the model predictions and checkpoints will be written",
            )
            .required(),
            FieldSpec::new(
                "overwrite_output_dir",
                Bool,
                false,
                "Overwrite the content of the output directory",
            ),
            FieldSpec::new("do_train", Bool, false, "Whether to run training"),
            FieldSpec::new("do_eval", Bool, false, "Whether to run eval on the dev set"),
            FieldSpec::new(
                "evaluation_strategy",
                Choice(INTERVAL_STRATEGIES),
                "no",
                "The evaluation strategy to use",
            ),
            FieldSpec::optional("eval_steps", Float, "Run an evaluation every X steps"),
            FieldSpec::new(
                "per_device_train_batch_size",
                Int,
                8,
                "Batch size per device for training",
            ),
            FieldSpec::new(
                "per_device_eval_batch_size",
                Int,
                8,
                "Batch size per device for evaluation",
            ),
            FieldSpec::new(
                "gradient_accumulation_steps",
                Int,
                1,
                "Number of update steps to accumulate before performing a backward/update pass",
            ),
            FieldSpec::new("learning_rate", Float, 5e-5, "The initial learning rate for AdamW"),
            FieldSpec::new("weight_decay", Float, 0.0, "Weight decay for AdamW if we apply some"),
            FieldSpec::new("adam_beta1", Float, 0.9, "Beta1 for AdamW optimizer"),
            FieldSpec::new("adam_beta2", Float, 0.999, "Beta2 for AdamW optimizer"),
            FieldSpec::new("adam_epsilon", Float, 1e-8, "Epsilon for AdamW optimizer"),
            FieldSpec::new("max_grad_norm", Float, 1.0, "Max gradient norm"),
            FieldSpec::new(
                "num_train_epochs",
                Float,
                3.0,
                "Total number of training epochs to perform",
            ),
            FieldSpec::new(
                "max_steps",
                Int,
                -1,
                "If > 0: set total number of training steps to perform",
            ),
            FieldSpec::new(
                "lr_scheduler_type",
                Choice(SCHEDULER_TYPES),
                "linear",
                "The scheduler type to use",
            ),
            FieldSpec::new(
                "warmup_ratio",
                Float,
                0.0,
                "Linear warmup over warmup_ratio fraction of total steps",
            ),
            FieldSpec::new("warmup_steps", Int, 0, "Linear warmup over warmup_steps"),
            FieldSpec::new(
                "log_level",
                Choice(LOG_LEVELS),
                "passive",
                "Logger log level to use on the main node",
            ),
            FieldSpec::optional("logging_dir", Str, "Tensorboard log dir"),
            FieldSpec::new(
                "logging_strategy",
                Choice(INTERVAL_STRATEGIES),
                "steps",
                "The logging strategy to use",
            ),
            FieldSpec::new("logging_steps", Float, 500.0, "Log every X updates steps"),
            FieldSpec::new(
                "save_strategy",
                Choice(INTERVAL_STRATEGIES),
                "steps",
                "The checkpoint save strategy to use",
            ),
            FieldSpec::new("save_steps", Float, 500.0, "Save checkpoint every X updates steps"),
            FieldSpec::optional(
                "save_total_limit",
                Int,
                "Limit the total amount of checkpoints",
            ),
            FieldSpec::new("seed", Int, 42, "Random seed that will be set at the beginning of training"),
            FieldSpec::new("bf16", Bool, false, "Whether to use bf16 (mixed) precision"),
            FieldSpec::new("fp16", Bool, false, "Whether to use fp16 (mixed) precision"),
            FieldSpec::optional("tf32", Bool, "Whether to enable tf32 mode"),
            FieldSpec::new(
                "dataloader_num_workers",
                Int,
                0,
                "Number of subprocesses to use for data loading",
            ),
            FieldSpec::optional("run_name", Str, "An optional descriptor for the run"),
            FieldSpec::new(
                "remove_unused_columns",
                Bool,
                true,
                "Remove columns not required by the model when using a dataset",
            ),
            FieldSpec::new(
                "report_to",
                StrList,
                Value::List(vec![Value::from("all")]),
                "The list of integrations to report the results and logs to",
            ),
            FieldSpec::new("optim", Str, "adamw_torch", "The optimizer to use"),
            FieldSpec::new(
                "gradient_checkpointing",
                Bool,
                false,
                "Use gradient checkpointing to save memory at the expense of slower backward pass",
            ),
            FieldSpec::optional(
                "gradient_checkpointing_kwargs",
                Map,
                "Keyword arguments passed to the gradient checkpointing function",
            ),
            FieldSpec::optional(
                "resume_from_checkpoint",
                Str,
                "The path to a folder with a valid checkpoint for your model",
            ),
            FieldSpec::new(
                "push_to_hub",
                Bool,
                false,
                "Whether or not to upload the trained model to the model hub after training",
            ),
            FieldSpec::optional(
                "hub_model_id",
                Str,
                "The name of the repository to keep in sync with the local output_dir",
            ),
        ],
    )
});
