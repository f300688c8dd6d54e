//! Shell quoting for displayed commands

use std::borrow::Cow;

fn is_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || "-_./=:,+@%".contains(c)
}

/// Quote `arg` for a POSIX shell, leaving plain words untouched.
pub fn quote_arg(arg: &str) -> Cow<'_, str> {
    if !arg.is_empty() && arg.chars().all(is_safe) {
        return Cow::Borrowed(arg);
    }
    Cow::Owned(format!("'{}'", arg.replace('\'', r"'\''")))
}

pub fn join_command<S: AsRef<str>>(parts: &[S]) -> String {
    parts.iter().map(|p| quote_arg(p.as_ref())).collect::<Vec<_>>().join(" ")
}
