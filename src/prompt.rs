//! Per-turn prompt composition.
//!
//! The agent runtime receives one flat text prompt per run; conversation
//! memory is replayed inline as labeled lines. Composition is a pure
//! function over a history snapshot so it can be tested byte-for-byte.

use crate::history::Turn;

/// Render a history snapshot plus the new user line into one prompt.
///
/// Each stored turn becomes `"<Role>: <content>"`, joined by newlines. The
/// new user line follows in the same format after one newline. An empty
/// history yields exactly the new user text with no leading separator.
pub fn compose(history: &[Turn], user_input: &str) -> String {
    let context = history
        .iter()
        .map(|turn| format!("{}: {}", turn.role.label(), turn.content))
        .collect::<Vec<_>>()
        .join("\n");

    if context.is_empty() {
        user_input.to_string()
    } else {
        format!("{context}\nUser: {user_input}")
    }
}
