//! Human-readable change summaries for edited rows

use crate::models::Transaction;

/// Describe the fields that differ between two versions of a row
///
/// Returns `None` when nothing changed.
pub fn describe_changes(before: &Transaction, after: &Transaction) -> Option<String> {
    let mut changes = Vec::new();

    if before.date != after.date {
        changes.push(format!("date: {} -> {}", before.date, after.date));
    }
    if before.category != after.category {
        changes.push(format!(
            "category: {} -> {}",
            quote(&before.category),
            quote(&after.category)
        ));
    }
    if before.description != after.description {
        changes.push(format!(
            "description: {} -> {}",
            quote(&before.description),
            quote(&after.description)
        ));
    }
    if before.amount != after.amount {
        changes.push(format!("amount: {} -> {}", before.amount, after.amount));
    }

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn quote(s: &str) -> String {
    if s.chars().count() > 50 {
        let head: String = s.chars().take(47).collect();
        format!("\"{}...\"", head)
    } else {
        format!("\"{}\"", s)
    }
}
