use chrono::{DateTime, Utc};
use colored::Colorize;
use timeago::Formatter;
use todoz::api::{CmdMessage, MessageLevel};
use todoz::due::format_local;
use todoz::model::Entry;
use todoz::short_id::DisplayEntry;

const TITLE_WIDTH: usize = 40;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
        }
    }
}

pub(super) fn print_entries(entries: &[DisplayEntry], time_format: &str) {
    if entries.is_empty() {
        println!("No entries found.");
        return;
    }

    let id_width = entries
        .iter()
        .map(|d| d.short_id.len())
        .max()
        .unwrap_or(1);
    let now = Utc::now();

    for d in entries {
        let title = truncate(&d.entry.title, TITLE_WIDTH);
        let due = format_due(d.entry.due, time_format, now);
        let due = if d.entry.is_due_before(now) && !d.entry.is_resolved() {
            due.red()
        } else {
            due.dimmed()
        };
        println!(
            "  {:<id_width$}  {:<title_width$}  {}",
            d.short_id.yellow(),
            title,
            due,
            id_width = id_width,
            title_width = TITLE_WIDTH
        );
    }
}

pub(super) fn print_full_entry(d: &DisplayEntry, time_format: &str) {
    let entry = &d.entry;
    let now = Utc::now();
    println!("{} {}", d.short_id.yellow(), entry.title.bold());
    println!("--------------------------------");
    println!("{:<10}{}", "id:", entry.id);
    println!("{:<10}{}", "due:", format_due(entry.due, time_format, now));
    println!("{:<10}{}", "notify:", notification_state(entry, time_format));
    if let Some(resolved_at) = entry.resolved_at {
        println!("{:<10}{}", "resolved:", format_local(resolved_at, time_format));
    }
    if !entry.details.is_empty() {
        println!();
        println!("{}", entry.details);
    }
}

fn notification_state(entry: &Entry, time_format: &str) -> String {
    match entry.notification.notified_at {
        Some(at) => format!("{} (sent {})", entry.notification.kind, format_local(at, time_format)),
        None => entry.notification.kind.to_string(),
    }
}

/// Absolute local time followed by a relative one, e.g. `2024-03-01 09:30 (in 2 hours)`.
fn format_due(due: Option<DateTime<Utc>>, time_format: &str, now: DateTime<Utc>) -> String {
    let Some(due) = due else {
        return "-".to_string();
    };
    let mut formatter = Formatter::new();
    let relative = if due >= now {
        formatter.ago("");
        let span = formatter.convert((due - now).to_std().unwrap_or_default());
        format!("in {}", span.trim())
    } else {
        formatter.convert((now - due).to_std().unwrap_or_default())
    };
    format!("{} ({})", format_local(due, time_format), relative)
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let mut result: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    result.push('…');
    result
}
