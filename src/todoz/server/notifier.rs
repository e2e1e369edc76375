//! Periodic notification of due entries.
//!
//! Every tick the loop lists the entries that are due and still wait for
//! their notification, and hands each one to a [`Notifier`]. An entry is
//! marked notified only when the notifier reports success; on failure it stays
//! pending and is retried on the next tick.

use super::AppHandle;
use crate::api::TodoApi;
use crate::due::format_local;
use crate::error::Result;
use crate::model::Entry;
use crate::store::EntryStore;
use chrono::{DateTime, Utc};
use std::io;
use std::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

pub trait Notifier {
    fn notify(&self, title: &str, text: &str) -> io::Result<()>;
}

/// Runs `<program> <title> <text>` and treats a non-zero exit as failure.
pub struct CommandNotifier {
    program: String,
}

impl CommandNotifier {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Notifier for CommandNotifier {
    fn notify(&self, title: &str, text: &str) -> io::Result<()> {
        debug!(program = %self.program, title, "calling notification command");
        let output = Command::new(&self.program).arg(title).arg(text).output()?;
        if output.status.success() {
            debug!(stdout = %String::from_utf8_lossy(&output.stdout), "notification command done");
            Ok(())
        } else {
            Err(io::Error::other(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )))
        }
    }
}

/// `title`, formatted due time and details on three lines.
pub fn render_text(entry: &Entry, time_format: &str) -> String {
    let due = entry
        .due
        .map(|due| format_local(due, time_format))
        .unwrap_or_default();
    format!("{}\n{}\n{}", entry.title, due, entry.details)
}

/// Notifies every entry pending before `now`. Returns how many were marked.
pub fn notify_due<S: EntryStore, N: Notifier>(
    api: &TodoApi<S>,
    notifier: &N,
    time_format: &str,
    now: DateTime<Utc>,
) -> Result<usize> {
    let pending = api.list_pending_notification_due_before(now)?;
    let mut marked = 0;

    for listed in pending.listed_entries {
        let entry = listed.entry;
        if let Err(err) = notifier.notify(&entry.title, &render_text(&entry, time_format)) {
            error!(id = %entry.id, title = %entry.title, error = %err, "notification failed");
            continue;
        }
        match api.mark_notified(&entry.id) {
            Ok(_) => marked += 1,
            Err(err) => {
                error!(id = %entry.id, title = %entry.title, error = %err, "could not mark as notified")
            }
        }
    }
    Ok(marked)
}

/// Ticks until `cancel` fires. Picks up reloaded configuration on each tick.
pub async fn run_loop(handle: AppHandle, cancel: CancellationToken) {
    loop {
        let tick = handle.current().config.tick();
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(tick) => {}
        }

        let runtime = handle.current();
        let Some(program) = runtime.config.notification_command.clone() else {
            continue;
        };

        let outcome = tokio::task::spawn_blocking(move || {
            let notifier = CommandNotifier::new(program);
            notify_due(&runtime.api, &notifier, &runtime.config.time_format, Utc::now())
        })
        .await;

        match outcome {
            Ok(Ok(0)) => {}
            Ok(Ok(marked)) => debug!(marked, "entries notified"),
            Ok(Err(err)) => error!(error = %err, "notification scan failed"),
            Err(err) => error!(error = %err, "notification task failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;
    use chrono::Duration;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recording {
        calls: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    impl Notifier for Recording {
        fn notify(&self, title: &str, text: &str) -> io::Result<()> {
            self.calls.lock().push((title.to_string(), text.to_string()));
            if self.fail {
                Err(io::Error::other("boom"))
            } else {
                Ok(())
            }
        }
    }

    fn api_with_due_entry() -> (TodoApi<crate::store::memory::InMemoryStore>, DateTime<Utc>) {
        let now = Utc::now();
        let store = StoreFixture::new()
            .with_due_entry("Due", now - Duration::minutes(1))
            .with_due_entry("Later", now + Duration::hours(1))
            .with_notified_entry("Done", now - Duration::hours(1))
            .store;
        (TodoApi::new(store), now)
    }

    #[test]
    fn notifies_and_marks_pending_entries() {
        let (api, now) = api_with_due_entry();
        let notifier = Recording::default();

        let marked = notify_due(&api, &notifier, "%H:%M", now).unwrap();

        assert_eq!(marked, 1);
        let calls = notifier.calls.lock();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "Due");
        assert!(calls[0].1.starts_with("Due\n"));
        assert!(api
            .list_pending_notification_due_before(now)
            .unwrap()
            .listed_entries
            .is_empty());
    }

    #[test]
    fn failed_notification_stays_pending() {
        let (api, now) = api_with_due_entry();
        let notifier = Recording {
            fail: true,
            ..Recording::default()
        };

        let marked = notify_due(&api, &notifier, "%H:%M", now).unwrap();

        assert_eq!(marked, 0);
        assert_eq!(notifier.calls.lock().len(), 1);
        assert_eq!(
            api.list_pending_notification_due_before(now)
                .unwrap()
                .listed_entries
                .len(),
            1
        );
    }

    #[test]
    fn text_has_title_due_and_details() {
        let mut entry = Entry::new("Call bank".into(), "ask about fees".into(), None);
        let text = render_text(&entry, "%Y");
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Call bank");
        assert_eq!(lines[1].len(), 4);
        assert_eq!(lines[2], "ask about fees");

        entry.due = None;
        assert_eq!(render_text(&entry, "%Y"), "Call bank\n\nask about fees");
    }

    #[test]
    fn broken_time_format_does_not_stop_notifications() {
        let (api, now) = api_with_due_entry();
        let notifier = Recording::default();

        let marked = notify_due(&api, &notifier, "%Q", now).unwrap();

        assert_eq!(marked, 1);
        let calls = notifier.calls.lock();
        assert!(calls[0].1.starts_with("Due\n"));
        assert!(calls[0].1.lines().nth(1).is_some_and(|line| !line.is_empty()));
    }

    #[cfg(unix)]
    #[test]
    fn command_exit_status_decides_success() {
        assert!(CommandNotifier::new("true").notify("t", "x").is_ok());
        assert!(CommandNotifier::new("false").notify("t", "x").is_err());
        assert!(CommandNotifier::new("/nonexistent/todoz-notify")
            .notify("t", "x")
            .is_err());
    }
}
