//! Terminal implementations of the view and notifier collaborators.

use gradebook_core::{
    format_fixed, Notice, NoticeKind, NoticeTiming, NotificationSlot, Notifier, StudentRecord,
    ViewRenderer,
};
use std::time::Instant;

const SCORE_DECIMALS: usize = 1;

/// Prints the whole roster as a table on every render.
#[derive(Debug, Default)]
pub struct TableRenderer;

impl ViewRenderer for TableRenderer {
    fn render_all(&mut self, records: &[StudentRecord]) {
        if records.is_empty() {
            println!("(no students registered)");
            return;
        }

        let name_width = records
            .iter()
            .map(|record| record.name.chars().count())
            .max()
            .unwrap_or(0)
            .max("Name".len());

        println!(
            "{:>3}  {:<name_width$}  {:>5}  {:>5}  {:>5}  {:>7}  {:<6}  Action",
            "#", "Name", "S1", "S2", "S3", "Average", "Status"
        );
        for (position, record) in records.iter().enumerate() {
            let [score1, score2, score3] =
                record.scores().map(|score| format_fixed(score, SCORE_DECIMALS));
            println!(
                "{:>3}  {:<name_width$}  {:>5}  {:>5}  {:>5}  {:>7}  {:<6}  delete {position}",
                position,
                record.name,
                score1,
                score2,
                score3,
                record.average,
                record.status.as_str(),
            );
        }
    }
}

/// How notices reach the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeMode {
    /// Print each notice as soon as it is raised.
    Immediate,
    /// Keep notices in the slot; the shell shows them in its status line.
    StatusLine,
}

/// Notifier backed by a single restartable notification slot.
#[derive(Debug)]
pub struct TerminalNotifier {
    mode: NoticeMode,
    slot: NotificationSlot,
}

impl TerminalNotifier {
    pub fn new(mode: NoticeMode) -> Self {
        Self {
            mode,
            slot: NotificationSlot::new(NoticeTiming::default()),
        }
    }

    /// Returns the status line text while the current notice is on screen.
    pub fn status_line(&mut self, now: Instant) -> Option<String> {
        self.slot.prune(now);
        self.slot.active_notice(now).map(format_notice)
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&mut self, message: &str, kind: NoticeKind) {
        let notice = Notice::new(message, kind);
        if self.mode == NoticeMode::Immediate {
            match kind {
                NoticeKind::Error => eprintln!("{}", format_notice(&notice)),
                NoticeKind::Success | NoticeKind::Info => println!("{}", format_notice(&notice)),
            }
        }
        self.slot.show(notice, Instant::now());
    }
}

fn format_notice(notice: &Notice) -> String {
    format!("[{}] {}", notice.kind.as_str(), notice.message)
}
