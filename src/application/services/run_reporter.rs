use crate::application::dtos::run_summary::RunSummary;
use crate::domain::entities::outcome::Outcome;
use crate::domain::entities::trash_entry::TrashEntry;

/// Emite una línea por resultado y acumula el recuento final. Puramente
/// observacional: ningún otro componente consume su estado.
#[derive(Debug, Default)]
pub struct RunReporter {
    summary: RunSummary,
}

impl RunReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, entry: &TrashEntry, outcome: &Outcome) {
        self.summary.total += 1;
        let kind = if entry.is_directory() { "DIR " } else { "FILE" };
        match outcome {
            Outcome::Restored => {
                self.summary.restored += 1;
                println!("[OK]   {kind} {}", entry.destination_path);
            }
            Outcome::AlreadyPresent => {
                self.summary.already_present += 1;
                println!(
                    "[WARN] {kind} {} already present, left untouched",
                    entry.destination_path
                );
            }
            Outcome::Failed(status) => {
                self.summary.failed += 1;
                match status {
                    Some(status) => println!(
                        "[FAIL] {kind} {} (last HTTP {status})",
                        entry.destination_path
                    ),
                    None => println!("[FAIL] {kind} {}", entry.destination_path),
                }
            }
        }
    }

    pub fn finish(self) -> RunSummary {
        self.summary
    }
}
