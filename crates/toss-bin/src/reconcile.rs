//! Cross-check of bin contents against the ledger
//!
//! Toss and restore are not transactional, so the bin and the ledger can
//! drift apart after a failure. [`HoldingArea::reconcile`] finds the drift
//! and reports it. It never moves, deletes or records anything.

use crate::error::{BinError, Result};
use crate::holding::HoldingArea;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use toss_domain::{Entry, Ledger};

/// Drift between the files directory and the ledger
#[derive(Debug, Clone, Default)]
pub struct ReconcileReport {
    /// Objects in the bin that no entry accounts for
    pub orphans: Vec<PathBuf>,

    /// Entries whose object is no longer in the bin
    pub stale: Vec<Entry>,

    /// Entries whose object was found
    pub tracked: usize,
}

impl ReconcileReport {
    /// True when bin and ledger agree
    pub fn is_consistent(&self) -> bool {
        self.orphans.is_empty() && self.stale.is_empty()
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Bin Reconciliation Summary".to_string(),
            "==========================".to_string(),
            format!("Tracked objects: {}", self.tracked),
            format!("Untracked objects (orphans): {}", self.orphans.len()),
            format!("Records without objects (stale): {}", self.stale.len()),
        ];

        for orphan in &self.orphans {
            lines.push(format!("  orphan: {}", orphan.display()));
        }
        for entry in &self.stale {
            lines.push(format!(
                "  stale:  {} ({})",
                entry.id,
                entry.original_path.display()
            ));
        }

        lines.join("\n")
    }
}

impl<L> HoldingArea<L>
where
    L: Ledger,
    L::Error: std::error::Error + Send + Sync + 'static,
{
    /// Compare the files directory with the ledger. Read-only.
    pub fn reconcile(&self) -> Result<ReconcileReport> {
        let entries = self.list()?;
        let files_dir = &self.paths().files_dir;

        let mut on_disk = HashSet::new();
        match fs::read_dir(files_dir) {
            Ok(read_dir) => {
                for dir_entry in read_dir {
                    let dir_entry = dir_entry.map_err(|e| BinError::io(files_dir, e))?;
                    on_disk.insert(dir_entry.file_name());
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(BinError::io(files_dir, e)),
        }

        let mut report = ReconcileReport::default();
        let mut recorded = HashSet::new();

        for entry in entries {
            let name = std::ffi::OsString::from(&entry.bin_name);
            if on_disk.contains(&name) {
                report.tracked += 1;
                recorded.insert(name);
            } else {
                report.stale.push(entry);
            }
        }

        let mut orphans: Vec<PathBuf> = on_disk
            .difference(&recorded)
            .map(|name| files_dir.join(name))
            .collect();
        orphans.sort();
        report.orphans = orphans;

        if !report.is_consistent() {
            tracing::warn!(
                orphans = report.orphans.len(),
                stale = report.stale.len(),
                "bin and ledger disagree"
            );
        }
        Ok(report)
    }
}
