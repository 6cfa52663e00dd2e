//! Copy report model and mutable report builder.

use std::collections::BTreeMap;
use std::fmt;

/// Counters and warnings for one [`crate::copy_dir_with`] run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReportCopy {
    /// Entries visited below the source root.
    pub cnt_scanned: u64,
    /// Regular files copied.
    pub cnt_copied: u64,
    /// Directories created or reused at destination.
    pub cnt_dirs: u64,
    /// Symlinks recreated at destination.
    pub cnt_linked: u64,
    /// Entries skipped by pattern, conflict rule or symlink rule.
    pub cnt_skipped: u64,
    /// Non-fatal notes, e.g. special files that were not copied.
    pub warnings: Vec<String>,
}

impl ReportCopy {
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_scanned".to_string(), self.cnt_scanned);
        dict_counts.insert("cnt_copied".to_string(), self.cnt_copied);
        dict_counts.insert("cnt_dirs".to_string(), self.cnt_dirs);
        dict_counts.insert("cnt_linked".to_string(), self.cnt_linked);
        dict_counts.insert("cnt_skipped".to_string(), self.cnt_skipped);
        dict_counts.insert("cnt_warnings".to_string(), self.warning_count() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} scanned={} copied={} dirs={} linked={} skipped={} warnings={}",
            self.cnt_scanned,
            self.cnt_copied,
            self.cnt_dirs,
            self.cnt_linked,
            self.cnt_skipped,
            self.warning_count()
        )
    }
}

impl fmt::Display for ReportCopy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[COPY]"))
    }
}

/// Mutable accumulator for copy statistics.
#[derive(Debug, Default, Clone)]
pub(crate) struct ReportCopyBuilder {
    report: ReportCopy,
}

impl ReportCopyBuilder {
    pub(crate) fn add_scanned(&mut self) {
        self.report.cnt_scanned += 1;
    }

    pub(crate) fn add_copied(&mut self) {
        self.report.cnt_copied += 1;
    }

    pub(crate) fn add_dir(&mut self) {
        self.report.cnt_dirs += 1;
    }

    pub(crate) fn add_linked(&mut self) {
        self.report.cnt_linked += 1;
    }

    pub(crate) fn add_skipped(&mut self) {
        self.report.cnt_skipped += 1;
    }

    pub(crate) fn add_warning(&mut self, warning: String) {
        tracing::warn!("{warning}");
        self.report.warnings.push(warning);
    }

    /// Finalize builder into immutable report.
    pub(crate) fn build(self) -> ReportCopy {
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::{ReportCopy, ReportCopyBuilder};

    #[test]
    fn report_to_dict_and_format_agree() {
        let report = ReportCopy {
            cnt_scanned: 8,
            cnt_copied: 3,
            cnt_dirs: 2,
            cnt_linked: 1,
            cnt_skipped: 2,
            warnings: vec!["w".to_string()],
        };

        let dict_counts = report.to_dict();
        assert_eq!(dict_counts["cnt_scanned"], 8);
        assert_eq!(dict_counts["cnt_copied"], 3);
        assert_eq!(dict_counts["cnt_linked"], 1);
        assert_eq!(dict_counts["cnt_warnings"], 1);

        let txt = report.format("[COPY]");
        assert_eq!(
            txt,
            "[COPY] scanned=8 copied=3 dirs=2 linked=1 skipped=2 warnings=1"
        );
        assert_eq!(report.to_string(), txt);
    }

    #[test]
    fn builder_accumulates() {
        let mut builder = ReportCopyBuilder::default();
        builder.add_scanned();
        builder.add_scanned();
        builder.add_copied();
        builder.add_skipped();
        builder.add_warning("special".to_string());
        let report = builder.build();
        assert_eq!(report.cnt_scanned, 2);
        assert_eq!(report.cnt_copied, 1);
        assert_eq!(report.cnt_skipped, 1);
        assert_eq!(report.warning_count(), 1);
    }
}
