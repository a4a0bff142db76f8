//! Output formatting for CLI operations.

use modpak::{Archive, FileTableEntry};
use serde_json::json;
use std::path::Path;

/// Trait for output formatting
pub trait OutputFormatter {
    /// Formats the result of a pack operation
    fn format_pack(&self, archive_path: &Path, archive: &Archive) -> String;

    /// Formats a list of entries
    fn format_list(&self, entries: &[FileTableEntry]) -> String;

    /// Formats verification results
    fn format_verify(&self, archive_path: &Path, entry_count: usize) -> String;

    /// Formats extraction results
    fn format_extract(&self, output_dir: &Path, files: usize, bytes: u64) -> String;
}

/// Human-readable output formatter
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn format_pack(&self, archive_path: &Path, archive: &Archive) -> String {
        format!(
            "Packed {} files ({}) into {} ({})\n",
            archive.entry_count(),
            humanize_bytes(archive.data_len()),
            archive_path.display(),
            humanize_bytes(archive.len() as u64)
        )
    }

    fn format_list(&self, entries: &[FileTableEntry]) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{:>12} {:>12} {:>10} {}\n",
            "Offset", "Size", "CRC", "Name"
        ));
        output.push_str(&"-".repeat(70));
        output.push('\n');

        let mut total_size: u64 = 0;
        for entry in entries {
            total_size += entry.length;
            output.push_str(&format!(
                "{:>12} {:>12} {:>10} {}\n",
                entry.offset,
                humanize_bytes(entry.length),
                format!("{:08x}", entry.crc32),
                entry.path
            ));
        }

        output.push_str(&"-".repeat(70));
        output.push('\n');
        output.push_str(&format!(
            "{:>12} {:>12} {:>10} {} files\n",
            "",
            humanize_bytes(total_size),
            "",
            entries.len()
        ));

        output
    }

    fn format_verify(&self, archive_path: &Path, entry_count: usize) -> String {
        format!(
            "OK: {} ({} entries verified)\n",
            archive_path.display(),
            entry_count
        )
    }

    fn format_extract(&self, output_dir: &Path, files: usize, bytes: u64) -> String {
        format!(
            "Extracted {} files ({}) to {}\n",
            files,
            humanize_bytes(bytes),
            output_dir.display()
        )
    }
}

/// JSON output formatter
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_pack(&self, archive_path: &Path, archive: &Archive) -> String {
        let obj = json!({
            "archive": archive_path.display().to_string(),
            "entries": archive.entry_count(),
            "data_bytes": archive.data_len(),
            "total_bytes": archive.len(),
        });
        format!("{}\n", obj)
    }

    fn format_list(&self, entries: &[FileTableEntry]) -> String {
        let items: Vec<_> = entries
            .iter()
            .map(|e| {
                json!({
                    "path": e.path.as_str(),
                    "offset": e.offset,
                    "size": e.length,
                    "crc32": format!("{:08x}", e.crc32),
                })
            })
            .collect();
        format!("{}\n", json!({ "entries": items }))
    }

    fn format_verify(&self, archive_path: &Path, entry_count: usize) -> String {
        let obj = json!({
            "archive": archive_path.display().to_string(),
            "ok": true,
            "entries": entry_count,
        });
        format!("{}\n", obj)
    }

    fn format_extract(&self, output_dir: &Path, files: usize, bytes: u64) -> String {
        let obj = json!({
            "output": output_dir.display().to_string(),
            "files": files,
            "bytes": bytes,
        });
        format!("{}\n", obj)
    }
}

/// Creates a formatter for the given output format
pub fn create_formatter(format: super::OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        super::OutputFormat::Human => Box::new(HumanFormatter),
        super::OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Converts bytes to a human-readable string
pub fn humanize_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
