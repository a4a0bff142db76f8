//! Command implementations for the CLI tool.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use modpak::{PakBuilder, PakOptions, PakReader, PathCase, VirtualFile};

use crate::OutputFormat;
use crate::exit_codes::{ExitCode, error_to_exit_code};
use crate::output::create_formatter;

/// Configuration for the pack command.
pub struct PackConfig<'a> {
    pub source_dir: &'a Path,
    pub archive_path: &'a Path,
    pub case_insensitive: bool,
    pub format: OutputFormat,
    pub quiet: bool,
}

/// Collects regular files under `root` as (archive path, content) pairs.
///
/// Entries are visited in file-name order so the same tree always packs to
/// the same bytes. Archive paths use `/` separators.
pub fn collect_files(root: &Path) -> Result<Vec<(String, Vec<u8>)>, String> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| e.to_string())?;
        if !entry.file_type().is_file() {
            if entry.file_type().is_symlink() {
                log::warn!("Skipping symlink: {}", entry.path().display());
            }
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| e.to_string())?;
        let mut segments = Vec::new();
        for component in relative.components() {
            let segment = component.as_os_str().to_str().ok_or_else(|| {
                format!("non UTF-8 file name: {}", entry.path().display())
            })?;
            segments.push(segment);
        }

        let data = std::fs::read(entry.path())
            .map_err(|e| format!("{}: {}", entry.path().display(), e))?;
        log::debug!("adding {} ({} bytes)", relative.display(), data.len());
        files.push((segments.join("/"), data));
    }

    Ok(files)
}

/// Pack command implementation
pub fn pack(config: &PackConfig<'_>) -> ExitCode {
    let formatter = create_formatter(config.format);

    if !config.source_dir.is_dir() {
        eprintln!("Error: {} is not a directory", config.source_dir.display());
        return ExitCode::BadArgs;
    }

    let collected = match collect_files(config.source_dir) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::IoError;
        }
    };

    let files: Vec<VirtualFile<'_>> = collected
        .iter()
        .map(|(path, data)| VirtualFile::new(path.as_str(), data.as_slice()))
        .collect();

    let path_case = if config.case_insensitive {
        PathCase::Insensitive
    } else {
        PathCase::Sensitive
    };
    let archive = match PakBuilder::new()
        .options(PakOptions::new().path_case(path_case))
        .build(&files)
    {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {}", e);
            return error_to_exit_code(&e);
        }
    };

    if let Err(e) = std::fs::write(config.archive_path, archive.as_bytes()) {
        eprintln!("Error writing {}: {}", config.archive_path.display(), e);
        return ExitCode::IoError;
    }

    if !config.quiet {
        print!("{}", formatter.format_pack(config.archive_path, &archive));
    }
    ExitCode::Success
}

/// Reads an archive file, mapping failures to an exit code.
fn read_archive(path: &Path) -> Result<Vec<u8>, ExitCode> {
    std::fs::read(path).map_err(|e| {
        eprintln!("Error reading {}: {}", path.display(), e);
        ExitCode::IoError
    })
}

/// List command implementation
pub fn list(archive_path: &Path, format: OutputFormat) -> ExitCode {
    let formatter = create_formatter(format);

    let bytes = match read_archive(archive_path) {
        Ok(b) => b,
        Err(code) => return code,
    };
    let reader = match PakReader::parse(&bytes) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return error_to_exit_code(&e);
        }
    };

    print!("{}", formatter.format_list(reader.entries()));
    ExitCode::Success
}

/// Verify command implementation
pub fn verify(archive_path: &Path, format: OutputFormat, quiet: bool) -> ExitCode {
    let formatter = create_formatter(format);

    let bytes = match read_archive(archive_path) {
        Ok(b) => b,
        Err(code) => return code,
    };
    let result = PakReader::parse(&bytes).and_then(|reader| {
        reader.verify()?;
        Ok(reader.len())
    });

    match result {
        Ok(count) => {
            if !quiet {
                print!("{}", formatter.format_verify(archive_path, count));
            }
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            error_to_exit_code(&e)
        }
    }
}

/// Returns the filesystem destination for an archive entry under `output_dir`.
///
/// Entry paths are already normalized and traversal-free, so joining their
/// segments cannot leave `output_dir`.
pub fn destination(output_dir: &Path, path: &modpak::PakPath) -> PathBuf {
    let mut dest = output_dir.to_path_buf();
    dest.extend(path.components());
    dest
}

/// Extract command implementation
pub fn extract(archive_path: &Path, output_dir: &Path, format: OutputFormat, quiet: bool) -> ExitCode {
    let formatter = create_formatter(format);

    let bytes = match read_archive(archive_path) {
        Ok(b) => b,
        Err(code) => return code,
    };
    let reader = match PakReader::parse(&bytes) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return error_to_exit_code(&e);
        }
    };

    let mut total_bytes = 0u64;
    for (i, entry) in reader.entries().iter().enumerate() {
        let data = match reader.read_index(i) {
            Ok(d) => d,
            Err(e) => {
                eprintln!("Error: {}", e);
                return error_to_exit_code(&e);
            }
        };

        let dest = destination(output_dir, &entry.path);
        if let Some(parent) = dest.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Error creating {}: {}", parent.display(), e);
                return ExitCode::IoError;
            }
        }
        if let Err(e) = std::fs::write(&dest, data) {
            eprintln!("Error writing {}: {}", dest.display(), e);
            return ExitCode::IoError;
        }
        total_bytes += data.len() as u64;
    }

    if !quiet {
        print!(
            "{}",
            formatter.format_extract(output_dir, reader.len(), total_bytes)
        );
    }
    ExitCode::Success
}
