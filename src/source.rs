use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::mpsc;
use std::thread;

use crate::parser::LoadError;
use crate::view::LoadTicket;

#[derive(Debug)]
pub struct LoadEvent {
    pub ticket: LoadTicket,
    pub path: PathBuf,
    pub result: Result<String, LoadError>,
}

/// Completions delivered to the event loop.
#[derive(Debug)]
pub enum SourceEvent {
    Loaded(LoadEvent),
    /// `None` when the user dismissed the picker.
    Picked(Option<PathBuf>),
    PickerUnavailable(String),
}

pub fn read_document(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|e| LoadError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Read `path` on a background thread and deliver the text on `tx`.
pub fn spawn_load(path: PathBuf, ticket: LoadTicket, tx: mpsc::Sender<SourceEvent>) {
    thread::spawn(move || {
        let result = read_document(&path);
        // Receiver gone means the app is shutting down
        let _ = tx.send(SourceEvent::Loaded(LoadEvent {
            ticket,
            path,
            result,
        }));
    });
}

/// Run the desktop file picker without blocking the caller.
pub fn spawn_pick(tx: mpsc::Sender<SourceEvent>) {
    thread::spawn(move || {
        let event = match pick_file() {
            Ok(picked) => SourceEvent::Picked(picked),
            Err(e) => SourceEvent::PickerUnavailable(e),
        };
        let _ = tx.send(event);
    });
}

pub fn resolve_path(input: &str) -> Result<PathBuf, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("No file given".to_string());
    }
    let path = Path::new(trimmed).to_path_buf();
    if path.is_relative() {
        Ok(std::env::current_dir()
            .map_err(|e| format!("Cannot get cwd: {}", e))?
            .join(path))
    } else {
        Ok(path)
    }
}

/// Ask the desktop for a file via zenity.
///
/// `Ok(None)` means the user cancelled; `Err` means no picker is available
/// and the caller should prompt for a path instead.
pub fn pick_file() -> Result<Option<PathBuf>, String> {
    let output = Command::new("zenity")
        .args([
            "--file-selection",
            "--title=Open problem",
            "--file-filter=Problem documents | *.xml",
            "--file-filter=All files | *",
        ])
        .output()
        .map_err(|e| format!("zenity unavailable: {}", e))?;

    if output.status.success() {
        let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !path.is_empty() {
            return Ok(Some(PathBuf::from(path)));
        }
    }
    Ok(None)
}
