use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read a markup file and return its content
pub fn read_markup(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(IoError::Io)
}

/// Write generated output, creating parent directories as needed
pub fn write_output(path: &Path, contents: &str) -> Result<(), IoError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }

    fs::write(path, contents).map_err(IoError::Io)
}

/// File name for a generated batch, e.g. `"Cape Coast"` -> `cape_coast_requests.json`.
pub fn output_file_name(title: &str, extension: &str) -> String {
    let stem = title.trim().to_lowercase().replace(' ', "_");
    let extension = extension.trim_start_matches('.');
    format!("{stem}_requests.{extension}")
}
