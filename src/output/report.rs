use crate::error::OutputError;
use crate::runner::SessionReport;
use std::fs;
use std::path::Path;

/// Write the whole session report as indented JSON
pub fn write_session_report(path: &Path, report: &SessionReport) -> Result<(), OutputError> {
    // Ensure directory exists
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(OutputError::CreateDir)?;
    }

    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json).map_err(OutputError::WriteReport)?;
    Ok(())
}
