mod report;
mod summary;

pub use report::write_session_report;
pub use summary::render_summary;
