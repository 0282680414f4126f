use std::path::PathBuf;

pub fn default_input_dir() -> PathBuf {
    PathBuf::from("data/raw")
}

pub fn default_output_dir() -> PathBuf {
    PathBuf::from("data/clean")
}

pub fn default_report_file() -> PathBuf {
    PathBuf::from("processing_report.json")
}

pub fn default_state_file() -> PathBuf {
    PathBuf::from("state/session.json")
}

pub fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

pub fn default_preview_rows() -> usize {
    5
}

pub fn default_concurrency() -> usize {
    1
}

pub fn default_api_base() -> String {
    // Gemini's OpenAI-compatible surface
    "https://generativelanguage.googleapis.com/v1beta/openai".to_string()
}

pub fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

pub fn default_api_key_env() -> String {
    "GOOGLE_API_KEY".to_string()
}

pub fn default_request_timeout_sec() -> u64 {
    120
}

pub fn default_interpreter() -> PathBuf {
    PathBuf::from("python3")
}

pub fn default_script_name() -> String {
    "temp_agent_script.py".to_string()
}

pub fn default_timeout_sec() -> u64 {
    30
}

pub fn default_working_dir() -> PathBuf {
    PathBuf::from(".")
}
