pub mod career_path;
pub mod content;
pub mod safety_log;
