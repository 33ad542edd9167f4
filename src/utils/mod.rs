//! Utility functions shared by the CLI.
//!
//! ## Modules
//!
//! - [`app_data`] - Configuration file in the application data directory
//! - [`progress`] - Progress bars, no-op without the `progress` feature
//!
//! Also hosts the small content checks used when reading input.

pub mod app_data;
pub mod progress;

pub use app_data::*;

/// Check if content is likely binary
pub fn is_binary(content: &[u8]) -> bool {
    let sample_size = content.len().min(8192);
    let sample = &content[..sample_size];

    // Any null byte in the sample is enough for text input
    if memchr::memchr(0, sample).is_some() {
        return true;
    }

    let non_text_count = sample
        .iter()
        .filter(|&&b| b < 0x20 && b != b'\n' && b != b'\r' && b != b'\t')
        .count();

    non_text_count > sample_size / 8
}

/// Human readable size, for statistics output
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
