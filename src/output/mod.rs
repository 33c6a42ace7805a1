//! Output formatting

pub mod human;
pub mod json;

use crate::cli::OutputFormat;
use serde::Serialize;

/// Print `value` as JSON, or the human rendering produced by `human`
pub fn emit<T, F>(format: OutputFormat, value: &T, human: F)
where
    T: Serialize + ?Sized,
    F: FnOnce(&T) -> String,
{
    match format {
        OutputFormat::Human => print!("{}", human(value)),
        OutputFormat::Json => println!("{}", json::format(value)),
    }
}

/// Public address of a short code on `base_url`
pub fn short_url(base_url: &str, short_code: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), short_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_url_joins_cleanly() {
        assert_eq!(short_url("http://localhost:8080/", "abc"), "http://localhost:8080/abc");
        assert_eq!(short_url("https://cut.example", "abc"), "https://cut.example/abc");
    }
}
