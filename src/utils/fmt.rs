//! Human-readable formatting for console output.

/// Format a byte count the way the size label next to a traced file reads.
///
/// - `0` -> `""` (nothing worth showing)
/// - `< 1024` -> `"512b"`
/// - `< 1 MiB` -> `"12.3kb"`
/// - otherwise -> `"1.5mb"`
pub fn human_size(bytes: u64) -> String {
    if bytes == 0 {
        return String::new();
    }
    if bytes < 1024 {
        return format!("{bytes}b");
    }

    #[allow(clippy::cast_precision_loss)]
    let kb = bytes as f64 / 1024.0;
    if kb < 1024.0 {
        format!("{:.1}kb", round_tenth(kb))
    } else {
        format!("{:.1}mb", round_tenth(kb / 1024.0))
    }
}

/// Round half up to one decimal place.
fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `"1 path"`, `"3 paths"`.
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    format!("{count} {noun}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_size_empty() {
        assert_eq!(human_size(0), "");
    }

    #[test]
    fn test_human_size_bytes() {
        assert_eq!(human_size(1), "1b");
        assert_eq!(human_size(1023), "1023b");
    }

    #[test]
    fn test_human_size_kilobytes() {
        assert_eq!(human_size(1024), "1.0kb");
        assert_eq!(human_size(1536), "1.5kb");
        assert_eq!(human_size(12_595), "12.3kb");
    }

    #[test]
    fn test_human_size_megabytes() {
        assert_eq!(human_size(1024 * 1024), "1.0mb");
        assert_eq!(human_size(5 * 1024 * 1024 + 512 * 1024), "5.5mb");
    }

    #[test]
    fn test_plural_count() {
        assert_eq!(plural_count(0, "path"), "0 paths");
        assert_eq!(plural_count(1, "path"), "1 path");
        assert_eq!(plural_count(279, "color"), "279 colors");
    }
}
