//! Size formatting helpers shared by validation, logging, and error bodies.

const KB: u64 = 1024;
const MB: u64 = KB * 1024;
const GB: u64 = MB * 1024;
const TB: u64 = GB * 1024;

/// Format a byte count as a human-readable magnitude with one decimal place.
///
/// Uses 1024-based units. Values under 1 KB are printed as plain bytes.
///
/// ```
/// use pdfmerge::utils::format_file_size;
///
/// assert_eq!(format_file_size(512), "512 B");
/// assert_eq!(format_file_size(1536), "1.5 KB");
/// ```
pub fn format_file_size(size: u64) -> String {
    let (unit, divisor) = if size >= TB {
        ("TB", TB)
    } else if size >= GB {
        ("GB", GB)
    } else if size >= MB {
        ("MB", MB)
    } else if size >= KB {
        ("KB", KB)
    } else {
        return format!("{size} B");
    };

    format!("{:.1} {unit}", size as f64 / divisor as f64)
}

/// Format a configured limit the way clients see it, e.g. `"100MB"`.
///
/// Limits are expressed in the largest whole unit that divides them exactly.
pub fn format_limit(limit: u64) -> String {
    for (unit, divisor) in [("GB", GB), ("MB", MB), ("KB", KB)] {
        if limit >= divisor && limit % divisor == 0 {
            return format!("{}{unit}", limit / divisor);
        }
    }
    format!("{limit}B")
}
