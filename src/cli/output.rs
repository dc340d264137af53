//! Output formatting for CLI

use std::fmt::Display;

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let digits = n.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Format `part` as a count with its share of `total`, e.g. `812 (81.2%)`
pub fn format_share(part: usize, total: usize) -> String {
    if total == 0 {
        return format_number(part);
    }
    let percent = part as f64 / total as f64 * 100.0;
    format!("{} ({percent:.1}%)", format_number(part))
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: impl Display) {
    println!("  {:20} {}", format!("{key}:"), value);
}

/// Print statistics table
pub fn print_stats_table(stats: &[(&str, String)]) {
    for (key, value) in stats {
        print_kv(key, value);
    }
}
