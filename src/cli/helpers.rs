//! Shared helper functions for CLI commands

use std::cmp::Ordering;

use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::cli::OutputFormat;

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Escape a string for CSV output
///
/// Handles commas, quotes, and newlines according to RFC 4180.
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Format a rate with two decimals
pub fn format_rate(rate: f64) -> String {
    format!("{:.2}", rate)
}

/// Order size labels numerically where possible ("2" < "10"), text otherwise
///
/// Labels such as "NaN" or "inf" parse as floats but sort as text.
pub fn compare_sizes(a: &str, b: &str) -> Ordering {
    let number = |s: &str| s.parse::<f64>().ok().filter(|x| x.is_finite());
    match (number(a), number(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Print rows in the requested format
///
/// `records` are serialized for JSON/YAML; `header` and `rows` drive the
/// table, TSV and CSV renderings.
pub fn print_rows<T: Serialize>(
    format: OutputFormat,
    records: &T,
    header: &[&str],
    rows: &[Vec<String>],
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(records).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(records).into_diagnostic()?);
        }
        OutputFormat::Csv => {
            println!("{}", header.join(","));
            for row in rows {
                let escaped: Vec<_> = row.iter().map(|c| escape_csv(c)).collect();
                println!("{}", escaped.join(","));
            }
        }
        OutputFormat::Tsv => {
            println!("{}", header.join("\t"));
            for row in rows {
                println!("{}", row.join("\t"));
            }
        }
        OutputFormat::Auto => {
            let mut builder = Builder::default();
            builder.push_record(header.iter().map(|h| h.to_string()));
            for row in rows {
                builder.push_record(row.iter().cloned());
            }
            println!("{}", builder.build().with(Style::sharp()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("IRONCORE CASTINGS PVT. LTD."), "IRONCORE CASTINGS PVT. LTD.");
        assert_eq!(
            escape_csv("Retainer Ring,Internal Circlip"),
            "\"Retainer Ring,Internal Circlip\""
        );
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(156.0), "156.00");
        assert_eq!(format_rate(0.0), "0.00");
    }

    #[test]
    fn test_compare_sizes() {
        let mut sizes = vec!["10", "2", "DN50", "12", "3", "1.5"];
        sizes.sort_by(|a, b| compare_sizes(a, b));
        assert_eq!(sizes, vec!["1.5", "2", "3", "10", "12", "DN50"]);
    }

    #[test]
    fn test_compare_sizes_non_finite_labels_sort_as_text() {
        let mut sizes: Vec<String> = (1..=60).rev().map(|n| n.to_string()).collect();
        sizes.insert(30, "NaN".to_string());
        sizes.insert(10, "inf".to_string());
        sizes.sort_by(|a, b| compare_sizes(a, b));

        let expected: Vec<String> = (1..=60)
            .map(|n| n.to_string())
            .chain(["NaN".to_string(), "inf".to_string()])
            .collect();
        assert_eq!(sizes, expected);
    }
}
