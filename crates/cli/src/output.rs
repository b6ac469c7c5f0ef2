//! Output formatting for fingerprint results

use anyhow::Result;
use serde_json::json;
use std::time::Duration;

use favscan_common::FingerprintResult;

use crate::args::OutputFormat;

/// Print results, `results[i]` belonging to `targets[i]`.
pub fn print_results(
    targets: &[String],
    results: &[FingerprintResult],
    format: OutputFormat,
    duration: Duration,
) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", render_json(targets, results, duration)?),
        OutputFormat::Text => print!("{}", render_table(targets, results, duration)),
    }
    Ok(())
}

fn render_json(
    targets: &[String],
    results: &[FingerprintResult],
    duration: Duration,
) -> Result<String> {
    let entries = targets
        .iter()
        .zip(results)
        .map(|(target, result)| -> Result<serde_json::Value> {
            Ok(json!({
                "target": target,
                "results": serde_json::to_value(result)?,
            }))
        })
        .collect::<Result<Vec<_>>>()?;

    let output = json!({
        "scan_info": {
            "duration_seconds": duration.as_secs_f64(),
            "duration_formatted": format_duration(duration),
            "total_targets": targets.len(),
            "identified": results.iter().map(Vec::len).sum::<usize>(),
        },
        "results": entries,
    });

    Ok(serde_json::to_string_pretty(&output)?)
}

/// ASCII table, one row per matched signature.
fn render_table(targets: &[String], results: &[FingerprintResult], duration: Duration) -> String {
    let mut out = String::new();
    let identified: usize = results.iter().map(Vec::len).sum();

    if identified == 0 {
        out.push_str("\nNo devices identified.\n");
    } else {
        out.push_str(&format!("\n{:-<96}\n", ""));
        out.push_str(&format!(
            "{:<32} {:<20} {:<42}\n",
            "TARGET", "ADDRESS", "DESCRIPTION"
        ));
        out.push_str(&format!("{:-<96}\n", ""));

        for (target, result) in targets.iter().zip(results) {
            for probe in result {
                for m in &probe.matches {
                    out.push_str(&format!(
                        "{:<32} {:<20} {:<42}\n",
                        truncate(target, 32),
                        probe.address.to_string(),
                        truncate(&m.description, 42)
                    ));
                }
            }
        }
        out.push_str(&format!("{:-<96}\n", ""));
    }

    let empty_targets = results.iter().filter(|r| r.is_empty()).count();
    out.push_str("\nSummary:\n");
    out.push_str(&format!("  Targets: {}\n", targets.len()));
    out.push_str(&format!("  Devices identified: {}\n", identified));
    out.push_str(&format!("  Targets without matches: {}\n", empty_targets));
    out.push_str(&format!("  Duration: {}\n\n", format_duration(duration)));
    out
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let cut: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        s.to_string()
    }
}

/// Format duration in a human-readable way
fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if total_secs == 0 {
        format!("{}ms", millis)
    } else if total_secs < 60 {
        if millis > 0 {
            format!("{}.{:03}s", total_secs, millis)
        } else {
            format!("{}s", total_secs)
        }
    } else {
        let mins = total_secs / 60;
        let secs = total_secs % 60;
        if secs > 0 {
            format!("{}m {}s", mins, secs)
        } else {
            format!("{}m", mins)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use favscan_common::{MatchRecord, ProbeResult};
    use std::net::{IpAddr, Ipv4Addr};

    fn sample() -> (Vec<String>, Vec<FingerprintResult>) {
        let hit = ProbeResult::new(
            IpAddr::V4(Ipv4Addr::new(192, 168, 0, 10)),
            vec![MatchRecord {
                description: "Ubiquiti WAP (Vague)".to_string(),
                examples: vec![],
                params: vec![],
            }],
        );
        (
            vec!["192.168.0.0/24".to_string(), "bad..host".to_string()],
            vec![vec![hit], Vec::new()],
        )
    }

    #[test]
    fn json_pairs_targets_with_results() {
        let (targets, results) = sample();
        let rendered = render_json(&targets, &results, Duration::from_secs(2)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(value["scan_info"]["total_targets"], 2);
        assert_eq!(value["scan_info"]["identified"], 1);
        assert_eq!(value["results"][0]["target"], "192.168.0.0/24");
        assert_eq!(value["results"][0]["results"][0]["IP_Address"], "192.168.0.10");
        assert_eq!(
            value["results"][0]["results"][0]["Matches"][0]["description"],
            "Ubiquiti WAP (Vague)"
        );
        assert_eq!(value["results"][1]["results"], json!([]));
    }

    #[test]
    fn table_lists_matches_and_summary() {
        let (targets, results) = sample();
        let table = render_table(&targets, &results, Duration::from_millis(1500));
        assert!(table.contains("192.168.0.10"));
        assert!(table.contains("Ubiquiti WAP (Vague)"));
        assert!(table.contains("Devices identified: 1"));
        assert!(table.contains("Targets without matches: 1"));
        assert!(table.contains("Duration: 1.500s"));
    }

    #[test]
    fn table_with_no_matches() {
        let table = render_table(&["x".to_string()], &[Vec::new()], Duration::ZERO);
        assert!(table.contains("No devices identified."));
    }

    #[test]
    fn truncates_long_cells() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long description", 10), "a very ...");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
        assert_eq!(format_duration(Duration::from_secs(5)), "5s");
        assert_eq!(format_duration(Duration::from_millis(5500)), "5.500s");
        assert_eq!(format_duration(Duration::from_secs(65)), "1m 5s");
        assert_eq!(format_duration(Duration::from_secs(120)), "2m");
    }
}
