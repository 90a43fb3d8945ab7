// ─────────────────────────────────────────────────────────────────────
// Affinity Kernel — Text Reports
// ─────────────────────────────────────────────────────────────────────
//! Plain-text tables for `affinity compare` and `affinity presets`.

use std::fmt::Write;

use affinity_core::SimulationSummary;
use affinity_types::{ScenarioPreset, SimulationConfig};

/// One labelled column of a comparison report.
pub struct ScenarioColumn<'a> {
    pub label: String,
    pub summary: &'a SimulationSummary,
}

fn cluster_sizes(sizes: &[usize]) -> String {
    let active: Vec<String> = sizes
        .iter()
        .filter(|&&s| s > 0)
        .map(|s| s.to_string())
        .collect();
    if active.is_empty() {
        "-".to_string()
    } else {
        active.join("/")
    }
}

/// Side-by-side metrics table, one column per scenario.
pub fn format_comparison(columns: &[ScenarioColumn<'_>]) -> String {
    type Cell = fn(&SimulationSummary) -> String;
    let rows: [(&str, Cell); 9] = [
        ("agents", |s| s.agents.to_string()),
        ("cycles", |s| s.cycles.to_string()),
        ("links", |s| s.links.to_string()),
        ("density", |s| format!("{:.4}", s.density)),
        ("mean connection", |s| format!("{:.4}", s.mean_connection)),
        ("max connection", |s| format!("{:.4}", s.max_connection)),
        ("active clusters", |s| s.active_clusters().to_string()),
        ("cluster sizes", |s| cluster_sizes(&s.cluster_sizes)),
        ("polarization", |s| format!("{:+.4}", s.polarization)),
    ];

    let mut out = String::new();
    let _ = write!(out, "{:<18}", "metric");
    for col in columns {
        let _ = write!(out, " {:>16}", col.label);
    }
    out.push('\n');
    let _ = writeln!(out, "{}", "-".repeat(18 + 17 * columns.len()));
    for (name, cell) in rows {
        let _ = write!(out, "{name:<18}");
        for col in columns {
            let _ = write!(out, " {:>16}", cell(col.summary));
        }
        out.push('\n');
    }
    out
}

/// Preset catalogue with the parameters each one overrides.
pub fn format_presets() -> String {
    let mut out = String::new();
    for preset in ScenarioPreset::ALL {
        let cfg = SimulationConfig::from_preset(preset);
        let _ = writeln!(out, "{preset}");
        let _ = writeln!(out, "  {}", preset.description());
        let _ = writeln!(
            out,
            "  clusters={} spread={} scenario={} cycles={} threshold={} recalculate_after={}",
            cfg.population.cluster_count,
            cfg.population.agent_spread,
            cfg.topics.scenario.label(),
            cfg.run.cycles,
            cfg.run.threshold,
            cfg.run.recalculate_after,
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(links: usize, polarization: f64) -> SimulationSummary {
        SimulationSummary {
            agents: 10,
            cycles: 5,
            threshold: 0.3,
            links,
            density: links as f64 / 45.0,
            mean_connection: 0.2,
            max_connection: 0.9,
            cluster_sizes: vec![6, 0, 4],
            intra_cluster_mean: 0.4,
            inter_cluster_mean: 0.1,
            polarization,
        }
    }

    #[test]
    fn test_comparison_has_all_columns() {
        let a = summary(12, 0.3);
        let b = summary(20, -0.05);
        let text = format_comparison(&[
            ScenarioColumn { label: "A".into(), summary: &a },
            ScenarioColumn { label: "B".into(), summary: &b },
        ]);
        let links = text.lines().find(|l| l.starts_with("links")).unwrap();
        assert!(links.contains("12") && links.contains("20"));
        assert!(text.contains("+0.3000"));
        assert!(text.contains("-0.0500"));
        assert!(text.contains("6/4"));
    }

    #[test]
    fn test_comparison_row_count() {
        let a = summary(1, 0.0);
        let text = format_comparison(&[ScenarioColumn { label: "only".into(), summary: &a }]);
        // header + rule + 9 metric rows
        assert_eq!(text.lines().count(), 11);
    }

    #[test]
    fn test_empty_cluster_sizes() {
        assert_eq!(cluster_sizes(&[]), "-");
        assert_eq!(cluster_sizes(&[0, 3]), "3");
    }

    #[test]
    fn test_presets_listed() {
        let text = format_presets();
        for preset in ScenarioPreset::ALL {
            assert!(text.contains(preset.name()));
        }
        assert!(text.contains("scenario=B"));
    }
}
