use crate::types::model::Dimension;
use crate::types::scoring::ScoreReport;

pub fn to_text(report: &ScoreReport) -> String {
    let mut output = String::new();
    output.push_str(&format!("Security Score - {}\n", report.platform));
    output.push_str(&format!("{}\n\n", "=".repeat(60)));

    output.push_str(&format!(
        "  Stars:   {:.1} / 5.0  [{}]\n",
        report.stars,
        star_bar(report.stars)
    ));
    output.push_str(&format!("  Overall: {}%\n\n", report.overall));

    output.push_str("Dimension Scores\n");
    output.push_str(&format!("{}\n", "-".repeat(40)));
    for score in report.dimensions.values() {
        let score_str = if score.has_metrics() {
            format!("{}%", score.score)
        } else {
            "N/A (no metrics)".to_string()
        };
        output.push_str(&format!(
            "  {:<20} {:>6}  ({}/{})\n",
            title_case(score.dimension),
            score_str,
            score.current_severity,
            score.max_severity
        ));
    }
    output.push('\n');

    output.push_str(&format!(
        "Threats: {} total, {} active, {} inactive\n",
        report.total_metrics, report.active_threats, report.inactive_threats
    ));
    output.push_str(&format!("{}\n", "-".repeat(40)));
    for metric in report.metrics_by_severity() {
        let status = if metric.active { "ACTIVE" } else { "OK" };
        output.push_str(&format!(
            "  [{:<6}] (sev {}) {}\n",
            status, metric.severity, metric.name
        ));
    }
    output.push('\n');

    if !report.compliance.is_empty() {
        output.push_str("Compliance\n");
        output.push_str(&format!("{}\n", "-".repeat(40)));
        for (group, entry) in &report.compliance {
            output.push_str(&format!(
                "  {:<30} {:5.1}%  ({}/{})\n",
                group, entry.percentage, entry.compliant, entry.total
            ));
        }
        output.push('\n');
    }

    output
}

/// `*` per whole star, `+` for a half star, `.` for the rest.
fn star_bar(stars: f64) -> String {
    let filled = (stars.max(0.0) as usize).min(5);
    let half = usize::from(filled < 5 && stars - filled as f64 >= 0.5);
    let empty = 5 - filled - half;
    format!("{}{}{}", "*".repeat(filled), "+".repeat(half), ".".repeat(empty))
}

fn title_case(dimension: Dimension) -> String {
    dimension
        .label()
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
