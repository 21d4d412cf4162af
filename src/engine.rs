//! Posture scoring over a [`ThreatCatalog`].
//!
//! Dimension and overall scores use truncating integer division; compliance
//! percentages are plain floating-point ratios. Published scores depend on
//! both rounding rules staying exactly as they are.

use crate::types::model::{Dimension, ThreatCatalog};
use crate::types::scoring::{
    ComplianceEntry, DimensionScore, MetricStatus, Remediation, ScoreReport, NOT_APPLICABLE,
};
use std::collections::{BTreeMap, BTreeSet};

pub fn compute_score(catalog: &ThreatCatalog, remediation: &Remediation) -> ScoreReport {
    let metrics = metric_statuses(catalog, remediation);

    let mut sums = BTreeMap::<Dimension, (i64, i64)>::new();
    for dimension in Dimension::ALL {
        sums.insert(dimension, (0, 0));
    }
    for metric in &metrics {
        let (current, max) = sums.entry(metric.dimension).or_insert((0, 0));
        let severity = i64::from(metric.severity);
        *max += severity;
        if !metric.active {
            *current += severity;
        }
    }

    let mut total_current = 0i64;
    let mut total_max = 0i64;
    let dimensions = sums
        .into_iter()
        .map(|(dimension, (current, max))| {
            total_current += current;
            total_max += max;
            let score = if max <= 0 {
                NOT_APPLICABLE
            } else {
                percent(current, max)
            };
            let entry = DimensionScore {
                dimension,
                current_severity: current,
                max_severity: max,
                score,
            };
            (dimension, entry)
        })
        .collect::<BTreeMap<_, _>>();

    // An empty catalog scores 0 overall, unlike the per-dimension sentinel.
    let overall = if total_max <= 0 {
        0
    } else {
        percent(total_current, total_max)
    };
    let stars = stars_for(overall);
    let compliance = compliance_from(&metrics);

    let active_threats = metrics.iter().filter(|metric| metric.active).count();
    let total_metrics = metrics.len();

    tracing::debug!(
        platform = catalog.platform(),
        overall,
        stars,
        active_threats,
        "score computed"
    );

    ScoreReport {
        platform: catalog.platform().to_string(),
        dimensions,
        overall,
        stars,
        compliance,
        metrics,
        total_metrics,
        active_threats,
        inactive_threats: total_metrics - active_threats,
    }
}

pub fn compute_compliance(
    catalog: &ThreatCatalog,
    remediation: &Remediation,
) -> BTreeMap<String, ComplianceEntry> {
    compliance_from(&metric_statuses(catalog, remediation))
}

/// Linear rescale of an overall percentage onto 0.0..=5.0.
pub fn stars_for(overall: i32) -> f64 {
    f64::from(overall) * 5.0 / 100.0
}

/// Text before the first comma, or the whole tag.
pub fn tag_prefix(tag: &str) -> &str {
    tag.split_once(',').map_or(tag, |(prefix, _)| prefix)
}

fn percent(current: i64, max: i64) -> i32 {
    // Integer division truncates toward zero; out-of-domain severities
    // saturate instead of wrapping.
    let ratio = current.saturating_mul(100) / max;
    i32::try_from(ratio).unwrap_or(if ratio < 0 { i32::MIN } else { i32::MAX })
}

fn metric_statuses(catalog: &ThreatCatalog, remediation: &Remediation) -> Vec<MetricStatus> {
    catalog
        .metrics()
        .iter()
        .map(|metric| MetricStatus {
            name: metric.name.clone(),
            dimension: metric.dimension,
            severity: metric.severity,
            active: !remediation.is_inactive(&metric.name),
            tags: metric.tags.clone(),
        })
        .collect()
}

fn compliance_from(metrics: &[MetricStatus]) -> BTreeMap<String, ComplianceEntry> {
    let prefixes = metrics
        .iter()
        .flat_map(|metric| metric.tags.iter())
        .map(|tag| tag_prefix(tag))
        .collect::<BTreeSet<_>>();

    let mut compliance = BTreeMap::new();
    for prefix in prefixes {
        let mut total = 0u32;
        let mut compliant = 0u32;
        // Membership is a starts-with test per tag occurrence, so a metric
        // carrying two tags of one standard counts twice.
        for metric in metrics {
            for tag in &metric.tags {
                if tag.starts_with(prefix) {
                    total += 1;
                    if !metric.active {
                        compliant += 1;
                    }
                }
            }
        }
        if total > 0 {
            compliance.insert(
                prefix.to_string(),
                ComplianceEntry {
                    compliant,
                    total,
                    percentage: 100.0 * f64::from(compliant) / f64::from(total),
                },
            );
        }
    }
    compliance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::model::Metric;

    fn metric(name: &str, dimension: Dimension, severity: i32, tags: &[&str]) -> Metric {
        Metric {
            name: name.to_string(),
            dimension,
            severity,
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
        }
    }

    fn catalog(metrics: Vec<Metric>) -> ThreatCatalog {
        ThreatCatalog::new("test model", metrics)
    }

    fn sample_catalog() -> ThreatCatalog {
        catalog(vec![
            metric("net1", Dimension::Network, 2, &["CIS,A"]),
            metric("ss1", Dimension::SystemServices, 3, &[]),
            metric("si1", Dimension::SystemIntegrity, 4, &["ISO 27001/2,B"]),
            metric("cred1", Dimension::Credentials, 1, &["CIS,C"]),
            metric("app1", Dimension::Applications, 5, &["Personal Posture"]),
        ])
    }

    #[test]
    fn empty_catalog_scores_zero_overall_and_sentinel_dimensions() {
        let report = compute_score(&catalog(vec![]), &Remediation::AllActive);
        assert_eq!(report.overall, 0);
        assert_eq!(report.stars, 0.0);
        assert_eq!(report.total_metrics, 0);
        assert_eq!(report.dimensions.len(), 5);
        for dimension in Dimension::ALL {
            let score = report.dimension(dimension);
            assert_eq!(score.score, NOT_APPLICABLE);
            assert_eq!((score.current_severity, score.max_severity), (0, 0));
            assert!(!score.has_metrics());
        }
        assert!(report.compliance.is_empty());
    }

    #[test]
    fn non_positive_severity_sums_are_not_applicable() {
        let catalog = catalog(vec![metric("neg", Dimension::Network, -2, &[])]);
        let report = compute_score(&catalog, &Remediation::AllInactive);

        let network = report.dimension(Dimension::Network);
        assert_eq!((network.current_severity, network.max_severity), (-2, -2));
        assert_eq!(network.score, NOT_APPLICABLE);
        assert_eq!(report.overall, 0);
        assert_eq!(report.stars, 0.0);
    }

    #[test]
    fn zero_severity_dimension_is_not_applicable_even_with_metrics() {
        let catalog = catalog(vec![
            metric("info", Dimension::Applications, 0, &[]),
            metric("net", Dimension::Network, 2, &[]),
        ]);
        let report = compute_score(&catalog, &Remediation::AllInactive);
        assert_eq!(report.dimension(Dimension::Applications).score, NOT_APPLICABLE);
        assert_eq!(report.dimension(Dimension::Network).score, 100);
        assert_eq!(report.overall, 100);
    }

    #[test]
    fn out_of_range_percentages_saturate() {
        let catalog = catalog(vec![
            metric("big", Dimension::Network, 2_000_000_000, &[]),
            metric("neg", Dimension::Network, -1_999_999_999, &[]),
        ]);
        let report = compute_score(&catalog, &Remediation::from_names(["big"]));

        let network = report.dimension(Dimension::Network);
        assert_eq!(network.max_severity, 1);
        assert_eq!(network.score, i32::MAX);
        assert_eq!(report.overall, i32::MAX);
        assert_eq!(report.stars, stars_for(i32::MAX));

        let inverted = compute_score(&catalog, &Remediation::from_names(["neg"]));
        assert_eq!(inverted.dimension(Dimension::Network).score, i32::MIN);
    }

    #[test]
    fn partial_remediation_truncates_dimension_and_overall() {
        let catalog = catalog(vec![
            metric("A", Dimension::Network, 5, &[]),
            metric("B", Dimension::Network, 3, &[]),
        ]);
        let report = compute_score(&catalog, &Remediation::from_names(["A"]));

        let network = report.dimension(Dimension::Network);
        assert_eq!(network.current_severity, 5);
        assert_eq!(network.max_severity, 8);
        assert_eq!(network.score, 62);
        assert_eq!(report.overall, 62);
        assert_eq!(report.stars, 3.1);
        assert_eq!(report.active_threats, 1);
        assert_eq!(report.inactive_threats, 1);
    }

    #[test]
    fn one_third_truncates_to_33() {
        let catalog = catalog(vec![
            metric("low", Dimension::Credentials, 1, &[]),
            metric("high", Dimension::Credentials, 2, &[]),
        ]);
        let report = compute_score(&catalog, &Remediation::from_names(["low"]));
        assert_eq!(report.dimension(Dimension::Credentials).score, 33);
        assert_eq!(report.overall, 33);
    }

    #[test]
    fn remediating_high_or_low_severity_weights_the_score() {
        let catalog = catalog(vec![
            metric("high_sev", Dimension::Network, 5, &[]),
            metric("low_sev", Dimension::Network, 1, &[]),
        ]);
        let low = compute_score(&catalog, &Remediation::from_names(["low_sev"]));
        assert_eq!(low.dimension(Dimension::Network).score, 16);

        let high = compute_score(&catalog, &Remediation::from_names(["high_sev"]));
        assert_eq!(high.dimension(Dimension::Network).score, 83);
    }

    #[test]
    fn dimensions_score_independently_and_sum_into_overall() {
        let catalog = catalog(vec![
            metric("net1", Dimension::Network, 4, &[]),
            metric("cred1", Dimension::Credentials, 2, &[]),
            metric("app1", Dimension::Applications, 3, &[]),
        ]);
        let report = compute_score(&catalog, &Remediation::from_names(["net1", "app1"]));
        assert_eq!(report.dimension(Dimension::Network).score, 100);
        assert_eq!(report.dimension(Dimension::Credentials).score, 0);
        assert_eq!(report.dimension(Dimension::Applications).score, 100);
        assert_eq!(report.dimension(Dimension::SystemServices).score, -1);
        assert_eq!(report.dimension(Dimension::SystemIntegrity).score, -1);
        // 7 of 9
        assert_eq!(report.overall, 77);
    }

    #[test]
    fn best_case_scores_full_marks() {
        let report = compute_score(&sample_catalog(), &Remediation::AllInactive);
        for dimension in Dimension::ALL {
            assert_eq!(report.dimension(dimension).score, 100);
        }
        assert_eq!(report.overall, 100);
        assert_eq!(report.stars, 5.0);
        assert_eq!(report.active_threats, 0);
    }

    #[test]
    fn worst_case_scores_zero() {
        let report = compute_score(&sample_catalog(), &Remediation::AllActive);
        for dimension in Dimension::ALL {
            assert_eq!(report.dimension(dimension).score, 0);
        }
        assert_eq!(report.overall, 0);
        assert_eq!(report.stars, 0.0);
        assert_eq!(report.inactive_threats, 0);
    }

    #[test]
    fn unknown_remediation_names_are_ignored() {
        let catalog = sample_catalog();
        let with_unknown = compute_score(
            &catalog,
            &Remediation::from_names(["net1", "no such check"]),
        );
        let without = compute_score(&catalog, &Remediation::from_names(["net1"]));
        assert_eq!(with_unknown, without);
    }

    #[test]
    fn scoring_is_idempotent() {
        let catalog = sample_catalog();
        let remediation = Remediation::from_names(["si1", "app1"]);
        assert_eq!(
            compute_score(&catalog, &remediation),
            compute_score(&catalog, &remediation)
        );
    }

    #[test]
    fn stars_are_linear_in_overall() {
        for overall in 0..=100 {
            assert_eq!(stars_for(overall), f64::from(overall) * 5.0 / 100.0);
        }
        let catalog = catalog(
            (1..=5)
                .map(|i| metric(&format!("t{i}"), Dimension::Network, 1, &[]))
                .collect(),
        );
        let report = compute_score(&catalog, &Remediation::from_names(["t1", "t2", "t3"]));
        assert_eq!(report.overall, 60);
        assert_eq!(report.stars, 3.0);
    }

    #[test]
    fn tag_prefix_stops_at_first_comma() {
        assert_eq!(tag_prefix("CIS Benchmark Level 1,Rule X"), "CIS Benchmark Level 1");
        assert_eq!(tag_prefix("ISO 27001/2,A.9,extra"), "ISO 27001/2");
        assert_eq!(tag_prefix("Personal Posture"), "Personal Posture");
    }

    #[test]
    fn compliance_uses_floating_point_ratio() {
        let catalog = catalog(vec![
            metric("t1", Dimension::Network, 3, &["SOC 2,A"]),
            metric("t2", Dimension::Network, 2, &["SOC 2,B"]),
            metric("t3", Dimension::Network, 2, &["SOC 2,C"]),
        ]);
        let compliance = compute_compliance(&catalog, &Remediation::from_names(["t1"]));
        let entry = &compliance["SOC 2"];
        assert_eq!((entry.compliant, entry.total), (1, 3));
        assert!((entry.percentage - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn compliance_counts_each_tag_occurrence() {
        let catalog = catalog(vec![metric(
            "t1",
            Dimension::Network,
            3,
            &["CIS Benchmark Level 1,Rule X", "CIS Benchmark Level 1,Rule Y"],
        )]);
        let compliance = compute_compliance(&catalog, &Remediation::AllInactive);
        let entry = &compliance["CIS Benchmark Level 1"];
        assert_eq!(entry.compliant, 2);
        assert_eq!(entry.total, 2);
        assert_eq!(entry.percentage, 100.0);
    }

    #[test]
    fn compliance_groups_per_standard() {
        let report = compute_score(&sample_catalog(), &Remediation::from_names(["net1"]));
        let keys = report.compliance.keys().cloned().collect::<Vec<_>>();
        assert_eq!(keys, vec!["CIS", "ISO 27001/2", "Personal Posture"]);
        assert_eq!(report.compliance["CIS"].percentage, 50.0);
        assert_eq!(report.compliance["ISO 27001/2"].percentage, 0.0);
    }

    #[test]
    fn shorter_group_key_also_matches_longer_tags() {
        let catalog = catalog(vec![
            metric("a", Dimension::Network, 1, &["CIS"]),
            metric("b", Dimension::Network, 1, &["CIS Benchmark Level 1,Rule"]),
        ]);
        let compliance = compute_compliance(&catalog, &Remediation::from_names(["b"]));
        assert_eq!(compliance["CIS"].total, 2);
        assert_eq!(compliance["CIS"].compliant, 1);
        assert_eq!(compliance["CIS Benchmark Level 1"].total, 1);
        assert_eq!(compliance["CIS Benchmark Level 1"].compliant, 1);
    }

    #[test]
    fn metrics_without_tags_produce_no_compliance() {
        let catalog = catalog(vec![metric("t1", Dimension::Network, 3, &[])]);
        assert!(compute_compliance(&catalog, &Remediation::AllInactive).is_empty());
    }

    #[test]
    fn report_lists_every_metric_status_in_catalog_order() {
        let report = compute_score(&sample_catalog(), &Remediation::from_names(["ss1"]));
        let names = report
            .metrics
            .iter()
            .map(|status| status.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["net1", "ss1", "si1", "cred1", "app1"]);
        assert!(!report.metrics[1].active);
        assert!(report.metrics[0].active);

        let by_severity = report
            .metrics_by_severity()
            .into_iter()
            .map(|status| status.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(by_severity, vec!["app1", "si1", "ss1", "net1", "cred1"]);
    }
}
