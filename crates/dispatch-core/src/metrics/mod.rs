//! # Metrics Aggregator
//!
//! Pure functions from a snapshot of orders, partners and ledger entries to the figures the
//! dashboard shows. Nothing is cached; each call is a single pass over its inputs.

mod trends;

pub use trends::*;

use crate::model::{
    AssignmentEntry, AssignmentStatus, FailureReason, Order, OrderId, OrderStatus, Partner,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReasonCount {
    pub reason: FailureReason,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentMetrics {
    /// Number of success entries.
    pub total_assigned: usize,
    /// Successes over all attempts, as a percentage. 0 when there were no attempts.
    pub success_rate: f64,
    /// Failed entries per reason, most frequent first.
    pub failure_reasons: Vec<ReasonCount>,
}

pub fn assignment_metrics(entries: &[AssignmentEntry]) -> AssignmentMetrics {
    let mut successes = 0;
    let mut reasons: HashMap<FailureReason, usize> = HashMap::new();
    for entry in entries {
        match (entry.status, entry.reason) {
            (AssignmentStatus::Success, _) => successes += 1,
            (AssignmentStatus::Failed, Some(reason)) => *reasons.entry(reason).or_default() += 1,
            (AssignmentStatus::Failed, None) => {}
        }
    }

    let mut failure_reasons: Vec<ReasonCount> = reasons
        .into_iter()
        .map(|(reason, count)| ReasonCount { reason, count })
        .collect();
    failure_reasons.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.reason.as_str().cmp(b.reason.as_str()))
    });

    AssignmentMetrics {
        total_assigned: successes,
        success_rate: percentage(successes, entries.len()),
        failure_reasons,
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationPerformance {
    pub area: String,
    /// Delivered orders in this area.
    pub completed_orders: usize,
    /// Partners (any status) that list this area.
    pub partners: usize,
}

/// One row per area seen on any order or partner, sorted by area.
pub fn location_performance(orders: &[Order], partners: &[Partner]) -> Vec<LocationPerformance> {
    let mut rows: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for order in orders {
        let row = rows.entry(order.area.as_str()).or_default();
        if order.status == OrderStatus::Delivered {
            row.0 += 1;
        }
    }
    for partner in partners {
        for area in &partner.areas {
            rows.entry(area.as_str()).or_default().1 += 1;
        }
    }
    rows.into_iter()
        .map(|(area, (completed_orders, partners))| LocationPerformance {
            area: area.to_string(),
            completed_orders,
            partners,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentStats {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    /// Mean seconds from order creation to its success entry. 0 without successes.
    pub average_response_secs: f64,
}

/// Attempt counts for entries created within `[from, to]` (either bound optional).
pub fn assignment_stats(
    entries: &[AssignmentEntry],
    orders: &[Order],
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> AssignmentStats {
    let created: HashMap<OrderId, DateTime<Utc>> =
        orders.iter().map(|o| (o.id, o.created_at)).collect();

    let mut stats = AssignmentStats {
        total: 0,
        successful: 0,
        failed: 0,
        average_response_secs: 0.0,
    };
    let mut response_total = 0i64;
    let mut responses = 0i64;

    for entry in entries
        .iter()
        .filter(|e| from.map_or(true, |from| e.created_at >= from))
        .filter(|e| to.map_or(true, |to| e.created_at <= to))
    {
        stats.total += 1;
        match entry.status {
            AssignmentStatus::Success => {
                stats.successful += 1;
                if let Some(placed) = created.get(&entry.order_id) {
                    response_total += (entry.created_at - *placed).num_seconds();
                    responses += 1;
                }
            }
            AssignmentStatus::Failed => stats.failed += 1,
        }
    }
    if responses > 0 {
        stats.average_response_secs = response_total as f64 / responses as f64;
    }
    stats
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartnerSummary {
    pub total_active: usize,
    /// Mean rating over all partners, 0 when there are none.
    pub average_rating: f64,
    /// Up to three areas served by the most active partners.
    pub top_areas: Vec<String>,
}

pub fn partner_summary(partners: &[Partner]) -> PartnerSummary {
    let mut coverage: BTreeMap<&str, usize> = BTreeMap::new();
    for partner in partners.iter().filter(|p| p.is_active()) {
        for area in &partner.areas {
            *coverage.entry(area.as_str()).or_default() += 1;
        }
    }
    let mut ranked: Vec<(&str, usize)> = coverage.into_iter().collect();
    // Stable sort keeps equal counts in area order.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let rating_sum: f64 = partners.iter().map(|p| f64::from(p.metrics.rating)).sum();
    PartnerSummary {
        total_active: partners.iter().filter(|p| p.is_active()).count(),
        average_rating: if partners.is_empty() {
            0.0
        } else {
            rating_sum / partners.len() as f64
        },
        top_areas: ranked
            .into_iter()
            .take(3)
            .map(|(area, _)| area.to_string())
            .collect(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrderStatusCounts {
    pub total: usize,
    pub pending: usize,
    pub assigned: usize,
    pub picked: usize,
    pub delivered: usize,
}

pub fn order_status_counts(orders: &[Order]) -> OrderStatusCounts {
    orders
        .iter()
        .fold(OrderStatusCounts::default(), |mut counts, order| {
            counts.total += 1;
            match order.status {
                OrderStatus::Pending => counts.pending += 1,
                OrderStatus::Assigned => counts.assigned += 1,
                OrderStatus::Picked => counts.picked += 1,
                OrderStatus::Delivered => counts.delivered += 1,
            }
            counts
        })
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::model::PartnerStatus;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    const AREA: Option<FailureReason> = Some(FailureReason::NoEligiblePartnerInArea);
    const FULL: Option<FailureReason> = Some(FailureReason::AllEligiblePartnersAtCapacity);

    #[test]
    fn empty_ledger_has_zero_success_rate() {
        let metrics = assignment_metrics(&[]);
        assert_eq!(metrics.total_assigned, 0);
        assert_eq!(metrics.success_rate, 0.0);
        assert!(metrics.failure_reasons.is_empty());
    }

    #[test]
    fn success_rate_and_histogram() {
        let entries = [
            entry(1, 1, AREA, at(0)),
            entry(2, 1, AREA, at(1)),
            entry(3, 2, FULL, at(2)),
            entry(4, 2, None, at(3)),
        ];
        let metrics = assignment_metrics(&entries);
        assert_eq!(metrics.total_assigned, 1);
        assert_eq!(metrics.success_rate, 25.0);
        assert_eq!(
            metrics.failure_reasons,
            vec![
                ReasonCount {
                    reason: FailureReason::NoEligiblePartnerInArea,
                    count: 2
                },
                ReasonCount {
                    reason: FailureReason::AllEligiblePartnersAtCapacity,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn histogram_ties_are_ordered_by_label() {
        let entries = [entry(1, 1, AREA, at(0)), entry(2, 2, FULL, at(1))];
        let reasons: Vec<_> = assignment_metrics(&entries)
            .failure_reasons
            .into_iter()
            .map(|r| r.reason)
            .collect();
        // "all eligible ..." sorts before "no eligible ...".
        assert_eq!(
            reasons,
            vec![
                FailureReason::AllEligiblePartnersAtCapacity,
                FailureReason::NoEligiblePartnerInArea
            ]
        );
    }

    #[test]
    fn success_rate_matches_definition_for_mixed_sequences() {
        for (successes, failures) in [(0usize, 4usize), (3, 0), (2, 5), (7, 1)] {
            let mut entries = Vec::new();
            for i in 0..successes {
                entries.push(entry(i as u32, i as u32, None, at(0)));
            }
            for i in 0..failures {
                entries.push(entry(100 + i as u32, 1, FULL, at(0)));
            }
            let expected = successes as f64 / (successes + failures) as f64 * 100.0;
            assert_eq!(assignment_metrics(&entries).success_rate, expected);
        }
    }

    #[test]
    fn location_performance_unions_both_sources() {
        let orders = [
            order(1, "North", OrderStatus::Delivered, at(0)),
            order(2, "North", OrderStatus::Assigned, at(0)),
            order(3, "Harbour", OrderStatus::Delivered, at(0)),
        ];
        let partners = [
            partner(1, &["North", "South"], PartnerStatus::Active, 5.0),
            partner(2, &["South"], PartnerStatus::Inactive, 4.0),
        ];
        assert_eq!(
            location_performance(&orders, &partners),
            vec![
                LocationPerformance {
                    area: "Harbour".into(),
                    completed_orders: 1,
                    partners: 0
                },
                LocationPerformance {
                    area: "North".into(),
                    completed_orders: 1,
                    partners: 1
                },
                LocationPerformance {
                    area: "South".into(),
                    completed_orders: 0,
                    partners: 2
                },
            ]
        );
    }

    #[test]
    fn assignment_stats_window_and_response_time() {
        let orders = [
            order(1, "North", OrderStatus::Assigned, at(0)),
            order(2, "North", OrderStatus::Assigned, at(10)),
        ];
        let entries = [
            entry(1, 1, FULL, at(1)),
            entry(2, 1, None, at(2)),
            entry(3, 2, None, at(14)),
        ];

        let all = assignment_stats(&entries, &orders, None, None);
        assert_eq!(
            all,
            AssignmentStats {
                total: 3,
                successful: 2,
                failed: 1,
                // (120s + 240s) / 2
                average_response_secs: 180.0,
            }
        );

        let early = assignment_stats(&entries, &orders, Some(at(1)), Some(at(2)));
        assert_eq!((early.total, early.successful, early.failed), (2, 1, 1));
        assert_eq!(early.average_response_secs, 120.0);

        let none = assignment_stats(&entries, &orders, Some(at(60)), None);
        assert_eq!(none.total, 0);
        assert_eq!(none.average_response_secs, 0.0);
    }

    #[test]
    fn partner_summary_counts_active_coverage() {
        let partners = [
            partner(1, &["North", "South"], PartnerStatus::Active, 5.0),
            partner(2, &["North", "East"], PartnerStatus::Active, 4.0),
            partner(3, &["West"], PartnerStatus::Active, 3.0),
            partner(4, &["Harbour", "Harbour2"], PartnerStatus::Inactive, 4.0),
        ];
        let summary = partner_summary(&partners);
        assert_eq!(summary.total_active, 3);
        assert_eq!(summary.average_rating, 4.0);
        assert_eq!(summary.top_areas, vec!["North", "East", "South"]);

        assert_eq!(partner_summary(&[]).average_rating, 0.0);
    }

    #[test]
    fn status_counts() {
        let orders = [
            order(1, "A", OrderStatus::Pending, at(0)),
            order(2, "A", OrderStatus::Pending, at(0)),
            order(3, "A", OrderStatus::Picked, at(0)),
            order(4, "A", OrderStatus::Delivered, at(0)),
        ];
        assert_eq!(
            order_status_counts(&orders),
            OrderStatusCounts {
                total: 4,
                pending: 2,
                assigned: 0,
                picked: 1,
                delivered: 1
            }
        );
    }
}
