//! Time-bucketed order trends.
//!
//! Series are dense: every bucket between the first and the last one appears, with zero
//! counts where nothing happened, so charts get a continuous axis.

use crate::model::{Order, OrderStatus};
use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucketing {
    Day,
    /// ISO weeks, starting on Monday.
    Week,
    /// Calendar months.
    Month,
}

impl Bucketing {
    /// First day of the bucket containing `date`.
    pub fn start_of(self, date: NaiveDate) -> NaiveDate {
        match self {
            Bucketing::Day => date,
            Bucketing::Week => {
                date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
            }
            Bucketing::Month => date - Duration::days(i64::from(date.day0())),
        }
    }

    fn next(self, start: NaiveDate) -> Option<NaiveDate> {
        match self {
            Bucketing::Day => start.checked_add_signed(Duration::days(1)),
            Bucketing::Week => start.checked_add_signed(Duration::days(7)),
            Bucketing::Month => start.checked_add_months(Months::new(1)),
        }
    }

    fn label(self, start: NaiveDate) -> String {
        match self {
            Bucketing::Day => start.format("%Y-%m-%d").to_string(),
            Bucketing::Week => {
                let week = start.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            Bucketing::Month => start.format("%b %Y").to_string(),
        }
    }
}

/// Inclusive range of calendar days (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub bucket_start: NaiveDate,
    pub label: String,
    /// Orders created in the bucket.
    pub orders: usize,
    /// Of those, the ones that are delivered.
    pub delivered: usize,
}

/// Orders per bucket of their creation day.
///
/// Without a `window` the series spans the oldest to the newest order; with one, orders
/// outside it are ignored and the series covers the whole window even if it is empty.
pub fn order_trends(
    orders: &[Order],
    bucketing: Bucketing,
    window: Option<DateWindow>,
) -> Vec<TrendPoint> {
    let days = orders.iter().map(|o| o.created_at.date_naive());
    let (from, to) = match window {
        Some(window) => (window.from, window.to),
        None => match (days.clone().min(), days.max()) {
            (Some(from), Some(to)) => (from, to),
            _ => return Vec::new(),
        },
    };
    if from > to {
        return Vec::new();
    }

    let mut counts: BTreeMap<NaiveDate, (usize, usize)> = BTreeMap::new();
    for order in orders {
        let day = order.created_at.date_naive();
        if day < from || day > to {
            continue;
        }
        let bucket = counts.entry(bucketing.start_of(day)).or_default();
        bucket.0 += 1;
        if order.status == OrderStatus::Delivered {
            bucket.1 += 1;
        }
    }

    let last = bucketing.start_of(to);
    let mut points = Vec::new();
    let mut cursor = Some(bucketing.start_of(from));
    while let Some(start) = cursor.filter(|start| *start <= last) {
        let (orders, delivered) = counts.get(&start).copied().unwrap_or_default();
        points.push(TrendPoint {
            bucket_start: start,
            label: bucketing.label(start),
            orders,
            delivered,
        });
        cursor = bucketing.next(start);
    }
    points
}
