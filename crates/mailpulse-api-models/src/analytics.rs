//! Aggregated review statistics.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Headline counters for the selected period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyticsSummary {
    /// All reviews received.
    pub total_reviews: u64,
    /// Reviews classified positive.
    pub positive_reviews: u64,
    /// Reviews classified negative.
    pub negative_reviews: u64,
    /// Reviews classified neutral.
    pub neutral_reviews: u64,
    /// Reviews classified mixed.
    pub mixed_reviews: u64,
    /// Critical-priority reviews.
    pub critical_count: u64,
    /// High-priority reviews.
    pub high_count: u64,
    /// Medium-priority reviews.
    pub medium_count: u64,
    /// Low-priority reviews.
    pub low_count: u64,
    /// Mean time to handle, in hours.
    pub avg_response_time_hours: Option<f64>,
    /// Reviews marked handled.
    pub processed_count: u64,
    /// Reviews still open.
    pub unprocessed_count: u64,
}

/// One bucket of the sentiment trend series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrendPoint {
    /// Bucket date.
    pub date: NaiveDate,
    /// Reviews in the bucket.
    pub total: u64,
    /// Positive reviews in the bucket.
    pub positive: u64,
    /// Negative reviews in the bucket.
    pub negative: u64,
    /// Neutral reviews in the bucket.
    pub neutral: u64,
}

/// Frequency of a recurring customer problem.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProblemStat {
    /// Problem description.
    pub problem: String,
    /// Occurrences.
    pub count: u64,
    /// Share of all problems, 0-100.
    pub percentage: f64,
}
