use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::{model::window::DateWindow, service::metadata::MetadataCache};

/// Window width in days for a dataset's declared update frequency, capped at `max_days`.
///
/// The frequency is matched case-insensitively by substring, so "Daily (NRT)" counts as
/// daily. Unknown or missing frequencies chunk like daily ones.
pub fn chunk_days(update_frequency: Option<&str>, max_days: u32) -> u32 {
    let frequency = update_frequency.unwrap_or_default().to_lowercase();

    let preferred = if frequency.contains("daily") {
        7
    } else if frequency.contains("weekly") {
        14
    } else if frequency.contains("monthly") {
        30
    } else {
        7
    };

    preferred.min(max_days).max(1)
}

/// Walks `start` to `end` in `days`-wide steps, clipping the last window to `end`.
///
/// Consecutive windows share their boundary. `start >= end` yields no windows; a width of
/// zero is treated as one day.
pub fn uniform_windows(start: DateTime<Utc>, end: DateTime<Utc>, days: u32) -> Vec<DateWindow> {
    let step = Duration::days(i64::from(days.max(1)));
    let mut windows = Vec::new();
    let mut current = start;

    while current < end {
        let next = current
            .checked_add_signed(step)
            .map_or(end, |next| next.min(end));
        windows.push(DateWindow::new(current, next));
        current = next;
    }

    windows
}

/// Splits requested date spans into API-sized windows using dataset metadata.
pub struct DateRangeOptimizer {
    metadata: Arc<MetadataCache>,
}

impl DateRangeOptimizer {
    pub fn new(metadata: Arc<MetadataCache>) -> Self {
        Self { metadata }
    }

    /// Ordered, contiguous windows covering `start..end`, each at most `max_days_per_query`
    /// days wide.
    ///
    /// Never fails: if metadata cannot be retrieved the span is chunked uniformly at
    /// `max_days_per_query`.
    pub async fn optimize_date_range(
        &self,
        dataset: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        max_days_per_query: u32,
    ) -> Vec<DateWindow> {
        match self.metadata.get_dataset_metadata(dataset, "latest").await {
            Ok(metadata) => {
                let days = chunk_days(metadata.update_frequency(), max_days_per_query);
                let windows = uniform_windows(start, end, days);
                tracing::info!(
                    "Optimized date ranges for {}: {} chunks of {} days each",
                    dataset,
                    windows.len(),
                    days
                );
                windows
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to optimize date range for {}, using fallback: {}",
                    dataset,
                    e
                );
                uniform_windows(start, end, max_days_per_query)
            }
        }
    }
}
