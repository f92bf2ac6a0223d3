use crate::{
    model::{dataset::Dataset, window::DateWindow},
    util::time::format_date,
};

/// Confidence predicate admitting `lowest` and every level above it.
///
/// A level outside the dataset's ordered list is not rejected: it logs a warning and yields
/// `None`, meaning every confidence level is admitted.
pub fn confidence_filter(dataset: Dataset, lowest: &str) -> Option<String> {
    let order = dataset.confidence_order();

    let Some(index) = order.iter().position(|level| *level == lowest) else {
        tracing::warn!(
            "Invalid confidence value: {}. Using all confidence values.",
            lowest
        );
        return None;
    };

    let field = dataset.confidence_field();
    let clauses: Vec<String> = order[index..]
        .iter()
        .map(|level| format!("{field} = '{}'", dataset.confidence_filter_value(level)))
        .collect();

    Some(format!("({})", clauses.join(" OR ")))
}

/// Requested columns: latitude and longitude first, then `fields` in order without repeats.
pub fn select_fields<'a>(fields: &[&'a str]) -> Vec<&'a str> {
    let mut selected = vec!["latitude", "longitude"];
    for field in fields {
        if !selected.contains(field) {
            selected.push(*field);
        }
    }
    selected
}

/// Filter expression over the `results` table bounded by `window` on `date_field`.
pub fn build_sql(
    fields: &[&str],
    date_field: &str,
    window: &DateWindow,
    extra_filter: Option<&str>,
) -> String {
    let mut sql = format!(
        "SELECT {} FROM results WHERE ({date_field} >= '{}' AND {date_field} <= '{}')",
        select_fields(fields).join(","),
        format_date(&window.start),
        format_date(&window.end),
    );

    if let Some(extra) = extra_filter.filter(|extra| !extra.is_empty()) {
        sql.push_str(" AND ");
        sql.push_str(extra);
    }

    sql
}
