use chrono::{DateTime, Local};

// Local wall-clock time without offset, microsecond precision. Sorts
// lexicographically in chronological order.
const SORTABLE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

pub fn sortable_now() -> String {
  format_sortable(&Local::now())
}

pub fn format_sortable(time: &DateTime<Local>) -> String {
  time.naive_local().format(SORTABLE_FORMAT).to_string()
}
