//! Filtering and ordering of record sets.
//!
//! Queries always filter first and sort second. Sorting is stable: records
//! whose date and time compare equal keep their input order, which for a
//! fresh `list_all` is id order.
//!
//! Dates are stored as free text, conventionally `DD/MM/YYYY`. Comparing
//! that text bytewise does not follow the calendar (`02/01/2024` sorts after
//! `01/12/2024`), so how dates compare is a [`RecordOrdering`] the caller
//! picks:
//!
//! - [`LexicalOrdering`] compares the raw text.
//! - [`CalendarOrdering`] parses dates and times and compares the values.

use std::cmp::Ordering;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::record::VehicleRecord;

/// Date formats understood by [`CalendarOrdering`], tried in order.
const DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%Y-%m-%d"];

/// Time formats understood by [`CalendarOrdering`], tried in order.
const TIME_FORMATS: &[&str] = &["%H:%M", "%H:%M:%S"];

/// A total order over records by date, then time.
pub trait RecordOrdering {
    /// Compare two records.
    fn compare(&self, a: &VehicleRecord, b: &VehicleRecord) -> Ordering;
}

/// Compares `date` then `time` as raw strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalOrdering;

impl RecordOrdering for LexicalOrdering {
    fn compare(&self, a: &VehicleRecord, b: &VehicleRecord) -> Ordering {
        a.fields
            .date
            .cmp(&b.fields.date)
            .then_with(|| a.fields.time.cmp(&b.fields.time))
    }
}

/// Compares `date` then `time` as calendar values.
///
/// Values that parse sort before values that don't; unparseable values are
/// compared as raw strings among themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarOrdering;

impl CalendarOrdering {
    fn parse_date(s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    }

    fn parse_time(s: &str) -> Option<NaiveTime> {
        let s = s.trim();
        TIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
    }
}

/// Parsed values first, raw text as the fallback.
fn compare_parsed<T: Ord>(a: Option<T>, a_raw: &str, b: Option<T>, b_raw: &str) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a_raw.cmp(b_raw),
    }
}

impl RecordOrdering for CalendarOrdering {
    fn compare(&self, a: &VehicleRecord, b: &VehicleRecord) -> Ordering {
        let (a, b) = (&a.fields, &b.fields);
        compare_parsed(
            Self::parse_date(&a.date),
            &a.date,
            Self::parse_date(&b.date),
            &b.date,
        )
        .then_with(|| {
            compare_parsed(
                Self::parse_time(&a.time),
                &a.time,
                Self::parse_time(&b.time),
                &b.time,
            )
        })
    }
}

/// Configurable choice between the built-in orderings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateOrder {
    /// Raw text comparison.
    #[default]
    Lexical,
    /// Calendar comparison.
    Calendar,
}

impl RecordOrdering for DateOrder {
    fn compare(&self, a: &VehicleRecord, b: &VehicleRecord) -> Ordering {
        match self {
            Self::Lexical => LexicalOrdering.compare(a, b),
            Self::Calendar => CalendarOrdering.compare(a, b),
        }
    }
}

/// Sort records ascending by date, then time, comparing the raw text.
#[must_use]
pub fn sort_by_date_time(records: Vec<VehicleRecord>) -> Vec<VehicleRecord> {
    sort_by_date_time_with(records, &LexicalOrdering)
}

/// Sort records ascending with the given ordering. The sort is stable.
#[must_use]
pub fn sort_by_date_time_with(
    mut records: Vec<VehicleRecord>,
    ordering: &impl RecordOrdering,
) -> Vec<VehicleRecord> {
    records.sort_by(|a, b| ordering.compare(a, b));
    records
}

/// Keep records whose `vehicle` contains `query` (case-sensitive).
///
/// `None` or an empty query returns the records unchanged.
#[must_use]
pub fn filter_by_vehicle_substring(
    records: Vec<VehicleRecord>,
    query: Option<&str>,
) -> Vec<VehicleRecord> {
    match query {
        Some(q) if !q.is_empty() => records
            .into_iter()
            .filter(|r| r.fields.vehicle.contains(q))
            .collect(),
        _ => records,
    }
}

/// A vehicle filter followed by a date/time sort.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    /// Substring to look for in the vehicle name.
    pub vehicle: Option<String>,
    /// How dates compare.
    pub order: DateOrder,
}

impl Query {
    /// Create a query that keeps everything, in lexical order.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to vehicles containing `query`.
    #[must_use]
    pub fn vehicle(mut self, query: impl Into<String>) -> Self {
        self.vehicle = Some(query.into());
        self
    }

    /// Use the given date order.
    #[must_use]
    pub fn order(mut self, order: DateOrder) -> Self {
        self.order = order;
        self
    }

    /// Filter, then sort.
    #[must_use]
    pub fn apply(&self, records: Vec<VehicleRecord>) -> Vec<VehicleRecord> {
        let filtered = filter_by_vehicle_substring(records, self.vehicle.as_deref());
        sort_by_date_time_with(filtered, &self.order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordFields;

    fn record(id: i64, date: &str, time: &str, vehicle: &str) -> VehicleRecord {
        VehicleRecord {
            id,
            fields: RecordFields::new(date, time, "AA-123", vehicle, "X", "CERIZA"),
        }
    }

    fn ids(records: &[VehicleRecord]) -> Vec<i64> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_sort_by_date_then_time() {
        let records = vec![
            record(1, "02/01/2024", "09:00", "Clio"),
            record(2, "01/01/2024", "18:00", "Golf"),
            record(3, "01/01/2024", "08:30", "Polo"),
        ];
        assert_eq!(ids(&sort_by_date_time(records)), vec![3, 2, 1]);
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let records = vec![
            record(1, "01/01/2024", "09:00", "Clio"),
            record(2, "01/01/2024", "09:00", "Clio"),
            record(3, "01/01/2024", "09:00", "Golf"),
        ];
        assert_eq!(ids(&sort_by_date_time(records)), vec![1, 2, 3]);

        let reversed = vec![
            record(3, "01/01/2024", "09:00", "Golf"),
            record(1, "01/01/2024", "09:00", "Clio"),
        ];
        assert_eq!(ids(&sort_by_date_time(reversed)), vec![3, 1]);
    }

    #[test]
    fn test_lexical_ordering_ignores_calendar() {
        // 15 Jan sorts after 02 Dec as text.
        let records = vec![
            record(1, "15/01/2024", "09:00", "Clio"),
            record(2, "02/12/2024", "09:00", "Clio"),
        ];
        assert_eq!(ids(&sort_by_date_time(records)), vec![2, 1]);
    }

    #[test]
    fn test_calendar_ordering() {
        let records = vec![
            record(1, "15/01/2024", "09:00", "Clio"),
            record(2, "02/12/2024", "09:00", "Clio"),
            record(3, "2023-06-30", "23:59", "Clio"),
        ];
        let sorted = sort_by_date_time_with(records, &CalendarOrdering);
        assert_eq!(ids(&sorted), vec![3, 1, 2]);
    }

    #[test]
    fn test_calendar_ordering_times() {
        let records = vec![
            record(1, "01/01/2024", "10:00", "Clio"),
            record(2, "01/01/2024", "9:05", "Clio"),
        ];
        let sorted = sort_by_date_time_with(records, &CalendarOrdering);
        assert_eq!(ids(&sorted), vec![2, 1]);
    }

    #[test]
    fn test_calendar_unparseable_sorts_last() {
        let records = vec![
            record(1, "tomorrow", "09:00", "Clio"),
            record(2, "", "09:00", "Clio"),
            record(3, "01/01/2024", "09:00", "Clio"),
        ];
        let sorted = sort_by_date_time_with(records, &CalendarOrdering);
        assert_eq!(ids(&sorted), vec![3, 2, 1]);
    }

    #[test]
    fn test_date_order_dispatch() {
        let a = record(1, "15/01/2024", "09:00", "Clio");
        let b = record(2, "02/12/2024", "09:00", "Clio");
        assert_eq!(DateOrder::Lexical.compare(&a, &b), Ordering::Greater);
        assert_eq!(DateOrder::Calendar.compare(&a, &b), Ordering::Less);
    }

    #[test]
    fn test_date_order_serde() {
        let json = serde_json::to_string(&DateOrder::Calendar).unwrap();
        assert_eq!(json, "\"calendar\"");
        assert_eq!(DateOrder::default(), DateOrder::Lexical);
    }

    #[test]
    fn test_filter_case_sensitive() {
        let records = vec![
            record(1, "01/01/2024", "09:00", "Clio"),
            record(2, "01/01/2024", "09:00", "clio sport"),
            record(3, "01/01/2024", "09:00", "Golf"),
        ];
        let filtered = filter_by_vehicle_substring(records, Some("Clio"));
        assert_eq!(ids(&filtered), vec![1]);
    }

    #[test]
    fn test_filter_matches_vehicle_only() {
        let records = vec![record(1, "01/01/2024", "09:00", "Golf")];
        // "AA" is in the plate, not the vehicle.
        assert!(filter_by_vehicle_substring(records, Some("AA")).is_empty());
    }

    #[test]
    fn test_filter_empty_query_is_identity() {
        let records = vec![
            record(2, "02/01/2024", "09:00", "Golf"),
            record(1, "01/01/2024", "09:00", "Clio"),
        ];
        assert_eq!(
            filter_by_vehicle_substring(records.clone(), Some("")),
            records
        );
        assert_eq!(filter_by_vehicle_substring(records.clone(), None), records);
    }

    #[test]
    fn test_query_filters_then_sorts() {
        let records = vec![
            record(1, "03/01/2024", "09:00", "Clio"),
            record(2, "01/01/2024", "09:00", "Golf"),
            record(3, "02/01/2024", "09:00", "Clio"),
        ];
        let result = Query::new().vehicle("Clio").apply(records);
        assert_eq!(ids(&result), vec![3, 1]);
    }

    #[test]
    fn test_query_with_calendar_order() {
        let records = vec![
            record(1, "15/01/2024", "09:00", "Clio"),
            record(2, "02/12/2024", "09:00", "Clio"),
        ];
        let result = Query::new().order(DateOrder::Calendar).apply(records);
        assert_eq!(ids(&result), vec![1, 2]);
    }
}
