use crate::domain::model::DrawRecord;
use std::collections::{BTreeSet, HashMap};

/// Read-only lookups over a loaded draw collection.
pub struct QueryIndex<'a> {
    records: &'a [DrawRecord],
    by_period: HashMap<&'a str, &'a DrawRecord>,
    by_date: HashMap<&'a str, &'a DrawRecord>,
}

impl<'a> QueryIndex<'a> {
    pub fn new(records: &'a [DrawRecord]) -> Self {
        let mut by_period = HashMap::with_capacity(records.len());
        let mut by_date = HashMap::with_capacity(records.len());
        for record in records {
            by_period.entry(record.period.as_str()).or_insert(record);
            by_date.entry(record.date.as_str()).or_insert(record);
        }

        Self {
            records,
            by_period,
            by_date,
        }
    }

    pub fn by_period(&self, period: &str) -> Option<&'a DrawRecord> {
        self.by_period.get(period).copied()
    }

    pub fn by_date(&self, date: &str) -> Option<&'a DrawRecord> {
        self.by_date.get(date).copied()
    }

    /// Draws whose numeric period lies in `start..=end`, in collection order.
    pub fn range(&self, start: u32, end: u32) -> Vec<&'a DrawRecord> {
        self.records
            .iter()
            .filter(|r| r.period_number().is_some_and(|p| (start..=end).contains(&p)))
            .collect()
    }

    /// Draws whose six red balls are exactly `balls`, in any order.
    pub fn search_by_red_combination<S: AsRef<str>>(&self, balls: &[S]) -> Vec<&'a DrawRecord> {
        let wanted: BTreeSet<&str> = balls.iter().map(|b| b.as_ref()).collect();
        self.records
            .iter()
            .filter(|r| r.red_balls.iter().map(String::as_str).collect::<BTreeSet<_>>() == wanted)
            .collect()
    }

    pub fn latest(&self) -> Option<&'a DrawRecord> {
        self.records.first()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
