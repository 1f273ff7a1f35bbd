use crate::domain::model::DrawRecord;
use crate::utils::validation::{BLUE_MAX, RED_MAX};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberPicks {
    pub red: Vec<String>,
    pub blue: Vec<String>,
}

/// Domain numbers absent from the `window` most recent draws, each mapped to
/// the window size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingReport {
    pub window: usize,
    pub red: BTreeMap<String, usize>,
    pub blue: BTreeMap<String, usize>,
}

/// For each number, how many of the latest draws in a row it has sat out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OmissionReport {
    pub red: BTreeMap<String, usize>,
    pub blue: BTreeMap<String, usize>,
}

fn domain(max: u32) -> Vec<String> {
    (1..=max).map(|n| format!("{:02}", n)).collect()
}

fn numeric(value: &str) -> u32 {
    value.trim().parse().unwrap_or(u32::MAX)
}

fn tally<'r>(
    mut counts: HashMap<String, usize>,
    values: impl Iterator<Item = &'r String>,
) -> Vec<(String, usize)> {
    for value in values {
        *counts.entry(value.clone()).or_insert(0) += 1;
    }
    counts.into_iter().collect()
}

/// Counts of the values that actually appear, unsorted.
fn observed<'r>(values: impl Iterator<Item = &'r String>) -> Vec<(String, usize)> {
    tally(HashMap::new(), values)
}

/// Counts every value in the domain (zero included) plus any value seen
/// outside it, unsorted.
fn with_domain<'r>(values: impl Iterator<Item = &'r String>, max: u32) -> Vec<(String, usize)> {
    tally(domain(max).into_iter().map(|n| (n, 0)).collect(), values)
}

/// Ties on count are broken by numeric value, smallest first.
fn by_value(a: &(String, usize), b: &(String, usize)) -> Ordering {
    numeric(&a.0).cmp(&numeric(&b.0)).then_with(|| a.0.cmp(&b.0))
}

fn hottest_first(mut counts: Vec<(String, usize)>) -> Vec<(String, usize)> {
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| by_value(a, b)));
    counts
}

fn coldest_first(mut counts: Vec<(String, usize)>) -> Vec<(String, usize)> {
    counts.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| by_value(a, b)));
    counts
}

fn take_values(ranked: Vec<(String, usize)>, n: usize) -> Vec<String> {
    ranked.into_iter().take(n).map(|(value, _)| value).collect()
}

/// Frequency and absence analysis over a window of draws.
///
/// The window is expected most-recent-first, as `DataLoader` returns it.
pub struct Statistics<'a> {
    records: &'a [DrawRecord],
}

impl<'a> Statistics<'a> {
    pub fn new(records: &'a [DrawRecord]) -> Self {
        Self { records }
    }

    fn reds(&self) -> impl Iterator<Item = &'a String> {
        self.records.iter().flat_map(|r| r.red_balls.iter())
    }

    fn blues(&self) -> impl Iterator<Item = &'a String> {
        self.records.iter().map(|r| &r.blue_ball)
    }

    /// Top `top_n` drawn red values by count, descending; equal counts go to
    /// the smaller number first. Values never drawn are not listed.
    pub fn red_frequency(&self, top_n: usize) -> Vec<(String, usize)> {
        let mut ranked = hottest_first(observed(self.reds()));
        ranked.truncate(top_n);
        ranked
    }

    pub fn blue_frequency(&self, top_n: usize) -> Vec<(String, usize)> {
        let mut ranked = hottest_first(observed(self.blues()));
        ranked.truncate(top_n);
        ranked
    }

    /// Most drawn numbers. May return fewer than asked for when the window
    /// holds fewer distinct values.
    pub fn hot_numbers(&self, red_n: usize, blue_n: usize) -> NumberPicks {
        NumberPicks {
            red: take_values(hottest_first(observed(self.reds())), red_n),
            blue: take_values(hottest_first(observed(self.blues())), blue_n),
        }
    }

    /// Least drawn numbers, coldest first. The whole domain is ranked, so
    /// numbers that never appeared always come before ones that did.
    pub fn cold_numbers(&self, red_n: usize, blue_n: usize) -> NumberPicks {
        NumberPicks {
            red: take_values(coldest_first(with_domain(self.reds(), RED_MAX)), red_n),
            blue: take_values(coldest_first(with_domain(self.blues(), BLUE_MAX)), blue_n),
        }
    }

    pub fn analyze_missing(&self, recent_n: usize) -> MissingReport {
        let window = &self.records[..recent_n.min(self.records.len())];

        let seen_red: BTreeSet<&str> = window
            .iter()
            .flat_map(|r| r.red_balls.iter().map(String::as_str))
            .collect();
        let seen_blue: BTreeSet<&str> = window.iter().map(|r| r.blue_ball.as_str()).collect();

        let absent = |max: u32, seen: &BTreeSet<&str>| -> BTreeMap<String, usize> {
            domain(max)
                .into_iter()
                .filter(|n| !seen.contains(n.as_str()))
                .map(|n| (n, window.len()))
                .collect()
        };

        MissingReport {
            window: window.len(),
            red: absent(RED_MAX, &seen_red),
            blue: absent(BLUE_MAX, &seen_blue),
        }
    }

    fn streak(&self, drawn: impl Fn(&DrawRecord) -> bool) -> usize {
        self.records
            .iter()
            .position(|r| drawn(r))
            .unwrap_or(self.records.len())
    }

    /// Current omission streak of every domain number. A number never drawn
    /// in the collection gets the collection length.
    pub fn omission_streaks(&self) -> OmissionReport {
        OmissionReport {
            red: domain(RED_MAX)
                .into_iter()
                .map(|n| {
                    let s = self.streak(|r| r.red_balls.contains(&n));
                    (n, s)
                })
                .collect(),
            blue: domain(BLUE_MAX)
                .into_iter()
                .map(|n| {
                    let s = self.streak(|r| r.blue_ball == n);
                    (n, s)
                })
                .collect(),
        }
    }
}
