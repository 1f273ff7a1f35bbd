use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// One draw: six red balls, one blue ball, identified by a 5-digit period.
///
/// Values are stored exactly as the source printed them ("06", not "6") so
/// the cache round-trips byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRecord {
    pub period: String,
    pub date: String,
    pub red_balls: [String; 6],
    pub blue_ball: String,
}

impl DrawRecord {
    pub fn new(
        period: impl Into<String>,
        date: impl Into<String>,
        red_balls: [String; 6],
        blue_ball: impl Into<String>,
    ) -> Self {
        Self {
            period: period.into(),
            date: date.into(),
            red_balls,
            blue_ball: blue_ball.into(),
        }
    }

    /// Numeric period, `None` when the source sent something that is not a number.
    pub fn period_number(&self) -> Option<u32> {
        self.period.trim().parse().ok()
    }
}

/// Puts records into canonical order: most recent period first.
/// Records without a numeric period go last, keeping their relative order.
pub fn sort_descending(records: &mut [DrawRecord]) {
    records.sort_by_key(|r| Reverse(r.period_number()));
}

pub fn is_descending(records: &[DrawRecord]) -> bool {
    records
        .windows(2)
        .all(|pair| pair[0].period_number() > pair[1].period_number())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(period: &str) -> DrawRecord {
        DrawRecord::new(
            period,
            "2022-06-09",
            ["09", "14", "18", "23", "28", "31"].map(String::from),
            "02",
        )
    }

    #[test]
    fn test_period_number() {
        assert_eq!(draw("22065").period_number(), Some(22065));
        assert_eq!(draw("03001").period_number(), Some(3001));
        assert_eq!(draw("n/a").period_number(), None);
    }

    #[test]
    fn test_sort_descending_puts_latest_first() {
        let mut records = vec![draw("22063"), draw("22065"), draw("bad"), draw("22064")];
        sort_descending(&mut records);

        let periods: Vec<&str> = records.iter().map(|r| r.period.as_str()).collect();
        assert_eq!(periods, vec!["22065", "22064", "22063", "bad"]);
    }

    #[test]
    fn test_is_descending_rejects_duplicates() {
        assert!(is_descending(&[draw("22065"), draw("22064")]));
        assert!(!is_descending(&[draw("22065"), draw("22065")]));
        assert!(!is_descending(&[draw("22064"), draw("22065")]));
        assert!(is_descending(&[]));
    }
}
