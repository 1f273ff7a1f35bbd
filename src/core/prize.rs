use crate::domain::model::DrawRecord;
use crate::utils::error::Result;
use crate::utils::validation::{validate_blue_ball, validate_red_balls};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Tier {
    #[serde(rename = "1st")]
    First,
    #[serde(rename = "2nd")]
    Second,
    #[serde(rename = "3rd")]
    Third,
    #[serde(rename = "4th")]
    Fourth,
    #[serde(rename = "5th")]
    Fifth,
    #[serde(rename = "6th")]
    Sixth,
    #[serde(rename = "No prize")]
    NoPrize,
}

impl Tier {
    pub fn label(&self) -> &'static str {
        match self {
            Tier::First => "1st",
            Tier::Second => "2nd",
            Tier::Third => "3rd",
            Tier::Fourth => "4th",
            Tier::Fifth => "5th",
            Tier::Sixth => "6th",
            Tier::NoPrize => "No prize",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A player's selection: six distinct reds and one blue, zero-padded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    red: [String; 6],
    blue: String,
}

impl Ticket {
    pub fn new<S: AsRef<str>>(red: &[S], blue: &str) -> Result<Self> {
        Ok(Self {
            red: validate_red_balls(red)?,
            blue: validate_blue_ball(blue)?,
        })
    }

    pub fn red(&self) -> &[String; 6] {
        &self.red
    }

    pub fn blue(&self) -> &str {
        &self.blue
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOutcome {
    pub matched_red: usize,
    pub matched_blue: bool,
}

/// Maps `(matched red, blue matched)` to a tier. Anything absent is no prize.
#[derive(Debug, Clone)]
pub struct PrizeTable {
    tiers: HashMap<(usize, bool), Tier>,
}

static STANDARD_TABLE: LazyLock<PrizeTable> = LazyLock::new(|| {
    PrizeTable::from_entries([
        ((6, true), Tier::First),
        ((6, false), Tier::Second),
        ((5, true), Tier::Third),
        ((5, false), Tier::Fourth),
        ((4, true), Tier::Fourth),
        ((4, false), Tier::Fifth),
        ((3, true), Tier::Fifth),
        ((0, true), Tier::Sixth),
    ])
});

impl PrizeTable {
    pub fn from_entries(entries: impl IntoIterator<Item = ((usize, bool), Tier)>) -> Self {
        Self {
            tiers: entries.into_iter().collect(),
        }
    }

    /// The published rule. Sparse on purpose: one or two reds with the blue
    /// ball, and three reds without it, win nothing.
    pub fn standard() -> &'static PrizeTable {
        &STANDARD_TABLE
    }

    pub fn tier(&self, outcome: MatchOutcome) -> Tier {
        self.tiers
            .get(&(outcome.matched_red, outcome.matched_blue))
            .copied()
            .unwrap_or(Tier::NoPrize)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PrizeChecker<'t> {
    table: &'t PrizeTable,
}

impl Default for PrizeChecker<'static> {
    fn default() -> Self {
        Self::with_table(PrizeTable::standard())
    }
}

impl<'t> PrizeChecker<'t> {
    pub fn with_table(table: &'t PrizeTable) -> Self {
        Self { table }
    }

    pub fn match_draw(&self, ticket: &Ticket, draw: &DrawRecord) -> MatchOutcome {
        let drawn: HashSet<&str> = draw.red_balls.iter().map(String::as_str).collect();
        let matched_red = ticket
            .red
            .iter()
            .filter(|ball| drawn.contains(ball.as_str()))
            .count();

        MatchOutcome {
            matched_red,
            matched_blue: ticket.blue == draw.blue_ball,
        }
    }

    pub fn check(&self, ticket: &Ticket, draw: &DrawRecord) -> Tier {
        self.table.tier(self.match_draw(ticket, draw))
    }

    /// Tier histogram over `draws`. Every draw is counted, no-prize included.
    pub fn batch_check(&self, ticket: &Ticket, draws: &[DrawRecord]) -> BTreeMap<Tier, usize> {
        let mut histogram = BTreeMap::new();
        for draw in draws {
            *histogram.entry(self.check(ticket, draw)).or_insert(0) += 1;
        }
        histogram
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn winning_draw() -> DrawRecord {
        DrawRecord::new(
            "22064",
            "2022-06-07",
            ["01", "03", "16", "18", "29", "33"].map(String::from),
            "06",
        )
    }

    fn ticket(red: [&str; 6], blue: &str) -> Ticket {
        Ticket::new(&red, blue).unwrap()
    }

    #[test]
    fn test_first_prize() {
        let checker = PrizeChecker::default();
        let t = ticket(["01", "03", "16", "18", "29", "33"], "06");
        assert_eq!(checker.check(&t, &winning_draw()), Tier::First);
    }

    #[test]
    fn test_second_prize_when_only_blue_differs() {
        let checker = PrizeChecker::default();
        let t = ticket(["01", "03", "16", "18", "29", "33"], "05");
        assert_eq!(checker.check(&t, &winning_draw()), Tier::Second);
    }

    #[test]
    fn test_third_prize_five_red_plus_blue() {
        let checker = PrizeChecker::default();
        let t = ticket(["01", "03", "16", "18", "29", "05"], "06");
        assert_eq!(checker.check(&t, &winning_draw()), Tier::Third);
    }

    #[test]
    fn test_sixth_prize_blue_only() {
        let checker = PrizeChecker::default();
        let t = ticket(["02", "04", "06", "08", "10", "12"], "06");
        assert_eq!(checker.check(&t, &winning_draw()), Tier::Sixth);
    }

    #[test]
    fn test_no_prize_two_red_no_blue() {
        let checker = PrizeChecker::default();
        let t = ticket(["01", "03", "06", "08", "10", "12"], "05");
        let outcome = checker.match_draw(&t, &winning_draw());
        assert_eq!(
            outcome,
            MatchOutcome {
                matched_red: 2,
                matched_blue: false
            }
        );
        assert_eq!(checker.check(&t, &winning_draw()), Tier::NoPrize);
    }

    #[test]
    fn test_full_table() {
        let table = PrizeTable::standard();
        let expect = |red, blue, tier| {
            assert_eq!(
                table.tier(MatchOutcome {
                    matched_red: red,
                    matched_blue: blue
                }),
                tier,
                "({}, {})",
                red,
                blue
            );
        };

        expect(6, true, Tier::First);
        expect(6, false, Tier::Second);
        expect(5, true, Tier::Third);
        expect(5, false, Tier::Fourth);
        expect(4, true, Tier::Fourth);
        expect(4, false, Tier::Fifth);
        expect(3, true, Tier::Fifth);
        expect(3, false, Tier::NoPrize);
        expect(2, true, Tier::NoPrize);
        expect(1, true, Tier::NoPrize);
        expect(0, true, Tier::Sixth);
        expect(0, false, Tier::NoPrize);
    }

    #[test]
    fn test_unpadded_ticket_matches_padded_draw() {
        let checker = PrizeChecker::default();
        let t = Ticket::new(&["1", "3", "16", "18", "29", "33"], "6").unwrap();
        assert_eq!(checker.check(&t, &winning_draw()), Tier::First);
    }

    #[test]
    fn test_batch_check_counts_every_draw() {
        let checker = PrizeChecker::default();
        let other = DrawRecord::new(
            "22065",
            "2022-06-09",
            ["09", "14", "20", "23", "28", "31"].map(String::from),
            "02",
        );
        let draws = vec![winning_draw(), winning_draw(), other];
        let t = ticket(["01", "03", "16", "18", "29", "33"], "06");

        let histogram = checker.batch_check(&t, &draws);

        assert_eq!(histogram.get(&Tier::First), Some(&2));
        assert_eq!(histogram.get(&Tier::NoPrize), Some(&1));
        assert_eq!(histogram.values().sum::<usize>(), draws.len());
    }

    #[test]
    fn test_custom_table() {
        let table = PrizeTable::from_entries([((6, true), Tier::First)]);
        let checker = PrizeChecker::with_table(&table);
        let t = ticket(["01", "03", "16", "18", "29", "33"], "05");
        assert_eq!(checker.check(&t, &winning_draw()), Tier::NoPrize);
    }

    #[test]
    fn test_tier_labels_serialize() {
        assert_eq!(Tier::First.to_string(), "1st");
        assert_eq!(serde_json::to_string(&Tier::NoPrize).unwrap(), "\"No prize\"");
    }
}
