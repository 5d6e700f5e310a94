//! Keyword counts and the two-word "battle".

use super::filters::{contains_lowercase, ReviewQuery};
use serde::Serialize;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Which reviews a keyword count looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum YearScope {
    #[default]
    All,
    Year(String),
}

impl YearScope {
    pub fn includes(&self, year: Option<&str>) -> bool {
        match self {
            YearScope::All => true,
            YearScope::Year(wanted) => year == Some(wanted.as_str()),
        }
    }
}

impl FromStr for YearScope {
    type Err = Infallible;

    /// `"all"` (any case) or a year.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            Ok(YearScope::All)
        } else {
            Ok(YearScope::Year(s.to_string()))
        }
    }
}

impl From<i32> for YearScope {
    fn from(year: i32) -> Self {
        YearScope::Year(year.to_string())
    }
}

impl fmt::Display for YearScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearScope::All => write!(f, "all years"),
            YearScope::Year(year) => write!(f, "{year}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordCount {
    pub word: String,
    /// In-scope reviews containing the word.
    pub count: usize,
    /// In-scope reviews with text.
    pub population: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BattleWinner {
    First,
    Second,
    Tie,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BattleOutcome {
    pub scope: YearScope,
    pub first: KeywordCount,
    pub second: KeywordCount,
    pub winner: BattleWinner,
}

impl BattleOutcome {
    /// The winning word, `None` on a tie.
    pub fn winning_word(&self) -> Option<&str> {
        match self.winner {
            BattleWinner::First => Some(&self.first.word),
            BattleWinner::Second => Some(&self.second.word),
            BattleWinner::Tie => None,
        }
    }
}

impl ReviewQuery<'_> {
    /// Number of in-scope reviews containing `word` (ignoring case) and the
    /// size of the in-scope population. An empty word counts nothing.
    pub fn keyword_count(&self, word: &str, scope: &YearScope) -> KeywordCount {
        let needle = word.to_lowercase();
        let mut population = 0;
        let mut count = 0;

        for text in self
            .table
            .iter()
            .filter(|r| scope.includes(r.review_year.as_deref()))
            .filter_map(|r| r.review.as_deref())
        {
            population += 1;
            if !needle.is_empty() && contains_lowercase(text, &needle) {
                count += 1;
            }
        }

        KeywordCount {
            word: word.to_string(),
            count,
            population,
        }
    }

    /// Head-to-head keyword counts. The higher count wins, equal is a tie.
    pub fn battle(&self, first: &str, second: &str, scope: &YearScope) -> BattleOutcome {
        let first = self.keyword_count(first, scope);
        let second = self.keyword_count(second, scope);
        let winner = match first.count.cmp(&second.count) {
            std::cmp::Ordering::Greater => BattleWinner::First,
            std::cmp::Ordering::Less => BattleWinner::Second,
            std::cmp::Ordering::Equal => BattleWinner::Tie,
        };

        tracing::debug!(
            first = %first.word,
            second = %second.word,
            %scope,
            ?winner,
            "keyword battle"
        );

        BattleOutcome {
            scope: scope.clone(),
            first,
            second,
            winner,
        }
    }
}
