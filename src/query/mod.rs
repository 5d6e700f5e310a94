//! Query module - Parameterized read-only views

mod battle;
mod filters;
mod frame;

pub use battle::{BattleOutcome, BattleWinner, KeywordCount, YearScope};
pub use filters::{KeywordMatches, ReviewQuery};
pub use frame::{select_columns, REVIEW_VIEW_COLUMNS, TOWN_VIEW_COLUMNS};
