#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Move budget countdown and star rating system.

use blockslide_core::{Event, StarRating, StarThresholds};

/// Derives the star rating earned after `applied_moves` moves.
///
/// Returns [`StarRating::Unrated`] when the level has no thresholds.
#[must_use]
pub fn rate(applied_moves: u32, thresholds: Option<StarThresholds>) -> StarRating {
    let Some(thresholds) = thresholds else {
        return StarRating::Unrated;
    };

    if applied_moves <= thresholds.three {
        StarRating::Three
    } else if applied_moves <= thresholds.two {
        StarRating::Two
    } else {
        StarRating::One
    }
}

/// Tracks the move budget and the star rating it implies.
#[derive(Clone, Debug)]
pub struct Scoring {
    budget: u32,
    applied: u32,
    thresholds: Option<StarThresholds>,
    rating: StarRating,
}

impl Scoring {
    /// Creates a fresh scoreboard for a level.
    #[must_use]
    pub fn new(budget: u32, thresholds: Option<StarThresholds>) -> Self {
        Self {
            budget,
            applied: 0,
            thresholds,
            rating: rate(0, thresholds),
        }
    }

    /// Counts one committed move and reports the changed counters.
    pub fn record_move(&mut self, out: &mut Vec<Event>) {
        self.applied = self.applied.saturating_add(1);
        out.push(Event::MovesChanged {
            applied: self.applied,
            left: self.moves_left(),
        });

        let rating = rate(self.applied, self.thresholds);
        if rating != self.rating {
            self.rating = rating;
            out.push(Event::StarRatingChanged { rating });
        }
    }

    /// Moves applied since the level started.
    #[must_use]
    pub const fn applied_moves(&self) -> u32 {
        self.applied
    }

    /// Moves remaining in the budget.
    #[must_use]
    pub const fn moves_left(&self) -> u32 {
        self.budget.saturating_sub(self.applied)
    }

    /// Reports whether the budget is spent.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.moves_left() == 0
    }

    /// Current star rating.
    #[must_use]
    pub const fn rating(&self) -> StarRating {
        self.rating
    }
}
