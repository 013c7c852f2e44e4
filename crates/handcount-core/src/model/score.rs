use crate::model::player::Seat;
use crate::model::round::RoundInput;
use serde::{Deserialize, Serialize};

/// Signed per-seat deltas for one completed round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoundResult {
    deltas: Vec<i64>,
}

impl RoundResult {
    pub fn deltas(&self) -> &[i64] {
        &self.deltas
    }

    pub fn delta(&self, seat: Seat) -> i64 {
        self.deltas.get(seat.index()).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }
}

/// Turns held points into deltas. A seat holding zero collects the whole pot
/// (every zero-holder collects it in full); everyone else loses what they hold.
pub fn compute_round_result(input: &RoundInput) -> RoundResult {
    let total: i64 = input.held().iter().map(|&points| i64::from(points)).sum();
    let deltas = input
        .held()
        .iter()
        .map(|&points| {
            if points == 0 {
                total
            } else {
                -i64::from(points)
            }
        })
        .collect();
    RoundResult { deltas }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBoard {
    totals: Vec<i64>,
}

impl ScoreBoard {
    pub fn new(player_count: usize) -> Self {
        Self {
            totals: vec![0; player_count],
        }
    }

    pub fn score(&self, seat: Seat) -> i64 {
        self.totals.get(seat.index()).copied().unwrap_or(0)
    }

    pub fn standings(&self) -> &[i64] {
        &self.totals
    }

    pub fn apply_round(&mut self, result: &RoundResult) {
        for (total, delta) in self.totals.iter_mut().zip(result.deltas()) {
            *total += delta;
        }
    }

    pub fn reset(&mut self) {
        self.totals.iter_mut().for_each(|total| *total = 0);
    }

    /// Highest total wins; on a tie the lowest seat is preferred.
    pub fn leading_player(&self) -> Option<Seat> {
        let mut best: Option<(usize, i64)> = None;
        for (index, &total) in self.totals.iter().enumerate() {
            if best.is_none_or(|(_, top)| total > top) {
                best = Some((index, total));
            }
        }
        best.map(|(index, _)| Seat::new(index as u8))
    }
}
