//! Stage generation
//!
//! Each stage shuffles a grid of candidate block slots inside a vertical band
//! that moves down as stages advance, then fills the first slots with blocks.

use glam::Vec2;
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::seq::SliceRandom;

use super::rect::Rect;
use super::state::{Block, GameState, ItemKind, Paddle};
use crate::error::{GameError, GameResult};
use crate::tuning::Tuning;

/// Weighted sampler for block item drops
///
/// Slot 0 is "no item"; slots 1..=4 follow [`ItemKind::ALL`].
#[derive(Debug, Clone)]
pub struct ItemTable {
    weights: [u32; 5],
    dist: WeightedIndex<u32>,
}

impl ItemTable {
    pub fn new(weights: [u32; 5]) -> GameResult<Self> {
        let dist =
            WeightedIndex::new(weights).map_err(|e| GameError::ItemWeights(e.to_string()))?;
        Ok(Self { weights, dist })
    }

    /// Draw one item assignment
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<ItemKind> {
        match self.dist.sample(rng) {
            0 => None,
            i => ItemKind::ALL.get(i - 1).copied(),
        }
    }

    /// Exact probability of an outcome
    #[cfg(test)]
    fn probability(&self, kind: Option<ItemKind>) -> f64 {
        let total: u32 = self.weights.iter().sum();
        let slot = match kind {
            None => 0,
            Some(kind) => 1 + ItemKind::ALL.iter().position(|&k| k == kind).unwrap_or(0),
        };
        self.weights[slot] as f64 / total as f64
    }
}

/// Vertical range `[top, bottom)` of block top edges for a stage
///
/// The band moves down by `stage_band_shift` per stage but never comes within
/// `min_paddle_clearance` of the paddle.
pub fn stage_band(tuning: &Tuning, stage: u32) -> (f32, f32) {
    let mut top = tuning.stage_band_top + tuning.stage_band_shift * stage as f32;
    let mut bottom = top + tuning.stage_band_height;

    let max_bottom = tuning.paddle_top() - tuning.min_paddle_clearance;
    if bottom > max_bottom {
        let excess = bottom - max_bottom;
        top = (top - excess).max(0.0);
        bottom = (bottom - excess).max(top);
    }
    (top, bottom)
}

/// Top-left corners of every block slot for a stage, in row-major order
pub fn candidate_positions(tuning: &Tuning, stage: u32) -> Vec<Vec2> {
    let (top, bottom) = stage_band(tuning, stage);
    let x_stride = tuning.block_width + tuning.block_gap;
    let y_stride = tuning.block_height + tuning.block_gap;
    let max_x = tuning.screen_width - tuning.block_width;

    let mut positions = Vec::new();
    let mut x = 0.0;
    while x <= max_x {
        let mut y = top;
        while y < bottom {
            positions.push(Vec2::new(x, y));
            y += y_stride;
        }
        x += x_stride;
    }
    positions
}

/// Lay out the current stage with a fresh paddle, blocks and one primary ball
pub fn generate_stage(state: &mut GameState) {
    state.paddle = Paddle::new(&state.tuning);
    state.balls = Vec::new();
    state.items = Vec::new();
    state.blocks = Vec::with_capacity(state.tuning.blocks_per_stage);

    let mut positions = candidate_positions(&state.tuning, state.stage);
    positions.shuffle(&mut state.rng);
    positions.truncate(state.tuning.blocks_per_stage);

    let (w, h) = (state.tuning.block_width, state.tuning.block_height);
    for pos in positions {
        let item = state.item_table.roll(&mut state.rng);
        let id = state.next_entity_id();
        state.blocks.push(Block {
            id,
            rect: Rect::new(pos.x, pos.y, w, h),
            item,
        });
    }

    state.spawn_ball_attached(true);

    let carrying = state.blocks.iter().filter(|b| b.item.is_some()).count();
    log::info!(
        "Stage {}: {} blocks ({} carrying items)",
        state.stage,
        state.blocks.len(),
        carrying
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::HashMap;

    #[test]
    fn test_band_moves_down_per_stage() {
        let tuning = Tuning::default();
        assert_eq!(stage_band(&tuning, 1), (150.0, 450.0));
        assert_eq!(stage_band(&tuning, 2), (250.0, 550.0));
    }

    #[test]
    fn test_band_keeps_clear_of_paddle() {
        let tuning = Tuning::default();
        let max_bottom = tuning.paddle_top() - tuning.min_paddle_clearance;
        for stage in 1..50 {
            let (top, bottom) = stage_band(&tuning, stage);
            assert!(bottom <= max_bottom, "stage {} band bottom {}", stage, bottom);
            assert!(bottom - top > 0.0);
        }
    }

    #[test]
    fn test_candidate_grid_size() {
        let tuning = Tuning::default();
        let positions = candidate_positions(&tuning, 1);
        // 13 columns (0..=1120 step 90) x 8 rows (150..450 step 40)
        assert_eq!(positions.len(), 13 * 8);
        assert!(positions.iter().all(|p| p.x + tuning.block_width <= tuning.screen_width));
    }

    #[test]
    fn test_small_grid_places_fewer_blocks() {
        let tuning = Tuning {
            screen_width: 400.0,
            paddle_width: 100.0,
            stage_band_height: 40.0,
            ..Default::default()
        };
        let mut state = GameState::new(tuning, 3, 0).unwrap();
        state.stage = 1;
        generate_stage(&mut state);
        // 4 columns x 1 row
        assert_eq!(state.blocks.len(), 4);
    }

    #[test]
    fn test_generated_blocks_inside_band() {
        let mut state = GameState::new(Tuning::default(), 11, 0).unwrap();
        for stage in 1..8 {
            state.stage = stage;
            generate_stage(&mut state);
            let (top, bottom) = stage_band(&state.tuning, stage);
            assert_eq!(state.blocks.len(), 40);
            assert!(state.blocks.iter().all(|b| b.rect.y >= top && b.rect.y < bottom));
            assert_eq!(state.balls.len(), 1);
            assert!(state.items.is_empty());
        }
    }

    #[test]
    fn test_generated_blocks_do_not_overlap() {
        let state = GameState::new(Tuning::default(), 5, 0).unwrap();
        for (i, a) in state.blocks.iter().enumerate() {
            for b in &state.blocks[i + 1..] {
                assert!(!a.rect.overlaps(&b.rect));
            }
        }
    }

    #[test]
    fn test_item_table_distribution() {
        let table = ItemTable::new([65, 10, 10, 10, 5]).unwrap();
        let mut rng = Pcg32::seed_from_u64(42);
        let mut counts: HashMap<Option<ItemKind>, u32> = HashMap::new();
        let n = 100_000;
        for _ in 0..n {
            *counts.entry(table.roll(&mut rng)).or_default() += 1;
        }

        let outcomes = [
            None,
            Some(ItemKind::PowerUp),
            Some(ItemKind::SpeedDown),
            Some(ItemKind::MultiBall),
            Some(ItemKind::ExtraLife),
        ];
        for outcome in outcomes {
            let observed = *counts.get(&outcome).unwrap_or(&0) as f64 / n as f64;
            let expected = table.probability(outcome);
            assert!(
                (observed - expected).abs() < 0.01,
                "{:?}: observed {} expected {}",
                outcome,
                observed,
                expected
            );
        }
    }

    #[test]
    fn test_item_table_rejects_zero_weights() {
        assert!(ItemTable::new([0; 5]).is_err());
    }

    #[test]
    fn test_item_table_single_outcome() {
        let table = ItemTable::new([0, 0, 0, 1, 0]).unwrap();
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..20 {
            assert_eq!(table.roll(&mut rng), Some(ItemKind::MultiBall));
        }
    }
}
