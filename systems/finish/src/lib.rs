#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Finish bookkeeping system that decides which blocks rest on accepted finish cells.

use std::collections::{BTreeMap, BTreeSet};

use blockslide_core::{BlockId, BlockSnapshot, BlockView, CellCoord, Event};

/// Configuration parameters required to construct the finish tracker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Config {
    lock_on_first_finish: bool,
}

impl Config {
    /// Creates a configuration that optionally locks blocks once they first finish.
    #[must_use]
    pub const fn new(lock_on_first_finish: bool) -> Self {
        Self {
            lock_on_first_finish,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct FinishEntry {
    finished: bool,
    locked: bool,
}

/// Stateful system that re-evaluates finish status after every settled turn.
///
/// Non-universal blocks finish on their own primary or additional finish
/// cells; universal blocks finish on any cell in the shared pool of every
/// block's finish cells. Status is recomputed from scratch each evaluation so
/// a block that leaves its finish cell becomes unfinished again.
#[derive(Debug, Default)]
pub struct FinishTracker {
    lock_on_first_finish: bool,
    entries: BTreeMap<BlockId, FinishEntry>,
    unfinished: usize,
}

impl FinishTracker {
    /// Creates a tracker using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            lock_on_first_finish: config.lock_on_first_finish,
            entries: BTreeMap::new(),
            unfinished: 0,
        }
    }

    /// Re-evaluates every block and emits an event for each status flip.
    ///
    /// Blocks seen for the first time start out unfinished. When locking is
    /// configured, a controllable block that finishes for the first time also
    /// produces [`Event::BlockLocked`].
    pub fn evaluate(&mut self, blocks: &BlockView, out: &mut Vec<Event>) {
        let pool = shared_finish_pool(blocks);

        for block in blocks.iter() {
            let entry = self.entries.entry(block.id).or_insert_with(|| {
                self.unfinished += 1;
                FinishEntry::default()
            });

            let now_finished = if block.universal {
                pool.contains(&block.cell)
            } else {
                block.finish_cells().any(|cell| cell == block.cell)
            };

            if now_finished == entry.finished {
                continue;
            }

            entry.finished = now_finished;
            if now_finished {
                self.unfinished = self.unfinished.saturating_sub(1);
                out.push(Event::BlockFinished { block: block.id });
                if self.lock_on_first_finish && !entry.locked {
                    entry.locked = true;
                    if block.controllable {
                        out.push(Event::BlockLocked { block: block.id });
                    }
                }
            } else {
                self.unfinished += 1;
                out.push(Event::BlockUnfinished { block: block.id });
            }
        }
    }

    /// Number of tracked blocks that are not finished.
    #[must_use]
    pub fn unfinished_count(&self) -> usize {
        self.unfinished
    }

    /// Number of tracked blocks that are finished.
    #[must_use]
    pub fn finished_count(&self) -> usize {
        self.entries.len() - self.unfinished
    }

    /// Reports whether the provided block is finished.
    #[must_use]
    pub fn is_finished(&self, block: BlockId) -> bool {
        self.entries
            .get(&block)
            .is_some_and(|entry| entry.finished)
    }

    /// Reports whether at least one block is tracked and all of them are finished.
    #[must_use]
    pub fn all_finished(&self) -> bool {
        !self.entries.is_empty() && self.unfinished == 0
    }
}

fn shared_finish_pool(blocks: &BlockView) -> BTreeSet<CellCoord> {
    blocks
        .iter()
        .flat_map(BlockSnapshot::finish_cells)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(id: u32, cell: CellCoord, finish: CellCoord) -> BlockSnapshot {
        BlockSnapshot {
            id: BlockId::new(id),
            cell,
            finish,
            extra_finishes: Vec::new(),
            universal: false,
            collide_with_walls: true,
            collide_with_blocks: true,
            finished: false,
            controllable: true,
            speed: 5.0,
        }
    }

    #[test]
    fn new_blocks_start_unfinished() {
        let mut tracker = FinishTracker::default();
        let view = BlockView::from_snapshots(vec![
            snapshot(0, CellCoord::new(1, 1), CellCoord::new(3, 3)),
            snapshot(1, CellCoord::new(2, 1), CellCoord::new(3, 2)),
        ]);
        let mut events = Vec::new();

        tracker.evaluate(&view, &mut events);

        assert!(events.is_empty());
        assert_eq!(tracker.unfinished_count(), 2);
        assert_eq!(tracker.finished_count(), 0);
        assert!(!tracker.all_finished());
    }

    #[test]
    fn empty_tracker_is_never_complete() {
        let tracker = FinishTracker::default();
        assert!(!tracker.all_finished());
    }
}
