//! Coalescing of overlapping and back-to-back intervals.
//!
//! The merged runs are what the grid draws and what the weekly total sums, so
//! overlapping manual entries are never counted twice.

use std::collections::BTreeMap;

use super::interval::Interval;
use super::time::{TimeOfDay, Weekday};

/// A run on one weekday in absolute minutes; `end_min` may pass 1440.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Block {
    pub day: Weekday,
    pub start_min: u32,
    pub end_min: u32,
}

impl Block {
    pub fn start(&self) -> TimeOfDay {
        TimeOfDay::from_minutes(self.start_min)
    }

    pub fn end(&self) -> TimeOfDay {
        TimeOfDay::from_minutes(self.end_min)
    }

    pub fn duration_minutes(&self) -> u32 {
        self.end_min - self.start_min
    }

    pub fn contains_minute(&self, minute: u32) -> bool {
        minute >= self.start_min && minute < self.end_min
    }
}

impl From<&Interval> for Block {
    fn from(interval: &Interval) -> Self {
        Block {
            day: interval.day,
            start_min: interval.start_min(),
            end_min: interval.effective_end_min(),
        }
    }
}

/// A merged block together with the items it was built from.
#[derive(Debug, Clone)]
pub struct Run<'a, T> {
    pub block: Block,
    pub members: Vec<&'a T>,
}

/// Groups `items` by weekday, sorts each group by start (stable) and sweeps,
/// extending the current run while the next start is `<=` its end.
pub fn merge_with<'a, T, F>(items: &'a [T], block_of: F) -> Vec<Run<'a, T>>
where
    F: Fn(&T) -> Block,
{
    let mut by_day: BTreeMap<Weekday, Vec<(Block, &'a T)>> = BTreeMap::new();
    for item in items {
        let block = block_of(item);
        by_day.entry(block.day).or_default().push((block, item));
    }

    let mut runs = Vec::new();
    for (_, mut entries) in by_day {
        entries.sort_by_key(|(block, _)| block.start_min);

        let mut iter = entries.into_iter();
        let Some((first, first_item)) = iter.next() else {
            continue;
        };
        let mut current = Run {
            block: first,
            members: vec![first_item],
        };

        for (next, item) in iter {
            if next.start_min <= current.block.end_min {
                current.block.end_min = current.block.end_min.max(next.end_min);
                current.members.push(item);
            } else {
                runs.push(std::mem::replace(
                    &mut current,
                    Run {
                        block: next,
                        members: vec![item],
                    },
                ));
            }
        }
        runs.push(current);
    }
    runs
}

pub fn merge(intervals: &[Interval]) -> Vec<Block> {
    merge_with(intervals, |interval| Block::from(interval))
        .into_iter()
        .map(|run| run.block)
        .collect()
}

pub fn merge_blocks(blocks: &[Block]) -> Vec<Block> {
    merge_with(blocks, |b| *b)
        .into_iter()
        .map(|run| run.block)
        .collect()
}

pub fn total_minutes(blocks: &[Block]) -> u32 {
    blocks.iter().map(Block::duration_minutes).sum()
}
