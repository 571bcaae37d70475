//! 优先级边界
//!
//! `priority-queue` 要求优先级实现 `Ord`，这里用 `total_cmp` 包装浮点键，
//! 键相同时按插入序号先进先出。

use priority_queue::PriorityQueue;
use std::cmp::{Ordering, Reverse};

/// (键, 插入序号)
#[derive(Debug, Clone, Copy)]
pub struct Rank {
    pub key: f64,
    pub seq: usize,
}

impl PartialEq for Rank {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Rank {}

impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key
            .total_cmp(&other.key)
            .then(self.seq.cmp(&other.seq))
    }
}

/// 最小优先队列：元素为节点下标，弹出键最小者
pub struct MinFrontier {
    queue: PriorityQueue<usize, Reverse<Rank>>,
}

impl MinFrontier {
    pub fn new() -> Self {
        Self {
            queue: PriorityQueue::new(),
        }
    }

    /// 插入或降低键值；已有更小键时保持不变
    pub fn offer(&mut self, item: usize, key: f64, seq: usize) -> bool {
        let rank = Reverse(Rank { key, seq });
        match self.queue.get_priority(&item) {
            Some(existing) if *existing >= rank => false,
            _ => {
                self.queue.push(item, rank);
                true
            }
        }
    }

    pub fn pop(&mut self) -> Option<(usize, Rank)> {
        self.queue.pop().map(|(item, Reverse(rank))| (item, rank))
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

impl Default for MinFrontier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pops_smallest_key_then_oldest() {
        let mut frontier = MinFrontier::new();
        frontier.offer(1, 5.0, 0);
        frontier.offer(2, 3.0, 1);
        frontier.offer(3, 3.0, 2);
        assert_eq!(frontier.len(), 3);

        assert_eq!(frontier.pop().map(|(i, _)| i), Some(2));
        assert_eq!(frontier.pop().map(|(i, _)| i), Some(3));
        assert_eq!(frontier.pop().map(|(i, _)| i), Some(1));
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_offer_only_decreases() {
        let mut frontier = MinFrontier::new();
        assert!(frontier.offer(7, 4.0, 0));
        assert!(!frontier.offer(7, 9.0, 1));
        assert!(frontier.offer(7, 1.0, 2));
        let (item, rank) = frontier.pop().unwrap();
        assert_eq!(item, 7);
        assert_eq!(rank.key, 1.0);
        assert_eq!(rank.seq, 2);
    }
}
