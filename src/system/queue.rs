use std::cmp::Reverse;
use std::collections::VecDeque;

use crate::command::QueueItem;

/// Play order of pending clips. The head is the clip playing (or about to play); it leaves
/// the queue only when it finishes or is skipped.
#[derive(Debug, Default)]
pub(crate) struct ClipQueue {
    items: VecDeque<QueueItem>,
}

impl ClipQueue {
    /// Append `item` and restore priority order over `items[pinned..]`: high clips before
    /// normal ones, arrival order kept inside each tier. `pinned` leading items are left
    /// where they are (the clip currently playing).
    pub fn push(&mut self, item: QueueItem, pinned: usize) {
        self.items.push_back(item);
        let pinned = pinned.min(self.items.len());
        // slice sort is stable
        self.items.make_contiguous()[pinned..].sort_by_key(|item| Reverse(item.priority()));
    }

    /// Put `item` ahead of everything, regardless of priority.
    pub fn push_front(&mut self, item: QueueItem) {
        self.items.push_front(item);
    }

    pub fn head(&self) -> Option<&QueueItem> {
        self.items.front()
    }

    pub fn pop_head(&mut self) -> Option<QueueItem> {
        self.items.pop_front()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn to_vec(&self) -> Vec<QueueItem> {
        self.items.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::ClipQueue;
    use crate::command::QueueItem;

    fn identifiers(queue: &ClipQueue) -> Vec<String> {
        queue
            .to_vec()
            .iter()
            .map(|item| item.identifier().to_string())
            .collect()
    }

    #[test]
    fn fifo_within_tier() {
        let mut queue = ClipQueue::default();
        queue.push(QueueItem::normal("a"), 0);
        queue.push(QueueItem::normal("b"), 0);
        queue.push(QueueItem::normal("c"), 0);
        assert_eq!(identifiers(&queue), ["a", "b", "c"]);
    }

    #[test]
    fn high_overtakes_normal_but_not_high() {
        let mut queue = ClipQueue::default();
        queue.push(QueueItem::normal("n1"), 0);
        queue.push(QueueItem::high("h1"), 0);
        queue.push(QueueItem::normal("n2"), 0);
        queue.push(QueueItem::high("h2"), 0);
        assert_eq!(identifiers(&queue), ["h1", "h2", "n1", "n2"]);
    }

    #[test]
    fn pinned_head_stays_put() {
        let mut queue = ClipQueue::default();
        queue.push(QueueItem::normal("playing"), 0);
        queue.push(QueueItem::normal("next"), 1);
        queue.push(QueueItem::high("urgent"), 1);
        assert_eq!(identifiers(&queue), ["playing", "urgent", "next"]);
    }

    #[test]
    fn push_front_bypasses_priority() {
        let mut queue = ClipQueue::default();
        queue.push(QueueItem::high("h"), 0);
        queue.push_front(QueueItem::normal("n"));
        assert_eq!(identifiers(&queue), ["n", "h"]);
        assert_eq!(queue.pop_head().unwrap().identifier(), "n");
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn no_normal_ahead_of_pending_high() {
        let mut queue = ClipQueue::default();
        let arrivals = ["n", "h", "n", "n", "h", "h", "n", "h"];
        for (i, tier) in arrivals.iter().enumerate() {
            let id = format!("{}{}", tier, i);
            let item = if *tier == "h" {
                QueueItem::high(id)
            } else {
                QueueItem::normal(id)
            };
            queue.push(item, 0);
            let order = identifiers(&queue);
            let first_normal = order.iter().position(|id| id.starts_with('n'));
            let last_high = order.iter().rposition(|id| id.starts_with('h'));
            if let (Some(n), Some(h)) = (first_normal, last_high) {
                assert!(h < n, "high behind normal in {:?}", order);
            }
        }
        assert_eq!(
            identifiers(&queue),
            ["h1", "h4", "h5", "h7", "n0", "n2", "n3", "n6"]
        );
    }
}
