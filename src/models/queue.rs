use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Title;

/// Maximum number of titles offered per day
pub const QUEUE_SIZE: usize = 5;

/// The day's stack of candidates. The last element is the top card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyQueue {
    pub date: NaiveDate,
    pub titles: Vec<Title>,
}

impl DailyQueue {
    /// Creates a queue for `date`, keeping at most [`QUEUE_SIZE`] titles
    pub fn new(date: NaiveDate, mut titles: Vec<Title>) -> Self {
        titles.truncate(QUEUE_SIZE);
        Self { date, titles }
    }

    pub fn is_for(&self, today: NaiveDate) -> bool {
        self.date == today
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn top(&self) -> Option<&Title> {
        self.titles.last()
    }

    /// Removes and returns the top card
    pub fn pop(&mut self) -> Option<Title> {
        self.titles.pop()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.titles.iter().any(|t| t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::title::sample_title;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[test]
    fn test_new_truncates_to_queue_size() {
        let titles = (0..8).map(|i| sample_title(&format!("tt{}", i), "7.5")).collect();
        let queue = DailyQueue::new(day(1), titles);
        assert_eq!(queue.len(), QUEUE_SIZE);
    }

    #[test]
    fn test_pop_takes_top_card() {
        let mut queue = DailyQueue::new(
            day(1),
            vec![sample_title("tt1", "7.0"), sample_title("tt2", "7.0")],
        );
        assert_eq!(queue.top().map(|t| t.id.as_str()), Some("tt2"));
        assert_eq!(queue.pop().map(|t| t.id), Some("tt2".to_string()));
        assert_eq!(queue.pop().map(|t| t.id), Some("tt1".to_string()));
        assert!(queue.pop().is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_is_for_date() {
        let queue = DailyQueue::new(day(1), Vec::new());
        assert!(queue.is_for(day(1)));
        assert!(!queue.is_for(day(2)));
    }
}
