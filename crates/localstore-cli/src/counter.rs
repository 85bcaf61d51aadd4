//! Click counter

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClickCounter {
    count: u64,
}

impl ClickCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn click(&mut self) {
        self.count = self.count.saturating_add(1);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn label(&self) -> String {
        format!("count is {}", self.count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero() {
        assert_eq!(ClickCounter::new().label(), "count is 0");
    }

    #[test]
    fn test_click_increments() {
        let mut counter = ClickCounter::new();
        counter.click();
        counter.click();
        assert_eq!(counter.count(), 2);
        assert_eq!(counter.label(), "count is 2");
    }
}
