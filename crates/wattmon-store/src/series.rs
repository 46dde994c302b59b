//! Rolling consumption series for chart consumers.

use std::collections::VecDeque;

use wattmon_types::ConsumptionPoint;

/// Fixed-capacity rolling window of consumption points.
///
/// Appending at capacity drops the oldest point, so the window length
/// stays stable for chart rendering.
#[derive(Debug, Clone)]
pub struct ConsumptionSeries {
    points: VecDeque<ConsumptionPoint>,
    capacity: usize,
}

impl ConsumptionSeries {
    /// Default window length for the realtime series.
    pub const DEFAULT_CAPACITY: usize = 6;

    /// Create an empty series with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Create a series seeded with `points`, keeping at most `capacity`
    /// of the newest ones.
    pub fn from_points(points: Vec<ConsumptionPoint>, capacity: usize) -> Self {
        let mut series = Self::new(capacity);
        for point in points {
            series.push(point);
        }
        series
    }

    /// Append a point, dropping the oldest when at capacity.
    pub fn push(&mut self, point: ConsumptionPoint) {
        if self.capacity == 0 {
            return;
        }
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    /// Iterate points oldest-first.
    pub fn points(&self) -> impl Iterator<Item = &ConsumptionPoint> {
        self.points.iter()
    }

    /// Copy the window into a vector, oldest-first.
    pub fn to_vec(&self) -> Vec<ConsumptionPoint> {
        self.points.iter().cloned().collect()
    }

    /// Number of points currently held.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the window is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(time: &str, consumption: f64) -> ConsumptionPoint {
        ConsumptionPoint {
            time: time.to_string(),
            consumption,
            efficiency: 90,
        }
    }

    #[test]
    fn test_push_below_capacity() {
        let mut series = ConsumptionSeries::new(3);
        series.push(point("00:00", 245.0));
        series.push(point("04:00", 189.0));
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_push_at_capacity_drops_oldest() {
        let mut series = ConsumptionSeries::new(2);
        series.push(point("00:00", 245.0));
        series.push(point("04:00", 189.0));
        series.push(point("08:00", 312.0));
        assert_eq!(series.len(), 2);
        let times: Vec<&str> = series.points().map(|p| p.time.as_str()).collect();
        assert_eq!(times, vec!["04:00", "08:00"]);
    }

    #[test]
    fn test_from_points_keeps_newest() {
        let series = ConsumptionSeries::from_points(
            vec![point("a", 1.0), point("b", 2.0), point("c", 3.0)],
            2,
        );
        let times: Vec<&str> = series.points().map(|p| p.time.as_str()).collect();
        assert_eq!(times, vec!["b", "c"]);
    }

    #[test]
    fn test_zero_capacity_stays_empty() {
        let mut series = ConsumptionSeries::new(0);
        series.push(point("00:00", 245.0));
        assert!(series.is_empty());
    }
}
