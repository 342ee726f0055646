use crate::models::restaurant::RestaurantRecord;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QualityThresholds {
    pub min_rating: f64,
    pub min_reviews: u64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            min_rating: 4.0,
            min_reviews: 100,
        }
    }
}

impl QualityThresholds {
    /// A record missing its rating or review count never passes, whatever
    /// the thresholds.
    pub fn accepts(&self, record: &RestaurantRecord) -> bool {
        record.rating.map_or(false, |rating| rating >= self.min_rating)
            && record
                .review_count
                .map_or(false, |reviews| reviews >= self.min_reviews)
    }
}

/// Keeps the records meeting `thresholds`, in their original order.
pub fn filter_by_quality(
    records: Vec<RestaurantRecord>,
    thresholds: &QualityThresholds,
) -> Vec<RestaurantRecord> {
    records
        .into_iter()
        .filter(|record| thresholds.accepts(record))
        .collect()
}
