//! Core type definitions for shard statistics

use serde::{Deserialize, Serialize};

/// Statistics for one topic as observed in a single shard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicStat {
    pub name: String,
    #[serde(rename = "type")]
    pub topic_type: String,
    pub serialization_format: String,
    pub message_count: u64,
    /// Opaque serialized QoS description, passed through untouched
    pub offered_qos_profiles: String,
}

/// Inclusive timestamp range (nanoseconds) covering at least one message
///
/// An archive or shard without messages has no bounds at all, which is
/// modelled as `Option<TimeBounds>::None` rather than with numeric sentinels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBounds {
    min: i64,
    max: i64,
}

impl TimeBounds {
    /// Create bounds from two timestamps, in either order
    pub fn new(a: i64, b: i64) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Bounds of a single instant
    pub fn at(timestamp: i64) -> Self {
        Self::new(timestamp, timestamp)
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    /// `max - min`, saturating so that extreme timestamps cannot overflow
    pub fn duration(&self) -> i64 {
        self.max.saturating_sub(self.min)
    }

    /// Smallest range covering both `self` and `other`
    pub fn merge(self, other: TimeBounds) -> TimeBounds {
        TimeBounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Merge two optional ranges, treating `None` as the empty range
    pub fn merge_opt(a: Option<TimeBounds>, b: Option<TimeBounds>) -> Option<TimeBounds> {
        match (a, b) {
            (Some(a), Some(b)) => Some(a.merge(b)),
            (a, None) => a,
            (None, b) => b,
        }
    }
}

/// Aggregate statistics for one shard file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShardStats {
    pub topics: Vec<TopicStat>,
    pub bounds: Option<TimeBounds>,
}

impl ShardStats {
    /// Earliest message timestamp in the shard, if any message exists
    pub fn min_timestamp(&self) -> Option<i64> {
        self.bounds.map(|b| b.min())
    }

    /// Latest message timestamp in the shard, if any message exists
    pub fn max_timestamp(&self) -> Option<i64> {
        self.bounds.map(|b| b.max())
    }

    /// Total messages across all topics in the shard
    pub fn message_count(&self) -> u64 {
        self.topics.iter().map(|t| t.message_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_new_orders_arguments() {
        let b = TimeBounds::new(50, 10);
        assert_eq!(b.min(), 10);
        assert_eq!(b.max(), 50);
        assert_eq!(b.duration(), 40);
    }

    #[test]
    fn test_merge_is_order_independent() {
        let a = TimeBounds::new(10, 30);
        let b = TimeBounds::new(25, 60);
        let c = TimeBounds::at(5);

        let left = a.merge(b).merge(c);
        let right = c.merge(b).merge(a);
        assert_eq!(left, right);
        assert_eq!(left, TimeBounds::new(5, 60));
    }

    #[test]
    fn test_merge_opt_with_absent_bounds() {
        let a = Some(TimeBounds::new(10, 20));
        assert_eq!(TimeBounds::merge_opt(a, None), a);
        assert_eq!(TimeBounds::merge_opt(None, a), a);
        assert_eq!(TimeBounds::merge_opt(None, None), None);
    }

    #[test]
    fn test_duration_saturates_at_extremes() {
        let b = TimeBounds::new(i64::MIN, i64::MAX);
        assert_eq!(b.duration(), i64::MAX);
    }

    #[test]
    fn test_empty_shard_stats_have_no_bounds() {
        let stats = ShardStats::default();
        assert!(stats.is_empty());
        assert_eq!(stats.min_timestamp(), None);
        assert_eq!(stats.max_timestamp(), None);
        assert_eq!(stats.message_count(), 0);
    }

    #[test]
    fn test_topic_stat_serializes_type_field() {
        let stat = TopicStat {
            name: "/a".to_string(),
            topic_type: "std_msgs/msg/String".to_string(),
            serialization_format: "cdr".to_string(),
            message_count: 5,
            offered_qos_profiles: String::new(),
        };
        let json = serde_json::to_value(&stat).unwrap();
        assert_eq!(json["type"], "std_msgs/msg/String");
        assert_eq!(json["message_count"], 5);
    }
}
