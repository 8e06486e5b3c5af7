//! Limit/offset pagination for list endpoints

use serde::Deserialize;

/// Pagination query parameters
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ListParams {
    /// Maximum number of items to return
    pub limit: Option<i64>,

    /// Number of items to skip
    pub offset: Option<i64>,
}

impl ListParams {
    /// Default page size when the caller does not specify one
    pub const DEFAULT_LIMIT: i64 = 5;

    /// Maximum allowed page size
    pub const MAX_LIMIT: i64 = 100;

    /// Returns the clamped SQL LIMIT
    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }

    /// Returns the SQL OFFSET (never negative)
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let params = ListParams::default();
        assert_eq!(params.limit(), 5);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn limit_is_clamped_to_bounds() {
        let params = ListParams {
            limit: Some(1000),
            offset: Some(-3),
        };
        assert_eq!(params.limit(), ListParams::MAX_LIMIT);
        assert_eq!(params.offset(), 0);

        let params = ListParams {
            limit: Some(0),
            offset: None,
        };
        assert_eq!(params.limit(), 1);
    }
}
