//! Public Activity Feed

use std::sync::Arc;

use crate::domain::entity::activity::Activity;
use crate::domain::repository::ActivityRepository;
use crate::error::AccountsResult;

pub const DEFAULT_FEED_LIMIT: i64 = 20;
pub const MAX_FEED_LIMIT: i64 = 50;

pub struct RecentActivityUseCase<A>
where
    A: ActivityRepository,
{
    activity_repo: Arc<A>,
}

impl<A> RecentActivityUseCase<A>
where
    A: ActivityRepository,
{
    pub fn new(activity_repo: Arc<A>) -> Self {
        Self { activity_repo }
    }

    /// Newest first; `limit` is clamped to `1..=50`
    pub async fn execute(&self, limit: Option<i64>) -> AccountsResult<Vec<Activity>> {
        let limit = limit.unwrap_or(DEFAULT_FEED_LIMIT).clamp(1, MAX_FEED_LIMIT);
        self.activity_repo.recent(limit).await
    }
}
