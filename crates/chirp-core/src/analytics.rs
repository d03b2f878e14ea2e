//! Analytics engine - read-only aggregation views over one owner's posts.
//!
//! Four named operations (overview, trend, top-N, hourly profile) with
//! fixed input/output shapes. Each is a pure function over the owner's
//! fetched posts; `AnalyticsEngine` wraps them behind the repository port.
//! Nothing here ever mutates a post. Day and hour bucketing uses UTC.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeDelta, Timelike, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Engagement, Post, PostStatus};
use crate::error::RepoError;
use crate::ports::PostRepository;

/// Default number of entries returned by the top-posts ranking.
pub const DEFAULT_TOP_LIMIT: usize = 10;

/// Supported trend lookback windows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrendWindow {
    #[default]
    Days7,
    Days30,
    Days90,
}

impl TrendWindow {
    /// Parse a window from its query form ("7d", "30d", "90d").
    /// Unrecognized input falls back to the 7-day default.
    pub fn parse(s: &str) -> Self {
        match s {
            "30d" => TrendWindow::Days30,
            "90d" => TrendWindow::Days90,
            _ => TrendWindow::Days7,
        }
    }

    pub fn days(self) -> i64 {
        match self {
            TrendWindow::Days7 => 7,
            TrendWindow::Days30 => 30,
            TrendWindow::Days90 => 90,
        }
    }

    pub fn duration(self) -> TimeDelta {
        TimeDelta::days(self.days())
    }
}

/// Counts by status plus engagement totals across published posts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Overview {
    pub total_posts: u64,
    pub scheduled_posts: u64,
    pub posted_posts: u64,
    pub engagement: Engagement,
}

/// One calendar day of the trend series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub posts: u64,
    pub engagement: Engagement,
}

/// One entry of the top-posts ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopPost {
    pub id: Uuid,
    pub content: String,
    pub engagement: Engagement,
    pub posted_at: DateTime<Utc>,
}

/// One hour-of-day bucket of the posting-performance profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HourlyBucket {
    /// Hour of day, 0-23, in UTC.
    pub hour: u32,
    pub posts: u64,
    /// Average of likes + retweets + replies per post in this hour.
    pub avg_interactions: f64,
}

/// Counts of posts by status plus engagement sums over published posts.
/// Zero posted posts yields zero sums, not an error.
pub fn overview(posts: &[Post]) -> Overview {
    let mut result = Overview {
        total_posts: posts.len() as u64,
        ..Overview::default()
    };

    for post in posts {
        match post.status {
            PostStatus::Scheduled => result.scheduled_posts += 1,
            PostStatus::Posted => {
                result.posted_posts += 1;
                result.engagement.add(&post.engagement);
            }
            _ => {}
        }
    }

    result
}

/// Daily counts and engagement sums over published posts within
/// `[now - window, now]`. Days without posts are omitted; the series is
/// ascending by date.
pub fn trend(posts: &[Post], window: TrendWindow, now: DateTime<Utc>) -> Vec<TrendPoint> {
    let start = now - window.duration();
    let mut days: BTreeMap<NaiveDate, (u64, Engagement)> = BTreeMap::new();

    for post in posts {
        if post.status != PostStatus::Posted {
            continue;
        }
        let Some(posted_at) = post.posted_at else {
            continue;
        };
        if posted_at < start || posted_at > now {
            continue;
        }

        let bucket = days.entry(posted_at.date_naive()).or_default();
        bucket.0 += 1;
        bucket.1.add(&post.engagement);
    }

    days.into_iter()
        .map(|(date, (count, engagement))| TrendPoint {
            date,
            posts: count,
            engagement,
        })
        .collect()
}

/// The `limit` published posts with the highest impressions, ties broken
/// by earliest creation. Returns at most `min(limit, posted)` entries.
pub fn top_posts(posts: &[Post], limit: usize) -> Vec<TopPost> {
    let mut posted: Vec<&Post> = posts
        .iter()
        .filter(|p| p.status == PostStatus::Posted && p.posted_at.is_some())
        .collect();

    posted.sort_by(|a, b| {
        b.engagement
            .impressions
            .cmp(&a.engagement.impressions)
            .then(a.created_at.cmp(&b.created_at))
    });

    posted
        .into_iter()
        .take(limit)
        .map(|post| TopPost {
            id: post.id,
            content: post.content.clone(),
            engagement: post.engagement,
            // filtered on Some above
            posted_at: post.posted_at.unwrap_or(post.created_at),
        })
        .collect()
}

/// Post count and average interactions per UTC hour-of-day across
/// published posts. Hours with zero posts are omitted; ascending by hour.
pub fn hourly_profile(posts: &[Post]) -> Vec<HourlyBucket> {
    let mut hours: BTreeMap<u32, (u64, u64)> = BTreeMap::new();

    for post in posts {
        if post.status != PostStatus::Posted {
            continue;
        }
        let Some(posted_at) = post.posted_at else {
            continue;
        };

        let bucket = hours.entry(posted_at.hour()).or_default();
        bucket.0 += 1;
        bucket.1 += post.engagement.interactions();
    }

    hours
        .into_iter()
        .map(|(hour, (count, interactions))| HourlyBucket {
            hour,
            posts: count,
            avg_interactions: interactions as f64 / count as f64,
        })
        .collect()
}

/// Read-side service: loads an owner's posts through the repository and
/// runs the aggregation above. Store failures surface to the caller as-is;
/// no partial or stale result is substituted.
pub struct AnalyticsEngine {
    posts: Arc<dyn PostRepository>,
}

impl AnalyticsEngine {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    pub async fn overview(&self, owner_id: Uuid) -> Result<Overview, RepoError> {
        let posts = self.posts.list_by_owner(owner_id, None, None).await?;
        Ok(overview(&posts))
    }

    pub async fn trend(
        &self,
        owner_id: Uuid,
        window: TrendWindow,
        now: DateTime<Utc>,
    ) -> Result<Vec<TrendPoint>, RepoError> {
        let posts = self
            .posts
            .list_by_owner(owner_id, Some(PostStatus::Posted), None)
            .await?;
        Ok(trend(&posts, window, now))
    }

    pub async fn top_posts(&self, owner_id: Uuid, limit: usize) -> Result<Vec<TopPost>, RepoError> {
        let posts = self
            .posts
            .list_by_owner(owner_id, Some(PostStatus::Posted), None)
            .await?;
        Ok(top_posts(&posts, limit))
    }

    pub async fn hourly_profile(&self, owner_id: Uuid) -> Result<Vec<HourlyBucket>, RepoError> {
        let posts = self
            .posts
            .list_by_owner(owner_id, Some(PostStatus::Posted), None)
            .await?;
        Ok(hourly_profile(&posts))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn posted(
        owner: Uuid,
        posted_at: DateTime<Utc>,
        created_at: DateTime<Utc>,
        engagement: Engagement,
    ) -> Post {
        Post {
            id: Uuid::new_v4(),
            owner_id: owner,
            content: "posted".to_string(),
            scheduled_time: posted_at,
            status: PostStatus::Posted,
            ai_generated: false,
            engagement,
            created_at,
            posted_at: Some(posted_at),
        }
    }

    fn scheduled(owner: Uuid, scheduled_time: DateTime<Utc>) -> Post {
        Post::new(owner, "pending".to_string(), scheduled_time, false).unwrap()
    }

    fn at(y: i32, mo: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap()
    }

    fn counters(likes: u64, retweets: u64, replies: u64, impressions: u64) -> Engagement {
        Engagement {
            likes,
            retweets,
            replies,
            impressions,
        }
    }

    #[test]
    fn overview_with_no_posted_posts_sums_to_zero() {
        let owner = Uuid::new_v4();
        let posts = vec![
            scheduled(owner, at(2026, 8, 1, 9)),
            scheduled(owner, at(2026, 8, 2, 9)),
        ];

        let result = overview(&posts);

        assert_eq!(result.total_posts, 2);
        assert_eq!(result.scheduled_posts, 2);
        assert_eq!(result.posted_posts, 0);
        assert_eq!(result.engagement, Engagement::default());
    }

    #[test]
    fn overview_sums_engagement_over_posted_only() {
        let owner = Uuid::new_v4();
        let mut cancelled = scheduled(owner, at(2026, 8, 1, 9));
        cancelled.status = PostStatus::Cancelled;
        // Counters on a non-posted post must not leak into the totals.
        cancelled.engagement = counters(100, 100, 100, 100);

        let posts = vec![
            posted(owner, at(2026, 8, 1, 10), at(2026, 7, 30, 0), counters(3, 1, 2, 50)),
            posted(owner, at(2026, 8, 2, 11), at(2026, 7, 30, 1), counters(7, 0, 1, 150)),
            cancelled,
        ];

        let result = overview(&posts);

        assert_eq!(result.total_posts, 3);
        assert_eq!(result.posted_posts, 2);
        assert_eq!(result.engagement, counters(10, 1, 3, 200));
    }

    #[test]
    fn trend_over_empty_window_is_empty() {
        let owner = Uuid::new_v4();
        let now = at(2026, 8, 6, 12);
        // Posted, but well before the 7-day window opens.
        let posts = vec![posted(
            owner,
            at(2026, 6, 1, 10),
            at(2026, 5, 31, 0),
            counters(5, 0, 0, 10),
        )];

        assert!(trend(&posts, TrendWindow::Days7, now).is_empty());
    }

    #[test]
    fn trend_groups_by_day_sparse_and_ascending() {
        let owner = Uuid::new_v4();
        let now = at(2026, 8, 6, 12);
        let posts = vec![
            posted(owner, at(2026, 8, 4, 18), at(2026, 8, 1, 0), counters(1, 0, 0, 10)),
            posted(owner, at(2026, 8, 1, 9), at(2026, 8, 1, 1), counters(2, 1, 0, 20)),
            posted(owner, at(2026, 8, 4, 7), at(2026, 8, 1, 2), counters(4, 0, 1, 30)),
            // Outside the window entirely.
            posted(owner, at(2026, 7, 1, 7), at(2026, 6, 30, 0), counters(9, 9, 9, 9)),
        ];

        let series = trend(&posts, TrendWindow::Days7, now);

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date, NaiveDate::from_ymd_opt(2026, 8, 1).unwrap());
        assert_eq!(series[0].posts, 1);
        assert_eq!(series[1].date, NaiveDate::from_ymd_opt(2026, 8, 4).unwrap());
        assert_eq!(series[1].posts, 2);
        assert_eq!(series[1].engagement, counters(5, 0, 1, 40));
    }

    #[test]
    fn trend_wider_window_includes_older_days() {
        let owner = Uuid::new_v4();
        let now = at(2026, 8, 6, 12);
        let posts = vec![posted(
            owner,
            at(2026, 7, 15, 10),
            at(2026, 7, 14, 0),
            counters(1, 1, 1, 1),
        )];

        assert!(trend(&posts, TrendWindow::Days7, now).is_empty());
        assert_eq!(trend(&posts, TrendWindow::Days30, now).len(), 1);
    }

    #[test]
    fn trend_window_parse_falls_back_to_seven_days() {
        assert_eq!(TrendWindow::parse("7d"), TrendWindow::Days7);
        assert_eq!(TrendWindow::parse("30d"), TrendWindow::Days30);
        assert_eq!(TrendWindow::parse("90d"), TrendWindow::Days90);
        assert_eq!(TrendWindow::parse("365d"), TrendWindow::Days7);
        assert_eq!(TrendWindow::parse(""), TrendWindow::Days7);
    }

    #[test]
    fn top_posts_ranks_by_impressions_with_creation_tiebreak() {
        let owner = Uuid::new_v4();
        let older = posted(owner, at(2026, 8, 1, 10), at(2026, 7, 1, 0), counters(0, 0, 0, 500));
        let newer = posted(owner, at(2026, 8, 2, 10), at(2026, 7, 2, 0), counters(0, 0, 0, 500));
        let leader = posted(owner, at(2026, 8, 3, 10), at(2026, 7, 3, 0), counters(0, 0, 0, 900));

        // Insertion order deliberately scrambled.
        let posts = vec![newer.clone(), leader.clone(), older.clone()];
        let ranking = top_posts(&posts, 10);

        assert_eq!(ranking.len(), 3);
        assert_eq!(ranking[0].id, leader.id);
        // Tie on 500 impressions: earliest creation first.
        assert_eq!(ranking[1].id, older.id);
        assert_eq!(ranking[2].id, newer.id);
    }

    #[test]
    fn top_posts_returns_at_most_limit_and_skips_unposted() {
        let owner = Uuid::new_v4();
        let mut posts: Vec<Post> = (0..5)
            .map(|i| {
                posted(
                    owner,
                    at(2026, 8, 1, 10),
                    at(2026, 7, 1, i),
                    counters(0, 0, 0, 100 + u64::from(i)),
                )
            })
            .collect();
        posts.push(scheduled(owner, at(2026, 9, 1, 0)));

        let ranking = top_posts(&posts, 3);

        assert_eq!(ranking.len(), 3);
        assert_eq!(ranking[0].engagement.impressions, 104);
        assert_eq!(ranking[2].engagement.impressions, 102);
    }

    #[test]
    fn hourly_profile_averages_interactions_per_hour() {
        let owner = Uuid::new_v4();
        let posts = vec![
            posted(owner, at(2026, 8, 1, 9), at(2026, 7, 1, 0), counters(4, 2, 0, 99)),
            posted(owner, at(2026, 8, 3, 9), at(2026, 7, 1, 1), counters(1, 0, 1, 99)),
            posted(owner, at(2026, 8, 2, 17), at(2026, 7, 1, 2), counters(10, 0, 0, 99)),
        ];

        let profile = hourly_profile(&posts);

        assert_eq!(profile.len(), 2);
        assert_eq!(profile[0].hour, 9);
        assert_eq!(profile[0].posts, 2);
        // (6 + 2) / 2; impressions do not count as interactions.
        assert_eq!(profile[0].avg_interactions, 4.0);
        assert_eq!(profile[1].hour, 17);
        assert_eq!(profile[1].posts, 1);
        assert_eq!(profile[1].avg_interactions, 10.0);
    }

    #[test]
    fn hourly_profile_omits_empty_hours() {
        assert!(hourly_profile(&[]).is_empty());
    }
}
