//! Time-limited portfolio listings.

use crate::{Account, AccountId, ListingId, Role};
use chrono::{DateTime, Utc};
use portfoliohub_error::{ValidationError, ValidationErrorKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Listings with more combined likes and views than this count as trending.
pub const TRENDING_THRESHOLD: u64 = 5;

/// Stored listing status.
///
/// Status is never flipped to `Expired` automatically; readers intersect it
/// with `expires_at` (see [`Listing::is_visible_at`]).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ListingStatus {
    /// Published
    Active,
    /// Taken down
    Expired,
    /// Held back by an administrator
    Pending,
}

/// Allowed publication lengths. Each hour costs one credit.
///
/// # Examples
///
/// ```
/// use portfoliohub_core::ListingDuration;
///
/// let d = ListingDuration::try_from(8).unwrap();
/// assert_eq!(d.hours(), 8);
/// assert_eq!(d.credit_cost(), 8);
/// assert!(ListingDuration::try_from(3).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum ListingDuration {
    /// 1 hour
    OneHour,
    /// 2 hours
    TwoHours,
    /// 4 hours
    FourHours,
    /// 8 hours
    EightHours,
    /// 12 hours
    TwelveHours,
    /// 24 hours
    OneDay,
}

impl ListingDuration {
    /// Every selectable duration, shortest first.
    pub const ALL: [ListingDuration; 6] = [
        ListingDuration::OneHour,
        ListingDuration::TwoHours,
        ListingDuration::FourHours,
        ListingDuration::EightHours,
        ListingDuration::TwelveHours,
        ListingDuration::OneDay,
    ];

    /// Length in hours.
    pub fn hours(self) -> u32 {
        match self {
            ListingDuration::OneHour => 1,
            ListingDuration::TwoHours => 2,
            ListingDuration::FourHours => 4,
            ListingDuration::EightHours => 8,
            ListingDuration::TwelveHours => 12,
            ListingDuration::OneDay => 24,
        }
    }

    /// Credits charged for this duration.
    pub fn credit_cost(self) -> i64 {
        i64::from(self.hours())
    }

    /// Duration as a time span.
    pub fn as_duration(self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.hours()))
    }
}

impl TryFrom<u32> for ListingDuration {
    type Error = ValidationError;

    fn try_from(hours: u32) -> Result<Self, Self::Error> {
        ListingDuration::ALL
            .into_iter()
            .find(|d| d.hours() == hours)
            .ok_or_else(|| ValidationError::new(ValidationErrorKind::InvalidDuration(hours)))
    }
}

impl From<ListingDuration> for u32 {
    fn from(duration: ListingDuration) -> Self {
        duration.hours()
    }
}

impl fmt::Display for ListingDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h", self.hours())
    }
}

/// Split a comma-separated tag string, trimming each tag and dropping empties.
///
/// # Examples
///
/// ```
/// use portfoliohub_core::parse_tags;
///
/// assert_eq!(parse_tags(" ui, ,branding,3d "), vec!["ui", "branding", "3d"]);
/// assert!(parse_tags("").is_empty());
/// ```
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// User-supplied listing fields, before credits are spent.
///
/// # Examples
///
/// ```
/// use portfoliohub_core::ListingDraft;
///
/// let draft = ListingDraft::builder()
///     .title("Brand refresh")
///     .description("Logo and palette work")
///     .image_url("https://example.com/cover.png")
///     .tags("branding, logo")
///     .build()
///     .unwrap();
/// assert!(draft.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into))]
pub struct ListingDraft {
    /// Listing title
    pub title: String,
    /// Listing description
    pub description: String,
    /// Cover image URL
    pub image_url: String,
    /// Comma-separated tags as typed by the user
    #[builder(default)]
    pub tags: String,
}

impl ListingDraft {
    /// Creates a new builder for `ListingDraft`.
    pub fn builder() -> ListingDraftBuilder {
        ListingDraftBuilder::default()
    }

    /// Check required fields and the image URL.
    ///
    /// # Errors
    ///
    /// `MissingField` for a blank title, description or image URL, and
    /// `InvalidUrl` when the image URL is not an absolute http(s) URL.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("title", &self.title),
            ("description", &self.description),
            ("imageUrl", &self.image_url),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::new(ValidationErrorKind::MissingField(
                    field.to_string(),
                )));
            }
        }

        let invalid = || {
            ValidationError::new(ValidationErrorKind::InvalidUrl {
                field: "imageUrl".to_string(),
                value: self.image_url.clone(),
            })
        };
        let parsed = url::Url::parse(self.image_url.trim()).map_err(|_| invalid())?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(invalid());
        }
        Ok(())
    }
}

/// A portfolio publication, visible only while active and unexpired.
///
/// Stored in the `portfolios` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// Listing id
    pub id: ListingId,
    /// Title
    pub title: String,
    /// Description
    pub description: String,
    /// Cover image URL
    pub image_url: String,
    /// Ordered tags
    pub tags: Vec<String>,
    /// Creator account
    pub creator_id: AccountId,
    /// Creator display name at publication time
    pub creator_name: String,
    /// Creator role at publication time
    pub creator_role: Role,
    /// Publication time
    pub created_at: DateTime<Utc>,
    /// End of visibility
    pub expires_at: DateTime<Utc>,
    /// Stored status
    pub status: ListingStatus,
    /// Like counter
    pub likes: u64,
    /// View counter
    pub views: u64,
}

impl Listing {
    /// Build an active listing for `creator`, expiring `duration` after `now`.
    pub fn publish(
        id: ListingId,
        draft: &ListingDraft,
        creator: &Account,
        duration: ListingDuration,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            image_url: draft.image_url.trim().to_string(),
            tags: parse_tags(&draft.tags),
            creator_id: creator.id.clone(),
            creator_name: creator.display_name.clone(),
            creator_role: creator.role,
            created_at: now,
            expires_at: now + duration.as_duration(),
            status: ListingStatus::Active,
            likes: 0,
            views: 0,
        }
    }

    /// Effectively visible: stored status is active and expiry is in the future.
    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        self.status == ListingStatus::Active && self.expires_at > now
    }

    /// Time left before expiry, clamped at zero.
    pub fn remaining_at(&self, now: DateTime<Utc>) -> RemainingTime {
        RemainingTime::until(self.expires_at, now)
    }

    /// Combined likes and views, used for trending order.
    pub fn popularity(&self) -> u64 {
        self.likes + self.views
    }

    /// Whether the listing counts as trending.
    pub fn is_trending(&self) -> bool {
        self.popularity() > TRENDING_THRESHOLD
    }
}

/// Remaining visibility of a listing, `max(0, expires_at - now)`.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use portfoliohub_core::RemainingTime;
///
/// let now = Utc::now();
/// assert_eq!(RemainingTime::until(now + Duration::minutes(125), now).to_string(), "2h 5m");
/// assert_eq!(RemainingTime::until(now + Duration::minutes(42), now).to_string(), "42m");
/// assert_eq!(RemainingTime::until(now - Duration::seconds(1), now).to_string(), "expired");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RemainingTime(std::time::Duration);

impl RemainingTime {
    /// Remaining time between `now` and `expires_at`.
    pub fn until(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self((expires_at - now).to_std().unwrap_or_default())
    }

    /// True once nothing remains.
    pub fn is_expired(&self) -> bool {
        self.0.is_zero()
    }

    /// Whole hours left.
    pub fn hours(&self) -> u64 {
        self.0.as_secs() / 3600
    }

    /// Whole minutes left after the whole hours.
    pub fn minutes(&self) -> u64 {
        (self.0.as_secs() % 3600) / 60
    }

    /// Underlying span.
    pub fn as_duration(&self) -> std::time::Duration {
        self.0
    }
}

impl fmt::Display for RemainingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_expired() {
            write!(f, "expired")
        } else if self.hours() > 0 {
            write!(f, "{}h {}m", self.hours(), self.minutes())
        } else {
            write!(f, "{}m", self.minutes())
        }
    }
}
