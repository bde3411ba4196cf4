//! Activity Entity
//!
//! Append-only audit record with display text for the public feed.
//! Never mutated after creation.

use chrono::{DateTime, Utc};
use kernel::id::{ActivityId, CollegeId, UserId};
use serde::{Deserialize, Serialize};

use crate::domain::entity::{college::College, user::User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    UserRegistered,
    ReferralSuccess,
    AdminVerified,
    AdminRejected,
}

impl ActivityKind {
    pub const fn code(&self) -> &'static str {
        match self {
            ActivityKind::UserRegistered => "user_registered",
            ActivityKind::ReferralSuccess => "referral_success",
            ActivityKind::AdminVerified => "admin_verified",
            ActivityKind::AdminRejected => "admin_rejected",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "user_registered" => Some(ActivityKind::UserRegistered),
            "referral_success" => Some(ActivityKind::ReferralSuccess),
            "admin_verified" => Some(ActivityKind::AdminVerified),
            "admin_rejected" => Some(ActivityKind::AdminRejected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Activity {
    pub activity_id: ActivityId,
    pub kind: ActivityKind,
    /// Subject of the event (the new user, the referrer, the reviewed admin)
    pub user_id: UserId,
    pub college_id: Option<CollegeId>,
    /// Denormalised text shown in the feed
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Activity {
    fn new(
        kind: ActivityKind,
        user_id: UserId,
        college_id: Option<CollegeId>,
        message: String,
    ) -> Self {
        Self {
            activity_id: ActivityId::new(),
            kind,
            user_id,
            college_id,
            message,
            created_at: Utc::now(),
        }
    }

    pub fn user_registered(user: &User, college: &College) -> Self {
        Self::new(
            ActivityKind::UserRegistered,
            user.user_id,
            Some(college.college_id),
            format!("{} joined from {}", user.public_name(), college.name),
        )
    }

    pub fn referral_success(referrer: &User, referred: &User) -> Self {
        Self::new(
            ActivityKind::ReferralSuccess,
            referrer.user_id,
            referrer.college_id,
            format!(
                "{} referred {}",
                referrer.public_name(),
                referred.public_name()
            ),
        )
    }

    pub fn admin_verified(admin: &User, college: Option<&College>) -> Self {
        let message = match college {
            Some(c) => format!("{} is now the verified admin of {}", admin.public_name(), c.name),
            None => format!("{} is now a verified college admin", admin.public_name()),
        };
        Self::new(ActivityKind::AdminVerified, admin.user_id, admin.college_id, message)
    }

    pub fn admin_rejected(admin: &User) -> Self {
        Self::new(
            ActivityKind::AdminRejected,
            admin.user_id,
            admin.college_id,
            format!("College admin application from {} was rejected", admin.public_name()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_codes_round_trip() {
        for kind in [
            ActivityKind::UserRegistered,
            ActivityKind::ReferralSuccess,
            ActivityKind::AdminVerified,
            ActivityKind::AdminRejected,
        ] {
            assert_eq!(ActivityKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(ActivityKind::from_code("unknown"), None);
    }
}
