//! Member DTOs: search query, summaries, full profile and profile edits.

use jiff::civil::DateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::photo::PhotoResponse;
use crate::models::{Gender, UpdateUser};
use crate::query::{AgeRange, PageRequest, UserFilter, UserSort, parse_flag};
use crate::services::{ProfileCard, ProfileDetail};

// ============================================================================
// Request DTOs
// ============================================================================

/// Member search parameters.
///
/// Every field is optional and read leniently: malformed values fall back to
/// their defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UserListQuery {
    /// 1-based page number
    #[param(example = "1")]
    pub page_number: Option<String>,
    /// Items per page, at most 50
    #[param(example = "10")]
    pub page_size: Option<String>,
    /// `male` or `female`; defaults to the opposite of the caller's gender
    pub gender: Option<String>,
    #[param(example = "18")]
    pub min_age: Option<String>,
    #[param(example = "99")]
    pub max_age: Option<String>,
    /// `created` or `lastActive` (default)
    pub order_by: Option<String>,
    /// Only members who like the caller
    pub likers: Option<String>,
    /// Only members the caller likes
    pub likees: Option<String>,
}

impl UserListQuery {
    pub fn page(&self) -> PageRequest {
        PageRequest::from_raw(self.page_number.as_deref(), self.page_size.as_deref())
    }

    /// The listing filter for `current_user_id`. An unrecognized gender is
    /// left unset so the caller-based default applies.
    pub fn filter(&self, current_user_id: i32) -> UserFilter {
        UserFilter {
            gender: self.gender.as_deref().and_then(|g| g.parse::<Gender>().ok()),
            age: AgeRange::from_raw(self.min_age.as_deref(), self.max_age.as_deref()),
            likers: parse_flag(self.likers.as_deref()),
            likees: parse_flag(self.likees.as_deref()),
            sort: UserSort::parse(self.order_by.as_deref()),
            ..UserFilter::new(current_user_id)
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(max = 4000))]
    pub introduction: Option<String>,
    #[validate(length(max = 4000))]
    pub looking_for: Option<String>,
    #[validate(length(max = 4000))]
    pub interests: Option<String>,
    #[validate(length(min = 1, max = 255, message = "City cannot be empty"))]
    pub city: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Country cannot be empty"))]
    pub country: Option<String>,
}

impl From<UpdateUserRequest> for UpdateUser {
    fn from(request: UpdateUserRequest) -> Self {
        Self {
            introduction: request.introduction,
            looking_for: request.looking_for,
            interests: request.interests,
            city: request.city,
            country: request.country,
        }
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

/// One entry of the member listing.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[schema(example = 2)]
    pub id: i32,
    #[schema(example = "karen")]
    pub username: String,
    #[schema(example = "Karen")]
    pub known_as: String,
    pub gender: Gender,
    #[schema(example = 29)]
    pub age: i16,
    #[schema(value_type = String, format = DateTime)]
    pub created: DateTime,
    #[schema(value_type = String, format = DateTime)]
    pub last_active: DateTime,
    pub city: String,
    pub country: String,
    /// Main photo, absent until one is uploaded
    pub photo_url: Option<String>,
}

impl From<ProfileCard> for UserSummary {
    fn from(card: ProfileCard) -> Self {
        let user = card.user;
        Self {
            id: user.id,
            created: user.created.to_jiff(),
            last_active: user.last_active.to_jiff(),
            username: user.username,
            known_as: user.known_as,
            gender: user.gender,
            age: card.age,
            city: user.city,
            country: user.country,
            photo_url: card.photo_url,
        }
    }
}

/// A full profile with its photos.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDetail {
    pub id: i32,
    pub username: String,
    pub known_as: String,
    pub gender: Gender,
    pub age: i16,
    #[schema(value_type = String, format = DateTime)]
    pub created: DateTime,
    #[schema(value_type = String, format = DateTime)]
    pub last_active: DateTime,
    pub introduction: Option<String>,
    pub looking_for: Option<String>,
    pub interests: Option<String>,
    pub city: String,
    pub country: String,
    pub photo_url: Option<String>,
    pub photos: Vec<PhotoResponse>,
}

impl From<ProfileDetail> for UserDetail {
    fn from(detail: ProfileDetail) -> Self {
        let photo_url = detail.main_photo_url().map(str::to_string);
        let user = detail.user;
        Self {
            id: user.id,
            created: user.created.to_jiff(),
            last_active: user.last_active.to_jiff(),
            username: user.username,
            known_as: user.known_as,
            gender: user.gender,
            age: detail.age,
            introduction: user.introduction,
            looking_for: user.looking_for,
            interests: user.interests,
            city: user.city,
            country: user.country,
            photo_url,
            photos: detail.photos.into_iter().map(PhotoResponse::from).collect(),
        }
    }
}
