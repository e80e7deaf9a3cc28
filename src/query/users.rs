//! Member search: filter criteria and ordering for the user listing.

use std::cmp::Reverse;
use std::collections::HashSet;

use jiff::Span;
use jiff::civil::{Date, DateTime};

use crate::models::Gender;

use super::page::{PageRequest, PagedList};
use super::pipeline::Pipeline;

/// Lowest age accepted by the age filter.
pub const MIN_AGE: u16 = 18;

/// Highest age accepted by the age filter.
pub const MAX_AGE: u16 = 99;

/// The fields of a member the search pipeline looks at.
pub trait Profile {
    fn profile_id(&self) -> i32;
    fn gender(&self) -> Gender;
    fn birth_date(&self) -> Date;
    fn created_at(&self) -> DateTime;
    fn last_active_at(&self) -> DateTime;
}

/// Listing order. Anything unrecognized means [`UserSort::LastActive`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UserSort {
    #[default]
    LastActive,
    Created,
}

impl UserSort {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(value) if value.eq_ignore_ascii_case("created") => Self::Created,
            _ => Self::LastActive,
        }
    }
}

/// An inclusive age range in whole years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeRange {
    min: u16,
    max: u16,
}

impl AgeRange {
    /// Parses the raw bounds.
    ///
    /// Unparseable or out-of-bounds values fall back to the default bound.
    /// Returns `None` when the result is the default 18..=99 range or when
    /// `min > max`, both of which disable the age filter.
    pub fn from_raw(min: Option<&str>, max: Option<&str>) -> Option<Self> {
        let min = parse_age(min).unwrap_or(MIN_AGE);
        let max = parse_age(max).unwrap_or(MAX_AGE);

        Self::new(min, max)
    }

    pub fn new(min: u16, max: u16) -> Option<Self> {
        if min > max || (min == MIN_AGE && max == MAX_AGE) {
            return None;
        }
        Some(Self { min, max })
    }

    pub fn min(&self) -> u16 {
        self.min
    }

    pub fn max(&self) -> u16 {
        self.max
    }

    /// The inclusive birth-date window for this range, relative to `today`.
    ///
    /// Calendar-year arithmetic: someone aged `max` may be born up to
    /// `max + 1` years ago, someone aged `min` at least `min` years ago.
    pub fn birth_window(&self, today: Date) -> Option<(Date, Date)> {
        let earliest = today
            .checked_sub(Span::new().years(i64::from(self.max) + 1))
            .ok()?;
        let latest = today.checked_sub(Span::new().years(i64::from(self.min))).ok()?;

        Some((earliest, latest))
    }
}

fn parse_age(raw: Option<&str>) -> Option<u16> {
    raw.and_then(|value| value.trim().parse::<u16>().ok())
        .filter(|age| (MIN_AGE..=MAX_AGE).contains(age))
}

/// Parses a boolean query flag. Only `true` and `1` switch it on.
pub fn parse_flag(raw: Option<&str>) -> bool {
    matches!(raw.map(str::trim), Some(value) if value.eq_ignore_ascii_case("true") || value == "1")
}

/// Relationship ids loaded ahead of filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LikeSets {
    /// Members who like the current user.
    pub likers: HashSet<i32>,
    /// Members the current user likes.
    pub likees: HashSet<i32>,
}

/// Criteria for the member listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFilter {
    pub current_user_id: i32,
    pub gender: Option<Gender>,
    pub age: Option<AgeRange>,
    pub likers: bool,
    pub likees: bool,
    pub sort: UserSort,
}

impl UserFilter {
    pub fn new(current_user_id: i32) -> Self {
        Self {
            current_user_id,
            gender: None,
            age: None,
            likers: false,
            likees: false,
            sort: UserSort::default(),
        }
    }

    /// Whether the relationship sets must be loaded before [`UserFilter::apply`].
    pub fn needs_like_sets(&self) -> bool {
        self.likers || self.likees
    }

    /// Runs the listing: exclude self, gender, likers, likees, age, sort, page.
    pub fn apply<P: Profile>(
        &self,
        candidates: Vec<P>,
        likes: &LikeSets,
        today: Date,
        page: PageRequest,
    ) -> PagedList<P> {
        let window = self.age.and_then(|range| range.birth_window(today));
        let likers = self.likers.then_some(&likes.likers);
        let likees = self.likees.then_some(&likes.likees);

        let pipeline = Pipeline::new(candidates)
            .filter(|user| user.profile_id() != self.current_user_id)
            .filter_opt(self.gender, |gender, user| user.gender() == *gender)
            .filter_opt(likers, |ids, user| ids.contains(&user.profile_id()))
            .filter_opt(likees, |ids, user| ids.contains(&user.profile_id()))
            .filter_opt(window, |&(earliest, latest), user| {
                let born = user.birth_date();
                born >= earliest && born <= latest
            });

        // Ties fall back to ascending id so pages line up across requests.
        let sorted = match self.sort {
            UserSort::Created => {
                pipeline.sort_by_key_desc(|user| (user.created_at(), Reverse(user.profile_id())))
            }
            UserSort::LastActive => {
                pipeline.sort_by_key_desc(|user| (user.last_active_at(), Reverse(user.profile_id())))
            }
        };

        sorted.page(page)
    }
}
