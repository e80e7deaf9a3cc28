use std::fmt;
use std::io::Write;
use std::str::FromStr;

use diesel::deserialize::{self, FromSql};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::serialize::{self, Output, ToSql};
use diesel::sql_types::Text;
use diesel::{AsExpression, FromSqlRow};
use jiff::Span;
use jiff::civil::{Date as CivilDate, DateTime as CivilDateTime};
use jiff_diesel::{Date, DateTime};
use serde::{Deserialize, Serialize};

use crate::query::Profile;

/// Member gender, stored as lowercase text.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    utoipa::ToSchema,
    AsExpression,
    FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Gender::Male => Gender::Female,
            Gender::Female => Gender::Male,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            other => Err(format!("Unrecognized gender: {}", other)),
        }
    }
}

impl ToSql<Text, Pg> for Gender {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(serialize::IsNull::No)
    }
}

impl FromSql<Text, Pg> for Gender {
    fn from_sql(bytes: <Pg as diesel::backend::Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        s.parse::<Gender>().map_err(Into::into)
    }
}

/// User model for reading from database
#[derive(Debug, Queryable, Selectable, Identifiable, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    pub gender: Gender,
    pub date_of_birth: Date,
    pub known_as: String,
    pub created: DateTime,
    pub last_active: DateTime,
    pub introduction: Option<String>,
    pub looking_for: Option<String>,
    pub interests: Option<String>,
    pub city: String,
    pub country: String,
}

impl User {
    /// Whole years between the date of birth and `today`.
    pub fn age(&self, today: CivilDate) -> i16 {
        age_on(self.date_of_birth.to_jiff(), today)
    }
}

impl Profile for User {
    fn profile_id(&self) -> i32 {
        self.id
    }

    fn gender(&self) -> Gender {
        self.gender
    }

    fn birth_date(&self) -> CivilDate {
        self.date_of_birth.to_jiff()
    }

    fn created_at(&self) -> CivilDateTime {
        self.created.to_jiff()
    }

    fn last_active_at(&self) -> CivilDateTime {
        self.last_active.to_jiff()
    }
}

/// Age in whole years: one less when this year's birthday is still ahead.
pub fn age_on(born: CivilDate, today: CivilDate) -> i16 {
    let mut age = today.year() - born.year();
    if let Ok(birthday) = born.checked_add(Span::new().years(age))
        && birthday > today
    {
        age -= 1;
    }
    age
}

/// NewUser model for inserting new records
#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub gender: Gender,
    pub date_of_birth: Date,
    pub known_as: String,
    pub city: String,
    pub country: String,
}

/// Profile fields a member may edit
#[derive(Debug, AsChangeset, Clone, Default)]
#[diesel(table_name = crate::schema::users)]
pub struct UpdateUser {
    pub introduction: Option<String>,
    pub looking_for: Option<String>,
    pub interests: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl UpdateUser {
    pub fn is_empty(&self) -> bool {
        self.introduction.is_none()
            && self.looking_for.is_none()
            && self.interests.is_none()
            && self.city.is_none()
            && self.country.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    #[test]
    fn test_gender_parse() {
        assert_eq!("male".parse::<Gender>(), Ok(Gender::Male));
        assert_eq!(" Female ".parse::<Gender>(), Ok(Gender::Female));
        assert!("other".parse::<Gender>().is_err());
        assert_eq!(Gender::Male.opposite(), Gender::Female);
        assert_eq!(Gender::Female.to_string(), "female");
    }

    #[test]
    fn test_age_before_and_after_birthday() {
        let born = date(1990, 6, 15);
        assert_eq!(age_on(born, date(2024, 6, 14)), 33);
        assert_eq!(age_on(born, date(2024, 6, 15)), 34);
        assert_eq!(age_on(born, date(2024, 12, 31)), 34);
    }

    #[test]
    fn test_age_for_leap_day_birth() {
        let born = date(2000, 2, 29);
        assert_eq!(age_on(born, date(2023, 2, 28)), 23);
        assert_eq!(age_on(born, date(2023, 2, 27)), 22);
    }

    #[test]
    fn test_update_user_is_empty() {
        assert!(UpdateUser::default().is_empty());
        let update = UpdateUser {
            city: Some("Oslo".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
