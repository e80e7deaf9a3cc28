use diesel::prelude::*;
use jiff_diesel::DateTime;

use super::User;

#[derive(Debug, Queryable, Selectable, Identifiable, Associations, Clone)]
#[diesel(table_name = crate::schema::photos)]
#[diesel(belongs_to(User))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Photo {
    pub id: i32,
    pub url: String,
    pub description: Option<String>,
    pub date_added: DateTime,
    pub is_main: bool,
    /// Identifier at the image host, absent for photos stored elsewhere.
    pub public_id: Option<String>,
    pub user_id: i32,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::photos)]
pub struct NewPhoto {
    pub url: String,
    pub description: Option<String>,
    pub is_main: bool,
    pub public_id: Option<String>,
    pub user_id: i32,
}
