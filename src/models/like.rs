use diesel::prelude::*;

/// `liker_id` likes `likee_id`.
#[derive(Debug, Queryable, Selectable, Insertable, Clone, Copy, PartialEq, Eq)]
#[diesel(table_name = crate::schema::likes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Like {
    pub liker_id: i32,
    pub likee_id: i32,
}
