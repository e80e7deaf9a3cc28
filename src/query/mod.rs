//! Request-scoped listing core.
//!
//! Repositories load candidate rows, this module filters, orders and pages
//! them. Nothing in here performs I/O.

mod messages;
mod page;
mod pipeline;
mod users;

pub use messages::{Correspondence, MessageContainer, MessageFilter, thread};
pub use page::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PageMeta, PageRequest, PagedList};
pub use pipeline::Pipeline;
pub use users::{AgeRange, LikeSets, MAX_AGE, MIN_AGE, Profile, UserFilter, UserSort, parse_flag};
