use chrono::Utc;

pub use uuid::Uuid;
pub type Time = chrono::DateTime<Utc>;

mod comment;
pub use comment::{Comment, CommentId};

mod error;
pub use error::Error;

mod time;
pub use time::{time_ago, TimeUnit};

mod user;
pub use user::{AuthorSnapshot, UserId};
