pub mod auth;
pub mod comments;
pub mod health;
pub mod posts;
pub mod users;

pub use auth::{login, register};
pub use comments::{add_comment, delete_comment, list_comments};
pub use health::health_check;
pub use posts::{create_post, delete_post, get_post, list_posts, toggle_like, update_post};
pub use users::update_profile;
