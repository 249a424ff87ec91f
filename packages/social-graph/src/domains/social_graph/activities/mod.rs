//! Social graph activities - business logic called by HTTP handlers and the
//! registration saga.

pub mod access;
pub mod follows;
pub mod recommendations;
pub mod users;

pub use access::can_access;
pub use follows::{
    accept_reject_follow_request, check_if_follow_exists, check_if_follow_request_exists,
    count_followers, count_following, create_follow, get_all_follow_requests, get_followers,
    get_following, remove_follow,
};
pub use recommendations::{get_recommendations_profile, get_target_group_users, FALLBACK_LIMIT};
pub use users::{get_user, update_privacy};
