pub mod follow;
pub mod user;

pub use follow::{Direction, EdgeKind, FollowState, TargetGroupFilter};
pub use user::User;
