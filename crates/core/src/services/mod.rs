//! Business logic services.

pub mod comment;
pub mod following;
pub mod group;
pub mod post;
pub mod user;

pub use comment::{CommentService, CommentView};
pub use following::{FollowOutcome, FollowingService};
pub use group::{CreateGroupInput, GroupService};
pub use post::{GroupSummary, PostService, PostView, UserSummary};
pub use user::{CreateUserInput, UserService};
