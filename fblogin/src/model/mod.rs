mod user;
pub use user::User;

mod outcome;
pub use outcome::{Authenticated, LoginOutcome};

mod context;
pub(crate) use context::Context;
