use std::fmt::{Debug, Formatter};

use crate::web::facebook::FacebookLogin;

/// Router state shared by the login and callback handlers.
pub(crate) struct Context<S, F> {
    pub facebook: FacebookLogin,
    pub success: S,
    pub failure: F,
}

impl<S, F> Debug for Context<S, F> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("facebook", &self.facebook)
            .field("success", &std::any::type_name::<S>())
            .field("failure", &std::any::type_name::<F>())
            .finish()
    }
}
