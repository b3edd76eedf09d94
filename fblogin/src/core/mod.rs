use std::sync::Arc;

use crate::model::Context;

pub(crate) type LoginRouter<S, F> = axum::Router<Arc<Context<S, F>>>;
