//! API client context for sharing a singleton client instance.
//!
//! # Design
//! - Create exactly one API client per app boot.

use crate::services::api::ApiClient;
use std::rc::Rc;
use yew::prelude::*;

/// Shared API client context for feature views.
#[derive(Clone)]
pub(crate) struct ApiCtx {
    /// Singleton API client instance.
    pub(crate) client: Rc<ApiClient>,
}

impl ApiCtx {
    /// Create a new context with the configured base URL.
    pub(crate) fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Rc::new(ApiClient::new(base_url)),
        }
    }
}

impl PartialEq for ApiCtx {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.client, &other.client)
    }
}

/// Client from the nearest [`ApiCtx`] provider.
#[hook]
pub(crate) fn use_api() -> Option<Rc<ApiClient>> {
    use_context::<ApiCtx>().map(|ctx| ctx.client)
}
