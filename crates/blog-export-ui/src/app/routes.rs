//! Routing definitions for the Blog Export UI.
use yew_router::prelude::*;

#[derive(Clone, Routable, PartialEq, Eq, Debug)]
pub(crate) enum Route {
    #[at("/")]
    Blogs,
    #[at("/blogs/:id")]
    BlogDetail { id: String },
    #[not_found]
    #[at("/404")]
    NotFound,
}
