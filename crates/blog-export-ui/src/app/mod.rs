//! App shell: API context, routing and the page header.

use crate::components::atoms::EmptyState;
use crate::features::blogs::view::{BlogDetailPage, BlogsPage};
use crate::features::session::view::UserBar;
use api::ApiCtx;
use preferences::api_base_url;
pub(crate) use routes::Route;
use yew::prelude::*;
use yew_router::prelude::*;

pub(crate) mod api;
pub(crate) mod jobs;
mod preferences;
mod routes;

#[function_component(BlogExportApp)]
fn blog_export_app() -> Html {
    let api_ctx = use_memo(|_| ApiCtx::new(api_base_url()), ());

    html! {
        <ContextProvider<ApiCtx> context={(*api_ctx).clone()}>
            <HashRouter>
                <header class="app-header">
                    <Link<Route> classes="brand" to={Route::Blogs}>{"Blog Export"}</Link<Route>>
                    <UserBar />
                </header>
                <main class="app-main">
                    <Switch<Route> render={switch} />
                </main>
            </HashRouter>
        </ContextProvider<ApiCtx>>
    }
}

fn switch(route: Route) -> Html {
    match route {
        Route::Blogs => html! { <BlogsPage /> },
        Route::BlogDetail { id } => html! { <BlogDetailPage id={AttrValue::from(id)} /> },
        Route::NotFound => html! {
            <EmptyState title={AttrValue::from("Page not found")}>
                <Link<Route> to={Route::Blogs}>{"Back to blogs"}</Link<Route>>
            </EmptyState>
        },
    }
}

/// Mount the application on `#root`, or on `<body>` when absent.
pub fn run_app() {
    console_error_panic_hook::set_once();
    if let Some(root) = gloo::utils::document().get_element_by_id("root") {
        yew::Renderer::<BlogExportApp>::with_root(root).render();
    } else {
        yew::Renderer::<BlogExportApp>::new().render();
    }
}
