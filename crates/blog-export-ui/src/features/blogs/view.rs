//! Blog table, add form and blog detail page.

use crate::app::Route;
use crate::app::api::use_api;
use crate::components::atoms::{EmptyState, Spinner};
use crate::core::store::{
    AppStore, app_dispatch, blog_row_key, request_refresh, set_blogs, set_blogs_error,
};
use crate::features::blogs::state::{AddBlogAction, AddBlogEffect, AddBlogState};
use crate::features::jobs::view::DownloadBlog;
use crate::features::pdf::view::{CreatePdf, DownloadPdfMenu};
use blog_export_api_models::BlogDto;
use gloo::console;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::use_selector;

/// Blog list with per-row export controls.
#[function_component(BlogsPage)]
pub(crate) fn blogs_page() -> Html {
    let api = use_api();
    let refresh_seq = use_selector(|store: &AppStore| store.blogs.refresh_seq);
    let loaded = use_selector(|store: &AppStore| store.blogs.loaded);
    let rows = use_selector(|store: &AppStore| store.blogs.rows.clone());
    let load_error = use_selector(|store: &AppStore| store.blogs.error.clone());

    use_effect_with_deps(
        move |_| {
            if let Some(api) = api {
                yew::platform::spawn_local(async move {
                    match api.fetch_blogs().await {
                        Ok(blogs) => app_dispatch().reduce_mut(|store| set_blogs(store, blogs)),
                        Err(err) => {
                            console::error!(format!("Failed loading blogs: {err}"));
                            app_dispatch()
                                .reduce_mut(|store| set_blogs_error(store, err.to_string()));
                        }
                    }
                });
            }
            || ()
        },
        *refresh_seq,
    );

    let body = if !*loaded {
        html! { <Spinner label={AttrValue::from("Loading blogs")} /> }
    } else if let (true, Some(message)) = (rows.is_empty(), load_error.as_ref()) {
        html! {
            <EmptyState
                title={AttrValue::from("Could not load blogs")}
                description={Some(AttrValue::from(message.clone()))}
            />
        }
    } else if rows.is_empty() {
        html! {
            <EmptyState
                title={AttrValue::from("No blogs yet")}
                description={Some(AttrValue::from("Add a blog URL to start exporting."))}
            />
        }
    } else {
        html! {
            <table class="table blogs">
                <thead>
                    <tr>
                        <th>{"Blog"}</th>
                        <th>{"Last download"}</th>
                        <th />
                        <th />
                        <th />
                    </tr>
                </thead>
                <tbody>
                    { for rows.iter().enumerate().map(|(index, blog)| blog_row(index, blog)) }
                </tbody>
            </table>
        }
    };

    html! {
        <section class="blogs-page">
            <AddBlog />
            {body}
        </section>
    }
}

fn blog_row(index: usize, blog: &BlogDto) -> Html {
    let key = blog_row_key(index, blog);
    let name = AttrValue::from(blog.display_name().to_string());
    let last_download = if blog.has_downloaded() {
        blog.last_download.clone()
    } else {
        "Never".to_string()
    };
    let Some(id) = blog.id.clone() else {
        return html! {
            <tr key={key}>
                <td>{name}</td>
                <td>{last_download}</td>
                <td colspan="3" class="muted">{"Pending"}</td>
            </tr>
        };
    };
    let blog_id = AttrValue::from(id.clone());
    html! {
        <tr key={key}>
            <td><DownloadPdfMenu blog_id={blog_id.clone()} label={name} /></td>
            <td>{last_download}</td>
            <td><DownloadBlog blog_id={blog_id.clone()} /></td>
            <td><CreatePdf blog_id={blog_id} /></td>
            <td><Link<Route> to={Route::BlogDetail { id }}>{"Details"}</Link<Route>></td>
        </tr>
    }
}

/// Button that expands into the add-blog URL form.
#[function_component(AddBlog)]
pub(crate) fn add_blog() -> Html {
    let api = use_api();
    let state = use_mut_ref(AddBlogState::default);
    let redraw = use_force_update();

    let dispatch = {
        let state = state.clone();
        Callback::from(move |action: AddBlogAction| {
            let effect = state.borrow_mut().apply(action);
            match effect {
                AddBlogEffect::None => {}
                AddBlogEffect::Send(url) => {
                    if let Some(api) = api.clone() {
                        let state = state.clone();
                        let redraw = redraw.clone();
                        yew::platform::spawn_local(async move {
                            let outcome = match api.add_blog(&url).await {
                                Ok(()) => AddBlogAction::Saved,
                                Err(err) => {
                                    console::error!(format!("Failed adding blog: {err}"));
                                    AddBlogAction::Rejected(err.to_string())
                                }
                            };
                            if state.borrow_mut().apply(outcome) == AddBlogEffect::Refresh {
                                app_dispatch().reduce_mut(request_refresh);
                            }
                            redraw.force_update();
                        });
                    }
                }
                AddBlogEffect::Refresh => app_dispatch().reduce_mut(request_refresh),
            }
            redraw.force_update();
        })
    };

    let current = state.borrow().clone();
    match current {
        AddBlogState::Idle => html! {
            <button class="btn btn-primary" onclick={dispatch.reform(|_: MouseEvent| AddBlogAction::Open)}>
                {"Add blog"}
            </button>
        },
        AddBlogState::Editing { url, error } => {
            let on_input = dispatch.reform(|event: InputEvent| {
                let input: HtmlInputElement = event.target_unchecked_into();
                AddBlogAction::Edit(input.value())
            });
            let on_submit = dispatch.reform(|event: SubmitEvent| {
                event.prevent_default();
                AddBlogAction::Submit
            });
            html! {
                <form class="add-blog" onsubmit={on_submit}>
                    <input
                        type="url"
                        placeholder="https://example.blogspot.com"
                        value={url}
                        oninput={on_input}
                    />
                    <button class="btn btn-primary" type="submit">{"Add"}</button>
                    <button
                        class="btn btn-ghost"
                        type="button"
                        onclick={dispatch.reform(|_: MouseEvent| AddBlogAction::Cancel)}
                    >
                        {"Cancel"}
                    </button>
                    {error.map(|error| html! { <p class="form-error">{error}</p> }).unwrap_or_default()}
                </form>
            }
        }
        AddBlogState::Submitting { url } => html! {
            <Spinner label={AttrValue::from(format!("Adding {url}"))} />
        },
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct BlogDetailProps {
    pub(crate) id: AttrValue,
}

/// Single blog summary with the same export controls as the table row.
#[function_component(BlogDetailPage)]
pub(crate) fn blog_detail_page(props: &BlogDetailProps) -> Html {
    let api = use_api();
    let blog = use_state(|| None as Option<Result<BlogDto, String>>);
    let refresh_seq = use_selector(|store: &AppStore| store.blogs.refresh_seq);

    {
        let blog = blog.clone();
        let id = props.id.clone();
        use_effect_with_deps(
            move |_| {
                if let Some(api) = api {
                    yew::platform::spawn_local(async move {
                        match api.fetch_blog(&id).await {
                            Ok(found) => blog.set(Some(Ok(found))),
                            Err(err) => {
                                console::error!(format!("Failed loading blog {id}: {err}"));
                                blog.set(Some(Err(err.to_string())));
                            }
                        }
                    });
                }
                || ()
            },
            (props.id.clone(), *refresh_seq),
        );
    }

    let back = html! { <Link<Route> to={Route::Blogs}>{"Back to blogs"}</Link<Route>> };
    let body = match &*blog {
        None => html! { <Spinner label={AttrValue::from("Loading blog")} /> },
        Some(Err(detail)) => html! {
            <EmptyState
                title={AttrValue::from("Blog unavailable")}
                description={Some(AttrValue::from(detail.clone()))}
            >
                {back.clone()}
            </EmptyState>
        },
        Some(Ok(found)) => {
            let last_download = if found.has_downloaded() {
                found.last_download.clone()
            } else {
                "Never".to_string()
            };
            html! {
                <div class="blog-detail">
                    <h2>{found.display_name()}</h2>
                    <dl>
                        <dt>{"URL"}</dt>
                        <dd>{found.url.clone().unwrap_or_default()}</dd>
                        <dt>{"Last download"}</dt>
                        <dd>{last_download}</dd>
                    </dl>
                    <div class="detail-actions">
                        <DownloadPdfMenu blog_id={props.id.clone()} label={AttrValue::from("Generated PDFs")} />
                        <DownloadBlog blog_id={props.id.clone()} />
                        <CreatePdf blog_id={props.id.clone()} />
                    </div>
                </div>
            }
        }
    };

    html! {
        <section class="blog-detail-page">
            {back}
            {body}
        </section>
    }
}
