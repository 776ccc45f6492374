//! Download-blog control.

use crate::app::api::use_api;
use crate::app::jobs::{JobHandle, start_job};
use crate::components::atoms::Spinner;
use crate::core::store::{app_dispatch, request_refresh};
use crate::features::jobs::state::{JobState, JobStep, JobUpdate};
use blog_export_api_models::JobKind;
use gloo::console;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct DownloadBlogProps {
    pub(crate) blog_id: AttrValue,
}

/// Button that starts a blog download and shows its progress until it finishes.
#[function_component(DownloadBlog)]
pub(crate) fn download_blog(props: &DownloadBlogProps) -> Html {
    let api = use_api();
    let state = use_mut_ref(JobState::default);
    let redraw = use_force_update();
    let handle = use_mut_ref(|| None as Option<JobHandle>);

    {
        let handle = handle.clone();
        use_effect_with_deps(
            move |_| {
                move || {
                    handle.borrow_mut().take();
                }
            },
            (),
        );
    }

    let on_update = {
        let state = state.clone();
        let handle = handle.clone();
        let redraw = redraw.clone();
        Callback::from(move |update: JobUpdate| {
            let step = state.borrow_mut().apply(update);
            match step {
                JobStep::Completed => {
                    handle.borrow_mut().take();
                    app_dispatch().reduce_mut(request_refresh);
                }
                JobStep::Failed(detail) => {
                    handle.borrow_mut().take();
                    console::error!(format!("{}: {detail}", JobKind::Download.failure_label()));
                }
                JobStep::Progress | JobStep::Ignored => {}
            }
            redraw.force_update();
        })
    };

    let on_click = {
        let state = state.clone();
        let handle = handle.clone();
        let blog_id = props.blog_id.clone();
        Callback::from(move |_: MouseEvent| {
            let Some(api) = api.as_ref() else {
                return;
            };
            if !state.borrow_mut().start() {
                return;
            }
            let url = api.download_stream_url(&blog_id);
            if let Some(job) = start_job(url, on_update.clone()) {
                *handle.borrow_mut() = Some(job);
            } else {
                *state.borrow_mut() = JobState::Idle;
                console::error!(format!(
                    "{}: stream could not be opened",
                    JobKind::Download.failure_label()
                ));
            }
            redraw.force_update();
        })
    };

    let current = state.borrow().clone();
    match current {
        JobState::Idle => html! {
            <button class="btn btn-sm" onclick={on_click}>{"Download"}</button>
        },
        JobState::Running(progress) => {
            let label = progress.label("Starting download");
            html! { <Spinner label={AttrValue::from(label)} /> }
        }
    }
}
