//! PDF export form and generated-PDF menu.

use crate::app::api::use_api;
use crate::app::jobs::{JobHandle, start_job};
use crate::components::atoms::Spinner;
use crate::core::store::{AppStore, app_dispatch, request_refresh};
use crate::features::jobs::state::JobUpdate;
use crate::features::pdf::state::{CreatePdfAction, CreatePdfEffect, CreatePdfState, PdfMenuState};
use blog_export_api_models::{JobKind, PdfTemplate};
use gloo::console;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;
use yewdux::prelude::use_selector;

#[derive(Properties, PartialEq)]
pub(crate) struct PdfProps {
    pub(crate) blog_id: AttrValue,
}

type Dispatcher = Rc<dyn Fn(CreatePdfAction)>;

/// Export button that expands into a date range form and then tracks generation.
#[function_component(CreatePdf)]
pub(crate) fn create_pdf(props: &PdfProps) -> Html {
    let api = use_api();
    let state = use_mut_ref(CreatePdfState::default);
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
            let effect = state.borrow_mut().apply(CreatePdfAction::Job(update));
            settle(&effect, &handle);
            redraw.force_update();
        })
    };

    let dispatch: Dispatcher = {
        let state = state.clone();
        let handle = handle.clone();
        let blog_id = props.blog_id.clone();
        Rc::new(move |action: CreatePdfAction| {
            let effect = state.borrow_mut().apply(action);
            if let CreatePdfEffect::StartJob(range) = &effect {
                let opened = api.as_ref().and_then(|api| {
                    start_job(api.generate_stream_url(&blog_id, range), on_update.clone())
                });
                if let Some(job) = opened {
                    *handle.borrow_mut() = Some(job);
                } else {
                    *state.borrow_mut() = CreatePdfState::Idle;
                    console::error!(format!(
                        "{}: stream could not be opened",
                        JobKind::GeneratePdf.failure_label()
                    ));
                }
            } else {
                settle(&effect, &handle);
            }
            redraw.force_update();
        })
    };

    let send = |action_for: fn() -> CreatePdfAction| {
        let dispatch = dispatch.clone();
        Callback::from(move |_: MouseEvent| dispatch(action_for()))
    };

    let current = state.borrow().clone();
    match current {
        CreatePdfState::Idle => html! {
            <button class="btn btn-sm" onclick={send(|| CreatePdfAction::Open)}>{"Export as PDF"}</button>
        },
        CreatePdfState::Configuring(form) => {
            let on_start = {
                let dispatch = dispatch.clone();
                Callback::from(move |event: Event| {
                    let input: HtmlInputElement = event.target_unchecked_into();
                    dispatch(CreatePdfAction::SetStart(input.value()));
                })
            };
            let on_end = {
                let dispatch = dispatch.clone();
                Callback::from(move |event: Event| {
                    let input: HtmlInputElement = event.target_unchecked_into();
                    dispatch(CreatePdfAction::SetEnd(input.value()));
                })
            };
            let on_template = {
                let dispatch = dispatch.clone();
                Callback::from(move |event: Event| {
                    let select: HtmlSelectElement = event.target_unchecked_into();
                    if let Some(template) = PdfTemplate::from_value(&select.value()) {
                        dispatch(CreatePdfAction::SetTemplate(template));
                    }
                })
            };
            html! {
                <div class="pdf-form">
                    <label>
                        {"Start date"}
                        <input type="date" value={form.start.clone()} onchange={on_start} />
                    </label>
                    <label>
                        {"End date"}
                        <input type="date" value={form.end.clone()} onchange={on_end} />
                    </label>
                    <label>
                        {"Template"}
                        <select onchange={on_template}>
                            { for PdfTemplate::all().into_iter().map(|template| html! {
                                <option
                                    value={template.value().to_string()}
                                    selected={template == form.template}
                                >
                                    {template.label()}
                                </option>
                            }) }
                        </select>
                    </label>
                    {form.error.clone().map(|error| html! {
                        <p class="form-error">{error}</p>
                    }).unwrap_or_default()}
                    <div class="form-actions">
                        <button class="btn btn-sm btn-primary" onclick={send(|| CreatePdfAction::Export)}>{"Export"}</button>
                        <button class="btn btn-sm btn-ghost" onclick={send(|| CreatePdfAction::Cancel)}>{"Cancel"}</button>
                    </div>
                </div>
            }
        }
        CreatePdfState::Exporting(progress) => {
            let label = progress.label("Starting PDF generation");
            html! { <Spinner label={AttrValue::from(label)} /> }
        }
    }
}

fn settle(effect: &CreatePdfEffect, handle: &RefCell<Option<JobHandle>>) {
    match effect {
        CreatePdfEffect::Finished => {
            handle.borrow_mut().take();
            app_dispatch().reduce_mut(request_refresh);
        }
        CreatePdfEffect::Failed(detail) => {
            handle.borrow_mut().take();
            console::error!(format!(
                "{}: {detail}",
                JobKind::GeneratePdf.failure_label()
            ));
        }
        CreatePdfEffect::None | CreatePdfEffect::StartJob(_) => {}
    }
}

/// Blog name that opens a popover listing generated PDFs.
#[derive(Properties, PartialEq)]
pub(crate) struct PdfMenuProps {
    pub(crate) blog_id: AttrValue,
    pub(crate) label: AttrValue,
}

#[function_component(DownloadPdfMenu)]
pub(crate) fn download_pdf_menu(props: &PdfMenuProps) -> Html {
    let api = use_api();
    let menu = use_mut_ref(PdfMenuState::default);
    let redraw = use_force_update();
    let refresh_seq = use_selector(|store: &AppStore| store.blogs.refresh_seq);

    {
        let menu = menu.clone();
        let redraw = redraw.clone();
        let api = api.clone();
        let blog_id = props.blog_id.clone();
        use_effect_with_deps(
            move |_| {
                if let Some(api) = api {
                    yew::platform::spawn_local(async move {
                        match api.fetch_downloads(&blog_id).await {
                            Ok(downloads) => {
                                menu.borrow_mut().set_downloads(downloads);
                                redraw.force_update();
                            }
                            Err(err) => {
                                console::error!(format!("Failed listing pdfs: {err}"));
                                menu.borrow_mut().set_downloads(Vec::new());
                                redraw.force_update();
                            }
                        }
                    });
                }
                || ()
            },
            (props.blog_id.clone(), *refresh_seq),
        );
    }

    let on_toggle = {
        let menu = menu.clone();
        let redraw = redraw.clone();
        Callback::from(move |_: MouseEvent| {
            menu.borrow_mut().toggle();
            redraw.force_update();
        })
    };
    let on_close = {
        let menu = menu.clone();
        Callback::from(move |_: MouseEvent| {
            menu.borrow_mut().close();
            redraw.force_update();
        })
    };

    let menu = menu.borrow().clone();

    let entries = match api.as_ref() {
        Some(api) if !menu.downloads.is_empty() => html! {
            <ul class="menu">
                { for menu.downloads.iter().map(|download| {
                    let href = api.pdf_url(&props.blog_id, download);
                    html! {
                        <li key={download.key.clone()}>
                            <a href={href} target="_blank" rel="noopener">{download.file_name()}</a>
                        </li>
                    }
                }) }
            </ul>
        },
        _ => html! { <p class="muted">{"No PDFs yet"}</p> },
    };

    html! {
        <div class="pdf-menu">
            <button class="link" onclick={on_toggle}>{props.label.clone()}</button>
            {if menu.open {
                html! {
                    <>
                        <div class="popover-backdrop" onclick={on_close.clone()} />
                        <div class="popover">
                            {entries}
                            <button class="btn btn-xs btn-ghost" onclick={on_close}>{"Close"}</button>
                        </div>
                    </>
                }
            } else {
                html! {}
            }}
        </div>
    }
}
