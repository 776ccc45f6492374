use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct SpinnerProps {
    #[prop_or_default]
    pub(crate) label: Option<AttrValue>,
}

/// Inline busy indicator with an optional status line.
#[function_component(Spinner)]
pub(crate) fn spinner(props: &SpinnerProps) -> Html {
    html! {
        <span class="spinner-wrap">
            <span class="loading loading-spinner loading-sm" role="status" aria-label={props.label.clone()} />
            {props.label.clone().map(|text| html! {
                <span class="spinner-label muted">{text}</span>
            }).unwrap_or_default()}
        </span>
    }
}
