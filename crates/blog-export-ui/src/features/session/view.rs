//! Greeting and logout link.

use crate::app::api::use_api;
use crate::core::store::{AppStore, app_dispatch, select_greeting_name, set_user};
use gloo::console;
use yew::prelude::*;
use yewdux::prelude::use_selector;

#[function_component(UserBar)]
pub(crate) fn user_bar() -> Html {
    let api = use_api();
    let name = use_selector(select_greeting_name);

    {
        let api = api.clone();
        use_effect_with_deps(
            move |_| {
                if let Some(api) = api {
                    yew::platform::spawn_local(async move {
                        match api.fetch_user().await {
                            Ok(user) => app_dispatch().reduce_mut(|store| set_user(store, user)),
                            Err(err) => console::error!(format!("Failed loading user: {err}")),
                        }
                    });
                }
                || ()
            },
            (),
        );
    }

    let logout = api.map(|api| api.logout_url()).unwrap_or_default();
    html! {
        <div class="user-bar">
            <span class="greeting">{format!("Welcome {}", *name)}</span>
            <a class="btn btn-sm btn-ghost" href={logout}>{"Logout"}</a>
        </div>
    }
}
