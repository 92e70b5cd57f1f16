//! Service-center session view: root module wiring the Yew `Component`
//! implementation with submodules for state, update logic, view rendering and
//! the backend API.
//!
//! Responsibilities
//! - Re-export `Msg` and `SessionComponent`.
//! - Provide the `Component` implementation that delegates to `update::update` and `view::view`.
//! - On first render, load the field schema and open a server-side session.
//!
//! The backend owns the session state; this component only keeps what the
//! user is typing (access code, form values, address search) between actions.

use yew::platform::spawn_local;
use yew::prelude::*;

mod api;
mod form_view;
mod helpers;
mod messages;
mod state;
mod update;
mod view;

pub use messages::Msg;
pub use state::SessionComponent;

impl Component for SessionComponent {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        SessionComponent::new()
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render && !self.loaded {
            self.loaded = true;

            let link = ctx.link().clone();
            spawn_local(async move {
                match api::load_schema().await {
                    Ok(schema) => link.send_message(Msg::SchemaLoaded(schema)),
                    Err(err) => link.send_message(Msg::RequestFailed(format!(
                        "Could not load the field schema: {err}"
                    ))),
                }
                match api::open_session().await {
                    Ok(started) => link.send_message(Msg::SessionOpened(started)),
                    Err(err) => link.send_message(Msg::RequestFailed(format!(
                        "Could not open a session: {err}"
                    ))),
                }
            });
        }
    }
}
