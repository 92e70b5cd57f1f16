//! Update function for the session component.
//!
//! Elm-style: receives the current `SessionComponent`, the `Context` and a
//! `Msg`, mutates the state and returns whether the view should re-render.
//! Every user action is posted to the server; transport failures are logged
//! to the console and shown as a toast.

use common::requests::Action;
use serde_json::Value;
use yew::platform::spawn_local;
use yew::prelude::*;

use super::api;
use super::helpers::{show_toast, MIN_SEARCH_CHARS};
use super::messages::Msg;
use super::state::SessionComponent;

pub fn update(component: &mut SessionComponent, ctx: &Context<SessionComponent>, msg: Msg) -> bool {
    match msg {
        Msg::SchemaLoaded(schema) => {
            component.schema = schema;
            true
        }
        Msg::SessionOpened(started) => {
            component.session_id = Some(started.session_id);
            component.receive(started.view);
            true
        }
        Msg::ViewReceived(view) => {
            component.receive(view);
            true
        }
        Msg::RequestFailed(message) => {
            component.busy = false;
            gloo_console::error!(message.clone());
            show_toast(&message);
            true
        }
        Msg::UpdateAccessCode(code) => {
            component.access_code = code;
            true
        }
        Msg::Login => {
            let code = std::mem::take(&mut component.access_code);
            ctx.link().send_message(Msg::Perform(Action::Login { code }));
            true
        }
        Msg::Logout => {
            let Some(session_id) = component.session_id.take() else {
                return false;
            };
            component.busy = true;
            let link = ctx.link().clone();
            spawn_local(async move {
                if let Err(err) = api::close_session(&session_id).await {
                    gloo_console::warn!(format!("could not close session {session_id}: {err}"));
                }
                match api::open_session().await {
                    Ok(started) => link.send_message(Msg::SessionOpened(started)),
                    Err(err) => link.send_message(Msg::RequestFailed(format!(
                        "Could not open a session: {err}"
                    ))),
                }
            });
            true
        }
        Msg::Refresh => {
            let Some(session_id) = component.session_id.clone() else {
                return false;
            };
            component.busy = true;
            let link = ctx.link().clone();
            spawn_local(async move {
                match api::fetch_view(&session_id).await {
                    Ok(view) => link.send_message(Msg::ViewReceived(view)),
                    Err(err) => link.send_message(Msg::RequestFailed(err)),
                }
            });
            true
        }
        Msg::SelectRow(row) => {
            component.selected_row = row;
            true
        }
        Msg::Perform(action) => {
            let Some(session_id) = component.session_id.clone() else {
                return false;
            };
            component.busy = true;
            let link = ctx.link().clone();
            spawn_local(async move {
                match api::post_action(&session_id, &action).await {
                    Ok(view) => link.send_message(Msg::ViewReceived(view)),
                    Err(err) => link.send_message(Msg::RequestFailed(err)),
                }
            });
            true
        }
        Msg::SetField { name, value } => {
            component.form_values.insert(name, Value::String(value));
            true
        }
        Msg::Submit(flow) => {
            let attributes = component.form_values.clone();
            ctx.link()
                .send_message(Msg::Perform(Action::Submit { flow, attributes }));
            false
        }
        Msg::SearchInput(text) => {
            component.search_text = text.clone();
            if text.chars().count() < MIN_SEARCH_CHARS {
                component.suggestions.clear();
                return true;
            }
            let Some(session_id) = component.session_id.clone() else {
                return true;
            };
            let link = ctx.link().clone();
            spawn_local(async move {
                match api::fetch_suggestions(&session_id, &text).await {
                    Ok(suggestions) => link.send_message(Msg::SuggestionsReceived(suggestions)),
                    Err(err) => link.send_message(Msg::RequestFailed(err)),
                }
            });
            true
        }
        Msg::SuggestionsReceived(suggestions) => {
            // answers to older keystrokes arrive out of order
            if suggestions.query != component.search_text {
                return false;
            }
            component.suggestions = suggestions.suggestions;
            true
        }
        Msg::PickSuggestion(address) => {
            let Some(flow) = component.current_flow() else {
                return false;
            };
            if address.is_empty() {
                return false;
            }
            component.suggestions.clear();
            ctx.link()
                .send_message(Msg::Perform(Action::SelectSuggestion { flow, address }));
            true
        }
    }
}
