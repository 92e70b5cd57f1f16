//! View rendering for the session component.
//!
//! One page at a time, as the server reports it: login, record table, or one
//! of the two record forms (see `form_view`). Notices from the last action
//! are shown inline above the page. Guests get the same table with the
//! create, edit and delete buttons disabled.

use common::model::record::display_value;
use common::model::session::{Flow, Page};
use common::requests::Action;
use yew::html::Scope;
use yew::prelude::*;

use super::form_view::build_form;
use super::helpers::{column_names, input_value, notice_class, row_label, select_value};
use super::messages::Msg;
use super::state::SessionComponent;

/// Renders the page the server last reported for this session.
///
/// # Arguments
/// * `component` - The component state, including the last `SessionView`.
/// * `ctx` - The component context, used for its message link.
///
/// # Returns
/// The header, the notices and the current page, or a connecting message
/// while no session is open.
pub fn view(component: &SessionComponent, ctx: &Context<SessionComponent>) -> Html {
    let link = ctx.link();

    html! {
        <div class="service-centers-root">
            { build_header(component, link) }
            { build_notices(component) }
            {
                if component.session_id.is_none() {
                    html! { <p class="connecting">{"Connecting..."}</p> }
                } else {
                    match component.view.state.page {
                        Page::Login => build_login(component, link),
                        Page::Table => build_table(component, link),
                        Page::Edit => build_form(component, link, Flow::Edit),
                        Page::Create => build_form(component, link, Flow::Create),
                    }
                }
            }
        </div>
    }
}

fn build_header(component: &SessionComponent, link: &Scope<SessionComponent>) -> Html {
    let state = &component.view.state;
    html! {
        <header class="app-header">
            <h1>{"Service Centers"}</h1>
            {
                if state.authenticated {
                    let tier = if state.is_admin() { "admin" } else { "guest" };
                    html! {
                        <div class="session-info">
                            <span class="tier">{ tier }</span>
                            <button
                                disabled={component.busy}
                                onclick={link.callback(|_| Msg::Logout)}
                            >
                                {"Log out"}
                            </button>
                        </div>
                    }
                } else {
                    html! {}
                }
            }
        </header>
    }
}

fn build_notices(component: &SessionComponent) -> Html {
    html! {
        <div class="notices">
            { for component.view.notices.iter().map(|notice| html! {
                <div class={notice_class(notice.level)}>{ &notice.text }</div>
            }) }
        </div>
    }
}

fn build_login(component: &SessionComponent, link: &Scope<SessionComponent>) -> Html {
    html! {
        <div class="login">
            <label for="access-code">{"Access code"}</label>
            <input
                id="access-code"
                type="password"
                value={component.access_code.clone()}
                oninput={link.callback(|e: InputEvent| Msg::UpdateAccessCode(input_value(&e)))}
                onkeypress={link.batch_callback(|e: KeyboardEvent| {
                    (e.key() == "Enter").then_some(Msg::Login)
                })}
            />
            <button disabled={component.busy} onclick={link.callback(|_| Msg::Login)}>
                {"Log in"}
            </button>
        </div>
    }
}

fn build_table(component: &SessionComponent, link: &Scope<SessionComponent>) -> Html {
    let rows = &component.view.rows;
    let columns = column_names(rows);
    let read_only = !component.view.state.is_admin() || component.busy;

    html! {
        <div class="record-table">
            <div class="table-actions">
                {
                    if rows.is_empty() {
                        html! { <span class="empty">{"No records."}</span> }
                    } else {
                        let row = component.selected_row;
                        html! {
                            <>
                                <label for="row-index">{"Row"}</label>
                                <select
                                    id="row-index"
                                    onchange={link.callback(|e: Event| {
                                        Msg::SelectRow(select_value(&e).parse().unwrap_or(0))
                                    })}
                                >
                                    { for rows.iter().enumerate().map(|(index, record)| html! {
                                        <option value={index.to_string()} selected={index == row}>
                                            { row_label(index, record) }
                                        </option>
                                    }) }
                                </select>
                                <button
                                    disabled={read_only}
                                    onclick={link.callback(move |_| Msg::Perform(Action::StartEdit { row }))}
                                >
                                    {"Edit"}
                                </button>
                                <button
                                    disabled={read_only}
                                    onclick={link.callback(move |_| Msg::Perform(Action::Delete { row }))}
                                >
                                    {"Delete"}
                                </button>
                            </>
                        }
                    }
                }
                <button
                    disabled={read_only}
                    onclick={link.callback(|_| Msg::Perform(Action::StartCreate))}
                >
                    {"Create"}
                </button>
                <button disabled={component.busy} onclick={link.callback(|_| Msg::Refresh)}>
                    {"Refresh"}
                </button>
            </div>
            <table>
                <thead>
                    <tr>
                        <th>{"#"}</th>
                        { for columns.iter().map(|name| html! { <th>{ name }</th> }) }
                    </tr>
                </thead>
                <tbody>
                    { for rows.iter().enumerate().map(|(index, record)| html! {
                        <tr class={classes!((index == component.selected_row).then_some("selected"))}>
                            <td>{ index.to_string() }</td>
                            { for columns.iter().map(|name| html! {
                                <td>{ record.get(name).map(display_value).unwrap_or_default() }</td>
                            }) }
                        </tr>
                    }) }
                </tbody>
            </table>
        </div>
    }
}
