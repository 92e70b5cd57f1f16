//! The record form shared by the create and edit pages.
//!
//! Fields come from the schema in form-layout order: leading fields, the
//! suite address, latitude and longitude side by side, then the 0/1 service
//! flags in a grid. Identifiers, the address and the coordinates are shown
//! read-only; the address changes only by picking a search suggestion.

use common::model::record::display_value;
use common::model::schema::{FieldDescriptor, FieldKind, FormLayout};
use common::model::session::Flow;
use common::requests::Action;
use yew::html::Scope;
use yew::prelude::*;

use super::helpers::{input_value, select_value, MIN_SEARCH_CHARS};
use super::messages::Msg;
use super::state::SessionComponent;

/// Renders the create or edit form for the current record.
///
/// # Arguments
/// * `component` - Holds the schema, the entered values and the last view.
/// * `link` - Scope used to send field edits, searches and submits.
/// * `flow` - Which form to draw; it selects the pending address shown.
///
/// # Returns
/// The form markup, including the address search box and its suggestions.
pub fn build_form(
    component: &SessionComponent,
    link: &Scope<SessionComponent>,
    flow: Flow,
) -> Html {
    let state = &component.view.state;
    let layout = FormLayout::from_fields(component.schema.fields_for(flow, &state.selected_record));
    let title = match (flow, state.object_id) {
        (Flow::Create, _) => "New service center".to_string(),
        (Flow::Edit, Some(id)) => format!("Edit record {id}"),
        (Flow::Edit, None) => "Edit record".to_string(),
    };
    let field = |descriptor: &FieldDescriptor| build_field(component, link, flow, descriptor);

    html! {
        <div class="record-form">
            <h2>{ title }</h2>
            { build_address_search(component, link) }
            <div class="form-fields">
                { for layout.leading.iter().map(field) }
                { for layout.suite.iter().map(field) }
                <div class="coordinates">
                    { for layout.latitude.iter().map(field) }
                    { for layout.longitude.iter().map(field) }
                </div>
            </div>
            <div class="flag-grid">
                { for layout.flags.iter().map(field) }
            </div>
            <div class="form-actions">
                <button disabled={component.busy} onclick={link.callback(move |_| Msg::Submit(flow))}>
                    {"Submit"}
                </button>
                <button disabled={component.busy} onclick={link.callback(|_| Msg::Perform(Action::Back))}>
                    {"Back"}
                </button>
            </div>
        </div>
    }
}

fn build_address_search(component: &SessionComponent, link: &Scope<SessionComponent>) -> Html {
    let typed = component.search_text.chars().count();
    html! {
        <div class="address-search">
            <label for="address-search">{"Search address"}</label>
            <input
                id="address-search"
                type="text"
                value={component.search_text.clone()}
                oninput={link.callback(|e: InputEvent| Msg::SearchInput(input_value(&e)))}
            />
            {
                if typed > 0 && typed < MIN_SEARCH_CHARS {
                    html! { <span class="hint">{ format!("Type at least {MIN_SEARCH_CHARS} characters.") }</span> }
                } else if component.suggestions.is_empty() {
                    html! {}
                } else {
                    html! {
                        <select onchange={link.callback(|e: Event| Msg::PickSuggestion(select_value(&e)))}>
                            <option value="" selected={true}>{"Select an address"}</option>
                            { for component.suggestions.iter().map(|s| html! {
                                <option value={s.clone()}>{ s }</option>
                            }) }
                        </select>
                    }
                }
            }
        </div>
    }
}

fn build_field(
    component: &SessionComponent,
    link: &Scope<SessionComponent>,
    flow: Flow,
    descriptor: &FieldDescriptor,
) -> Html {
    let state = &component.view.state;
    let pending = state.pending(flow);
    let name = descriptor.name.clone();
    let entered = component
        .form_values
        .get(&name)
        .map(display_value)
        .unwrap_or_default();

    let control = match descriptor.kind {
        FieldKind::ReadOnly => read_only(
            state
                .selected_record
                .get(&name)
                .map(display_value)
                .unwrap_or_default(),
        ),
        FieldKind::Address => read_only(pending.address.clone()),
        FieldKind::Latitude => read_only(pending.latitude.clone()),
        FieldKind::Longitude => read_only(pending.longitude.clone()),
        FieldKind::Binary => {
            let field = name.clone();
            html! {
                <select onchange={link.callback(move |e: Event| Msg::SetField {
                    name: field.clone(),
                    value: select_value(&e),
                })}>
                    <option value="0" selected={entered != "1"}>{"0"}</option>
                    <option value="1" selected={entered == "1"}>{"1"}</option>
                </select>
            }
        }
        FieldKind::Phone | FieldKind::Suite | FieldKind::Text => {
            let field = name.clone();
            let placeholder = (descriptor.kind == FieldKind::Phone).then_some("555-123-4567");
            html! {
                <input
                    type="text"
                    value={entered}
                    placeholder={placeholder}
                    oninput={link.callback(move |e: InputEvent| Msg::SetField {
                        name: field.clone(),
                        value: input_value(&e),
                    })}
                />
            }
        }
    };

    html! {
        <div class="form-field">
            <label>{ name }</label>
            { control }
        </div>
    }
}

fn read_only(value: String) -> Html {
    html! { <input type="text" value={value} readonly={true} /> }
}
