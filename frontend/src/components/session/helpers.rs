//! Utility functions for the session view.
//!
//! - **User Feedback**: transient toast notifications for transport failures,
//!   which have no server-rendered notice to show them.
//! - **Table shaping**: column order and row labels for the record table.
//! - **Input events**: reading the value out of input and select events.

use common::model::notice::NoticeLevel;
use common::model::record::{object_id, Attributes};
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

/// Search text shorter than this never reaches the server.
pub const MIN_SEARCH_CHARS: usize = 3;

/// Displays a temporary notification message at the bottom of the screen.
///
/// The toast removes itself after a few seconds.
pub fn show_toast(message: &str) {
    if let Some(window) = web_sys::window() {
        if let Some(document) = window.document() {
            if let (Ok(toast), Some(body)) = (document.create_element("div"), document.body()) {
                toast.set_text_content(Some(message));
                let html_toast: HtmlElement = toast.unchecked_into();
                let style = html_toast.style();
                style.set_property("position", "fixed").ok();
                style.set_property("bottom", "20px").ok();
                style.set_property("left", "50%").ok();
                style.set_property("transform", "translateX(-50%)").ok();
                style.set_property("background", "rgba(160, 20, 20, 0.9)").ok();
                style.set_property("color", "#fff").ok();
                style.set_property("padding", "10px 20px").ok();
                style.set_property("border-radius", "4px").ok();
                style.set_property("z-index", "10000").ok();
                style.set_property("font-family", "Arial, sans-serif").ok();

                if body.append_child(&html_toast).is_ok() {
                    wasm_bindgen_futures::spawn_local(async move {
                        gloo_timers::future::TimeoutFuture::new(4000).await;
                        if let Some(parent) = html_toast.parent_node() {
                            parent.remove_child(&html_toast).ok();
                        }
                    });
                }
            }
        }
    }
}

pub fn notice_class(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Success => "notice notice-success",
        NoticeLevel::Info => "notice notice-info",
        NoticeLevel::Error => "notice notice-error",
    }
}

/// Column names of the record table: every attribute in first-seen order.
pub fn column_names(rows: &[Attributes]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        for name in row.keys() {
            if !columns.iter().any(|c| c == name) {
                columns.push(name.clone());
            }
        }
    }
    columns
}

/// Label of a row in the row selector, e.g. `3 (ObjectId 42)`.
pub fn row_label(index: usize, row: &Attributes) -> String {
    match object_id(row) {
        Some(id) => format!("{index} (ObjectId {id})"),
        None => index.to_string(),
    }
}

pub fn input_value(e: &InputEvent) -> String {
    let input: HtmlInputElement = e.target_unchecked_into();
    input.value()
}

pub fn select_value(e: &Event) -> String {
    let select: HtmlSelectElement = e.target_unchecked_into();
    select.value()
}
