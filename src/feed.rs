use std::cell::Cell;
use std::rc::Rc;

use log::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Response;

use crate::error::SiteError;
use crate::model::{Post, StaticFeedDoc};
use crate::FEED_FETCH_TIMEOUT_MS;

/// Parse the published feed document.
pub fn parse_feed_doc(text: &str) -> Result<Vec<Post>, SiteError> {
    let doc: StaticFeedDoc =
        serde_json::from_str(text).map_err(|err| SiteError::Fetch(err.to_string()))?;
    Ok(doc.posts)
}

pub type FeedCallback = Rc<dyn Fn(Vec<Post>)>;

/// Single fetch of the published feed per page view, no retry. Every failure
/// path (network, bad status, unparseable body, timeout) resolves the
/// callback with an empty sequence so the page still renders local drafts.
/// The timeout doubles as the backstop for a fetch that never settles.
pub fn fetch_static_feed(url: &str, on_done: FeedCallback) {
    let window = match web_sys::window() {
        Some(window) => window,
        None => {
            (*on_done)(Vec::new());
            return;
        }
    };

    let settled = Rc::new(Cell::new(false));

    let settled0 = settled.clone();
    let on_done0 = on_done.clone();
    let on_timeout = Closure::<dyn FnMut()>::new(move || {
        if !settled0.replace(true) {
            warn!("static feed fetch timed out");
            (*on_done0)(Vec::new());
        }
    });
    if window
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            on_timeout.as_ref().unchecked_ref(),
            FEED_FETCH_TIMEOUT_MS,
        )
        .is_err()
    {
        (*on_done)(Vec::new());
        return;
    }
    on_timeout.forget();

    let settled1 = settled.clone();
    let on_done1 = on_done.clone();
    let on_response = Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| {
        let fail = |detail: &str| {
            if !settled1.replace(true) {
                warn!("{}", SiteError::Fetch(detail.to_owned()));
                (*on_done1)(Vec::new());
            }
        };

        let response: Response = match value.dyn_into() {
            Ok(response) => response,
            Err(_) => {
                fail("fetch returned a non-response");
                return;
            }
        };
        if !response.ok() {
            fail(&format!("status {}", response.status()));
            return;
        }
        let body = match response.text() {
            Ok(body) => body,
            Err(_) => {
                fail("response body unreadable");
                return;
            }
        };

        let settled2 = settled1.clone();
        let on_done2 = on_done1.clone();
        let on_text = Closure::<dyn FnMut(JsValue)>::new(move |text: JsValue| {
            if settled2.replace(true) {
                return;
            }
            let text = text.as_string().unwrap_or_default();
            match parse_feed_doc(&text) {
                Ok(posts) => (*on_done2)(posts),
                Err(err) => {
                    warn!("{}", err);
                    (*on_done2)(Vec::new());
                }
            }
        });
        body.then(&on_text);
        on_text.forget();
    });

    let settled3 = settled;
    let on_done3 = on_done;
    let on_error = Closure::<dyn FnMut(JsValue)>::new(move |_err: JsValue| {
        if !settled3.replace(true) {
            warn!("static feed unreachable");
            (*on_done3)(Vec::new());
        }
    });

    window
        .fetch_with_str(url)
        .then(&on_response)
        .catch(&on_error);
    on_response.forget();
    on_error.forget();
}
