use std::collections::BTreeMap;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use crate::error::SiteError;
use crate::model::Post;
use crate::store::{load_bundle, Store};
use crate::BACKUP_FILENAME;

#[derive(Serialize)]
struct BackupDoc {
    posts: Vec<Post>,
    custom_edits: BTreeMap<String, String>,
}

/// The downloadable backup: the local bundle's posts plus the raw storage
/// contents, pretty-printed so the file is diffable when committed.
pub fn backup_payload(store: &dyn Store) -> Result<String, SiteError> {
    let bundle = load_bundle(store);

    let mut custom_edits = BTreeMap::new();
    for key in store.keys() {
        if let Some(value) = store.get(&key) {
            custom_edits.insert(key, value);
        }
    }

    let doc = BackupDoc {
        posts: bundle.posts,
        custom_edits,
    };
    serde_json::to_string_pretty(&doc).map_err(|err| SiteError::StorageParse(err.to_string()))
}

/// Hand the payload to the platform blob/URL machinery via a transient
/// anchor element. Browser-only glue around [`backup_payload`].
pub fn trigger_download(payload: &str) -> Result<(), JsValue> {
    let parts = js_sys::Array::new();
    parts.push(&JsValue::from_str(payload));
    let options = BlobPropertyBag::new();
    options.set_type("application/json");
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")?
        .dyn_into()
        .map_err(JsValue::from)?;
    anchor.set_href(&url);
    anchor.set_download(BACKUP_FILENAME);
    anchor.click();
    Url::revoke_object_url(&url)?;
    Ok(())
}
