// Browser-only smoke tests over real local storage; run with wasm-pack.
#![cfg(target_arch = "wasm32")]

extern crate seans_space;
extern crate wasm_bindgen_test;

use wasm_bindgen_test::*;

use seans_space::model::LocalData;
use seans_space::mutations::PostDraft;
use seans_space::site::Site;
use seans_space::store::{load_bundle, BrowserStore, Store};
use seans_space::{DATA_STORAGE_KEY, SESSION_STORAGE_KEY};

wasm_bindgen_test_configure!(run_in_browser);

fn clean_store() -> BrowserStore {
    let store = BrowserStore::from_window().expect("local storage unavailable");
    store.remove(DATA_STORAGE_KEY);
    store.remove(SESSION_STORAGE_KEY);
    store
}

#[wasm_bindgen_test]
fn storage_roundtrip() {
    let store = clean_store();
    assert_eq!(load_bundle(&store), LocalData::default());

    store.set("k", "v").unwrap();
    assert_eq!(store.get("k").unwrap(), "v");
    assert!(store.keys().contains(&"k".to_owned()));
    store.remove("k");
    assert_eq!(store.get("k"), None);
}

#[wasm_bindgen_test]
fn publish_persists_across_site_instances() {
    let store = clean_store();
    let site = Site::new(store, None);
    let post = site.publish_post(PostDraft::microblog("hello browser")).unwrap();

    // a second instance simulates the next page load
    let reloaded = Site::new(clean_store_keeping_data(), None);
    assert_eq!(reloaded.feed(None)[0].id, post.id);
}

fn clean_store_keeping_data() -> BrowserStore {
    BrowserStore::from_window().expect("local storage unavailable")
}
