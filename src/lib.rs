extern crate console_error_panic_hook;
extern crate serde;
#[macro_use]
extern crate serde_derive;

pub mod error;
pub mod events;
pub mod export;
pub mod feed;
pub mod markup;
pub mod merge;
pub mod model;
pub mod mutations;
pub mod session;
pub mod site;
pub mod store;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::error::SiteError;
use crate::model::{PostKind, SiteConfig};
use crate::mutations::{PostDraft, ProjectDraft};
use crate::site::Site;
use crate::store::BrowserStore;

pub const DATA_STORAGE_KEY: &'static str = "seans_space_data_v3";
pub const SESSION_STORAGE_KEY: &'static str = "seans_space_role_v2";
pub const INLINE_EDIT_KEY_PREFIX: &'static str = "content_";
pub const STATIC_PROJECT_PREFIX: &'static str = "static_";
pub const STATIC_FEED_URL: &'static str = "data/posts.json";
pub const BACKUP_FILENAME: &'static str = "site_data_backup.json";
pub const CONFIG_GLOBAL: &'static str = "SEAN_CONFIG";
pub const DEFAULT_PROJECT_IMAGE: &'static str = "images/project_fintech_thumb.png";
pub const FEED_FETCH_TIMEOUT_MS: i32 = 8_000;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = log)]
    pub fn console_log(contents: &str);
    #[wasm_bindgen(js_namespace = console, js_name = warn)]
    pub fn console_warn(contents: &str);
}

struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        let line = format!("{} {}", record.level(), record.args());
        match record.level() {
            log::Level::Error | log::Level::Warn => console_warn(&line),
            _ => console_log(&line),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

fn init_console_logger() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Info);
    }
}

thread_local! {
    static SITE: RefCell<Option<Site<BrowserStore>>> = RefCell::new(None);
}

fn with_site<T>(f: impl FnOnce(&Site<BrowserStore>) -> T) -> Result<T, JsValue> {
    SITE.with(|site| {
        site.borrow()
            .as_ref()
            .map(f)
            .ok_or_else(|| JsValue::from_str("site not bootstrapped"))
    })
}

fn to_js(err: SiteError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Deploy-time config lives on the window as a plain JS object; round-trip
/// it through JSON so serde owns the shape.
fn read_site_config() -> Option<SiteConfig> {
    let window = web_sys::window()?;
    let raw = js_sys::Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL)).ok()?;
    if raw.is_undefined() || raw.is_null() {
        return None;
    }
    let text = js_sys::JSON::stringify(&raw).ok()?;
    serde_json::from_str(&String::from(text)).ok()
}

/// Page entry point. Builds the site over browser storage, then kicks off
/// the static feed fetch; local content is renderable immediately and the
/// published entries merge in whenever the fetch resolves.
#[wasm_bindgen]
pub fn bootstrap() -> Result<(), JsValue> {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    init_console_logger();

    let store = BrowserStore::from_window()
        .ok_or_else(|| JsValue::from_str("local storage unavailable"))?;
    let config = read_site_config();
    SITE.with(|site| *site.borrow_mut() = Some(Site::new(store, config)));

    feed::fetch_static_feed(
        STATIC_FEED_URL,
        Rc::new(|posts: Vec<model::Post>| {
            let _ = with_site(move |site| site.install_static_posts(posts));
        }),
    );
    Ok(())
}

/// The renderer registers one callback and re-pulls whatever view the event
/// names; no page reloads.
#[wasm_bindgen]
pub fn subscribe_changes(callback: js_sys::Function) -> Result<(), JsValue> {
    with_site(|site| {
        site.subscribe(Box::new(move |event| {
            let _ = callback.call1(&JsValue::NULL, &JsValue::from_str(event.name()));
        }));
    })
}

fn parse_kind(kind: Option<String>) -> Result<Option<PostKind>, JsValue> {
    match kind.as_deref() {
        None => Ok(None),
        Some("blog") => Ok(Some(PostKind::Blog)),
        Some("microblog") => Ok(Some(PostKind::Microblog)),
        Some(other) => Err(JsValue::from_str(&format!("unknown post kind: {}", other))),
    }
}

#[wasm_bindgen]
pub fn feed_json(kind: Option<String>) -> Result<String, JsValue> {
    let kind = parse_kind(kind)?;
    let posts = with_site(|site| site.feed(kind))?;
    serde_json::to_string(&posts).map_err(|err| JsValue::from_str(&err.to_string()))
}

#[wasm_bindgen]
pub fn project_view_json() -> Result<String, JsValue> {
    let view = with_site(|site| site.projects())?;
    serde_json::to_string(&view).map_err(|err| JsValue::from_str(&err.to_string()))
}

#[wasm_bindgen]
pub fn is_admin() -> bool {
    with_site(|site| site.is_admin()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn attempt_login(code: &str) -> Result<(), JsValue> {
    with_site(|site| site.login(code))?.map_err(to_js)
}

#[wasm_bindgen]
pub fn logout() -> Result<(), JsValue> {
    with_site(|site| site.logout())
}

#[wasm_bindgen]
pub fn publish_blog_post(title: &str, content: &str) -> Result<String, JsValue> {
    let post = with_site(|site| site.publish_post(PostDraft::blog(title, content)))?
        .map_err(to_js)?;
    Ok(post.id)
}

#[wasm_bindgen]
pub fn publish_microblog(content: &str) -> Result<String, JsValue> {
    let post = with_site(|site| site.publish_post(PostDraft::microblog(content)))?
        .map_err(to_js)?;
    Ok(post.id)
}

#[wasm_bindgen]
pub fn delete_post(id: &str) -> Result<(), JsValue> {
    with_site(|site| site.delete_post(id))?.map_err(to_js)
}

#[wasm_bindgen]
pub fn add_project(title: &str, desc: &str, tag: &str, image: &str) -> Result<String, JsValue> {
    let draft = ProjectDraft {
        title: title.to_owned(),
        desc: desc.to_owned(),
        tag: tag.to_owned(),
        image: image.to_owned(),
    };
    let project = with_site(|site| site.add_project(draft))?.map_err(to_js)?;
    Ok(project.id)
}

#[wasm_bindgen]
pub fn delete_project(id: &str) -> Result<(), JsValue> {
    with_site(|site| site.delete_project(id))?.map_err(to_js)
}

#[wasm_bindgen]
pub fn save_inline_edit(field_id: &str, content: &str) -> Result<(), JsValue> {
    with_site(|site| site.save_inline_edit(field_id, content))?.map_err(to_js)
}

#[wasm_bindgen]
pub fn load_inline_edit(field_id: &str) -> Option<String> {
    with_site(|site| site.inline_edit(field_id)).unwrap_or(None)
}

#[wasm_bindgen]
pub fn render_microblog_html(text: &str) -> String {
    markup::render_microblog(text)
}

#[wasm_bindgen]
pub fn format_post_date(iso: &str) -> String {
    markup::format_date(iso)
}

#[wasm_bindgen]
pub fn download_backup() -> Result<(), JsValue> {
    let payload = with_site(|site| site.backup_payload())?.map_err(to_js)?;
    export::trigger_download(&payload)
}
