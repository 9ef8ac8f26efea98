use std::collections::BTreeSet;

use chrono::{Datelike, SecondsFormat, Utc};

#[derive(Hash, Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    Blog,
    Microblog,
}

#[derive(Hash, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct Post {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: PostKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
    /// ISO-8601 timestamp. Same-zone ISO strings order chronologically under
    /// plain byte comparison, which the merger relies on.
    pub date: String,
}

#[derive(Hash, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub desc: String,
    pub tag: String,
    pub image: String,
    pub year: i32,
    #[serde(rename = "isLocal", default)]
    pub is_local: bool,
}

/// The single mutable persisted aggregate. Rewritten wholesale on every
/// mutation; the static feed document is never touched from the client.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocalData {
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub projects: Vec<Project>,
    /// Static projects are page markup, not data. Deleting one records its id
    /// here so the renderer can suppress the card.
    #[serde(rename = "deletedStatic", default)]
    pub deleted_static: BTreeSet<String>,
}

/// Shape of the published feed document at `data/posts.json`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StaticFeedDoc {
    #[serde(default)]
    pub posts: Vec<Post>,
}

/// Deploy-time configuration, injected as a window global on local builds
/// and absent from the public artifact. Field names match the injected JS
/// object verbatim.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SiteConfig {
    #[serde(rename = "ADMIN_KEY")]
    pub admin_key: String,
    #[serde(rename = "ACCESS_CODE")]
    pub access_code: String,
    #[serde(rename = "IS_LOCAL", default)]
    pub is_local: bool,
}

pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn now_millis() -> u64 {
    Utc::now().timestamp_millis() as u64
}

pub fn current_year() -> i32 {
    Utc::now().year()
}

/// Creation-time millis plus a random suffix, both base-36. Uniqueness per
/// creation event is the sole merge key.
pub fn generate_post_id(millis: u64) -> String {
    let mut buf = [0u8; 8];
    getrandom::getrandom(&mut buf).expect("entropy source unavailable");
    to_base36(millis) + &to_base36(u64::from_le_bytes(buf))
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_owned();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    out.iter().map(|digit| *digit as char).collect()
}
