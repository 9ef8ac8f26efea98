use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::model::{LocalData, Post, PostKind, Project};

/// Combine local drafts with the published feed. Pure: no I/O, inputs are
/// left untouched.
///
/// Duplicate ids keep the last-seen entry of the local-then-static
/// concatenation, so a published entry wins over a stale local draft with
/// the same id. Result is ordered newest first; entries with equal dates
/// fall back to id, descending, so the order is deterministic.
pub fn merge_posts(local: &[Post], statics: &[Post]) -> Vec<Post> {
    let mut by_id: BTreeMap<&str, &Post> = BTreeMap::new();
    for post in local.iter().chain(statics.iter()) {
        by_id.insert(&post.id, post);
    }

    let mut merged: Vec<Post> = by_id.into_values().cloned().collect();
    merged.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
    merged
}

pub fn filter_kind(posts: Vec<Post>, kind: PostKind) -> Vec<Post> {
    posts.into_iter().filter(|post| post.kind == kind).collect()
}

/// What the renderer needs to draw the project grid: dynamically-added
/// projects, newest first, plus the ids of suppressed static cards.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct ProjectView {
    pub local: Vec<Project>,
    #[serde(rename = "hiddenStatic")]
    pub hidden_static: BTreeSet<String>,
}

impl ProjectView {
    /// Static project cards exist only as page markup; the renderer asks
    /// here before drawing each one.
    pub fn is_static_visible(&self, id: &str) -> bool {
        !self.hidden_static.contains(id)
    }
}

pub fn project_view(bundle: &LocalData) -> ProjectView {
    ProjectView {
        local: bundle.projects.clone(),
        hidden_static: bundle.deleted_static.clone(),
    }
}
