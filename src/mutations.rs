use crate::error::SiteError;
use crate::model::{
    current_year, generate_post_id, now_iso, now_millis, Post, PostKind, Project,
};
use crate::store::{load_bundle, save_bundle, Store};
use crate::{DEFAULT_PROJECT_IMAGE, INLINE_EDIT_KEY_PREFIX, STATIC_PROJECT_PREFIX};

/// User-supplied post content before an id and timestamp are assigned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostDraft {
    pub kind: PostKind,
    pub title: Option<String>,
    pub content: String,
}

impl PostDraft {
    pub fn blog(title: &str, content: &str) -> Self {
        PostDraft {
            kind: PostKind::Blog,
            title: Some(title.to_owned()),
            content: content.to_owned(),
        }
    }

    pub fn microblog(content: &str) -> Self {
        PostDraft {
            kind: PostKind::Microblog,
            title: None,
            content: content.trim().to_owned(),
        }
    }

    fn validate(&self) -> Result<(), SiteError> {
        match self.kind {
            PostKind::Blog => {
                let titled = self
                    .title
                    .as_deref()
                    .map(|title| !title.trim().is_empty())
                    .unwrap_or(false);
                if !titled || self.content.trim().is_empty() {
                    return Err(SiteError::Validation(
                        "please fill in both title and content",
                    ));
                }
            }
            PostKind::Microblog => {
                if self.content.trim().is_empty() {
                    return Err(SiteError::Validation("content cannot be empty"));
                }
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProjectDraft {
    pub title: String,
    pub desc: String,
    pub tag: String,
    pub image: String,
}

/// Validate, stamp id + timestamp, prepend, persist. The bundle is re-read
/// right before the write: another tab may have mutated it since page load,
/// and last-writer-wins on the whole blob is the accepted model.
pub fn add_post(store: &dyn Store, draft: PostDraft) -> Result<Post, SiteError> {
    draft.validate()?;

    let post = Post {
        id: generate_post_id(now_millis()),
        kind: draft.kind,
        title: draft.title,
        content: draft.content,
        date: now_iso(),
    };

    let mut bundle = load_bundle(store);
    bundle.posts.insert(0, post.clone());
    save_bundle(store, &bundle)?;
    Ok(post)
}

/// Removes from local data only. Entries that came from the static feed are
/// not ours to delete; rejecting the unknown id keeps that visible instead
/// of silently succeeding.
pub fn delete_post(store: &dyn Store, id: &str) -> Result<(), SiteError> {
    let mut bundle = load_bundle(store);
    let before = bundle.posts.len();
    bundle.posts.retain(|post| post.id != id);
    if bundle.posts.len() == before {
        return Err(SiteError::CannotDeleteStaticContent);
    }
    save_bundle(store, &bundle)
}

pub fn add_project(store: &dyn Store, draft: ProjectDraft) -> Result<Project, SiteError> {
    if draft.title.trim().is_empty() {
        return Err(SiteError::Validation("title required"));
    }

    let project = Project {
        id: format!("proj_{}", now_millis()),
        title: draft.title,
        desc: draft.desc,
        tag: draft.tag,
        image: if draft.image.is_empty() {
            DEFAULT_PROJECT_IMAGE.to_owned()
        } else {
            draft.image
        },
        year: current_year(),
        is_local: true,
    };

    let mut bundle = load_bundle(store);
    bundle.projects.insert(0, project.clone());
    save_bundle(store, &bundle)?;
    Ok(project)
}

/// Local projects are removed outright. Static projects are page markup, so
/// "deleting" one records its id in the suppression set instead; any other
/// unknown id is rejected.
pub fn delete_project(store: &dyn Store, id: &str) -> Result<(), SiteError> {
    let mut bundle = load_bundle(store);
    if bundle.projects.iter().any(|project| project.id == id) {
        bundle.projects.retain(|project| project.id != id);
    } else if id.starts_with(STATIC_PROJECT_PREFIX) {
        bundle.deleted_static.insert(id.to_owned());
    } else {
        return Err(SiteError::CannotDeleteStaticContent);
    }
    save_bundle(store, &bundle)
}

/// Per-field override for designated editable page regions, keyed by the
/// field name baked into the markup. Independent of post/project ids.
pub fn save_inline_edit(store: &dyn Store, field_id: &str, content: &str) -> Result<(), SiteError> {
    if field_id.trim().is_empty() {
        return Err(SiteError::Validation("field id required"));
    }
    store.set(&inline_edit_key(field_id), content)
}

pub fn load_inline_edit(store: &dyn Store, field_id: &str) -> Option<String> {
    store.get(&inline_edit_key(field_id))
}

fn inline_edit_key(field_id: &str) -> String {
    format!("{}{}", INLINE_EDIT_KEY_PREFIX, field_id)
}
