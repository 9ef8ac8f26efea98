use std::cell::RefCell;

use crate::error::SiteError;
use crate::events::ChangeEvent;
use crate::export;
use crate::merge::{self, ProjectView};
use crate::model::{Post, PostKind, Project, SiteConfig};
use crate::mutations::{self, PostDraft, ProjectDraft};
use crate::session;
use crate::store::{self, Store};

/// Wires the store, deploy-time config and the merged static feed together
/// and fans change events out to whoever renders. One instance per page.
pub struct Site<S: Store> {
    store: S,
    config: Option<SiteConfig>,
    static_posts: RefCell<Vec<Post>>,
    listeners: RefCell<Vec<Box<dyn Fn(ChangeEvent)>>>,
}

impl<S: Store> Site<S> {
    pub fn new(store: S, config: Option<SiteConfig>) -> Self {
        Site {
            store,
            config,
            static_posts: RefCell::new(Vec::new()),
            listeners: RefCell::new(Vec::new()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn subscribe(&self, listener: Box<dyn Fn(ChangeEvent)>) {
        self.listeners.borrow_mut().push(listener);
    }

    fn notify(&self, event: ChangeEvent) {
        for listener in self.listeners.borrow().iter() {
            listener(event);
        }
    }

    /// Called when the static feed fetch resolves; local content has already
    /// been renderable the whole time.
    pub fn install_static_posts(&self, posts: Vec<Post>) {
        *self.static_posts.borrow_mut() = posts;
        self.notify(ChangeEvent::StaticFeedLoaded);
    }

    /// The merged feed, newest first, re-reading the bundle so edits from
    /// another tab are picked up.
    pub fn feed(&self, kind: Option<PostKind>) -> Vec<Post> {
        let bundle = store::load_bundle(&self.store);
        let merged = merge::merge_posts(&bundle.posts, &self.static_posts.borrow());
        match kind {
            Some(kind) => merge::filter_kind(merged, kind),
            None => merged,
        }
    }

    pub fn projects(&self) -> ProjectView {
        merge::project_view(&store::load_bundle(&self.store))
    }

    pub fn is_admin(&self) -> bool {
        session::is_admin(&self.store, self.config.as_ref())
    }

    pub fn login(&self, code: &str) -> Result<(), SiteError> {
        session::login(&self.store, self.config.as_ref(), code)?;
        self.notify(ChangeEvent::SessionChanged);
        Ok(())
    }

    pub fn logout(&self) {
        session::logout(&self.store);
        self.notify(ChangeEvent::SessionChanged);
    }

    pub fn publish_post(&self, draft: PostDraft) -> Result<Post, SiteError> {
        let post = mutations::add_post(&self.store, draft)?;
        self.notify(ChangeEvent::PostsChanged);
        Ok(post)
    }

    pub fn delete_post(&self, id: &str) -> Result<(), SiteError> {
        mutations::delete_post(&self.store, id)?;
        self.notify(ChangeEvent::PostsChanged);
        Ok(())
    }

    pub fn add_project(&self, draft: ProjectDraft) -> Result<Project, SiteError> {
        let project = mutations::add_project(&self.store, draft)?;
        self.notify(ChangeEvent::ProjectsChanged);
        Ok(project)
    }

    pub fn delete_project(&self, id: &str) -> Result<(), SiteError> {
        mutations::delete_project(&self.store, id)?;
        self.notify(ChangeEvent::ProjectsChanged);
        Ok(())
    }

    pub fn save_inline_edit(&self, field_id: &str, content: &str) -> Result<(), SiteError> {
        mutations::save_inline_edit(&self.store, field_id, content)?;
        self.notify(ChangeEvent::InlineEditSaved);
        Ok(())
    }

    pub fn inline_edit(&self, field_id: &str) -> Option<String> {
        mutations::load_inline_edit(&self.store, field_id)
    }

    pub fn backup_payload(&self) -> Result<String, SiteError> {
        export::backup_payload(&self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn config() -> SiteConfig {
        SiteConfig {
            admin_key: "token-abc".into(),
            access_code: "demo123".into(),
            is_local: true,
        }
    }

    #[test]
    fn mutations_fan_out_change_events() {
        let site = Site::new(MemoryStore::new(), Some(config()));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen0 = seen.clone();
        site.subscribe(Box::new(move |event| seen0.borrow_mut().push(event)));

        let post = site.publish_post(PostDraft::microblog("hi")).unwrap();
        site.delete_post(&post.id).unwrap();
        site.login("demo123").unwrap();
        site.save_inline_edit("bio", "text").unwrap();
        site.logout();
        site.install_static_posts(Vec::new());

        assert_eq!(
            *seen.borrow(),
            vec![
                ChangeEvent::PostsChanged,
                ChangeEvent::PostsChanged,
                ChangeEvent::SessionChanged,
                ChangeEvent::InlineEditSaved,
                ChangeEvent::SessionChanged,
                ChangeEvent::StaticFeedLoaded,
            ]
        );
    }

    #[test]
    fn failed_mutations_do_not_notify() {
        let site = Site::new(MemoryStore::new(), None);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen0 = seen.clone();
        site.subscribe(Box::new(move |event| seen0.borrow_mut().push(event)));

        assert!(site.publish_post(PostDraft::microblog("  ")).is_err());
        assert!(site.delete_post("nope").is_err());
        assert!(site.login("demo123").is_err());

        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn static_posts_merge_into_feed() {
        let site = Site::new(MemoryStore::new(), None);
        let local = site.publish_post(PostDraft::microblog("local draft")).unwrap();

        // feed renders before the fetch resolves
        assert_eq!(site.feed(None), vec![local.clone()]);

        let published = Post {
            id: "pub1".into(),
            kind: PostKind::Blog,
            title: Some("Hi".into()),
            content: "body".into(),
            date: "2099-01-01T00:00:00.000Z".into(),
        };
        site.install_static_posts(vec![published.clone()]);

        assert_eq!(site.feed(None), vec![published.clone(), local]);
        assert_eq!(site.feed(Some(PostKind::Blog)), vec![published]);
    }
}
