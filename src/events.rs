/// Emitted by the site facade after a successful mutation or session
/// transition. The renderer subscribes and recomputes its view; this
/// replaces the old reload-the-page-after-every-write behavior.
#[derive(Hash, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChangeEvent {
    PostsChanged,
    ProjectsChanged,
    SessionChanged,
    InlineEditSaved,
    StaticFeedLoaded,
}

impl ChangeEvent {
    /// Stable name handed across the wasm boundary to JS subscribers.
    pub fn name(&self) -> &'static str {
        match self {
            ChangeEvent::PostsChanged => "posts_changed",
            ChangeEvent::ProjectsChanged => "projects_changed",
            ChangeEvent::SessionChanged => "session_changed",
            ChangeEvent::InlineEditSaved => "inline_edit_saved",
            ChangeEvent::StaticFeedLoaded => "static_feed_loaded",
        }
    }
}
