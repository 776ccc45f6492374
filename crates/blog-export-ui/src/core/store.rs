//! App-wide yewdux store slices.
//!
//! # Design
//! - Keep shared UI state in one store to avoid ad-hoc contexts.
//! - The blog list mirrors the last successful response; failures leave the rows
//!   untouched but still end the initial loading state.
//! - Refreshes are requested by bumping a sequence number the list view watches.

use blog_export_api_models::{BlogDto, UserDto};
use yewdux::store::Store;

/// Global application store for shared state.
#[derive(Clone, Debug, PartialEq, Eq, Store, Default)]
pub struct AppStore {
    /// Blog list state.
    pub blogs: BlogsSlice,
    /// Signed-in user state.
    pub session: SessionSlice,
}

/// Blog list mirrored from the backend.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct BlogsSlice {
    /// Rows from the last successful list response.
    pub rows: Vec<BlogDto>,
    /// Whether at least one list request has finished, successfully or not.
    pub loaded: bool,
    /// Message from the most recent failed list request.
    pub error: Option<String>,
    /// Monotonic refresh request counter.
    pub refresh_seq: u64,
}

/// Current session details.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SessionSlice {
    /// User returned by the backend, once fetched.
    pub user: Option<UserDto>,
}

/// Replace the blog rows with a fresh list response.
pub fn set_blogs(store: &mut AppStore, rows: Vec<BlogDto>) {
    store.blogs.rows = rows;
    store.blogs.loaded = true;
    store.blogs.error = None;
}

/// Record a failed list request, keeping any rows already shown.
pub fn set_blogs_error(store: &mut AppStore, message: String) {
    store.blogs.loaded = true;
    store.blogs.error = Some(message);
}

/// Ask the list view to re-fetch blogs.
pub fn request_refresh(store: &mut AppStore) {
    store.blogs.refresh_seq = store.blogs.refresh_seq.wrapping_add(1);
}

/// Record the signed-in user.
pub fn set_user(store: &mut AppStore, user: UserDto) {
    store.session.user = Some(user);
}

/// First name used in the greeting, empty until the user is known.
#[must_use]
pub fn select_greeting_name(store: &AppStore) -> String {
    store
        .session
        .user
        .as_ref()
        .map(|user| user.first_name.trim().to_string())
        .unwrap_or_default()
}

/// Look up a loaded blog by identifier.
#[must_use]
pub fn select_blog<'a>(store: &'a AppStore, id: &str) -> Option<&'a BlogDto> {
    store
        .blogs
        .rows
        .iter()
        .find(|blog| blog.id.as_deref() == Some(id))
}

/// Stable row key: the blog id, or the URL for blogs the backend has not crawled yet.
#[must_use]
pub fn blog_row_key(index: usize, blog: &BlogDto) -> String {
    match (blog.id.as_deref(), blog.url.as_deref()) {
        (Some(id), _) => format!("id:{id}"),
        (None, Some(url)) => format!("pending:{url}"),
        (None, None) => format!("pending#{index}"),
    }
}

/// Shared dispatch handle for the global store.
#[cfg(target_arch = "wasm32")]
pub(crate) fn app_dispatch() -> yewdux::prelude::Dispatch<AppStore> {
    yewdux::prelude::Dispatch::<AppStore>::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blog(id: &str, name: &str) -> BlogDto {
        BlogDto {
            id: Some(id.to_string()),
            url: Some(format!("https://{id}.blogspot.com/")),
            name: Some(name.to_string()),
            last_download: String::new(),
        }
    }

    #[test]
    fn set_blogs_replaces_rows_and_marks_loaded() {
        let mut store = AppStore::default();
        assert!(!store.blogs.loaded);
        set_blogs(&mut store, vec![blog("a", "Alpha")]);
        set_blogs(&mut store, vec![blog("b", "Beta"), blog("c", "Gamma")]);
        assert!(store.blogs.loaded);
        assert_eq!(store.blogs.rows.len(), 2);
        assert!(select_blog(&store, "a").is_none());
        assert_eq!(
            select_blog(&store, "c").map(BlogDto::display_name),
            Some("Gamma")
        );
    }

    #[test]
    fn failed_load_ends_loading_and_keeps_rows() {
        let mut store = AppStore::default();
        set_blogs_error(&mut store, "http 502".into());
        assert!(store.blogs.loaded);
        assert_eq!(store.blogs.error.as_deref(), Some("http 502"));

        set_blogs(&mut store, vec![blog("a", "Alpha")]);
        set_blogs_error(&mut store, "offline".into());
        assert_eq!(store.blogs.rows.len(), 1);
        set_blogs(&mut store, vec![blog("a", "Alpha")]);
        assert!(store.blogs.error.is_none());
    }

    #[test]
    fn row_keys_fall_back_to_url_for_pending_blogs() {
        let pending = BlogDto {
            url: Some("https://new.blogspot.com/".into()),
            ..BlogDto::default()
        };
        assert_eq!(blog_row_key(0, &blog("a", "Alpha")), "id:a");
        assert_eq!(blog_row_key(1, &pending), "pending:https://new.blogspot.com/");
        assert_eq!(blog_row_key(2, &BlogDto::default()), "pending#2");
    }

    #[test]
    fn refresh_requests_bump_sequence() {
        let mut store = AppStore::default();
        request_refresh(&mut store);
        request_refresh(&mut store);
        assert_eq!(store.blogs.refresh_seq, 2);
        assert!(store.blogs.rows.is_empty());
    }

    #[test]
    fn greeting_name_is_empty_until_user_loads() {
        let mut store = AppStore::default();
        assert_eq!(select_greeting_name(&store), "");
        set_user(
            &mut store,
            UserDto {
                first_name: " Ada ".into(),
                last_name: "Lovelace".into(),
                email: "ada@example.com".into(),
            },
        );
        assert_eq!(select_greeting_name(&store), "Ada");
    }
}
