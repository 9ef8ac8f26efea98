use log::info;

use crate::error::SiteError;
use crate::model::SiteConfig;
use crate::store::Store;
use crate::SESSION_STORAGE_KEY;

/// Pure read of the session state. Without a deploy-time config there is
/// nothing to compare the stored token against, so a public build is Guest
/// no matter what the store holds. This is advisory client-side gating, not
/// an authorization boundary: the only real protection is that the public
/// artifact ships no access code at all.
pub fn is_admin(store: &dyn Store, config: Option<&SiteConfig>) -> bool {
    match config {
        Some(config) => store.get(SESSION_STORAGE_KEY).as_deref() == Some(config.admin_key.as_str()),
        None => false,
    }
}

/// Guest -> Admin. On success the configured admin-key constant is stored as
/// the session token; the submitted code itself is never persisted. The
/// caller cannot distinguish a wrong code from a missing config.
pub fn login(store: &dyn Store, config: Option<&SiteConfig>, code: &str) -> Result<(), SiteError> {
    let config = config.ok_or(SiteError::AuthDenied)?;
    // a blank access code means the config template shipped unfilled
    if config.access_code.is_empty() || code != config.access_code {
        return Err(SiteError::AuthDenied);
    }
    store.set(SESSION_STORAGE_KEY, &config.admin_key)?;
    info!("admin session opened");
    Ok(())
}

/// Admin -> Guest. Sessions have no TTL; this is the only way out.
pub fn logout(store: &dyn Store) {
    store.remove(SESSION_STORAGE_KEY);
    info!("admin session closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn config() -> SiteConfig {
        SiteConfig {
            admin_key: "token-abc".into(),
            access_code: "demo123".into(),
            is_local: true,
        }
    }

    #[test]
    fn login_stores_admin_key_not_code() {
        let store = MemoryStore::new();
        let config = config();

        login(&store, Some(&config), "demo123").unwrap();
        assert_eq!(store.get(SESSION_STORAGE_KEY).unwrap(), "token-abc");
        assert!(is_admin(&store, Some(&config)));
    }

    #[test]
    fn wrong_code_leaves_session_unset() {
        let store = MemoryStore::new();
        let config = config();

        assert_eq!(
            login(&store, Some(&config), "wrong"),
            Err(SiteError::AuthDenied)
        );
        assert_eq!(store.get(SESSION_STORAGE_KEY), None);
        assert!(!is_admin(&store, Some(&config)));
    }

    #[test]
    fn no_config_forces_guest() {
        let store = MemoryStore::new();
        // even a previously stored, otherwise valid token is ignored
        store.set(SESSION_STORAGE_KEY, "token-abc").unwrap();

        assert!(!is_admin(&store, None));
        assert_eq!(login(&store, None, "demo123"), Err(SiteError::AuthDenied));
    }

    #[test]
    fn blank_access_code_cannot_log_in() {
        let store = MemoryStore::new();
        let mut config = config();
        config.access_code = String::new();

        assert_eq!(
            login(&store, Some(&config), ""),
            Err(SiteError::AuthDenied)
        );
    }

    #[test]
    fn mismatched_token_is_guest() {
        let store = MemoryStore::new();
        store.set(SESSION_STORAGE_KEY, "stale-token").unwrap();
        assert!(!is_admin(&store, Some(&config())));
    }

    #[test]
    fn logout_removes_token() {
        let store = MemoryStore::new();
        let config = config();
        login(&store, Some(&config), "demo123").unwrap();

        logout(&store);
        assert_eq!(store.get(SESSION_STORAGE_KEY), None);
        assert!(!is_admin(&store, Some(&config)));
    }
}
