use serde::{Deserialize, Serialize};

pub(crate) const COMMENTER_KEY: &str = "weblog_admin_commenter";

/// Name/link pair remembered across page loads to prefill the reply form.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub(crate) struct CommenterIdentity {
    pub author: String,
    pub link: String,
}

pub(crate) fn load_json_from_storage<T: for<'de> Deserialize<'de>>(key: &str) -> Option<T> {
    let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten())?;
    let json = storage.get_item(key).ok().flatten()?;
    serde_json::from_str(&json).ok()
}

pub(crate) fn save_json_to_storage<T: Serialize>(key: &str, value: &T) {
    if let Ok(json) = serde_json::to_string(value) {
        if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
            let _ = storage.set_item(key, &json);
        }
    }
}

pub(crate) fn load_commenter() -> CommenterIdentity {
    load_json_from_storage(COMMENTER_KEY).unwrap_or_default()
}

pub(crate) fn save_commenter(author: &str, link: &str) {
    if author.trim().is_empty() {
        return;
    }
    save_json_to_storage(
        COMMENTER_KEY,
        &CommenterIdentity {
            author: author.to_string(),
            link: link.to_string(),
        },
    );
}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` +
// wasm-bindgen-test-runner).
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn commenter_roundtrip() {
        save_commenter("Jane", "http://example.org");
        let loaded = load_commenter();
        assert_eq!(loaded.author, "Jane");
        assert_eq!(loaded.link, "http://example.org");
    }

    #[wasm_bindgen_test]
    fn empty_author_is_not_persisted() {
        save_commenter("Jane", "");
        save_commenter("  ", "http://example.org");
        assert_eq!(load_commenter().author, "Jane");
    }
}
