use crate::state::AppContext;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

const DEFAULT_SUBMIT_LABEL: &str = "Move";
const TAKEN_SUBMIT_LABEL: &str = "Can't overwrite existing article";

/// Validation outcome for a candidate slug against the current snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SlugStatus {
    Empty,
    Taken,
    Free,
}

pub(crate) fn slug_status(candidate: &str, in_use: &[String]) -> SlugStatus {
    if candidate.is_empty() {
        SlugStatus::Empty
    } else if in_use.iter().any(|s| s == candidate) {
        SlugStatus::Taken
    } else {
        SlugStatus::Free
    }
}

/// Keep only characters allowed in a slug: lowercase letters (plus the
/// German umlauts and ß), digits, underscore, hyphen. Everything else is
/// dropped in place.
pub(crate) fn sanitize_slug(raw: &str) -> String {
    raw.chars()
        .filter(|c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | 'ä' | 'ö' | 'ü' | 'ß'))
        .collect()
}

pub(crate) fn submit_enabled(status: SlugStatus) -> bool {
    status == SlugStatus::Free
}

pub(crate) fn submit_label(status: SlugStatus) -> &'static str {
    match status {
        SlugStatus::Taken => TAKEN_SUBMIT_LABEL,
        _ => DEFAULT_SUBMIT_LABEL,
    }
}

/// Handle on an open push channel. Dropping it detaches the handlers and
/// closes the socket; no reconnection is ever attempted.
pub(crate) struct SlugChannel {
    socket: web_sys::WebSocket,
    _on_open: Closure<dyn FnMut(web_sys::Event)>,
    _on_message: Closure<dyn FnMut(web_sys::MessageEvent)>,
    _on_error: Closure<dyn FnMut(web_sys::Event)>,
    _on_close: Closure<dyn FnMut(web_sys::CloseEvent)>,
}

impl SlugChannel {
    /// Open the channel. `on_wake` fires on connect and on every message
    /// (the payload is ignored; receipt alone means "snapshot changed").
    /// `on_trouble` fires on error or close with a user-facing notice.
    pub fn open(
        url: &str,
        on_wake: impl Fn() + Clone + 'static,
        on_trouble: impl Fn(String) + Clone + 'static,
    ) -> Result<Self, ()> {
        let socket = web_sys::WebSocket::new(url).map_err(|_| ())?;

        let wake = on_wake.clone();
        let on_open =
            Closure::<dyn FnMut(web_sys::Event)>::new(move |_| wake());

        let wake = on_wake;
        let on_message =
            Closure::<dyn FnMut(web_sys::MessageEvent)>::new(move |_| wake());

        let trouble = on_trouble.clone();
        let on_error = Closure::<dyn FnMut(web_sys::Event)>::new(move |_| {
            trouble("Channel error, please reload.".to_string())
        });

        let trouble = on_trouble;
        let on_close = Closure::<dyn FnMut(web_sys::CloseEvent)>::new(move |_| {
            trouble("Channel closed, please reload.".to_string())
        });

        socket.set_onopen(Some(on_open.as_ref().unchecked_ref()));
        socket.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
        socket.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        socket.set_onclose(Some(on_close.as_ref().unchecked_ref()));

        Ok(Self {
            socket,
            _on_open: on_open,
            _on_message: on_message,
            _on_error: on_error,
            _on_close: on_close,
        })
    }
}

impl Drop for SlugChannel {
    fn drop(&mut self) {
        self.socket.set_onopen(None);
        self.socket.set_onmessage(None);
        self.socket.set_onerror(None);
        self.socket.set_onclose(None);
        let _ = self.socket.close();
    }
}

/// Resolve the configured channel address against the page origin;
/// origin-relative paths become ws:// or wss:// depending on the scheme.
pub(crate) fn resolve_channel_url(configured: &str) -> String {
    if configured.starts_with("ws://") || configured.starts_with("wss://") {
        return configured.to_string();
    }

    let Some(location) = web_sys::window().map(|w| w.location()) else {
        return configured.to_string();
    };
    let scheme = match location.protocol().as_deref() {
        Ok("https:") => "wss",
        _ => "ws",
    };
    let host = location.host().unwrap_or_default();
    format!("{scheme}://{host}{configured}")
}

/// Slug field and move button, kept in sync with the slug snapshot pushed
/// by the server.
#[component]
pub fn SlugMover(current_slug: String) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let slugs = app_state.0.slugs;
    let candidate: RwSignal<String> = RwSignal::new(current_slug.clone());

    let refetch = {
        let app_state = app_state.clone();
        move || {
            let api_client = app_state.0.api_client.get_untracked();
            let slugs = app_state.0.slugs;
            let notice = app_state.0.channel_notice;
            spawn_local(async move {
                match api_client.fetch_slugs().await {
                    Ok(list) => slugs.set(list),
                    Err(_) => notice.set(Some("Failed to get slugs".to_string())),
                }
            });
        }
    };

    let notice = app_state.0.channel_notice;
    let channel = SlugChannel::open(
        &resolve_channel_url(&crate::api::EnvConfig::new().channel_url),
        refetch,
        move |msg| notice.set(Some(msg)),
    );
    match channel {
        // The channel lives as long as the page; it is dropped (and the
        // socket closed) when the owning scope is disposed.
        Ok(channel) => {
            StoredValue::new_local(channel);
        }
        Err(()) => notice.set(Some("Channel error, please reload.".to_string())),
    }

    let status = Memo::new(move |_| slug_status(&candidate.get(), &slugs.get()));

    let on_input = move |ev: web_sys::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return;
        };
        let raw = input.value();
        let clean = sanitize_slug(&raw);
        if clean != raw {
            // Write back immediately so rejected characters never linger.
            input.set_value(&clean);
        }
        candidate.set(clean);
    };

    let on_submit = {
        let app_state = app_state.clone();
        move |_| {
            if !submit_enabled(status.get_untracked()) {
                return;
            }
            let api_client = app_state.0.api_client.get_untracked();
            let from = current_slug.clone();
            let to = candidate.get_untracked();
            spawn_local(async move {
                if api_client.move_article(&from, &to).await.is_ok() {
                    let href = format!("/{}", urlencoding::encode(&to));
                    let _ = window().location().set_href(&href);
                }
            });
        }
    };

    view! {
        <div class="slug-mover">
            <label for="slug">"Slug"</label>
            <input
                id="slug"
                name="slug"
                type="text"
                prop:value=move || candidate.get()
                class:warning=move || status.get() == SlugStatus::Taken
                on:input=on_input
            />
            <button
                type="submit"
                disabled=move || !submit_enabled(status.get())
                on:click=on_submit
            >
                {move || submit_label(status.get())}
            </button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(slugs: &[&str]) -> Vec<String> {
        slugs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn sanitize_drops_rejected_characters() {
        assert_eq!(sanitize_slug("a b!c"), "abc");
        assert_eq!(sanitize_slug("hello-world_2"), "hello-world_2");
        assert_eq!(sanitize_slug("grüße"), "grüße");
        assert_eq!(sanitize_slug("Über"), "ber");
        assert_eq!(sanitize_slug(""), "");
    }

    #[test]
    fn status_against_snapshot() {
        let in_use = snapshot(&["foo", "bar"]);
        assert_eq!(slug_status("foo", &in_use), SlugStatus::Taken);
        assert_eq!(slug_status("baz", &in_use), SlugStatus::Free);
        assert_eq!(slug_status("", &in_use), SlugStatus::Empty);
    }

    #[test]
    fn submit_affordances_follow_status() {
        assert!(!submit_enabled(SlugStatus::Empty));
        assert!(!submit_enabled(SlugStatus::Taken));
        assert!(submit_enabled(SlugStatus::Free));

        assert_eq!(submit_label(SlugStatus::Empty), DEFAULT_SUBMIT_LABEL);
        assert_eq!(submit_label(SlugStatus::Free), DEFAULT_SUBMIT_LABEL);
        assert_eq!(submit_label(SlugStatus::Taken), TAKEN_SUBMIT_LABEL);
    }

    #[test]
    fn snapshot_replacement_is_wholesale() {
        let first = snapshot(&["foo"]);
        let second = snapshot(&["bar"]);
        assert_eq!(slug_status("foo", &first), SlugStatus::Taken);
        // After the next channel wake-up the old snapshot no longer applies.
        assert_eq!(slug_status("foo", &second), SlugStatus::Free);
    }
}
