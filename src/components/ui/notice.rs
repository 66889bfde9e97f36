use leptos::prelude::*;

/// Static inline notice, prepended to the page when something
/// non-recoverable happened (channel failure, fetch failure).
#[component]
pub fn Notice(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || message.get().is_some() fallback=|| ().into_view()>
            <p class="notice">{move || message.get()}</p>
        </Show>
    }
}
