use crate::api::ApiClient;
use leptos::prelude::*;

#[derive(Clone)]
pub(crate) struct AppState {
    pub api_client: RwSignal<ApiClient>,

    /// Most recent server-reported snapshot of slugs in use, replaced
    /// wholesale on every channel wake-up.
    pub slugs: RwSignal<Vec<String>>,

    /// Static notice shown when the push channel fails or a slug fetch
    /// fails. No retry is attempted.
    pub channel_notice: RwSignal<Option<String>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            api_client: RwSignal::new(ApiClient::from_env()),
            slugs: RwSignal::new(vec![]),
            channel_notice: RwSignal::new(None),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub(crate) struct AppContext(pub AppState);
