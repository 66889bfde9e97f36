use crate::models::{MoveSlug, NewComment, SaveArticle, SaveCommentAuthor, SaveCommentBody};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    Network,
    Http,
}

#[derive(Clone, Debug)]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
        }
    }

    fn http(status: reqwest::StatusCode, body: String, ctx: &str) -> Self {
        Self {
            kind: ApiErrorKind::Http,
            message: format!("{ctx} ({status}): {body}"),
        }
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

/// Which endpoint article saves go to. The two admin deployments differ
/// only here; it is configuration, not logic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub(crate) enum ArticleEndpoint {
    #[default]
    Update,
    Save,
}

impl ArticleEndpoint {
    pub fn path(&self) -> &'static str {
        match self {
            ArticleEndpoint::Update => "/admin/update-article",
            ArticleEndpoint::Save => "/admin/save-article",
        }
    }
}

pub(crate) const FALLBACK_API_URL: &str = "http://localhost:8080";

/// Base URL for HTTP calls. Request URLs are built by joining a path onto
/// it, so it must be absolute; the page origin serves the usual
/// same-origin deployment.
fn default_api_url() -> String {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_else(|| FALLBACK_API_URL.to_string())
}

#[derive(Clone, Debug)]
pub(crate) struct EnvConfig {
    /// Absolute origin for HTTP calls.
    pub api_url: String,
    /// Push channel address, absolute or origin-relative.
    pub channel_url: String,
    pub article_endpoint: ArticleEndpoint,
}

impl EnvConfig {
    pub fn new() -> Self {
        let mut cfg = Self {
            api_url: default_api_url(),
            channel_url: "/admin/channel".to_string(),
            article_endpoint: ArticleEndpoint::Update,
        };

        // The server may override defaults via `window.ENV`.
        if let Some(window) = web_sys::window() {
            if let Some(env) = window.get("ENV") {
                if !env.is_undefined() && env.is_object() {
                    if let Some(url) = get_str(&env, "API_URL") {
                        cfg.api_url = url;
                    }
                    if let Some(url) = get_str(&env, "CHANNEL_URL") {
                        cfg.channel_url = url;
                    }
                    if let Some(ep) = get_str(&env, "ARTICLE_ENDPOINT") {
                        if ep == "save" {
                            cfg.article_endpoint = ArticleEndpoint::Save;
                        }
                    }
                }
            }
        }

        cfg
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn get_str(env: &wasm_bindgen::JsValue, key: &str) -> Option<String> {
    js_sys::Reflect::get(env, &key.into())
        .ok()
        .and_then(|v| v.as_string())
}

#[derive(Clone)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
    pub(crate) article_endpoint: ArticleEndpoint,
}

impl ApiClient {
    pub fn new(base_url: String, article_endpoint: ArticleEndpoint) -> Self {
        Self {
            base_url,
            article_endpoint,
        }
    }

    pub fn from_env() -> Self {
        let env = EnvConfig::new();
        Self::new(env.api_url, env.article_endpoint)
    }

    /// POST a form-encoded payload, discarding the response body.
    async fn post_form(&self, path: &str, body: &impl Serialize) -> ApiResult<()> {
        self.post_form_text(path, body).await.map(|_| ())
    }

    /// POST a form-encoded payload and return the response body as text.
    async fn post_form_text(&self, path: &str, body: &impl Serialize) -> ApiResult<String> {
        let client = reqwest::Client::new();
        let url = format!("{}{}", self.base_url, path);
        let res = client
            .post(url)
            .form(body)
            .send()
            .await
            .map_err(ApiError::network)?;

        if res.status().is_success() {
            res.text().await.map_err(ApiError::network)
        } else {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::http(status, body, "Request failed"))
        }
    }

    async fn get_text(&self, path: &str) -> ApiResult<String> {
        let client = reqwest::Client::new();
        let url = format!("{}{}", self.base_url, path);
        let res = client.get(url).send().await.map_err(ApiError::network)?;

        if res.status().is_success() {
            res.text().await.map_err(ApiError::network)
        } else {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::http(status, body, "Request failed"))
        }
    }

    pub async fn update_comment_author(&self, id: &str, author: &str, link: &str) -> ApiResult<()> {
        self.post_form(
            "/admin/update-comment",
            &SaveCommentAuthor {
                id: id.to_string(),
                author: author.to_string(),
                link: link.to_string(),
            },
        )
        .await
    }

    pub async fn update_comment_body(&self, id: &str, body: &str) -> ApiResult<()> {
        self.post_form(
            "/admin/update-comment",
            &SaveCommentBody {
                id: id.to_string(),
                body: body.to_string(),
            },
        )
        .await
    }

    pub async fn save_article(&self, id: &str, title: &str, body: &str) -> ApiResult<()> {
        self.post_form(
            self.article_endpoint.path(),
            &SaveArticle {
                id: id.to_string(),
                title: title.to_string(),
                body: body.to_string(),
            },
        )
        .await
    }

    /// Submit a new comment. The server answers with an HTML rendition of
    /// the comment, ready to be inserted into the thread.
    pub async fn post_comment(&self, comment: &NewComment) -> ApiResult<String> {
        self.post_form_text("/comment", comment).await
    }

    /// Full snapshot of slugs currently in use, space-separated on the wire.
    pub async fn fetch_slugs(&self) -> ApiResult<Vec<String>> {
        let text = self.get_text("/admin/slugs").await?;
        Ok(parse_slug_list(&text))
    }

    pub async fn move_article(&self, from: &str, to: &str) -> ApiResult<()> {
        self.post_form(
            "/admin/move",
            &MoveSlug {
                from: from.to_string(),
                to: to.to_string(),
            },
        )
        .await
    }
}

pub(crate) fn parse_slug_list(text: &str) -> Vec<String> {
    text.split_whitespace().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_endpoint_paths() {
        assert_eq!(ArticleEndpoint::Update.path(), "/admin/update-article");
        assert_eq!(ArticleEndpoint::Save.path(), "/admin/save-article");
        assert_eq!(ArticleEndpoint::default(), ArticleEndpoint::Update);
    }

    #[test]
    fn slug_list_is_space_separated() {
        assert_eq!(parse_slug_list("foo bar baz"), vec!["foo", "bar", "baz"]);
        assert_eq!(parse_slug_list(""), Vec::<String>::new());
        assert_eq!(parse_slug_list("  foo \n"), vec!["foo"]);
    }

    #[test]
    fn comment_update_payload_shapes() {
        // The same endpoint accepts either {id, author, link} or {id, body};
        // the payload shape selects the flow on the server.
        let author = SaveCommentAuthor {
            id: "42".to_string(),
            author: "Jane".to_string(),
            link: String::new(),
        };
        let v = serde_json::to_value(author).expect("should serialize");
        assert_eq!(v["id"], "42");
        assert!(v.get("body").is_none());

        let body = SaveCommentBody {
            id: "42".to_string(),
            body: "text".to_string(),
        };
        let v = serde_json::to_value(body).expect("should serialize");
        assert!(v.get("author").is_none());
        assert_eq!(v["body"], "text");
    }

    #[test]
    fn request_urls_are_absolute_with_fallback_base() {
        // reqwest rejects relative URLs outright, so a bare path must never
        // reach the request funnel.
        assert!(reqwest::Url::parse("/admin/slugs").is_err());

        let client = ApiClient::new(FALLBACK_API_URL.to_string(), ArticleEndpoint::Update);
        let url = format!("{}{}", client.base_url, "/admin/slugs");
        let parsed = reqwest::Url::parse(&url).expect("joined request URL should be absolute");
        assert_eq!(parsed.path(), "/admin/slugs");
    }

    #[test]
    fn http_error_carries_status_and_body() {
        let err = ApiError::http(
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            "boom".to_string(),
            "Request failed",
        );
        assert_eq!(err.kind, ApiErrorKind::Http);
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn api_client_new() {
        let client = ApiClient::new(String::new(), ArticleEndpoint::Save);
        assert_eq!(client.base_url, "");
        assert_eq!(client.article_endpoint, ArticleEndpoint::Save);
    }
}
