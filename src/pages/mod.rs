use crate::comments::{comment_branch, AnchorWatcher, ReplyField};
use crate::components::ui::Notice;
use crate::editor::{EditableRegion, EditorCtx, SaveButton};
use crate::models::{EditableRole, PageData};
use crate::slugs::SlugMover;
use crate::state::AppContext;
use leptos::prelude::*;

/// Bootstrap payload the server embeds as `window.PAGE`.
fn load_page_data() -> Option<PageData> {
    let window = web_sys::window()?;
    let value = window.get("PAGE")?;
    if value.is_undefined() {
        return None;
    }
    let json: String = js_sys::JSON::stringify(&value).ok()?.into();
    serde_json::from_str(&json).ok()
}

/// The admin view of one article: editable title/body, the comment thread
/// with reply placeholders, and the slug mover.
#[component]
pub fn ArticleAdminPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    provide_context(EditorCtx::new());

    let Some(page) = load_page_data() else {
        return view! {
            <p class="notice">"Missing page data, please reload."</p>
        }
        .into_any();
    };

    let article = page.article;
    let top_level = page.comments.len() as u32;

    view! {
        <div class="admin-page">
            <Notice message=app_state.0.channel_notice />
            <AnchorWatcher />

            <div class="article" id=format!("article_{}", article.id)>
                <EditableRegion
                    role=EditableRole::ArticleTitle
                    target=article.id.clone()
                    html=article.title_html
                />
                <EditableRegion
                    role=EditableRole::ArticleBody
                    target=article.id.clone()
                    html=article.body_html
                />
            </div>

            <div class="admin-controls">
                <SaveButton />
                <SlugMover current_slug=article.slug />
            </div>

            <div class="comments" class:empty=page.empty>
                {page.comments.into_iter().map(comment_branch).collect_view()}
                <ReplyField parent_id=article.id following=top_level />
            </div>
        </div>
    }
    .into_any()
}
