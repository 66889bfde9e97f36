use crate::editor::EditableRegion;
use crate::models::{Comment, EditableRole, NewComment};
use crate::state::AppContext;
use crate::storage::{load_commenter, save_commenter};
use crate::util::{strip_tags, strip_trailing_br, url_fragment};
use leptos::ev;
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dom::helpers::window_event_listener;
use wasm_bindgen::JsCast;

const REPLY_HINT: &str = "Reply";
const PARENT_HIGHLIGHT_CLASS: &str = "to-be-replied-to";
const BRANCH_DELETE_CLASS: &str = "to-be-deleted";

/// Lifecycle of one reply placeholder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ReplyStage {
    /// Shows the hint; hovering highlights the parent comment.
    Idle,
    /// Clicked: hint cleared, body editable, form not yet revealed.
    Active,
    /// Name/link inputs and the publish button are visible.
    Expanded,
}

/// Publish is available only when the name is non-empty and the body has
/// extracted text (markup-only content does not count).
pub(crate) fn can_publish(author: &str, body_html: &str) -> bool {
    !author.trim().is_empty() && !strip_tags(body_html).trim().is_empty()
}

/// A reply with no known following siblings is the last element of its
/// branch (styling hook only).
pub(crate) fn marks_branch_end(following: u32) -> bool {
    following == 0
}

fn toggle_class_by_id(dom_id: &str, class: &str, on: bool) {
    let Some(el) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(dom_id))
    else {
        return;
    };
    let list = el.class_list();
    let _ = if on { list.add_1(class) } else { list.remove_1(class) };
}

fn toggle_class_by_selector(selector: &str, class: &str, on: bool) {
    let Some(el) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.query_selector(selector).ok().flatten())
    else {
        return;
    };
    let list = el.class_list();
    let _ = if on { list.add_1(class) } else { list.remove_1(class) };
}

fn set_anchored(index: &str, on: bool) {
    toggle_class_by_selector(&format!(".index-{index}"), "anchored", on);
}

/// Fragment of a `Location::hash` value (leading `#` included), if any.
pub(crate) fn hash_fragment(hash: &str) -> Option<&str> {
    hash.strip_prefix('#').filter(|f| !f.is_empty())
}

/// Highlight the comment whose position index matches the URL fragment, on
/// mount and on every fragment change.
#[component]
pub fn AnchorWatcher() -> impl IntoView {
    // The view is still detached while the component body runs; the
    // initial lookup has to wait until the tree is mounted.
    Effect::new(move |_| {
        if let Ok(hash) = window().location().hash() {
            if let Some(frag) = hash_fragment(&hash) {
                set_anchored(frag, true);
            }
        }
    });

    let _hash_handle = window_event_listener(ev::hashchange, |ev: web_sys::HashChangeEvent| {
        if let Some(old) = url_fragment(&ev.old_url()) {
            set_anchored(old, false);
        }
        if let Some(new) = url_fragment(&ev.new_url()) {
            set_anchored(new, true);
        }
    });
}

/// Inline reply form for one parent. Idle → activated on click → expanded
/// on the first keystroke → submitted; on success the server's rendition is
/// inserted once and the placeholder returns to Idle.
#[component]
pub fn ReplyField(parent_id: String, following: u32) -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    let stage: RwSignal<ReplyStage> = RwSignal::new(ReplyStage::Idle);
    let body_html: RwSignal<String> = RwSignal::new(String::new());
    let author: RwSignal<String> = RwSignal::new(String::new());
    let link: RwSignal<String> = RwSignal::new(String::new());
    let submitting: RwSignal<bool> = RwSignal::new(false);

    // Server renditions of comments submitted through this placeholder,
    // inserted above the restored form.
    let renditions: RwSignal<Vec<String>> = RwSignal::new(vec![]);

    let body_ref: NodeRef<html::Div> = NodeRef::new();

    let author_id = format!("author_{parent_id}");
    let link_id = format!("link_{parent_id}");

    let pid = parent_id.clone();
    let on_mouseover = move |_| toggle_class_by_id(&pid, PARENT_HIGHLIGHT_CLASS, true);
    let pid = parent_id.clone();
    let on_mouseout = move |_| toggle_class_by_id(&pid, PARENT_HIGHLIGHT_CLASS, false);

    let on_click = move |_| {
        if stage.get_untracked() != ReplyStage::Idle {
            return;
        }
        if let Some(el) = body_ref.get_untracked() {
            el.set_inner_html("");
        }
        body_html.set(String::new());
        stage.set(ReplyStage::Active);
    };

    let on_body_input = move |ev: web_sys::Event| {
        let Some(el) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlElement>().ok())
        else {
            return;
        };
        body_html.set(el.inner_html());

        if stage.get_untracked() == ReplyStage::Active {
            // First keystroke: reveal the form, prefilled with the
            // remembered commenter identity.
            let remembered = load_commenter();
            if author.get_untracked().is_empty() {
                author.set(remembered.author);
            }
            if link.get_untracked().is_empty() {
                link.set(remembered.link);
            }
            stage.set(ReplyStage::Expanded);
        }
    };

    let on_author_input = move |ev: web_sys::Event| {
        if let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        {
            author.set(input.value());
        }
    };

    let on_link_input = move |ev: web_sys::Event| {
        if let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        {
            link.set(input.value());
        }
    };

    let pid = parent_id.clone();
    let on_publish = move |_| {
        if submitting.get_untracked()
            || !can_publish(&author.get_untracked(), &body_html.get_untracked())
        {
            return;
        }
        submitting.set(true);

        let comment = NewComment {
            parent: pid.clone(),
            body: strip_trailing_br(&body_html.get_untracked()),
            author: author.get_untracked(),
            link: link.get_untracked(),
            following,
        };
        let api_client = app_state.0.api_client.get_untracked();

        spawn_local(async move {
            match api_client.post_comment(&comment).await {
                Ok(rendition) => {
                    save_commenter(&comment.author, &comment.link);
                    renditions.update(|r| r.push(rendition));

                    // Restore the pristine placeholder for the next reply.
                    if let Some(el) = body_ref.get_untracked() {
                        el.set_inner_html(REPLY_HINT);
                    }
                    body_html.set(String::new());
                    stage.set(ReplyStage::Idle);

                    // The thread is no longer empty.
                    toggle_class_by_selector("div.empty", "empty", false);
                }
                Err(_) => {
                    // Fire-and-forget contract: the form stays up so the
                    // text is not lost, but no error is surfaced.
                }
            }
            submitting.set(false);
        });
    };

    let publish_disabled =
        move || submitting.get() || !can_publish(&author.get(), &body_html.get());

    view! {
        <div class="reply-branch">
            {move || {
                renditions
                    .get()
                    .into_iter()
                    .map(|html| view! { <div class="comment-rendition" inner_html=html></div> })
                    .collect_view()
            }}

            <div
                class="comment-form"
                class:expanded=move || stage.get() == ReplyStage::Expanded
            >
                <div
                    class="reply-body"
                    contenteditable="true"
                    inner_html=REPLY_HINT
                    node_ref=body_ref
                    on:mouseover=on_mouseover
                    on:mouseout=on_mouseout
                    on:click=on_click
                    on:input=on_body_input
                ></div>

                <Show when=move || stage.get() == ReplyStage::Expanded fallback=|| ().into_view()>
                    <table class="slide">
                        <tbody>
                            <tr>
                                <td>
                                    <label
                                        for=author_id.clone()
                                        title="Required: Your real name or nickname"
                                    >
                                        "Name"
                                    </label>
                                </td>
                                <td>
                                    <input
                                        type="text"
                                        id=author_id.clone()
                                        title="Required: Your real name or nickname"
                                        prop:value=move || author.get()
                                        on:input=on_author_input
                                    />
                                </td>
                            </tr>
                            <tr>
                                <td>
                                    <label
                                        for=link_id.clone()
                                        title="Optional: Link to a website of your choice"
                                    >
                                        "Website"
                                    </label>
                                </td>
                                <td>
                                    <input
                                        type="text"
                                        id=link_id.clone()
                                        title="Optional: Link to a website of your choice"
                                        prop:value=move || link.get()
                                        on:input=on_link_input
                                    />
                                </td>
                            </tr>
                        </tbody>
                    </table>

                    <button
                        class="slide"
                        class:last=marks_branch_end(following)
                        disabled=publish_disabled
                        on:click=on_publish.clone()
                    >
                        "Publish"
                    </button>
                </Show>
            </div>
        </div>
    }
}

/// One comment and its subtree: editable author/body regions, admin action
/// links, nested children, then the reply placeholder.
pub(crate) fn comment_branch(comment: Comment) -> AnyView {
    let Comment {
        id,
        index,
        author_html,
        body_html,
        delete_href,
        cancel_delete_href,
        children,
    } = comment;

    let following = children.len() as u32;

    let delete_link = delete_href.map(|href| {
        let own = id.clone();
        let over = move |_| toggle_class_by_id(&own, BRANCH_DELETE_CLASS, true);
        let own = id.clone();
        let out = move |_| toggle_class_by_id(&own, BRANCH_DELETE_CLASS, false);
        view! {
            <a class="do-delete" href=href on:mouseover=over on:mouseout=out>
                "Delete"
            </a>
        }
    });

    let cancel_delete_link = cancel_delete_href.map(|href| {
        let own = id.clone();
        let over = move |_| toggle_class_by_id(&own, BRANCH_DELETE_CLASS, false);
        let own = id.clone();
        let out = move |_| toggle_class_by_id(&own, BRANCH_DELETE_CLASS, true);
        view! {
            <a class="cancel-delete" href=href on:mouseover=over on:mouseout=out>
                "Cancel Delete"
            </a>
        }
    });

    view! {
        <div class=format!("comment index-{index}") id=id.clone()>
            <EditableRegion
                role=EditableRole::CommentAuthor
                target=id.clone()
                html=author_html
            />
            <EditableRegion role=EditableRole::CommentBody target=id.clone() html=body_html />

            {delete_link}
            {cancel_delete_link}

            {children
                .into_iter()
                .map(comment_branch)
                .collect_view()}

            <ReplyField parent_id=id.clone() following=following />
        </div>
    }
    .into_any()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_requires_both_fields() {
        assert!(!can_publish("", "some body"));
        assert!(!can_publish("Jane", ""));
        assert!(can_publish("Jane", "some body"));
    }

    #[test]
    fn markup_only_body_does_not_count() {
        assert!(!can_publish("Jane", "<br>"));
        assert!(!can_publish("Jane", "<p> </p>"));
        assert!(can_publish("Jane", "<p>hi</p>"));
    }

    #[test]
    fn branch_end_marking() {
        assert!(marks_branch_end(0));
        assert!(!marks_branch_end(2));
    }

    #[test]
    fn hash_fragment_parsing() {
        assert_eq!(hash_fragment("#3"), Some("3"));
        assert_eq!(hash_fragment("#"), None);
        assert_eq!(hash_fragment(""), None);
    }
}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` +
// wasm-bindgen-test-runner).
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    // Anchor highlighting only works once the comment is attached to the
    // live document, which is why the on-load check runs after mount.
    #[wasm_bindgen_test]
    fn anchored_class_toggles_on_attached_comment() {
        let document = web_sys::window().unwrap().document().unwrap();
        let el = document.create_element("div").unwrap();
        el.set_class_name("comment index-4");
        document.body().unwrap().append_child(&el).unwrap();

        set_anchored("4", true);
        assert!(el.class_list().contains("anchored"));
        set_anchored("4", false);
        assert!(!el.class_list().contains("anchored"));

        el.remove();
    }
}
