use crate::models::EditableRole;
use crate::state::AppContext;
use crate::util::{extract_href, strip_author_markup, strip_trailing_br};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// One registered editable region. `baseline` is the markup the region had
/// when it was registered or last saved; the region counts as modified when
/// its current innerHTML differs from it.
#[derive(Clone, Debug)]
pub(crate) struct Region {
    pub dom_id: String,
    pub role: EditableRole,
    /// The id the save payload refers to: the comment id for comment
    /// regions, the article id for article regions.
    pub target: String,
    pub baseline: String,
}

/// Registry of editable regions plus the currently focused one. Provided
/// via context by the page; regions register themselves on mount.
#[derive(Clone, Copy)]
pub(crate) struct EditorCtx {
    pub regions: RwSignal<Vec<Region>>,
    pub active: RwSignal<Option<String>>,
}

impl EditorCtx {
    pub fn new() -> Self {
        Self {
            regions: RwSignal::new(vec![]),
            active: RwSignal::new(None),
        }
    }
}

pub(crate) fn find_region<'a>(regions: &'a [Region], dom_id: &str) -> Option<&'a Region> {
    regions.iter().find(|r| r.dom_id == dom_id)
}

pub(crate) fn rebaseline(regions: &mut [Region], dom_id: &str, html: &str) -> bool {
    if let Some(r) = regions.iter_mut().find(|r| r.dom_id == dom_id) {
        r.baseline = html.to_string();
        true
    } else {
        false
    }
}

/// Article save plan: `None` when neither region is modified (nothing to
/// save), otherwise the `(title, body)` pair. The payload always carries
/// both pieces of content, whichever of them changed.
pub(crate) fn plan_article_save(
    active_role: EditableRole,
    active_html: &str,
    active_modified: bool,
    other_html: &str,
    other_modified: bool,
) -> Option<(String, String)> {
    if !active_modified && !other_modified {
        return None;
    }
    match active_role {
        EditableRole::ArticleTitle => Some((active_html.to_string(), other_html.to_string())),
        _ => Some((other_html.to_string(), active_html.to_string())),
    }
}

fn current_html(dom_id: &str) -> Option<String> {
    web_sys::window()?
        .document()?
        .get_element_by_id(dom_id)
        .map(|el| el.inner_html())
}

fn notice_no_changes() {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message("No changes to save!");
    }
}

/// Run the save flow for the currently focused region: exactly one content
/// kind, at most one network write. Fire-and-forget; a failed POST leaves
/// the baseline untouched and is not surfaced.
pub(crate) fn save_active(ctx: EditorCtx, app_state: &AppContext) {
    let Some(active_id) = ctx.active.get_untracked() else {
        notice_no_changes();
        return;
    };

    let regions = ctx.regions.get_untracked();
    let Some(region) = find_region(&regions, &active_id) else {
        return;
    };
    let Some(current) = current_html(&active_id) else {
        return;
    };
    let modified = current != region.baseline;
    let api_client = app_state.0.api_client.get_untracked();

    match region.role {
        EditableRole::CommentAuthor => {
            if !modified {
                notice_no_changes();
                return;
            }
            let id = region.target.clone();
            let author = strip_author_markup(&current);
            let link = extract_href(&current);
            spawn_local(async move {
                if api_client
                    .update_comment_author(&id, &author, &link)
                    .await
                    .is_ok()
                {
                    ctx.regions.update(|rs| {
                        let _ = rebaseline(rs, &active_id, &current);
                    });
                }
            });
        }

        EditableRole::CommentBody => {
            if !modified {
                notice_no_changes();
                return;
            }
            let id = region.target.clone();
            let body = strip_trailing_br(&current);
            spawn_local(async move {
                if api_client.update_comment_body(&id, &body).await.is_ok() {
                    ctx.regions.update(|rs| {
                        let _ = rebaseline(rs, &active_id, &current);
                    });
                }
            });
        }

        EditableRole::ArticleTitle | EditableRole::ArticleBody => {
            let other_id = region
                .role
                .counterpart_dom_id(&region.target)
                .unwrap_or_default();

            // The counterpart may not be a registered region (e.g. a title
            // rendered as plain markup); read it as-is and treat it as
            // unmodified.
            let (other_html, other_modified) = match find_region(&regions, &other_id) {
                Some(other) => {
                    let html = current_html(&other_id).unwrap_or_default();
                    let changed = html != other.baseline;
                    (html, changed)
                }
                None => (current_html(&other_id).unwrap_or_default(), false),
            };

            let Some((title, body)) = plan_article_save(
                region.role,
                &current,
                modified,
                &other_html,
                other_modified,
            ) else {
                notice_no_changes();
                return;
            };

            let id = region.target.clone();
            spawn_local(async move {
                if api_client.save_article(&id, &title, &body).await.is_ok() {
                    ctx.regions.update(|rs| {
                        rebaseline(rs, &active_id, &current);
                        rebaseline(rs, &other_id, &other_html);
                    });
                }
            });
        }
    }
}

/// A directly editable piece of page content. Registers itself with the
/// editor context; the role is fixed here, never re-derived from the id.
#[component]
pub fn EditableRegion(role: EditableRole, target: String, html: String) -> impl IntoView {
    let ctx = expect_context::<EditorCtx>();
    let dom_id = role.dom_id(&target);

    ctx.regions.update(|rs| {
        rs.push(Region {
            dom_id: dom_id.clone(),
            role,
            target,
            baseline: html.clone(),
        })
    });

    let focus_id = dom_id.clone();
    view! {
        <div
            class="editable"
            id=dom_id
            contenteditable="true"
            inner_html=html
            on:focus=move |_| ctx.active.set(Some(focus_id.clone()))
        ></div>
    }
}

/// Explicit save trigger for whichever region holds focus.
#[component]
pub fn SaveButton() -> impl IntoView {
    let ctx = expect_context::<EditorCtx>();
    let app_state = expect_context::<AppContext>();

    view! {
        <button class="save" on:click=move |_| save_active(ctx, &app_state)>
            "Save"
        </button>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(dom_id: &str, role: EditableRole, target: &str, baseline: &str) -> Region {
        Region {
            dom_id: dom_id.to_string(),
            role,
            target: target.to_string(),
            baseline: baseline.to_string(),
        }
    }

    #[test]
    fn registry_lookup_and_rebaseline() {
        let mut regions = vec![
            region("title_7", EditableRole::ArticleTitle, "7", "Old title"),
            region("7", EditableRole::ArticleBody, "7", "Old body"),
        ];

        assert!(find_region(&regions, "title_7").is_some());
        assert!(find_region(&regions, "comment-body_9").is_none());

        assert!(rebaseline(&mut regions, "7", "New body"));
        assert_eq!(find_region(&regions, "7").map(|r| r.baseline.as_str()), Some("New body"));
        assert!(!rebaseline(&mut regions, "missing", "x"));
    }

    #[test]
    fn article_save_skipped_when_nothing_changed() {
        let plan = plan_article_save(EditableRole::ArticleTitle, "t", false, "b", false);
        assert!(plan.is_none());
    }

    #[test]
    fn article_payload_carries_both_regions() {
        // Active region is the title; only the title changed.
        let plan = plan_article_save(EditableRole::ArticleTitle, "t", true, "b", false);
        assert_eq!(plan, Some(("t".to_string(), "b".to_string())));

        // Active region is the body; only the counterpart title changed.
        let plan = plan_article_save(EditableRole::ArticleBody, "b", false, "t", true);
        assert_eq!(plan, Some(("t".to_string(), "b".to_string())));
    }
}
