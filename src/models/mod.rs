use serde::{Deserialize, Serialize};

/// Semantic role of an editable region, assigned once when the region is
/// registered. Saving dispatches on this tag instead of re-matching the
/// element id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EditableRole {
    CommentAuthor,
    CommentBody,
    ArticleTitle,
    ArticleBody,
}

impl EditableRole {
    /// DOM id for a region of this role, per the page's naming convention:
    /// `comment-author_<id>`, `comment-body_<id>`, `title_<id>`, bare `<id>`
    /// for the article body.
    pub fn dom_id(&self, target: &str) -> String {
        match self {
            EditableRole::CommentAuthor => format!("comment-author_{target}"),
            EditableRole::CommentBody => format!("comment-body_{target}"),
            EditableRole::ArticleTitle => format!("title_{target}"),
            EditableRole::ArticleBody => target.to_string(),
        }
    }

    /// An article is edited as two regions that are saved together. For the
    /// article roles this is the DOM id of the other half.
    pub fn counterpart_dom_id(&self, target: &str) -> Option<String> {
        match self {
            EditableRole::ArticleTitle => Some(EditableRole::ArticleBody.dom_id(target)),
            EditableRole::ArticleBody => Some(EditableRole::ArticleTitle.dom_id(target)),
            _ => None,
        }
    }
}

/// Bootstrap payload the server embeds as `window.PAGE`.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct PageData {
    pub article: Article,
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// True when the thread has no comments yet (styling hook on the
    /// thread container).
    #[serde(default)]
    pub empty: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct Article {
    pub id: String,
    pub slug: String,
    pub title_html: String,
    pub body_html: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct Comment {
    pub id: String,

    /// Position index on the page, matched against the URL fragment for
    /// anchor highlighting (`index-<n>`).
    pub index: u32,

    pub author_html: String,
    pub body_html: String,

    /// Admin action links, rendered only when the server grants them.
    #[serde(default)]
    pub delete_href: Option<String>,
    #[serde(default)]
    pub cancel_delete_href: Option<String>,

    #[serde(default)]
    pub children: Vec<Comment>,
}

/// Payload for a new comment submission.
#[derive(Serialize, Clone, Debug)]
pub(crate) struct NewComment {
    pub parent: String,
    pub body: String,
    pub author: String,
    pub link: String,
    /// Number of existing replies the new comment will join; the server
    /// uses it to decide head-of-branch styling.
    pub following: u32,
}

#[derive(Serialize, Clone, Debug)]
pub(crate) struct SaveCommentAuthor {
    pub id: String,
    pub author: String,
    pub link: String,
}

#[derive(Serialize, Clone, Debug)]
pub(crate) struct SaveCommentBody {
    pub id: String,
    pub body: String,
}

#[derive(Serialize, Clone, Debug)]
pub(crate) struct SaveArticle {
    pub id: String,
    pub title: String,
    pub body: String,
}

#[derive(Serialize, Clone, Debug)]
pub(crate) struct MoveSlug {
    pub from: String,
    pub to: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_id_follows_naming_convention() {
        assert_eq!(
            EditableRole::CommentAuthor.dom_id("42"),
            "comment-author_42"
        );
        assert_eq!(EditableRole::CommentBody.dom_id("42"), "comment-body_42");
        assert_eq!(EditableRole::ArticleTitle.dom_id("7"), "title_7");
        assert_eq!(EditableRole::ArticleBody.dom_id("7"), "7");
    }

    #[test]
    fn article_regions_are_counterparts() {
        assert_eq!(
            EditableRole::ArticleTitle.counterpart_dom_id("7").as_deref(),
            Some("7")
        );
        assert_eq!(
            EditableRole::ArticleBody.counterpart_dom_id("7").as_deref(),
            Some("title_7")
        );
        assert!(EditableRole::CommentBody.counterpart_dom_id("42").is_none());
    }

    #[test]
    fn page_data_bootstrap_deserializes() {
        let json = r#"{
            "article": {
                "id": "7",
                "slug": "hello-world",
                "title_html": "Hello world",
                "body_html": "<p>First post.</p>"
            },
            "comments": [
                {
                    "id": "42",
                    "index": 1,
                    "author_html": "<a href=\"http://example.org\">Jane</a>: ",
                    "body_html": "Nice.",
                    "children": []
                }
            ],
            "empty": false
        }"#;
        let page: PageData = serde_json::from_str(json).expect("bootstrap should parse");
        assert_eq!(page.article.slug, "hello-world");
        assert_eq!(page.comments.len(), 1);
        assert_eq!(page.comments[0].index, 1);
        assert!(page.comments[0].delete_href.is_none());
    }

    #[test]
    fn page_data_tolerates_missing_thread() {
        let json = r#"{
            "article": {"id": "7", "slug": "s", "title_html": "", "body_html": ""}
        }"#;
        let page: PageData = serde_json::from_str(json).expect("bootstrap should parse");
        assert!(page.comments.is_empty());
        assert!(!page.empty);
    }

    #[test]
    fn new_comment_payload_field_names() {
        let c = NewComment {
            parent: "42".to_string(),
            body: "hi".to_string(),
            author: "Jane".to_string(),
            link: String::new(),
            following: 0,
        };
        let v = serde_json::to_value(c).expect("should serialize");
        assert_eq!(v["parent"], "42");
        assert_eq!(v["following"], 0);
        assert_eq!(v["link"], "");
    }
}
