//! Notion display records, flattened out of the nested block/page/database
//! trees the remote actions return.
//!
//! Title text lives in rich-text run arrays; which array depends on the
//! entity: pages and database rows flag one property in their property bag
//! as the title-type property, databases carry a top-level `title` run
//! array. Parent linkage is a two-step indirection (`parent.type` names the
//! key holding the id) — except comments, which the API gives a flat
//! `parent.page_id`. These asymmetries are the upstream contract, not ours
//! to smooth over.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::Error;
use crate::extract::{nested_str, parent_ref, plain_text, str_at, title_from_properties};

fn bool_at(raw: &Value, key: &str) -> bool {
    raw.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn properties_of(raw: &Value) -> Value {
    raw.get("properties").cloned().unwrap_or_else(|| json!({}))
}

/// Emoji icon: only an object-shaped `icon` with an `emoji` key counts.
fn icon_of(raw: &Value) -> Option<String> {
    nested_str(raw, &["icon", "emoji"])
}

/// Cover image: only an object-shaped `cover` with `external.url` counts.
fn cover_of(raw: &Value) -> Option<String> {
    nested_str(raw, &["cover", "external", "url"])
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    pub url: Option<String>,
    pub title: Option<String>,
    pub icon: Option<String>,
    pub cover: Option<String>,
    pub parent_id: Option<String>,
    pub parent_type: Option<String>,
    pub archived: bool,
    pub created_time: Option<String>,
    pub last_edited_time: Option<String>,
    pub properties: Value,
}

impl Page {
    pub fn from_raw(raw: &Value) -> Self {
        let (parent_type, parent_id) = parent_ref(raw);
        Self {
            id: str_at(raw, &["id"]).unwrap_or_default(),
            url: str_at(raw, &["url"]),
            title: title_from_properties(&properties_of(raw)),
            icon: icon_of(raw),
            cover: cover_of(raw),
            parent_id,
            parent_type,
            archived: bool_at(raw, "archived"),
            created_time: str_at(raw, &["created_time"]),
            last_edited_time: str_at(raw, &["last_edited_time"]),
            properties: properties_of(raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    #[serde(rename = "type")]
    pub block_type: String,
    pub has_children: bool,
    pub archived: bool,
    pub created_time: Option<String>,
    pub last_edited_time: Option<String>,
    pub parent_id: Option<String>,
    /// The type-specific payload, copied verbatim from the key the raw
    /// block's `type` field names.
    pub content: Option<Value>,
}

impl Block {
    pub fn from_raw(raw: &Value) -> Self {
        let block_type =
            str_at(raw, &["type"]).unwrap_or_else(|| "unknown".to_string());
        let (_, parent_id) = parent_ref(raw);
        Self {
            content: raw.get(&block_type).cloned(),
            id: str_at(raw, &["id"]).unwrap_or_default(),
            block_type,
            has_children: bool_at(raw, "has_children"),
            archived: bool_at(raw, "archived"),
            created_time: str_at(raw, &["created_time"]),
            last_edited_time: str_at(raw, &["last_edited_time"]),
            parent_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Database {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub icon: Option<String>,
    pub parent_id: Option<String>,
    pub archived: bool,
    pub created_time: Option<String>,
    pub last_edited_time: Option<String>,
    pub properties: Value,
}

impl Database {
    pub fn from_raw(raw: &Value) -> Self {
        let (_, parent_id) = parent_ref(raw);
        Self {
            id: str_at(raw, &["id"]).unwrap_or_default(),
            // Database titles are a top-level run array, not a property scan.
            title: raw.get("title").and_then(plain_text),
            description: raw.get("description").and_then(plain_text),
            url: str_at(raw, &["url"]),
            icon: icon_of(raw),
            parent_id,
            archived: bool_at(raw, "archived"),
            created_time: str_at(raw, &["created_time"]),
            last_edited_time: str_at(raw, &["last_edited_time"]),
            properties: properties_of(raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseRow {
    pub id: String,
    pub url: Option<String>,
    pub properties: Value,
    pub created_time: Option<String>,
    pub last_edited_time: Option<String>,
    pub archived: bool,
}

impl DatabaseRow {
    pub fn from_raw(raw: &Value) -> Self {
        Self {
            id: str_at(raw, &["id"]).unwrap_or_default(),
            url: str_at(raw, &["url"]),
            properties: properties_of(raw),
            created_time: str_at(raw, &["created_time"]),
            last_edited_time: str_at(raw, &["last_edited_time"]),
            archived: bool_at(raw, "archived"),
        }
    }

    /// Row titles come from the same property-bag scan as pages.
    pub fn title(&self) -> Option<String> {
        title_from_properties(&self.properties)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub discussion_id: Option<String>,
    pub parent_id: Option<String>,
    pub rich_text: Option<Value>,
    pub created_time: Option<String>,
    pub created_by: Option<Value>,
}

impl Comment {
    pub fn from_raw(raw: &Value) -> Self {
        Self {
            id: str_at(raw, &["id"]).unwrap_or_default(),
            discussion_id: str_at(raw, &["discussion_id"]),
            // Comments are the one place the API hands us a flat parent key.
            parent_id: nested_str(raw, &["parent", "page_id"]),
            rich_text: raw.get("rich_text").filter(|v| !v.is_null()).cloned(),
            created_time: str_at(raw, &["created_time"]),
            created_by: raw.get("created_by").filter(|v| !v.is_null()).cloned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(rename = "type")]
    pub user_type: Option<String>,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub email: Option<String>,
}

impl User {
    pub fn from_raw(raw: &Value) -> Self {
        Self {
            id: str_at(raw, &["id"]).unwrap_or_default(),
            user_type: str_at(raw, &["type"]),
            name: str_at(raw, &["name"]),
            avatar_url: str_at(raw, &["avatar_url"]),
            // Only person-type users expose an email, nested under `person`.
            email: nested_str(raw, &["person", "email"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub object_type: String,
    pub title: Option<String>,
    pub url: Option<String>,
    pub parent_id: Option<String>,
    pub last_edited_time: Option<String>,
}

impl SearchResult {
    pub fn from_raw(raw: &Value) -> Self {
        let object_type =
            str_at(raw, &["object"]).unwrap_or_else(|| "page".to_string());
        let title = if object_type == "database" {
            raw.get("title").and_then(plain_text)
        } else {
            title_from_properties(&properties_of(raw))
        };
        let (_, parent_id) = parent_ref(raw);
        Self {
            id: str_at(raw, &["id"]).unwrap_or_default(),
            object_type,
            title,
            url: str_at(raw, &["url"]),
            parent_id,
            last_edited_time: str_at(raw, &["last_edited_time"]),
        }
    }
}

/// Fields of a page that can change in one update call. `None` means
/// "leave untouched" and the field is omitted from the request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageUpdate {
    pub title: Option<String>,
    pub icon: Option<String>,
    pub cover: Option<String>,
    pub archived: Option<bool>,
    pub properties: Option<Value>,
}

/// Input for querying a database.
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseQuery {
    pub filter: Option<Value>,
    pub sorts: Option<Value>,
    pub page_size: u32,
    pub start_cursor: Option<String>,
}

impl Default for DatabaseQuery {
    fn default() -> Self {
        Self {
            filter: None,
            sorts: None,
            page_size: 100,
            start_cursor: None,
        }
    }
}

/// Schema-level changes to a database (title, description, property defs).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatabaseSchemaUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub properties: Option<Value>,
}

/// One updatable aspect of a block. The v2 update action takes the
/// type-specific payload under the key named after the block type; this
/// union enumerates the block kinds the API accepts instead of passing
/// arbitrary key/value pairs through.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockUpdate {
    Paragraph(Value),
    Heading1(Value),
    Heading2(Value),
    Heading3(Value),
    BulletedListItem(Value),
    NumberedListItem(Value),
    ToDo(Value),
    Toggle(Value),
    Quote(Value),
    Callout(Value),
    Code(Value),
    Archived(bool),
}

impl BlockUpdate {
    /// Map a string block kind plus payload onto the union. Used by the CLI
    /// and MCP surfaces, which receive the kind as text.
    pub fn from_parts(kind: &str, payload: Value) -> Result<Self, Error> {
        let update = match kind {
            "paragraph" => BlockUpdate::Paragraph(payload),
            "heading_1" => BlockUpdate::Heading1(payload),
            "heading_2" => BlockUpdate::Heading2(payload),
            "heading_3" => BlockUpdate::Heading3(payload),
            "bulleted_list_item" => BlockUpdate::BulletedListItem(payload),
            "numbered_list_item" => BlockUpdate::NumberedListItem(payload),
            "to_do" => BlockUpdate::ToDo(payload),
            "toggle" => BlockUpdate::Toggle(payload),
            "quote" => BlockUpdate::Quote(payload),
            "callout" => BlockUpdate::Callout(payload),
            "code" => BlockUpdate::Code(payload),
            "archived" => match payload {
                Value::Bool(flag) => BlockUpdate::Archived(flag),
                other => {
                    return Err(Error::malformed(format!(
                        "block update 'archived' takes a boolean, got {other}"
                    )));
                }
            },
            other => {
                return Err(Error::malformed(format!(
                    "unknown block update kind '{other}'"
                )));
            }
        };
        Ok(update)
    }

    pub fn key(&self) -> &'static str {
        match self {
            BlockUpdate::Paragraph(_) => "paragraph",
            BlockUpdate::Heading1(_) => "heading_1",
            BlockUpdate::Heading2(_) => "heading_2",
            BlockUpdate::Heading3(_) => "heading_3",
            BlockUpdate::BulletedListItem(_) => "bulleted_list_item",
            BlockUpdate::NumberedListItem(_) => "numbered_list_item",
            BlockUpdate::ToDo(_) => "to_do",
            BlockUpdate::Toggle(_) => "toggle",
            BlockUpdate::Quote(_) => "quote",
            BlockUpdate::Callout(_) => "callout",
            BlockUpdate::Code(_) => "code",
            BlockUpdate::Archived(_) => "archived",
        }
    }

    fn value(&self) -> Value {
        match self {
            BlockUpdate::Archived(flag) => Value::Bool(*flag),
            BlockUpdate::Paragraph(v)
            | BlockUpdate::Heading1(v)
            | BlockUpdate::Heading2(v)
            | BlockUpdate::Heading3(v)
            | BlockUpdate::BulletedListItem(v)
            | BlockUpdate::NumberedListItem(v)
            | BlockUpdate::ToDo(v)
            | BlockUpdate::Toggle(v)
            | BlockUpdate::Quote(v)
            | BlockUpdate::Callout(v)
            | BlockUpdate::Code(v) => v.clone(),
        }
    }

    pub fn apply_to(&self, params: &mut Map<String, Value>) {
        params.insert(self.key().to_string(), self.value());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page_fixture() -> Value {
        json!({
            "id": "pg_1",
            "url": "https://notion.so/pg_1",
            "archived": false,
            "created_time": "2026-01-02T03:04:05.000Z",
            "icon": {"type": "emoji", "emoji": "📘"},
            "cover": {"type": "external", "external": {"url": "https://img/c.png"}},
            "parent": {"type": "database_id", "database_id": "D1"},
            "properties": {
                "Name": {
                    "type": "title",
                    "title": [{"plain_text": "A"}, {"plain_text": "B"}]
                },
                "Status": {"type": "select", "select": {"name": "Done"}}
            }
        })
    }

    #[test]
    fn page_flattens_title_parent_icon_and_cover() {
        let page = Page::from_raw(&page_fixture());
        assert_eq!(page.id, "pg_1");
        assert_eq!(page.title.as_deref(), Some("AB"));
        assert_eq!(page.parent_id.as_deref(), Some("D1"));
        assert_eq!(page.parent_type.as_deref(), Some("database_id"));
        assert_eq!(page.icon.as_deref(), Some("📘"));
        assert_eq!(page.cover.as_deref(), Some("https://img/c.png"));
    }

    #[test]
    fn page_icon_requires_object_shape() {
        let mut raw = page_fixture();
        raw["icon"] = json!("📘");
        assert_eq!(Page::from_raw(&raw).icon, None);
    }

    #[test]
    fn page_workspace_parent_has_no_id() {
        let mut raw = page_fixture();
        raw["parent"] = json!({"type": "workspace", "workspace": true});
        let page = Page::from_raw(&raw);
        assert_eq!(page.parent_type.as_deref(), Some("workspace"));
        assert_eq!(page.parent_id, None);
    }

    #[test]
    fn block_content_follows_the_type_key() {
        let raw = json!({
            "id": "bl_1",
            "type": "paragraph",
            "has_children": false,
            "paragraph": {"rich_text": [{"plain_text": "hi"}]},
            "parent": {"type": "page_id", "page_id": "pg_1"}
        });
        let block = Block::from_raw(&raw);
        assert_eq!(block.block_type, "paragraph");
        assert_eq!(
            block.content,
            Some(json!({"rich_text": [{"plain_text": "hi"}]}))
        );
        assert_eq!(block.parent_id.as_deref(), Some("pg_1"));
    }

    #[test]
    fn block_without_type_is_unknown_and_contentless() {
        let block = Block::from_raw(&json!({"id": "bl_2"}));
        assert_eq!(block.block_type, "unknown");
        assert_eq!(block.content, None);
    }

    #[test]
    fn database_title_reads_top_level_runs() {
        let raw = json!({
            "id": "db_1",
            "title": [{"plain_text": "Tasks"}],
            "description": [{"plain_text": "All "}, {"plain_text": "work"}],
            "parent": {"type": "page_id", "page_id": "pg_1"}
        });
        let db = Database::from_raw(&raw);
        assert_eq!(db.title.as_deref(), Some("Tasks"));
        assert_eq!(db.description.as_deref(), Some("All work"));
        assert_eq!(db.parent_id.as_deref(), Some("pg_1"));
    }

    #[test]
    fn comment_parent_is_flat_page_id() {
        let raw = json!({
            "id": "cm_1",
            "discussion_id": "ds_1",
            "parent": {"type": "page_id", "page_id": "pg_7"},
            "rich_text": [{"plain_text": "nice"}]
        });
        let comment = Comment::from_raw(&raw);
        assert_eq!(comment.parent_id.as_deref(), Some("pg_7"));
    }

    #[test]
    fn user_email_only_from_person_object() {
        let person = json!({"id": "u1", "type": "person", "person": {"email": "a@b.c"}});
        assert_eq!(User::from_raw(&person).email.as_deref(), Some("a@b.c"));
        let bot = json!({"id": "u2", "type": "bot", "bot": {}});
        assert_eq!(User::from_raw(&bot).email, None);
    }

    #[test]
    fn search_result_title_depends_on_object_type() {
        let db = json!({
            "id": "db_1",
            "object": "database",
            "title": [{"plain_text": "Tasks"}]
        });
        assert_eq!(SearchResult::from_raw(&db).title.as_deref(), Some("Tasks"));

        let page = json!({
            "id": "pg_1",
            "object": "page",
            "properties": {
                "Name": {"type": "title", "title": [{"plain_text": "Notes"}]}
            }
        });
        let result = SearchResult::from_raw(&page);
        assert_eq!(result.object_type, "page");
        assert_eq!(result.title.as_deref(), Some("Notes"));
    }

    #[test]
    fn block_update_builds_typed_params() {
        let update = BlockUpdate::from_parts(
            "paragraph",
            json!({"rich_text": [{"plain_text": "x"}]}),
        )
        .unwrap();
        let mut params = Map::new();
        update.apply_to(&mut params);
        assert_eq!(
            params.get("paragraph"),
            Some(&json!({"rich_text": [{"plain_text": "x"}]}))
        );

        let archived = BlockUpdate::from_parts("archived", json!(true)).unwrap();
        archived.apply_to(&mut params);
        assert_eq!(params.get("archived"), Some(&json!(true)));
    }

    #[test]
    fn block_update_rejects_unknown_kind() {
        let err = BlockUpdate::from_parts("table_of_contents_v9", json!({}));
        assert!(matches!(err, Err(Error::MalformedInput(_))));
        let err = BlockUpdate::from_parts("archived", json!("yes"));
        assert!(matches!(err, Err(Error::MalformedInput(_))));
    }
}
