//! Notion operations, expressed as Composio actions against one connected
//! account. Every method is execute-then-normalize; the raw payload shapes
//! and their quirks live in `composio_core::notion`.

use composio_core::Error;
use composio_core::extract::value_list;
use composio_core::notion::{
    Block, BlockUpdate, Comment, Database, DatabaseQuery, DatabaseRow, DatabaseSchemaUpdate, Page,
    PageUpdate, SearchResult, User,
};
use serde_json::{Map, Value, json};

use crate::ComposioClient;
use crate::credentials::{resolve_api_key, resolve_notion_account};
use crate::envelope::{result_objects, unwrap_data};

/// Notion client using Composio as the OAuth/API layer.
pub struct NotionClient {
    manage: ComposioClient,
    connected_account_id: String,
}

impl NotionClient {
    pub fn new(manage: ComposioClient, connected_account_id: impl Into<String>) -> Self {
        Self {
            manage,
            connected_account_id: connected_account_id.into(),
        }
    }

    /// Build from `COMPOSIO_API_KEY` and `NOTION_CONNECTED_ACCOUNT_ID`, with
    /// credential-store fallback for both.
    pub fn from_env() -> Result<Self, Error> {
        Ok(Self::new(
            ComposioClient::new(resolve_api_key()?)?,
            resolve_notion_account()?,
        ))
    }

    async fn execute(&self, action: &str, params: Value) -> Result<Value, Error> {
        let raw = self
            .manage
            .execute_action(action, &self.connected_account_id, params)
            .await?;
        Ok(unwrap_data(raw))
    }

    // ----- pages -----

    pub async fn create_page(
        &self,
        parent_id: &str,
        title: &str,
        parent_type: &str,
        icon: Option<&str>,
        cover: Option<&str>,
    ) -> Result<Page, Error> {
        let mut params = json!({
            "parent_type": parent_type,
            "parent_id": parent_id,
            "title": title,
        });
        if let Some(icon) = icon {
            params["icon"] = json!(icon);
        }
        if let Some(cover) = cover {
            params["cover"] = json!(cover);
        }
        let data = self.execute("NOTION_CREATE_NOTION_PAGE", params).await?;
        Ok(Page::from_raw(&data))
    }

    pub async fn get_page(&self, page_id: &str) -> Result<Page, Error> {
        let data = self
            .execute("NOTION_FETCH_BLOCK_METADATA", json!({"block_id": page_id}))
            .await?;
        Ok(Page::from_raw(&data))
    }

    pub async fn update_page(&self, page_id: &str, update: &PageUpdate) -> Result<Page, Error> {
        let mut params = json!({"page_id": page_id});
        if let Some(title) = &update.title {
            params["title"] = json!(title);
        }
        if let Some(icon) = &update.icon {
            params["icon"] = json!(icon);
        }
        if let Some(cover) = &update.cover {
            params["cover"] = json!(cover);
        }
        if let Some(archived) = update.archived {
            params["archived"] = json!(archived);
        }
        if let Some(properties) = &update.properties {
            params["properties"] = properties.clone();
        }
        let data = self.execute("NOTION_UPDATE_PAGE", params).await?;
        Ok(Page::from_raw(&data))
    }

    pub async fn archive_page(&self, page_id: &str, archived: bool) -> Result<Page, Error> {
        let data = self
            .execute(
                "NOTION_ARCHIVE_NOTION_PAGE",
                json!({"page_id": page_id, "archived": archived}),
            )
            .await?;
        Ok(Page::from_raw(&data))
    }

    pub async fn duplicate_page(&self, page_id: &str) -> Result<Page, Error> {
        let data = self
            .execute("NOTION_DUPLICATE_PAGE", json!({"page_id": page_id}))
            .await?;
        Ok(Page::from_raw(&data))
    }

    /// Search pages by title. An empty query lists everything accessible.
    pub async fn search_pages(&self, query: &str) -> Result<Vec<Page>, Error> {
        let data = self
            .execute("NOTION_SEARCH_NOTION_PAGE", json!({"query": query}))
            .await?;
        Ok(result_objects(&data).iter().map(Page::from_raw).collect())
    }

    pub async fn get_page_property(
        &self,
        page_id: &str,
        property_id: &str,
    ) -> Result<Value, Error> {
        self.execute(
            "NOTION_GET_PAGE_PROPERTY_ACTION",
            json!({"page_id": page_id, "property_id": property_id}),
        )
        .await
    }

    // ----- blocks -----

    /// Append blocks in the simplified `{"type": ..., "text": ...}` form.
    pub async fn add_content_blocks(
        &self,
        page_id: &str,
        blocks: Vec<Value>,
    ) -> Result<Value, Error> {
        self.execute(
            "NOTION_ADD_MULTIPLE_PAGE_CONTENT",
            json!({"page_id": page_id, "blocks": blocks}),
        )
        .await
    }

    /// Append children in full Notion block structure.
    pub async fn append_blocks(&self, block_id: &str, children: Vec<Value>) -> Result<Value, Error> {
        self.execute(
            "NOTION_APPEND_BLOCK_CHILDREN",
            json!({"block_id": block_id, "children": children}),
        )
        .await
    }

    pub async fn get_block(&self, block_id: &str) -> Result<Block, Error> {
        let data = self
            .execute("NOTION_FETCH_BLOCK_METADATA", json!({"block_id": block_id}))
            .await?;
        Ok(Block::from_raw(&data))
    }

    pub async fn get_block_children(
        &self,
        block_id: &str,
        start_cursor: Option<&str>,
        page_size: u32,
    ) -> Result<Vec<Block>, Error> {
        let mut params = json!({"block_id": block_id, "page_size": page_size});
        if let Some(cursor) = start_cursor {
            params["start_cursor"] = json!(cursor);
        }
        let data = self.execute("NOTION_FETCH_BLOCK_CONTENTS", params).await?;
        Ok(result_objects(&data).iter().map(Block::from_raw).collect())
    }

    pub async fn update_block(
        &self,
        block_id: &str,
        updates: &[BlockUpdate],
    ) -> Result<Block, Error> {
        let mut params = Map::new();
        params.insert("block_id".to_string(), json!(block_id));
        for update in updates {
            update.apply_to(&mut params);
        }
        let data = self
            .execute("NOTION_UPDATE_BLOCK", Value::Object(params))
            .await?;
        Ok(Block::from_raw(&data))
    }

    pub async fn delete_block(&self, block_id: &str) -> Result<Value, Error> {
        self.execute("NOTION_DELETE_BLOCK", json!({"block_id": block_id}))
            .await
    }

    // ----- databases -----

    pub async fn create_database(
        &self,
        parent_id: &str,
        title: &str,
        properties: Value,
    ) -> Result<Database, Error> {
        let data = self
            .execute(
                "NOTION_CREATE_DATABASE",
                json!({"parent_id": parent_id, "title": title, "properties": properties}),
            )
            .await?;
        Ok(Database::from_raw(&data))
    }

    pub async fn get_database(&self, database_id: &str) -> Result<Database, Error> {
        let data = self
            .execute("NOTION_FETCH_DATABASE", json!({"database_id": database_id}))
            .await?;
        Ok(Database::from_raw(&data))
    }

    pub async fn query_database(
        &self,
        database_id: &str,
        query: &DatabaseQuery,
    ) -> Result<Vec<DatabaseRow>, Error> {
        let mut params = json!({
            "database_id": database_id,
            "page_size": query.page_size,
        });
        if let Some(filter) = &query.filter {
            params["filter"] = filter.clone();
        }
        if let Some(sorts) = &query.sorts {
            params["sorts"] = sorts.clone();
        }
        if let Some(cursor) = &query.start_cursor {
            params["start_cursor"] = json!(cursor);
        }
        let data = self.execute("NOTION_QUERY_DATABASE", params).await?;
        Ok(result_objects(&data)
            .iter()
            .map(DatabaseRow::from_raw)
            .collect())
    }

    pub async fn create_database_row(
        &self,
        database_id: &str,
        properties: Value,
    ) -> Result<DatabaseRow, Error> {
        let data = self
            .execute(
                "NOTION_INSERT_ROW_DATABASE",
                json!({"database_id": database_id, "properties": properties}),
            )
            .await?;
        Ok(DatabaseRow::from_raw(&data))
    }

    pub async fn get_database_row(&self, row_id: &str) -> Result<DatabaseRow, Error> {
        let data = self
            .execute("NOTION_FETCH_ROW", json!({"row_id": row_id}))
            .await?;
        Ok(DatabaseRow::from_raw(&data))
    }

    pub async fn update_database_row(
        &self,
        row_id: &str,
        properties: Option<Value>,
        archived: Option<bool>,
    ) -> Result<DatabaseRow, Error> {
        let mut params = json!({"row_id": row_id});
        if let Some(properties) = properties {
            params["properties"] = properties;
        }
        if let Some(archived) = archived {
            params["archived"] = json!(archived);
        }
        let data = self.execute("NOTION_UPDATE_ROW_DATABASE", params).await?;
        Ok(DatabaseRow::from_raw(&data))
    }

    pub async fn update_database_schema(
        &self,
        database_id: &str,
        update: &DatabaseSchemaUpdate,
    ) -> Result<Database, Error> {
        let mut params = json!({"database_id": database_id});
        if let Some(title) = &update.title {
            params["title"] = json!(title);
        }
        if let Some(description) = &update.description {
            params["description"] = json!(description);
        }
        if let Some(properties) = &update.properties {
            params["properties"] = properties.clone();
        }
        let data = self.execute("NOTION_UPDATE_SCHEMA_DATABASE", params).await?;
        Ok(Database::from_raw(&data))
    }

    pub async fn get_database_property(
        &self,
        database_id: &str,
        property_id: &str,
    ) -> Result<Value, Error> {
        self.execute(
            "NOTION_RETRIEVE_DATABASE_PROPERTY",
            json!({"database_id": database_id, "property_id": property_id}),
        )
        .await
    }

    // ----- comments -----

    /// Comment on a page, or reply within a discussion when
    /// `discussion_id` is given (the page id is ignored in that case).
    pub async fn create_comment(
        &self,
        parent_id: &str,
        rich_text: &str,
        discussion_id: Option<&str>,
    ) -> Result<Comment, Error> {
        let params = match discussion_id {
            Some(discussion_id) => {
                json!({"rich_text": rich_text, "discussion_id": discussion_id})
            }
            None => json!({"rich_text": rich_text, "parent_id": parent_id}),
        };
        let data = self.execute("NOTION_CREATE_COMMENT", params).await?;
        Ok(Comment::from_raw(&data))
    }

    pub async fn get_comments(&self, block_id: &str) -> Result<Vec<Comment>, Error> {
        let data = self
            .execute("NOTION_FETCH_COMMENTS", json!({"block_id": block_id}))
            .await?;
        Ok(result_objects(&data)
            .iter()
            .map(Comment::from_raw)
            .collect())
    }

    pub async fn get_comment(&self, comment_id: &str) -> Result<Comment, Error> {
        let data = self
            .execute("NOTION_RETRIEVE_COMMENT", json!({"comment_id": comment_id}))
            .await?;
        Ok(Comment::from_raw(&data))
    }

    // ----- users -----

    /// The bot user behind this integration.
    pub async fn get_current_user(&self) -> Result<User, Error> {
        let data = self.execute("NOTION_GET_ABOUT_ME", json!({})).await?;
        Ok(User::from_raw(&data))
    }

    pub async fn get_user(&self, user_id: &str) -> Result<User, Error> {
        let data = self
            .execute("NOTION_GET_ABOUT_USER", json!({"user_id": user_id}))
            .await?;
        Ok(User::from_raw(&data))
    }

    pub async fn list_users(&self) -> Result<Vec<User>, Error> {
        let data = self.execute("NOTION_LIST_USERS", json!({})).await?;
        Ok(result_objects(&data).iter().map(User::from_raw).collect())
    }

    // ----- workspace -----

    /// Search across the workspace. `filter_type` is `"page"`,
    /// `"database"`, or `None` for everything.
    pub async fn search_workspace(
        &self,
        query: &str,
        filter_type: Option<&str>,
        page_size: u32,
    ) -> Result<Vec<SearchResult>, Error> {
        let mut params = json!({"page_size": page_size});
        if !query.is_empty() {
            params["query"] = json!(query);
        }
        match filter_type {
            Some("page") => params["get_pages"] = json!(true),
            Some("database") => params["get_databases"] = json!(true),
            _ => params["get_all"] = json!(true),
        }
        let data = self.execute("NOTION_FETCH_DATA", params).await?;
        let results = if data.is_array() {
            result_objects(&data)
        } else {
            value_list(&data, &["results", "values"])
                .into_iter()
                .filter(|item| item.is_object())
                .collect()
        };
        Ok(results.iter().map(SearchResult::from_raw).collect())
    }
}
