use clap::Subcommand;
use composio_core::Error;
use composio_core::notion::{DatabaseQuery, PageUpdate};
use composio_client::NotionClient;
use serde_json::Value;

use crate::util::{notion_client, parse_json_arg, report_error};

#[derive(Subcommand)]
pub enum NotionCommands {
    /// Show the bot user behind this integration
    Me,
    /// List workspace users
    Users,
    /// Get one user
    User {
        user_id: String,
    },
    /// Search the workspace
    Search {
        #[arg(default_value = "")]
        query: String,
        /// Restrict to "page" or "database"
        #[arg(long = "type", short = 't')]
        filter_type: Option<String>,
        #[arg(long, short = 'l', default_value_t = 20)]
        limit: u32,
    },
    /// Get page details
    Page {
        page_id: String,
    },
    /// Create a page
    CreatePage {
        parent_id: String,
        title: String,
        /// "page_id" or "database_id"
        #[arg(long, default_value = "page_id")]
        parent_type: String,
        /// Emoji icon
        #[arg(long, short = 'i')]
        icon: Option<String>,
        /// Cover image URL
        #[arg(long)]
        cover: Option<String>,
    },
    /// Update page title, icon, cover, or properties
    UpdatePage {
        page_id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        cover: Option<String>,
        /// Property values as JSON
        #[arg(long)]
        properties: Option<String>,
    },
    /// Archive a page (or restore it)
    Archive {
        page_id: String,
        #[arg(long)]
        restore: bool,
    },
    /// Duplicate a page with all its content
    Duplicate {
        page_id: String,
    },
    /// List child blocks of a page or block
    Blocks {
        block_id: String,
        #[arg(long)]
        cursor: Option<String>,
        #[arg(long, default_value_t = 100)]
        page_size: u32,
    },
    /// Append content blocks to a page
    AddContent {
        page_id: String,
        /// Block list as JSON, e.g. [{"type": "paragraph", "text": "Hi"}]
        #[arg(long)]
        blocks: String,
    },
    /// Get database details
    Database {
        database_id: String,
    },
    /// Query a database for rows
    Query {
        database_id: String,
        /// Notion filter object as JSON
        #[arg(long, short = 'f')]
        filter: Option<String>,
        /// Sort list as JSON
        #[arg(long)]
        sorts: Option<String>,
        #[arg(long, short = 'n', default_value_t = 20)]
        page_size: u32,
    },
    /// Insert a row into a database
    CreateRow {
        database_id: String,
        /// Property values as JSON
        #[arg(long)]
        properties: String,
    },
    /// Get a database row
    Row {
        row_id: String,
    },
    /// Update a database row
    UpdateRow {
        row_id: String,
        #[arg(long)]
        properties: Option<String>,
        #[arg(long)]
        archived: Option<bool>,
    },
    /// List comments on a page or block
    Comments {
        block_id: String,
    },
    /// Comment on a page, or reply in a discussion
    CommentCreate {
        parent_id: String,
        text: String,
        #[arg(long)]
        discussion: Option<String>,
    },
}

pub async fn run(api_key: Option<&str>, command: NotionCommands) -> i32 {
    let client = match notion_client(api_key) {
        Ok(client) => client,
        Err(e) => return report_error(&e),
    };
    let result = dispatch(&client, command).await;
    match result {
        Ok(()) => 0,
        Err(e) => report_error(&e),
    }
}

async fn dispatch(client: &NotionClient, command: NotionCommands) -> Result<(), Error> {
    match command {
        NotionCommands::Me => me(client).await,
        NotionCommands::Users => users(client).await,
        NotionCommands::User { user_id } => user(client, &user_id).await,
        NotionCommands::Search {
            query,
            filter_type,
            limit,
        } => search(client, &query, filter_type.as_deref(), limit).await,
        NotionCommands::Page { page_id } => page(client, &page_id).await,
        NotionCommands::CreatePage {
            parent_id,
            title,
            parent_type,
            icon,
            cover,
        } => {
            create_page(
                client,
                &parent_id,
                &title,
                &parent_type,
                icon.as_deref(),
                cover.as_deref(),
            )
            .await
        }
        NotionCommands::UpdatePage {
            page_id,
            title,
            icon,
            cover,
            properties,
        } => update_page(client, &page_id, title, icon, cover, properties.as_deref()).await,
        NotionCommands::Archive { page_id, restore } => archive(client, &page_id, !restore).await,
        NotionCommands::Duplicate { page_id } => duplicate(client, &page_id).await,
        NotionCommands::Blocks {
            block_id,
            cursor,
            page_size,
        } => blocks(client, &block_id, cursor.as_deref(), page_size).await,
        NotionCommands::AddContent { page_id, blocks } => {
            add_content(client, &page_id, &blocks).await
        }
        NotionCommands::Database { database_id } => database(client, &database_id).await,
        NotionCommands::Query {
            database_id,
            filter,
            sorts,
            page_size,
        } => {
            query(
                client,
                &database_id,
                filter.as_deref(),
                sorts.as_deref(),
                page_size,
            )
            .await
        }
        NotionCommands::CreateRow {
            database_id,
            properties,
        } => create_row(client, &database_id, &properties).await,
        NotionCommands::Row { row_id } => row(client, &row_id).await,
        NotionCommands::UpdateRow {
            row_id,
            properties,
            archived,
        } => update_row(client, &row_id, properties.as_deref(), archived).await,
        NotionCommands::Comments { block_id } => comments(client, &block_id).await,
        NotionCommands::CommentCreate {
            parent_id,
            text,
            discussion,
        } => comment_create(client, &parent_id, &text, discussion.as_deref()).await,
    }
}

async fn me(client: &NotionClient) -> Result<(), Error> {
    let user = client.get_current_user().await?;
    println!(
        "Bot: {} ({})",
        user.name.as_deref().unwrap_or("Unknown"),
        user.id
    );
    if let Some(user_type) = user.user_type {
        println!("  Type: {user_type}");
    }
    Ok(())
}

async fn users(client: &NotionClient) -> Result<(), Error> {
    let users = client.list_users().await?;
    if users.is_empty() {
        println!("No users found.");
        return Ok(());
    }
    for user in users {
        let email = user
            .email
            .map(|email| format!(" ({email})"))
            .unwrap_or_default();
        println!(
            "  {}{} [{}] - {}",
            user.name.as_deref().unwrap_or("Unknown"),
            email,
            user.user_type.as_deref().unwrap_or("?"),
            user.id
        );
    }
    Ok(())
}

async fn user(client: &NotionClient, user_id: &str) -> Result<(), Error> {
    let user = client.get_user(user_id).await?;
    println!("User: {}", user.name.as_deref().unwrap_or("Unknown"));
    println!("  ID:   {}", user.id);
    if let Some(user_type) = user.user_type {
        println!("  Type: {user_type}");
    }
    if let Some(email) = user.email {
        println!("  Email: {email}");
    }
    Ok(())
}

async fn search(
    client: &NotionClient,
    query: &str,
    filter_type: Option<&str>,
    limit: u32,
) -> Result<(), Error> {
    let results = client.search_workspace(query, filter_type, limit).await?;
    if results.is_empty() {
        println!("No results found.");
        return Ok(());
    }
    for result in results {
        let marker = if result.object_type == "database" {
            "db"
        } else {
            "p"
        };
        println!("  [{marker}] {}", result.title.as_deref().unwrap_or("Untitled"));
        println!("       ID: {}", result.id);
        if let Some(url) = result.url {
            println!("       URL: {url}");
        }
        println!();
    }
    Ok(())
}

fn print_page(page: &composio_core::notion::Page, heading: &str) {
    println!("{heading}: {}", page.title.as_deref().unwrap_or("Untitled"));
    println!("  ID: {}", page.id);
    if let Some(url) = &page.url {
        println!("  URL: {url}");
    }
    println!("  Archived: {}", page.archived);
    if let Some(created) = &page.created_time {
        println!("  Created: {created}");
    }
    if let Some(edited) = &page.last_edited_time {
        println!("  Edited: {edited}");
    }
}

async fn page(client: &NotionClient, page_id: &str) -> Result<(), Error> {
    let page = client.get_page(page_id).await?;
    print_page(&page, "Page");
    Ok(())
}

async fn create_page(
    client: &NotionClient,
    parent_id: &str,
    title: &str,
    parent_type: &str,
    icon: Option<&str>,
    cover: Option<&str>,
) -> Result<(), Error> {
    let page = client
        .create_page(parent_id, title, parent_type, icon, cover)
        .await?;
    print_page(&page, "Page created");
    Ok(())
}

async fn update_page(
    client: &NotionClient,
    page_id: &str,
    title: Option<String>,
    icon: Option<String>,
    cover: Option<String>,
    properties: Option<&str>,
) -> Result<(), Error> {
    let update = PageUpdate {
        title,
        icon,
        cover,
        archived: None,
        properties: properties
            .map(|raw| parse_json_arg("--properties", raw))
            .transpose()?,
    };
    let page = client.update_page(page_id, &update).await?;
    print_page(&page, "Page updated");
    Ok(())
}

async fn archive(client: &NotionClient, page_id: &str, archived: bool) -> Result<(), Error> {
    let page = client.archive_page(page_id, archived).await?;
    let verb = if archived { "archived" } else { "restored" };
    println!("Page {} {verb}.", page.id);
    Ok(())
}

async fn duplicate(client: &NotionClient, page_id: &str) -> Result<(), Error> {
    let page = client.duplicate_page(page_id).await?;
    print_page(&page, "Page duplicated");
    Ok(())
}

async fn blocks(
    client: &NotionClient,
    block_id: &str,
    cursor: Option<&str>,
    page_size: u32,
) -> Result<(), Error> {
    let blocks = client.get_block_children(block_id, cursor, page_size).await?;
    if blocks.is_empty() {
        println!("No blocks found.");
        return Ok(());
    }
    for block in blocks {
        let children = if block.has_children { " +children" } else { "" };
        println!("  [{}]{} {}", block.block_type, children, block.id);
    }
    Ok(())
}

async fn add_content(client: &NotionClient, page_id: &str, blocks: &str) -> Result<(), Error> {
    let blocks = parse_json_arg("--blocks", blocks)?;
    let Value::Array(blocks) = blocks else {
        return Err(Error::malformed("--blocks must be a JSON array"));
    };
    let count = blocks.len();
    client.add_content_blocks(page_id, blocks).await?;
    println!("Added {count} block(s) to {page_id}.");
    Ok(())
}

async fn database(client: &NotionClient, database_id: &str) -> Result<(), Error> {
    let db = client.get_database(database_id).await?;
    println!("Database: {}", db.title.as_deref().unwrap_or("Untitled"));
    println!("  ID: {}", db.id);
    if let Some(url) = &db.url {
        println!("  URL: {url}");
    }
    println!("  Properties:");
    if let Some(props) = db.properties.as_object() {
        for (name, prop) in props {
            let prop_type = prop.get("type").and_then(Value::as_str).unwrap_or("?");
            println!("    - {name} ({prop_type})");
        }
    }
    Ok(())
}

async fn query(
    client: &NotionClient,
    database_id: &str,
    filter: Option<&str>,
    sorts: Option<&str>,
    page_size: u32,
) -> Result<(), Error> {
    let query = DatabaseQuery {
        filter: filter.map(|raw| parse_json_arg("--filter", raw)).transpose()?,
        sorts: sorts.map(|raw| parse_json_arg("--sorts", raw)).transpose()?,
        page_size,
        start_cursor: None,
    };
    let rows = client.query_database(database_id, &query).await?;
    if rows.is_empty() {
        println!("No rows found.");
        return Ok(());
    }
    println!("Found {} rows:", rows.len());
    for row in rows {
        println!(
            "  - {} ({})",
            row.title().as_deref().unwrap_or("Untitled"),
            row.id
        );
    }
    Ok(())
}

async fn create_row(
    client: &NotionClient,
    database_id: &str,
    properties: &str,
) -> Result<(), Error> {
    let properties = parse_json_arg("--properties", properties)?;
    let row = client.create_database_row(database_id, properties).await?;
    println!("Row created: {}", row.id);
    if let Some(url) = row.url {
        println!("  URL: {url}");
    }
    Ok(())
}

async fn row(client: &NotionClient, row_id: &str) -> Result<(), Error> {
    let row = client.get_database_row(row_id).await?;
    println!("Row: {}", row.title().as_deref().unwrap_or("Untitled"));
    println!("  ID: {}", row.id);
    if let Some(url) = &row.url {
        println!("  URL: {url}");
    }
    println!("  Archived: {}", row.archived);
    Ok(())
}

async fn update_row(
    client: &NotionClient,
    row_id: &str,
    properties: Option<&str>,
    archived: Option<bool>,
) -> Result<(), Error> {
    let properties = properties
        .map(|raw| parse_json_arg("--properties", raw))
        .transpose()?;
    let row = client
        .update_database_row(row_id, properties, archived)
        .await?;
    println!("Row {} updated.", row.id);
    Ok(())
}

fn comment_text(comment: &composio_core::notion::Comment) -> String {
    match &comment.rich_text {
        Some(Value::String(text)) => text.clone(),
        Some(runs) => composio_core::extract::plain_text(runs).unwrap_or_default(),
        None => String::new(),
    }
}

async fn comments(client: &NotionClient, block_id: &str) -> Result<(), Error> {
    let comments = client.get_comments(block_id).await?;
    if comments.is_empty() {
        println!("No comments found.");
        return Ok(());
    }
    for comment in comments {
        println!("  {}", comment_text(&comment));
        println!("    ID: {}", comment.id);
        if let Some(created) = comment.created_time {
            println!("    Created: {created}");
        }
        println!();
    }
    Ok(())
}

async fn comment_create(
    client: &NotionClient,
    parent_id: &str,
    text: &str,
    discussion: Option<&str>,
) -> Result<(), Error> {
    let comment = client.create_comment(parent_id, text, discussion).await?;
    println!("Comment created: {}", comment.id);
    Ok(())
}
