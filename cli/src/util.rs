use chrono::DateTime;
use composio_core::Error;
use composio_client::{ComposioClient, NotionClient, ZoomClient, credentials};
use serde_json::{Value, json};

/// Print a structured error to stderr and return the process exit code.
pub fn report_error(err: &Error) -> i32 {
    let msg = json!({
        "error": "cli_error",
        "message": err.to_string(),
    });
    match serde_json::to_string_pretty(&msg) {
        Ok(text) => eprintln!("{text}"),
        Err(_) => eprintln!("{err}"),
    }
    1
}

/// Parse a JSON string passed on the command line, before any remote call.
pub fn parse_json_arg(flag: &str, raw: &str) -> Result<Value, Error> {
    serde_json::from_str(raw).map_err(|e| Error::malformed(format!("invalid JSON in {flag}: {e}")))
}

pub fn manage_client(api_key: Option<&str>) -> Result<ComposioClient, Error> {
    match api_key {
        Some(key) => ComposioClient::new(key),
        None => ComposioClient::from_env(),
    }
}

pub fn notion_client(api_key: Option<&str>) -> Result<NotionClient, Error> {
    match api_key {
        Some(key) => Ok(NotionClient::new(
            ComposioClient::new(key)?,
            credentials::resolve_notion_account()?,
        )),
        None => NotionClient::from_env(),
    }
}

pub fn zoom_client(api_key: Option<&str>) -> Result<ZoomClient, Error> {
    match api_key {
        Some(key) => Ok(ZoomClient::new(
            ComposioClient::new(key)?,
            credentials::resolve_zoom_account()?,
        )),
        None => ZoomClient::from_env(),
    }
}

/// "Sun, Feb 15 2026 at 10:00 AM" when the timestamp parses; the raw string
/// otherwise.
pub fn format_meeting_time(start_time: &str) -> String {
    DateTime::parse_from_rfc3339(start_time)
        .map(|dt| dt.format("%a, %b %d %Y at %I:%M %p").to_string())
        .unwrap_or_else(|_| start_time.to_string())
}

/// "Feb 15, 2026" short form for listings.
pub fn format_meeting_date(start_time: &str) -> String {
    DateTime::parse_from_rfc3339(start_time)
        .map(|dt| dt.format("%b %d, %Y").to_string())
        .unwrap_or_else(|_| start_time.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meeting_time_formats_rfc3339_and_passes_through_junk() {
        assert_eq!(
            format_meeting_time("2026-02-15T10:00:00Z"),
            "Sun, Feb 15 2026 at 10:00 AM"
        );
        assert_eq!(format_meeting_time("soon"), "soon");
    }

    #[test]
    fn json_arg_errors_name_the_flag() {
        let err = parse_json_arg("--filter", "{nope").unwrap_err();
        assert!(err.to_string().contains("--filter"));
    }
}
