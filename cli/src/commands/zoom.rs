use clap::Subcommand;
use composio_core::Error;
use composio_core::zoom::{Meeting, MeetingCreate, MeetingUpdate};
use composio_client::ZoomClient;

use crate::util::{format_meeting_date, format_meeting_time, report_error, zoom_client};

#[derive(Subcommand)]
pub enum ZoomCommands {
    /// List meetings
    List {
        /// "upcoming", "scheduled", "live", or "pending"
        #[arg(long = "type", short = 't', default_value = "upcoming")]
        meeting_type: String,
    },
    /// Create a scheduled meeting
    Create {
        #[arg(long, short = 't')]
        topic: String,
        /// ISO-8601 local start time, e.g. 2026-02-15T10:00:00
        #[arg(long, short = 'd')]
        datetime: String,
        /// Duration in minutes
        #[arg(long, short = 'l', default_value_t = 45)]
        duration: i64,
        #[arg(long, short = 'z', default_value = "America/New_York")]
        timezone: String,
        #[arg(long, short = 'a')]
        agenda: Option<String>,
    },
    /// Get meeting details
    Get {
        meeting_id: i64,
    },
    /// Update a meeting
    Update {
        meeting_id: i64,
        #[arg(long, short = 't')]
        topic: Option<String>,
        #[arg(long, short = 'd')]
        datetime: Option<String>,
        #[arg(long, short = 'l')]
        duration: Option<i64>,
        #[arg(long, short = 'a')]
        agenda: Option<String>,
    },
    /// Delete a meeting
    Delete {
        meeting_id: i64,
    },
    /// List cloud recordings in a date range
    Recordings {
        /// Start date (YYYY-MM-DD)
        #[arg(long = "from")]
        from_date: String,
        /// End date (YYYY-MM-DD)
        #[arg(long = "to")]
        to_date: Option<String>,
    },
    /// Get recording files for a meeting
    Recording {
        meeting_id: i64,
    },
    /// List participants of a past meeting
    Participants {
        meeting_id: i64,
    },
    /// Get the AI-generated meeting summary
    Summary {
        meeting_id: i64,
    },
    /// Register someone for a meeting
    Register {
        meeting_id: i64,
        email: String,
        first_name: String,
        #[arg(default_value = "")]
        last_name: String,
    },
}

pub async fn run(api_key: Option<&str>, command: ZoomCommands) -> i32 {
    let client = match zoom_client(api_key) {
        Ok(client) => client,
        Err(e) => return report_error(&e),
    };
    let result = match command {
        ZoomCommands::List { meeting_type } => list(&client, &meeting_type).await,
        ZoomCommands::Create {
            topic,
            datetime,
            duration,
            timezone,
            agenda,
        } => create(&client, topic, datetime, duration, timezone, agenda).await,
        ZoomCommands::Get { meeting_id } => get(&client, meeting_id).await,
        ZoomCommands::Update {
            meeting_id,
            topic,
            datetime,
            duration,
            agenda,
        } => update(&client, meeting_id, topic, datetime, duration, agenda).await,
        ZoomCommands::Delete { meeting_id } => delete(&client, meeting_id).await,
        ZoomCommands::Recordings { from_date, to_date } => {
            recordings(&client, &from_date, to_date.as_deref()).await
        }
        ZoomCommands::Recording { meeting_id } => recording(&client, meeting_id).await,
        ZoomCommands::Participants { meeting_id } => participants(&client, meeting_id).await,
        ZoomCommands::Summary { meeting_id } => summary(&client, meeting_id).await,
        ZoomCommands::Register {
            meeting_id,
            email,
            first_name,
            last_name,
        } => register(&client, meeting_id, &email, &first_name, &last_name).await,
    };
    match result {
        Ok(()) => 0,
        Err(e) => report_error(&e),
    }
}

fn print_meeting(meeting: &Meeting) {
    println!("  Topic:      {}", meeting.topic);
    println!(
        "  Date/Time:  {} {}",
        format_meeting_time(&meeting.start_time),
        meeting.timezone
    );
    println!("  Duration:   {} min", meeting.duration);
    println!("  Meeting ID: {}", meeting.id);
    if let Some(password) = &meeting.password {
        println!("  Password:   {password}");
    }
    if let Some(join_url) = &meeting.join_url {
        println!("  Join URL:   {join_url}");
    }
}

async fn list(client: &ZoomClient, meeting_type: &str) -> Result<(), Error> {
    let meetings = client.list_meetings(meeting_type).await?;
    if meetings.is_empty() {
        println!("No meetings found.");
        return Ok(());
    }
    for meeting in meetings {
        print_meeting(&meeting);
        println!();
    }
    Ok(())
}

async fn create(
    client: &ZoomClient,
    topic: String,
    datetime: String,
    duration: i64,
    timezone: String,
    agenda: Option<String>,
) -> Result<(), Error> {
    let mut input = MeetingCreate::new(topic, datetime);
    input.duration = duration;
    input.timezone = timezone;
    input.agenda = agenda;
    let meeting = client.create_meeting(&input).await?;
    println!("Meeting created:\n");
    print_meeting(&meeting);
    Ok(())
}

async fn get(client: &ZoomClient, meeting_id: i64) -> Result<(), Error> {
    let meeting = client.get_meeting(meeting_id).await?;
    print_meeting(&meeting);
    if let Some(agenda) = &meeting.agenda {
        println!("  Agenda:     {agenda}");
    }
    if let Some(status) = &meeting.status {
        println!("  Status:     {status}");
    }
    Ok(())
}

async fn update(
    client: &ZoomClient,
    meeting_id: i64,
    topic: Option<String>,
    datetime: Option<String>,
    duration: Option<i64>,
    agenda: Option<String>,
) -> Result<(), Error> {
    let update = MeetingUpdate {
        topic,
        start_time: datetime,
        duration,
        agenda,
    };
    client.update_meeting(meeting_id, &update).await?;
    println!("Meeting {meeting_id} updated.");
    Ok(())
}

async fn delete(client: &ZoomClient, meeting_id: i64) -> Result<(), Error> {
    client.delete_meeting(meeting_id).await?;
    println!("Meeting {meeting_id} deleted.");
    Ok(())
}

async fn recordings(
    client: &ZoomClient,
    from_date: &str,
    to_date: Option<&str>,
) -> Result<(), Error> {
    let recordings = client.list_recordings(from_date, to_date).await?;
    if recordings.is_empty() {
        println!("No recordings found.");
        return Ok(());
    }
    for recording in recordings {
        println!("  {}", recording.topic);
        println!(
            "    Date: {}, Duration: {} min",
            format_meeting_date(&recording.start_time),
            recording.duration
        );
        println!("    Meeting ID: {}", recording.meeting_id);
        println!();
    }
    Ok(())
}

async fn recording(client: &ZoomClient, meeting_id: i64) -> Result<(), Error> {
    let recording = client.get_recording(meeting_id).await?;
    println!("Recording: {}", recording.topic);
    if let Some(share_url) = &recording.share_url {
        println!("  Share URL: {share_url}");
    }
    if let Some(password) = &recording.password {
        println!("  Password:  {password}");
    }
    println!("  Files:");
    for file in recording.files {
        println!(
            "    - {}: {}MB",
            file.file_type,
            file.file_size / 1024 / 1024
        );
        if let Some(download_url) = file.download_url {
            println!("      Download: {download_url}");
        }
    }
    Ok(())
}

async fn participants(client: &ZoomClient, meeting_id: i64) -> Result<(), Error> {
    let participants = client.get_participants(meeting_id).await?;
    if participants.is_empty() {
        println!("No participants found.");
        return Ok(());
    }
    println!("Participants:");
    for participant in participants {
        let duration = participant
            .duration
            .map(|seconds| format!("{}m", seconds / 60))
            .unwrap_or_else(|| "?".to_string());
        println!(
            "  - {} ({}) - {}",
            participant.name.as_deref().unwrap_or("Unknown"),
            participant.email.as_deref().unwrap_or("no email"),
            duration
        );
    }
    Ok(())
}

async fn summary(client: &ZoomClient, meeting_id: i64) -> Result<(), Error> {
    let summary = client.get_meeting_summary(meeting_id).await?;
    if let Some(text) = &summary.summary {
        println!("Summary:");
        println!("  {text}");
    }
    if let Some(next_steps) = &summary.next_steps {
        println!("\nNext Steps:");
        for step in next_steps {
            println!("  - {step}");
        }
    }
    if let Some(topics) = &summary.topics {
        println!("\nTopics:");
        for topic in topics {
            println!("  - {topic}");
        }
    }
    Ok(())
}

async fn register(
    client: &ZoomClient,
    meeting_id: i64,
    email: &str,
    first_name: &str,
    last_name: &str,
) -> Result<(), Error> {
    let registrant = client
        .add_registrant(meeting_id, email, first_name, last_name)
        .await?;
    println!("Registrant added: {email}");
    if let Some(join_url) = registrant.join_url {
        println!("  Join URL: {join_url}");
    }
    Ok(())
}
