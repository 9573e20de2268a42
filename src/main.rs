use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use notes::config::ensure_database_directory;
use notes::{
    Config, CreateNote, DEFAULT_PAGE_SIZE, Database, NoteError, NoteId, NoteService, PageRequest,
    SortOrder, map_tags,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// notes - tagged short-note store with an HTTP API
#[derive(Parser)]
#[command(name = "notes")]
#[command(about = "Create, tag and browse short text notes")]
#[command(version)]
struct Cli {
    /// Path of the SQLite database file
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Address the HTTP server listens on
    #[arg(long, global = true, value_name = "ADDR")]
    bind: Option<SocketAddr>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve,
    /// Add a new note
    Add(AddCommand),
    /// Show one note with its word statistics
    Show {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// List notes, newest first by default
    List(ListCommand),
    /// List notes carrying any of the given tags
    Filter(FilterCommand),
    /// Delete a note
    Delete {
        #[arg(value_name = "ID")]
        id: String,
    },
}

#[derive(Parser)]
struct AddCommand {
    #[arg(value_name = "TITLE")]
    title: String,

    #[arg(value_name = "TEXT")]
    text: String,

    /// Comma-separated tags (BUSINESS, PERSONAL, IMPORTANT)
    #[arg(short, long, value_name = "TAGS")]
    tags: Option<String>,
}

#[derive(Parser)]
struct ListCommand {
    #[arg(long, default_value_t = 0)]
    page: u32,

    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    size: u32,

    /// createdTime, title or id
    #[arg(long, default_value = "createdTime")]
    sort_by: String,

    /// "desc" for descending, anything else ascending
    #[arg(long, default_value = "desc")]
    sort_dir: String,
}

#[derive(Parser)]
struct FilterCommand {
    /// Comma-separated tags; omit to list every note
    #[arg(short, long, value_name = "TAGS")]
    tags: Option<String>,

    #[arg(long, default_value_t = 0)]
    page: u32,

    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    size: u32,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,notes=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env()?.with_overrides(cli.db, cli.bind);
    let service = open_service(&config)?;

    if let Commands::Serve = cli.command {
        return notes::api::serve(service, config.bind_addr).await;
    }

    let output = execute(&cli.command, &service)?;
    println!("{output}");
    Ok(())
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors are the caller's input: validation failures, unknown tags,
/// unknown ids and bad paging. Everything else is internal.
fn is_user_error(error: &anyhow::Error) -> bool {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<NoteError>())
        .is_some_and(NoteError::is_user_error)
}

fn open_service(config: &Config) -> Result<NoteService> {
    ensure_database_directory(&config.database_path)?;
    let db = Database::open(&config.database_path).with_context(|| {
        format!(
            "Failed to open database at {}",
            config.database_path.display()
        )
    })?;
    Ok(NoteService::new(db))
}

/// Runs a non-serve command and returns its JSON output.
///
/// Separated from `run` to allow testing with in-memory databases.
fn execute(command: &Commands, service: &NoteService) -> Result<String> {
    let json = match command {
        Commands::Serve => anyhow::bail!("serve is not a one-shot command"),
        Commands::Add(cmd) => {
            let tags = cmd.tags.as_deref().map(parse_tags).unwrap_or_default();
            let input = CreateNote::new(&cmd.title, &cmd.text).with_tags(tags);
            serde_json::to_string_pretty(&service.create(input)?)?
        }
        Commands::Show { id } => serde_json::to_string_pretty(&service.get_by_id(&NoteId::new(id))?)?,
        Commands::List(cmd) => {
            let request = PageRequest::new(cmd.page, cmd.size)?
                .sorted_by(cmd.sort_by.parse()?, SortOrder::from_param(&cmd.sort_dir));
            serde_json::to_string_pretty(&service.list(&request)?)?
        }
        Commands::Filter(cmd) => {
            let raw = cmd.tags.as_deref().map(parse_tags).unwrap_or_default();
            let tags = map_tags(&raw)?;
            let request = PageRequest::new(cmd.page, cmd.size)?;
            serde_json::to_string_pretty(&service.list_by_tags(&tags, &request)?)?
        }
        Commands::Delete { id } => {
            let id = NoteId::new(id);
            service.delete(&id)?;
            serde_json::json!({ "deleted": id }).to_string()
        }
    };
    Ok(json)
}

/// Parses a comma-separated tag string into a vector of trimmed tag names.
///
/// Empty elements (from consecutive commas or trailing commas) are filtered out.
fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> NoteService {
        NoteService::new(Database::in_memory().expect("failed to create in-memory database"))
    }

    fn add(service: &NoteService, title: &str, tags: Option<&str>) -> serde_json::Value {
        let command = Commands::Add(AddCommand {
            title: title.to_string(),
            text: "some text".to_string(),
            tags: tags.map(String::from),
        });
        serde_json::from_str(&execute(&command, service).unwrap()).unwrap()
    }

    #[test]
    fn parse_tags_with_normal_input() {
        let result = parse_tags("business,personal");
        assert_eq!(result, vec!["business", "personal"]);
    }

    #[test]
    fn parse_tags_with_whitespace_and_empty_elements() {
        let result = parse_tags(" business ,, important ,");
        assert_eq!(result, vec!["business", "important"]);
    }

    #[test]
    fn parse_tags_only_whitespace() {
        let result = parse_tags("  ,  ,  ");
        assert!(result.is_empty());
    }

    #[test]
    fn add_prints_view_with_normalised_tags() {
        let service = service();
        let view = add(&service, "Groceries", Some("personal, important"));

        assert_eq!(view["title"], "Groceries");
        assert_eq!(view["tags"], serde_json::json!(["PERSONAL", "IMPORTANT"]));
        assert_eq!(view["wordStats"]["some"], 1);
    }

    #[test]
    fn add_with_unknown_tag_is_user_error() {
        let service = service();
        let command = Commands::Add(AddCommand {
            title: "t".to_string(),
            text: "x".to_string(),
            tags: Some("urgent".to_string()),
        });

        let err = execute(&command, &service).unwrap_err();
        assert!(is_user_error(&err));
    }

    #[test]
    fn show_and_delete_round_trip() {
        let service = service();
        let id = add(&service, "Doomed", None)["id"]
            .as_str()
            .unwrap()
            .to_string();

        let shown = execute(&Commands::Show { id: id.clone() }, &service).unwrap();
        assert!(shown.contains("Doomed"));

        let deleted = execute(&Commands::Delete { id: id.clone() }, &service).unwrap();
        assert!(deleted.contains(&id));

        let err = execute(&Commands::Show { id }, &service).unwrap_err();
        assert!(is_user_error(&err));
    }

    #[test]
    fn list_rejects_unknown_sort_field() {
        let service = service();
        let command = Commands::List(ListCommand {
            page: 0,
            size: 10,
            sort_by: "text".to_string(),
            sort_dir: "asc".to_string(),
        });

        let err = execute(&command, &service).unwrap_err();
        assert!(is_user_error(&err));
    }

    #[test]
    fn filter_returns_matching_page() {
        let service = service();
        add(&service, "work", Some("business"));
        add(&service, "home", Some("personal"));

        let command = Commands::Filter(FilterCommand {
            tags: Some("BUSINESS".to_string()),
            page: 0,
            size: 10,
        });
        let page: serde_json::Value =
            serde_json::from_str(&execute(&command, &service).unwrap()).unwrap();

        assert_eq!(page["totalElements"], 1);
        assert_eq!(page["content"][0]["title"], "work");
    }

    #[test]
    fn store_failures_are_internal_errors() {
        let err = anyhow::Error::from(NoteError::Store(anyhow::anyhow!("disk I/O error")))
            .context("Failed to list notes");
        assert!(!is_user_error(&err));

        let plain = anyhow::anyhow!("something else");
        assert!(!is_user_error(&plain));
    }
}
