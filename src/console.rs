//! Line-oriented console for one list view
//!
//! Input is read from stdin one command per line. A render task follows the
//! controller's change feed and reprints the list whenever a fetch settles.

use dashweb_config::PaginationConfig;
use dashweb_core::{
    page_tokens, ListController, ListItem, ListPhase, ListSnapshot, PageToken, Transaction, User,
};
use dashweb_utils::{format_number, initials, pad};
use serde::Serialize;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

/// A record the console knows how to lay out as a table row
pub trait TableRow: ListItem + Serialize {
    /// Plural noun used in summaries, e.g. "users"
    const NOUN: &'static str;
    /// Column titles and widths
    const COLUMNS: &'static [(&'static str, usize)];

    fn cells(&self) -> Vec<String>;
}

impl TableRow for User {
    const NOUN: &'static str = "users";
    const COLUMNS: &'static [(&'static str, usize)] =
        &[("ID", 4), ("User", 20), ("Email", 26), ("Signup Date", 14), ("Status", 8)];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            format!("{} {}", initials(&self.name), self.name),
            self.email.clone(),
            self.signup_display(),
            self.subscription_status.to_string(),
        ]
    }
}

impl TableRow for Transaction {
    const NOUN: &'static str = "transactions";
    const COLUMNS: &'static [(&'static str, usize)] = &[
        ("Transaction", 11),
        ("Date", 14),
        ("User", 16),
        ("Method", 14),
        ("Amount", 14),
        ("Status", 8),
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.date_display(),
            self.user_name.clone(),
            self.payment_method.to_string(),
            self.amount_display(),
            self.status.to_string(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Search(String),
    Page(usize),
    Next,
    Previous,
    Delete(String),
    Show,
    Json,
    Help,
    Quit,
}

const HELP: &str = "commands: /<text> | search <text> | page <n> | next | prev | delete <id> | show | json | quit";

pub fn parse_command(line: &str) -> Result<ConsoleCommand, String> {
    let line = line.trim();
    if let Some(term) = line.strip_prefix('/') {
        return Ok(ConsoleCommand::Search(term.to_string()));
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_lowercase().as_str() {
        "search" | "s" => Ok(ConsoleCommand::Search(rest.to_string())),
        "page" | "p" => rest
            .parse()
            .map(ConsoleCommand::Page)
            .map_err(|_| format!("not a page number: '{}'", rest)),
        "next" | "n" => Ok(ConsoleCommand::Next),
        "prev" | "previous" => Ok(ConsoleCommand::Previous),
        "delete" | "d" if !rest.is_empty() => Ok(ConsoleCommand::Delete(rest.to_string())),
        "delete" | "d" => Err("delete needs an id".to_string()),
        "show" | "" => Ok(ConsoleCommand::Show),
        "json" => Ok(ConsoleCommand::Json),
        "help" | "?" => Ok(ConsoleCommand::Help),
        "quit" | "q" | "exit" => Ok(ConsoleCommand::Quit),
        other => Err(format!("unknown command '{}'", other)),
    }
}

fn pager_line(snapshot: &ListSnapshot<impl TableRow>, pagination: &PaginationConfig) -> Option<String> {
    let tokens = page_tokens(
        snapshot.list.current_page,
        snapshot.list.total_pages,
        pagination.max_visible_pages,
        pagination.show_previous_next,
    );
    if tokens.is_empty() {
        return None;
    }

    let parts: Vec<String> = tokens
        .iter()
        .filter_map(|token| match *token {
            PageToken::Previous { enabled } => enabled.then(|| "‹ Prev".to_string()),
            PageToken::Next { enabled } => enabled.then(|| "Next ›".to_string()),
            PageToken::First => Some("1".to_string()),
            PageToken::Ellipsis => Some("…".to_string()),
            PageToken::Page { number, current: true } => Some(format!("[{}]", number)),
            PageToken::Page { number, .. } => Some(number.to_string()),
            PageToken::Last { number } => Some(number.to_string()),
        })
        .collect();
    Some(parts.join("  "))
}

/// Full text rendering of one snapshot
pub fn render<T: TableRow>(snapshot: &ListSnapshot<T>, pagination: &PaginationConfig) -> String {
    let mut out = String::new();

    if !snapshot.query.raw_term.is_empty() {
        out.push_str(&format!("search: {}\n", snapshot.query.raw_term));
    }

    let header: Vec<String> = T::COLUMNS.iter().map(|(title, width)| pad(title, *width)).collect();
    out.push_str(header.join(" ").trim_end());
    out.push('\n');

    if snapshot.list.items.is_empty() {
        match snapshot.phase {
            ListPhase::Settled => out.push_str(&format!("No {} found\n", T::NOUN)),
            _ => out.push_str("Loading…\n"),
        }
    }
    for item in &snapshot.list.items {
        let row: Vec<String> = item
            .cells()
            .iter()
            .zip(T::COLUMNS)
            .map(|(cell, (_, width))| pad(cell, *width))
            .collect();
        out.push_str(row.join(" ").trim_end());
        if snapshot.pending_deletes.iter().any(|id| id == item.id()) {
            out.push_str("  (deleting…)");
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "Showing {} of {} {}\n",
        format_number(snapshot.list.items.len()),
        format_number(snapshot.list.total_count),
        T::NOUN
    ));
    if let Some(pager) = pager_line(snapshot, pagination) {
        out.push_str(&pager);
        out.push('\n');
    }
    if let Some(error) = &snapshot.last_error {
        out.push_str(&format!("! {}\n", error));
    }

    out
}

/// What the render task last printed
#[derive(Debug, Default, PartialEq)]
struct Printed {
    sequence: u64,
    loading: bool,
    pending: usize,
    errors: u64,
}

impl Printed {
    fn of<T>(snapshot: &ListSnapshot<T>) -> Self {
        Self {
            sequence: snapshot.list.last_applied_sequence,
            loading: snapshot.list.loading,
            pending: snapshot.pending_deletes.len(),
            errors: snapshot.errors_recorded,
        }
    }
}

/// Output owed for `snapshot` given what was printed before it
fn render_update<T: TableRow>(
    printed: &Printed,
    snapshot: &ListSnapshot<T>,
    pagination: &PaginationConfig,
) -> (Printed, String) {
    let next = Printed::of(snapshot);
    let mut out = String::new();

    if next.errors != printed.errors {
        if let Some(error) = &snapshot.last_error {
            out.push_str(&format!("! {}\n", error));
        }
    }
    if next.sequence != printed.sequence || next.pending != printed.pending {
        out.push_str(&render(snapshot, pagination));
    } else if next.loading && !printed.loading {
        out.push_str("loading…\n");
    }

    (next, out)
}

fn spawn_renderer<T: TableRow>(
    controller: Arc<ListController<T>>,
    pagination: PaginationConfig,
) -> tokio::task::JoinHandle<()> {
    let mut changes = controller.subscribe();

    tokio::spawn(async move {
        let mut printed = Printed::default();
        while changes.changed().await.is_ok() {
            let (next, out) = render_update(&printed, &controller.snapshot(), &pagination);
            print!("{}", out);
            printed = next;
        }
    })
}

/// Run the interactive session until `quit` or end of input
pub async fn run<T: TableRow>(
    controller: Arc<ListController<T>>,
    pagination: &PaginationConfig,
) -> anyhow::Result<()> {
    let renderer = spawn_renderer(controller.clone(), pagination.clone());
    println!("{}", HELP);

    if let Err(error) = controller.mount().await {
        log::debug!("initial load failed: {}", error);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{}", message);
                continue;
            }
        };

        // Fetches run in the background so typing never blocks on them
        let task = controller.clone();
        match command {
            ConsoleCommand::Search(term) => controller.set_search_term(term),
            ConsoleCommand::Page(page) => {
                tokio::spawn(async move { task.set_page(page).await.ok() });
            }
            ConsoleCommand::Next => {
                tokio::spawn(async move { task.next_page().await.ok() });
            }
            ConsoleCommand::Previous => {
                tokio::spawn(async move { task.previous_page().await.ok() });
            }
            ConsoleCommand::Delete(id) => {
                controller.dismiss_error();
                tokio::spawn(async move { task.delete_item(&id).await.ok() });
            }
            ConsoleCommand::Show => print!("{}", render(&controller.snapshot(), pagination)),
            ConsoleCommand::Json => println!("{}", serde_json::to_string_pretty(&controller.snapshot())?),
            ConsoleCommand::Help => println!("{}", HELP),
            ConsoleCommand::Quit => break,
        }
    }

    controller.shutdown();
    renderer.abort();
    log::debug!("console closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashweb_core::ControllerOptions;
    use dashweb_store::{seed, MemoryCollection};
    use std::time::Duration;

    fn controller<T: TableRow>(items: Vec<T>) -> Arc<ListController<T>> {
        ListController::new(
            Arc::new(MemoryCollection::new(items, 7)),
            ControllerOptions::new(Duration::from_millis(300)),
        )
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("/smith"), Ok(ConsoleCommand::Search("smith".to_string())));
        assert_eq!(
            parse_command("search bank transfer"),
            Ok(ConsoleCommand::Search("bank transfer".to_string()))
        );
        assert_eq!(parse_command("/"), Ok(ConsoleCommand::Search(String::new())));
        assert_eq!(parse_command("page 3"), Ok(ConsoleCommand::Page(3)));
        assert_eq!(parse_command("  next "), Ok(ConsoleCommand::Next));
        assert_eq!(parse_command("prev"), Ok(ConsoleCommand::Previous));
        assert_eq!(parse_command("delete TXN-1004"), Ok(ConsoleCommand::Delete("TXN-1004".to_string())));
        assert_eq!(parse_command(""), Ok(ConsoleCommand::Show));
        assert_eq!(parse_command("QUIT"), Ok(ConsoleCommand::Quit));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse_command("page two").is_err());
        assert!(parse_command("delete").is_err());
        assert!(parse_command("frobnicate").is_err());
    }

    #[tokio::test]
    async fn test_render_first_page_of_users() {
        let controller = controller(seed::users());
        controller.mount().await.unwrap();

        let text = render(&controller.snapshot(), &PaginationConfig::default());

        assert!(text.starts_with("ID"));
        assert!(text.contains("RM Ricardo Mathew"));
        assert!(text.contains("08 Aug, 10:30"));
        assert!(text.contains("Showing 7 of 10 users"));
        assert!(text.contains("[1]  2  Next ›"));
        assert!(!text.contains("‹ Prev"));
    }

    #[tokio::test]
    async fn test_render_transactions_and_empty_search() {
        let controller = controller(seed::transactions());
        controller.mount().await.unwrap();

        let text = render(&controller.snapshot(), &PaginationConfig::default());
        assert!(text.contains("1200.00 USD"));
        assert!(text.contains("Bank Transfer"));

        controller.on_debounced_term_change("nobody".to_string()).await.unwrap();
        let text = render(&controller.snapshot(), &PaginationConfig::default());
        assert!(text.contains("No transactions found"));
        assert!(text.contains("Showing 0 of 0 transactions"));
    }

    #[test]
    fn test_render_before_first_load() {
        let snapshot: ListSnapshot<User> = ListSnapshot {
            phase: ListPhase::Idle,
            list: Default::default(),
            query: Default::default(),
            pending_deletes: Vec::new(),
            last_error: None,
            errors_recorded: 0,
        };

        let text = render(&snapshot, &PaginationConfig::default());
        assert!(text.contains("Loading…"));
    }

    #[tokio::test]
    async fn test_repeated_failure_prints_a_toast_each_time() {
        let controller = controller(seed::users());
        controller.mount().await.unwrap();
        let pagination = PaginationConfig::default();

        let (printed, _) = render_update(&Printed::default(), &controller.snapshot(), &pagination);

        controller.delete_item("404").await.unwrap_err();
        let (printed, out) = render_update(&printed, &controller.snapshot(), &pagination);
        assert!(out.starts_with("! [DELETE_FAILURE]"), "{out}");

        controller.delete_item("404").await.unwrap_err();
        let (printed, out) = render_update(&printed, &controller.snapshot(), &pagination);
        assert!(out.starts_with("! [DELETE_FAILURE]"), "{out}");

        // Nothing new happened
        let (_, out) = render_update(&printed, &controller.snapshot(), &pagination);
        assert!(out.is_empty());
    }
}
