//! Interactive recommendation chat.

use std::borrow::Cow::{self, Borrowed, Owned};

use aibro_application::RecommendationUseCase;
use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use super::chat;
use crate::context::AppContext;
use crate::render;

const COMMANDS: &[&str] = &[
    "/new", "/sessions", "/open", "/delete", "/saved", "/save", "/show", "/help",
];

/// Rustyline helper completing and highlighting slash commands.
#[derive(Clone)]
struct ReplHelper {
    commands: Vec<String>,
}

impl ReplHelper {
    fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Helper for ReplHelper {}

impl Completer for ReplHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for ReplHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ReplHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for ReplHelper {}

fn print_help() {
    println!("{}", "Type a message to get recommendations, or:".bright_black());
    println!("{}", "  /new             start a new chat".bright_black());
    println!("{}", "  /sessions        list chats".bright_black());
    println!("{}", "  /open <id>       continue a chat".bright_black());
    println!("{}", "  /delete <id>     delete a chat".bright_black());
    println!("{}", "  /show <policy>   announcement details".bright_black());
    println!("{}", "  /save <policy>   save or unsave an announcement".bright_black());
    println!("{}", "  /saved           list saved announcements".bright_black());
    println!("{}", "  quit             exit".bright_black());
}

pub async fn run(ctx: &AppContext) -> Result<()> {
    let usecase = ctx.recommendations()?;

    let mut rl: Editor<ReplHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(ReplHelper::new()));

    println!("{}", "=== AI Bro ===".bright_magenta().bold());
    print_help();
    println!();

    if let Some(session) = chat::new_session(ctx, &usecase).await? {
        render::session(&session);
    }

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }

                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(trimmed);

                if let Err(e) = handle_line(ctx, &usecase, trimmed).await {
                    tracing::error!("REPL command failed: {:#}", e);
                    eprintln!("{}", format!("Error: {:#}", e).red());
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}

async fn handle_line(ctx: &AppContext, usecase: &RecommendationUseCase, line: &str) -> Result<()> {
    if !line.starts_with('/') {
        return chat::send(usecase, line).await;
    }

    let (command, arg) = match line.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, arg.trim()),
        None => (line, ""),
    };
    let browse = ctx.browse();

    match (command, arg) {
        ("/new", _) => {
            if let Some(session) = chat::new_session(ctx, usecase).await? {
                render::session(&session);
            }
        }
        ("/sessions", _) => {
            let active = usecase.active_session_id().await;
            for s in usecase.list_sessions().await? {
                let marker = if active.as_deref() == Some(s.session_id.as_str()) {
                    "*"
                } else {
                    " "
                };
                println!("{} {}", marker.bright_green(), render::session_line(&s));
            }
        }
        ("/open", id) if !id.is_empty() => {
            let session = usecase.open_session(id).await?;
            render::session(&session);
        }
        ("/delete", id) if !id.is_empty() => {
            usecase.delete_session(id).await?;
            println!("{}", format!("Session {} deleted.", id).bright_black());
        }
        ("/show", id) if !id.is_empty() => {
            let saved = browse.is_saved(id).await?;
            render::announcement_detail(browse.detail(id)?, saved);
        }
        ("/save", id) if !id.is_empty() => {
            browse.detail(id)?;
            let state = if browse.toggle_saved(id).await? {
                "saved"
            } else {
                "unsaved"
            };
            println!("{}", format!("{} {}", id, state).yellow());
        }
        ("/saved", _) => {
            for a in browse.saved_items().await? {
                println!("{}", render::announcement_line(a, true));
            }
        }
        ("/help", _) => print_help(),
        _ => println!("{}", "Unknown command. Type /help.".bright_black()),
    }
    Ok(())
}
