use std::io::{self, BufRead, Write};

use aibro_application::{RecommendationUseCase, TurnOutcome, TurnRejected};
use aibro_core::profile::{ProfileRepository, UserProfile};
use aibro_core::session::ChatSession;
use aibro_core::settings::SettingsRepository;
use anyhow::Result;
use colored::Colorize;

use crate::ChatAction;
use crate::context::AppContext;
use crate::render;

pub async fn run(ctx: &AppContext, action: ChatAction) -> Result<()> {
    let usecase = ctx.recommendations()?;
    match action {
        ChatAction::New => {
            if let Some(session) = new_session(ctx, &usecase).await? {
                render::session(&session);
            }
        }
        ChatAction::List => {
            let sessions = usecase.list_sessions().await?;
            if sessions.is_empty() {
                println!("{}", "No chat sessions yet.".bright_black());
            }
            for s in &sessions {
                println!("{}", render::session_line(s));
            }
        }
        ChatAction::Show { session_id } => {
            let session = usecase.open_session(&session_id).await?;
            render::session(&session);
        }
        ChatAction::Send { session, text } => {
            usecase.open_session(&session).await?;
            send(&usecase, &text).await?;
        }
        ChatAction::Delete { session_id } => {
            usecase.delete_session(&session_id).await?;
            println!("{}", format!("Session {} deleted.", session_id).bright_black());
        }
    }
    Ok(())
}

/// Starts a session for the stored profile.
///
/// When profile reuse is turned off, the profile is shown and confirmed
/// first. Returns `None` if the user declines.
pub async fn new_session(
    ctx: &AppContext,
    usecase: &RecommendationUseCase,
) -> Result<Option<ChatSession>> {
    let profile = ctx.store.get_profile().await?;
    let settings = ctx.store.get_settings().await?;

    if let Some(p) = &profile {
        if !settings.reuse_profile && !confirm_profile(p)? {
            println!(
                "{}",
                "Update your profile with `aibro profile set`, then start a new chat.".yellow()
            );
            return Ok(None);
        }
    }
    let session = usecase.create_session(profile.as_ref()).await?;
    if profile.is_none() {
        println!("{}", "Set up your profile with `aibro profile set`.".yellow());
    }
    Ok(Some(session))
}

fn confirm_profile(profile: &UserProfile) -> Result<bool> {
    render::profile(profile);
    print!("Use this profile for the new chat? [Y/n] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer.is_empty() || answer == "y" || answer == "yes")
}

/// Sends one message to the active session and prints the outcome.
///
/// Rejected turns are explained rather than treated as errors.
pub async fn send(usecase: &RecommendationUseCase, text: &str) -> Result<()> {
    let pending = match usecase.append_user_turn(text).await {
        Ok(pending) => pending,
        Err(TurnRejected::Store(e)) => return Err(e.into()),
        Err(rejected) => {
            explain_rejection(&rejected);
            return Ok(());
        }
    };

    println!("{}", "Looking for matching policy funds...".bright_black());
    let outcome = usecase.produce_recommendation(pending).await?;
    print_outcome(&outcome);
    Ok(())
}

fn explain_rejection(rejected: &TurnRejected) {
    let text = match rejected {
        TurnRejected::EmptyText => "Type a message first.".to_string(),
        TurnRejected::NoActiveSession => {
            "No active chat. Start one with `aibro chat new` or /new.".to_string()
        }
        TurnRejected::ProfileMissing => {
            "Recommendations need a business profile. Set it with `aibro profile set`.".to_string()
        }
        TurnRejected::InFlight(_) => "Still waiting for the previous reply.".to_string(),
        TurnRejected::Store(e) => e.to_string(),
    };
    println!("{}", text.yellow());
}

fn print_outcome(outcome: &TurnOutcome) {
    match outcome {
        TurnOutcome::Delivered {
            session,
            unresolved,
        } => {
            if let Some(reply) = session.last_message() {
                render::message(reply);
            }
            if !unresolved.is_empty() {
                tracing::debug!(?unresolved, "Unresolved recommendations not shown");
            }
        }
        TurnOutcome::Apologized { session, error } => {
            if let Some(reply) = session.last_message() {
                render::message(reply);
            }
            println!("{}", format!("({})", error).bright_black());
        }
        TurnOutcome::Discarded { .. } => {
            println!("{}", "The reply arrived after you left the chat and was dropped.".bright_black());
        }
    }
}
