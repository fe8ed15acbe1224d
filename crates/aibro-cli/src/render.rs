//! Terminal rendering of announcements and sessions.

use aibro_core::catalog::Announcement;
use aibro_core::profile::UserProfile;
use aibro_core::session::{ChatSession, Message, MessageRole};
use colored::Colorize;

pub fn announcement_line(a: &Announcement, saved: bool) -> String {
    let star = if saved { "★" } else { " " };
    format!(
        "{} {:<6} {:<18} {:<12} {}  {}",
        star.yellow(),
        a.policy_id.bold(),
        a.category.label(),
        a.region,
        a.title,
        a.deadline.as_deref().unwrap_or("open-ended").bright_black()
    )
}

pub fn announcement_detail(a: &Announcement, saved: bool) {
    println!("{}", a.title.bold());
    println!(
        "{} · {} · {}",
        a.policy_id,
        a.category.label(),
        a.region
    );
    println!();
    println!("{} {}", "Target:".bright_black(), a.target);
    println!("{} {}", "Deadline:".bright_black(), a.deadline.as_deref().unwrap_or("open-ended"));
    if let Some(link) = &a.apply_link {
        println!("{} {}", "Apply:".bright_black(), link.underline());
    }
    println!();
    println!("{}", a.content);
    if saved {
        println!();
        println!("{}", "★ saved".yellow());
    }
}

pub fn recommendation(rank: usize, a: &Announcement) {
    let score = a.score.unwrap_or(0.0);
    println!(
        "  {}. {} {}",
        rank,
        a.title.bold(),
        format!("[{score:.0}/100 fit]").bright_cyan()
    );
    if let Some(reason) = &a.reason {
        println!("     {}", reason);
    }
    for item in a.checklist.iter().flatten() {
        println!("     {} {}", "☐".bright_black(), item);
    }
    if let Some(risk) = &a.risk_note {
        println!("     {} {}", "⚠".yellow(), risk.yellow());
    }
    if let Some(link) = &a.apply_link {
        println!("     {}", link.underline().bright_black());
    }
}

pub fn message(m: &Message) {
    match m.role {
        MessageRole::User => println!("{}", format!("> {}", m.content).green()),
        MessageRole::Assistant => {
            for line in m.content.lines() {
                println!("{}", line.bright_blue());
            }
            if let Some(recs) = &m.recommendations {
                for (i, a) in recs.iter().enumerate() {
                    recommendation(i + 1, a);
                }
                println!(
                    "{}",
                    "Scores express fit only; they are not loan approval probabilities."
                        .bright_black()
                );
            }
        }
    }
}

pub fn session_line(s: &ChatSession) -> String {
    format!(
        "{}  {}  {}",
        s.session_id.bright_black(),
        s.updated_at.format("%Y-%m-%d %H:%M"),
        s.title.bold()
    )
}

pub fn session(s: &ChatSession) {
    println!("{}", session_line(s));
    println!();
    for m in &s.messages {
        message(m);
        println!();
    }
}

pub fn profile(p: &UserProfile) {
    println!("{} {}", "Region:".bright_black(), p.region);
    println!("{} {}", "Industry:".bright_black(), p.industry);
    println!("{} {}", "Employees:".bright_black(), p.employees);
    println!("{} {}", "Opened:".bright_black(), p.opening_date);
    println!("{} {}", "Revenue:".bright_black(), p.revenue);
}
