//! CLI output formatting

use crate::core::summary::ActivityRow;
use crate::core::ActivityStatus;
use crate::resolve::{ActivityMenu, BreakpointState, Effect};
use chrono::{DateTime, Utc};
use console::Emoji;

// Re-export style
pub use console::style;

pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "!");
pub static LINK: Emoji<'_, '_> = Emoji("🔗 ", "> ");

/// Width of the terminal, 80 columns when unknown
pub fn terminal_width() -> usize {
    term_size::dimensions_stdout().map(|(w, _)| w).unwrap_or(80)
}

/// Format an activity status for display
pub fn format_status(status: Option<ActivityStatus>) -> String {
    let Some(status) = status else {
        return style("-").dim().to_string();
    };
    let text = status.as_str();
    match status {
        ActivityStatus::Succeeded => style(text).green().to_string(),
        ActivityStatus::Failed | ActivityStatus::Error => style(text).red().to_string(),
        ActivityStatus::Running => style(text).yellow().to_string(),
        ActivityStatus::WaitingForApproval => style(text).blue().to_string(),
        ActivityStatus::Pending
        | ActivityStatus::Aborted
        | ActivityStatus::NotExecuted
        | ActivityStatus::Unknown => style(text).dim().to_string(),
    }
}

fn status_icon(status: Option<ActivityStatus>) -> Emoji<'static, 'static> {
    match status {
        Some(ActivityStatus::Succeeded) => CHECK,
        Some(s) if s.is_failure() => CROSS,
        Some(ActivityStatus::Running) | Some(ActivityStatus::Pending) => SPINNER,
        _ => INFO,
    }
}

/// Format the activity table, cutting the message column to the terminal width
pub fn format_activity_table(rows: &[ActivityRow], width: usize, now: DateTime<Utc>) -> String {
    let name_width = column_width(rows.iter().map(|r| r.name.as_str()), "NAME");
    let owner_width = column_width(rows.iter().map(|r| r.owner.as_str()), "OWNER");
    let repository_width = column_width(rows.iter().map(|r| r.repository.as_str()), "REPOSITORY");
    let branch_width = column_width(rows.iter().map(|r| r.branch.as_str()), "BRANCH");
    let build_width = column_width(rows.iter().map(|r| r.build.as_str()), "BUILD");
    let status_width = column_width(
        rows.iter().map(|r| r.status.map(|s| s.as_str()).unwrap_or("-")),
        "STATUS",
    );

    let header = format!(
        "   {:name_width$}  {:owner_width$}  {:repository_width$}  {:branch_width$}  {:>build_width$}  {:status_width$}  {:>5}  MESSAGE",
        "NAME", "OWNER", "REPOSITORY", "BRANCH", "BUILD", "STATUS", "AGE"
    );
    let fixed = header.chars().count() - "MESSAGE".len();
    let message_width = width.saturating_sub(fixed).max(10);

    let mut lines = vec![style(header).bold().to_string()];
    for row in rows {
        let status = row.status.map(|s| s.as_str()).unwrap_or("-");
        let padding = " ".repeat(status_width.saturating_sub(status.len()));
        lines.push(format!(
            "{}{:name_width$}  {:owner_width$}  {:repository_width$}  {:branch_width$}  {:>build_width$}  {}{}  {:>5}  {}",
            status_icon(row.status),
            row.name,
            row.owner,
            row.repository,
            row.branch,
            row.build,
            format_status(row.status),
            padding,
            row.age(now),
            truncate(&row.message, message_width)
        ));
    }
    lines.join("\n")
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>, header: &str) -> usize {
    values
        .map(|v| v.chars().count())
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0)
}

/// Cut text to `max` characters, marking the cut with `...`
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Format the menu of an activity
pub fn format_menu(name: &str, menu: &ActivityMenu) -> String {
    let mut lines = vec![format!("{} {}", INFO, style(name).bold())];

    if menu.shows_logs() {
        lines.push(format!("  {}", style("Logs").bold()));
        for target in menu.log_targets() {
            lines.push(format!("    {} {}", style(&target.label).cyan(), style(&target.container).dim()));
        }
    }

    if menu.shows_shell() {
        lines.push(format!("  {}", style("Shell").bold()));
        for target in menu.shell_targets() {
            lines.push(format!("    {} {}", style(&target.label).cyan(), style(&target.container).dim()));
        }
    }

    match &menu.breakpoint {
        BreakpointState::Hidden => {}
        BreakpointState::Add => {
            lines.push(format!("  {} {}", style("Breakpoint").bold(), style("add").green()));
        }
        BreakpointState::Remove { breakpoint } => lines.push(format!(
            "  {} {} {}",
            style("Breakpoint").bold(),
            style("remove").red(),
            style(breakpoint.name()).dim()
        )),
    }

    if !menu.repository_url.is_empty() {
        lines.push(format!("  {} {}", style("Repository").bold(), menu.repository_url));
    }

    for (index, link) in menu.links.iter().enumerate() {
        let label = link
            .label
            .as_ref()
            .map(|l| format!(" #{}", l))
            .unwrap_or_default();
        lines.push(format!(
            "  {}[{}] {}{} {}",
            LINK,
            index,
            style(&link.title).cyan(),
            style(label).dim(),
            style(&link.url).dim()
        ));
    }

    lines.join("\n")
}

/// Format an effect that was not executed
pub fn format_effect(effect: &Effect) -> String {
    format!("{} {}", WARN, effect)
}
