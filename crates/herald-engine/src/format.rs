//! Pure string and value formatters used to build notification text.
//!
//! Every function here is total: unknown enum values map to a neutral glyph,
//! unparseable dates are echoed verbatim, and absent text is the caller's
//! empty string.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use herald_core::Priority;
use herald_core::entities::{Issue, IssueState, User};
use herald_core::enums::{IssueStateType, ProjectHealth};

/// Shown for an absent user.
pub const UNASSIGNED: &str = "Unassigned";

/// Shown for an absent author or creator.
pub const UNKNOWN_USER: &str = "Unknown";

/// Stands in for a previous assignee, whose record the payload never carries.
pub const PREVIOUS_ASSIGNEE: &str = "Someone";

/// Appended by [`truncate`] when text is cut.
pub const ELLIPSIS: &str = "...";

// ---------------------------------------------------------------------------
// Names and identifiers
// ---------------------------------------------------------------------------

/// Short issue reference such as `ENG-123`.
#[must_use]
pub fn identifier(team_key: &str, number: u32) -> String {
    format!("{team_key}-{number}")
}

/// Preferred display name: a non-empty `displayName`, else `name`, else
/// [`UNASSIGNED`] when there is no user at all.
#[must_use]
pub fn display_name(user: Option<&User>) -> &str {
    let Some(user) = user else {
        return UNASSIGNED;
    };
    match user.display_name.as_deref() {
        Some(display) if !display.trim().is_empty() => display,
        _ => &user.name,
    }
}

/// Like [`display_name`], but an absent user renders as [`UNKNOWN_USER`].
#[must_use]
pub fn author(user: Option<&User>) -> &str {
    user.map_or(UNKNOWN_USER, |user| display_name(Some(user)))
}

// ---------------------------------------------------------------------------
// Glyphs and labels
// ---------------------------------------------------------------------------

/// Glyph for an issue priority number (1 = urgent … 4 = low).
#[must_use]
pub const fn priority_glyph(priority: u8) -> &'static str {
    match priority {
        1 => "🔴",
        2 => "🟠",
        3 => "🟡",
        4 => "🔽",
        _ => "",
    }
}

#[must_use]
pub const fn priority_label(priority: u8) -> &'static str {
    match priority {
        0 => "No priority",
        1 => "Urgent",
        2 => "High",
        3 => "Medium",
        4 => "Low",
        _ => "Unknown",
    }
}

#[must_use]
pub const fn state_glyph(state: IssueStateType) -> &'static str {
    match state {
        IssueStateType::Backlog => "📋",
        IssueStateType::Unstarted => "⏸️",
        IssueStateType::Started => "🟡",
        IssueStateType::Completed => "✅",
        IssueStateType::Canceled => "❌",
        IssueStateType::Unknown => "",
    }
}

#[must_use]
pub const fn health_glyph(health: ProjectHealth) -> &'static str {
    match health {
        ProjectHealth::OnTrack => "🟢",
        ProjectHealth::AtRisk => "🟡",
        ProjectHealth::OffTrack => "🔴",
        ProjectHealth::Unknown => "",
    }
}

#[must_use]
pub const fn health_label(health: ProjectHealth) -> &'static str {
    match health {
        ProjectHealth::OnTrack => "On Track",
        ProjectHealth::AtRisk => "At Risk",
        ProjectHealth::OffTrack => "Off Track",
        ProjectHealth::Unknown => "Unknown",
    }
}

/// Leading icon that signals notification urgency.
#[must_use]
pub const fn urgency_icon(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "🚨",
        Priority::Medium => "📢",
        Priority::Low => "💬",
        Priority::Ignore => "",
    }
}

// ---------------------------------------------------------------------------
// Text shaping
// ---------------------------------------------------------------------------

/// Cut `text` to at most `max_chars` characters, appending [`ELLIPSIS`] when
/// anything was removed. Counts characters, never splits one.
#[must_use]
pub fn truncate(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => Cow::Owned(format!("{}{ELLIPSIS}", &text[..cut])),
        None => Cow::Borrowed(text),
    }
}

/// Prefix every line with `> `, keeping empty lines.
#[must_use]
pub fn blockquote(text: &str) -> String {
    text.split('\n')
        .map(|line| format!("> {}", line.strip_suffix('\r').unwrap_or(line)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `fraction * 100`, rounded to the nearest integer.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn percentage(fraction: f64) -> i64 {
    (fraction * 100.0).round() as i64
}

/// `true` when two progress fractions differ by strictly more than
/// `threshold`. Compared in millionths so that float noise on an exact
/// threshold step (0.30 to 0.40) does not count as exceeding it.
#[must_use]
pub fn progress_moved(previous: f64, current: f64, threshold: f64) -> bool {
    const SCALE: f64 = 1_000_000.0;
    ((current - previous).abs() * SCALE).round() > (threshold * SCALE).round()
}

/// Progress fraction rendered as `NN%`.
#[must_use]
pub fn progress(fraction: f64) -> String {
    format!("{}%", percentage(fraction))
}

// ---------------------------------------------------------------------------
// Label and assignee diffs
// ---------------------------------------------------------------------------

/// Labels added and removed between two label lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl LabelDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

impl fmt::Display for LabelDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(2);
        if !self.added.is_empty() {
            parts.push(format!("+{}", self.added.join(", ")));
        }
        if !self.removed.is_empty() {
            parts.push(format!("-{}", self.removed.join(", ")));
        }
        f.write_str(&parts.join(" "))
    }
}

/// Added labels keep `new`'s order, removed labels keep `old`'s order.
#[must_use]
pub fn diff_labels(old: &[String], new: &[String]) -> LabelDiff {
    let old_set: HashSet<&str> = old.iter().map(String::as_str).collect();
    let new_set: HashSet<&str> = new.iter().map(String::as_str).collect();

    LabelDiff {
        added: new
            .iter()
            .filter(|label| !old_set.contains(label.as_str()))
            .cloned()
            .collect(),
        removed: old
            .iter()
            .filter(|label| !new_set.contains(label.as_str()))
            .cloned()
            .collect(),
    }
}

/// Order-insensitive equality of two label lists.
#[must_use]
pub fn same_set(a: &[String], b: &[String]) -> bool {
    let a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let b: HashSet<&str> = b.iter().map(String::as_str).collect();
    a == b
}

#[must_use]
pub fn assignee_change(old: Option<&str>, new: Option<&str>) -> String {
    match (old, new) {
        (None, Some(new)) => format!("→ {new}"),
        (Some(old), None) => format!("← {old}"),
        (Some(old), Some(new)) => format!("{old} → {new}"),
        (None, None) => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

fn parse_date(raw: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(raw)
        .map(|timestamp| timestamp.with_timezone(&Utc).date_naive())
        .ok()
        .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
}

/// `Jan 5` when the date falls in the reference year, `Jan 5, 2025`
/// otherwise. Unparseable input is returned unchanged.
#[must_use]
pub fn format_date(raw: &str, reference: Option<DateTime<Utc>>) -> String {
    let Some(date) = parse_date(raw) else {
        return raw.to_string();
    };
    match reference {
        Some(reference) if reference.year() == date.year() => date.format("%b %-d").to_string(),
        _ => date.format("%b %-d, %Y").to_string(),
    }
}

/// Full UTC timestamp such as `Mar 4, 2025 09:59 UTC`.
#[must_use]
pub fn format_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw).map_or_else(
        |_| raw.to_string(),
        |timestamp| {
            timestamp
                .with_timezone(&Utc)
                .format("%b %-d, %Y %H:%M UTC")
                .to_string()
        },
    )
}

// ---------------------------------------------------------------------------
// Links
// ---------------------------------------------------------------------------

/// `🔴 [ENG-42] [title](url)`; the glyph is dropped for "no priority".
#[must_use]
pub fn issue_link(issue: &Issue, url: &str) -> String {
    let reference = format!(
        "[{}] [{}]({url})",
        identifier(&issue.team.key, issue.number),
        issue.title
    );
    match priority_glyph(issue.priority) {
        "" => reference,
        glyph => format!("{glyph} {reference}"),
    }
}

#[must_use]
pub fn project_link(name: &str, url: &str) -> String {
    format!("📋 [{name}]({url})")
}

#[must_use]
pub fn cycle_link(name: &str, url: &str) -> String {
    format!("🔄 [{name}]({url})")
}

/// `✅ Done`
#[must_use]
pub fn state_line(state: &IssueState) -> String {
    match state_glyph(state.state_type) {
        "" => state.name.clone(),
        glyph => format!("{glyph} {}", state.name),
    }
}

/// `🔴 Off Track`
#[must_use]
pub fn health_line(health: ProjectHealth) -> String {
    match health_glyph(health) {
        "" => health_label(health).to_string(),
        glyph => format!("{glyph} {}", health_label(health)),
    }
}
