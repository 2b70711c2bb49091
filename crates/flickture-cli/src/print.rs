//! Plain-text rendering of API payloads.

use serde_json::Value;

use flickture_api::types::{Comment, Title, UserList, WatchlistEntry};
use flickture_core::notify::{Notification, NotificationKind};
use flickture_core::time_ago::format_time_ago_str;

pub fn title_line(title: &Title) -> String {
    let mut line = format!("{:>8}  {}", title.tmdb_id, title.display_title());
    if let Some(year) = title.year() {
        line.push_str(&format!(" ({year})"));
    }
    if let Some(score) = title.vote_average.filter(|s| *s > 0.0) {
        line.push_str(&format!("  ★ {score:.1}"));
    }
    line
}

pub fn watchlist_line(entry: &WatchlistEntry) -> String {
    format!("[{}] {}", entry.status, title_line(&entry.movie))
}

pub fn list_line(list: &UserList) -> String {
    let mut line = format!("{:>6}  {}", list.id, list.name);
    if let Some(creator) = &list.creator {
        line.push_str(&format!(" by {creator}"));
    }
    let titles = list.movies_count.unwrap_or(list.movies.len() as u64);
    line.push_str(&format!("  ({titles} titles"));
    if let Some(likes) = list.likes_count {
        line.push_str(&format!(", {likes} likes"));
    }
    line.push(')');
    if let Some(created) = &list.created_at {
        line.push_str(&format!(", created {}", format_time_ago_str(created)));
    }
    line
}

pub fn comment_block(comment: &Comment) -> String {
    let author = comment
        .user
        .as_ref()
        .map(|u| u.username.as_str())
        .unwrap_or("anonymous");
    let when = comment
        .created_at
        .as_deref()
        .map(format_time_ago_str)
        .unwrap_or_default();
    let stars = comment
        .rating
        .map(|r| "★".repeat(r as usize))
        .unwrap_or_default();
    format!(
        "#{} {author} {stars} {when}\n    {}",
        comment.id,
        comment.content.replace('\n', "\n    ")
    )
}

/// Summary of a movie detail payload. Fields are looked up loosely since
/// the detail endpoint merges local and upstream data.
pub fn movie_summary(detail: &Value) -> String {
    let movie = detail.get("movie").unwrap_or(detail);
    let field = |key: &str| movie.get(key).and_then(Value::as_str);

    let title = field("title").or(field("name")).unwrap_or("(untitled)");
    let mut out = title.to_string();
    if let Some(date) = field("release_date").filter(|d| !d.is_empty()) {
        out.push_str(&format!(" ({date})"));
    }
    if let Some(score) = movie.get("vote_average").and_then(Value::as_f64) {
        out.push_str(&format!("\nRating: {score:.1}/10"));
    }
    if let Some(status) = detail.get("watchlist_status").and_then(Value::as_str) {
        out.push_str(&format!("\nOn your list: {status}"));
    }
    if let Some(overview) = field("overview").filter(|o| !o.is_empty()) {
        out.push_str(&format!("\n\n{overview}"));
    }
    out
}

pub fn notification_line(notification: &Notification) -> String {
    let label = match notification.kind {
        NotificationKind::Error => "error",
        NotificationKind::Success => "ok",
        NotificationKind::Info => "info",
    };
    format!("{label}: {}", notification.message)
}
