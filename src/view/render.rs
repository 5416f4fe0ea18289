//! Comment markup, comment-list placeholders and relative timestamps.
//!
//! Everything the viewer or another user typed goes through `escape_html`
//! before it is concatenated into markup.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime};

use crate::api::wire::{Comment, GameId};
use crate::session::Session;

/// Escape text for use in element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ── Relative time ──────────────────────────────────────────────────

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Abbreviated month names, genitive, as ru-RU prints them after a day.
const MONTHS_SHORT: [&str; 12] = [
    "янв.", "февр.", "мар.", "апр.", "мая", "июн.", "июл.", "авг.", "сент.", "окт.", "нояб.",
    "дек.",
];

/// Parse a server timestamp. Timestamps without an offset are taken to be
/// in `now`'s offset, which is how the browser reads them.
fn parse_timestamp(raw: &str, now: &DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt);
    }
    raw.parse::<NaiveDateTime>()
        .ok()?
        .and_local_timezone(*now.offset())
        .single()
}

/// "только что" / "N мин. назад" / "N ч. назад" / "3 окт. 2026 г.".
/// Unparseable input is returned unchanged.
pub fn format_relative(raw: &str, now: &DateTime<FixedOffset>) -> String {
    let Some(at) = parse_timestamp(raw, now) else {
        return raw.to_string();
    };
    let diff = now.signed_duration_since(at).num_milliseconds();

    if diff < MINUTE_MS {
        "только что".to_string()
    } else if diff < HOUR_MS {
        format!("{} мин. назад", diff / MINUTE_MS)
    } else if diff < DAY_MS {
        format!("{} ч. назад", diff / HOUR_MS)
    } else {
        let local = at.with_timezone(now.offset());
        format!(
            "{} {} {} г.",
            local.day(),
            MONTHS_SHORT[local.month0() as usize],
            local.year()
        )
    }
}

// ── Comment markup ─────────────────────────────────────────────────

/// Markup for one comment in the modal list.
///
/// The element starts hidden and shifted left; `transition::comment_enter`
/// brings it in. The delete button is rendered only for the author.
pub fn render_comment(
    comment: &Comment,
    session: &Session,
    game_id: GameId,
    now: &DateTime<FixedOffset>,
) -> String {
    let mut html = String::with_capacity(512);

    html.push_str(&format!(
        r#"<div class="comment mb-3" id="comment-{id}" data-comment-id="{id}" style="opacity: 0; transform: translateX(-20px);">"#,
        id = comment.id
    ));
    html.push_str(r#"<div class="d-flex justify-content-between align-items-start mb-2">"#);
    html.push_str(&format!(
        r#"<div><strong class="user">{}</strong><small class="timestamp ms-2">{}</small></div>"#,
        escape_html(&comment.user),
        escape_html(&format_relative(&comment.timestamp, now))
    ));

    if session.owns(comment) {
        html.push_str(&format!(
            r#"<button class="btn btn-sm btn-outline-danger delete-comment-btn" data-game-id="{}" data-comment-id="{}" aria-label="Удалить комментарий"><i class="fas fa-trash"></i></button>"#,
            game_id, comment.id
        ));
    }

    html.push_str("</div>");
    html.push_str(&format!(
        r#"<div class="text">{}</div>"#,
        escape_html(&comment.text)
    ));
    html.push_str("</div>");
    html
}

// ── Placeholders ───────────────────────────────────────────────────

pub const LOADING_PLACEHOLDER: &str = r#"<div class="text-center py-4"><div class="spinner-border text-primary mb-3" role="status"></div><p class="text-muted">Загрузка комментариев...</p></div>"#;

pub const EMPTY_PLACEHOLDER: &str = r#"<div class="text-center text-muted py-5"><i class="fas fa-comments fa-3x mb-3 opacity-50"></i><p class="fs-5">Пока нет комментариев</p><p class="text-muted">Будьте первым, кто оставит комментарий!</p></div>"#;

pub const ERROR_PLACEHOLDER: &str = r#"<div class="alert alert-danger text-center"><i class="fas fa-exclamation-triangle me-2"></i>Ошибка загрузки комментариев</div>"#;
