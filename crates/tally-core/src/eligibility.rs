//! The XP gate: decides whether a message counts at all.
//!
//! Rejections are silent — the coordinator still performs its bookkeeping,
//! the event just contributes zero XP.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::event::ActivityEvent;

/// ASCII alphanumerics plus the extended Latin range (covers Vietnamese
/// diacritics). A message with none of these is noise.
static SUBSTANTIVE: LazyLock<Regex> = LazyLock::new(|| Regex::new("[a-zA-Z0-9À-ỹ]").unwrap());

/// Minimum trimmed payload length that earns XP.
pub const MIN_PAYLOAD_CHARS: usize = 5;

/// Why an event earned no XP.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    Banned,
    NoPayload,
    Bot,
    NonQualifyingContext,
    TooShort,
    NoSubstance,
}

/// First reason the event fails the XP gate, or `None` when eligible.
///
/// The ban is checked first: it gates XP only, never the caller's
/// bookkeeping or other side effects.
pub fn reject_reason(event: &ActivityEvent, banned: bool) -> Option<RejectReason> {
    if banned {
        return Some(RejectReason::Banned);
    }
    let payload = event.payload();
    if payload.is_empty() {
        return Some(RejectReason::NoPayload);
    }
    if event.is_bot {
        return Some(RejectReason::Bot);
    }
    if !event.context.is_multiparty() {
        return Some(RejectReason::NonQualifyingContext);
    }
    let trimmed = payload.trim();
    if trimmed.chars().count() < MIN_PAYLOAD_CHARS {
        return Some(RejectReason::TooShort);
    }
    if !SUBSTANTIVE.is_match(trimmed) {
        return Some(RejectReason::NoSubstance);
    }
    None
}

/// Whether the event qualifies for XP consideration.
pub fn is_eligible(event: &ActivityEvent, banned: bool) -> bool {
    reject_reason(event, banned).is_none()
}
