//! Level curve: `level = max(1, floor(sqrt(xp / 5)))`.

/// Level reached at a given lifetime XP.
///
/// Pure and monotone; safe to re-derive at any time instead of trusting
/// a stored value. Integer square root keeps it exact for the full u64
/// range.
pub fn level_for(xp: u64) -> u32 {
    ((xp / 5).isqrt() as u32).max(1)
}

/// Levels gained moving from `old_xp` to `new_xp`.
pub fn level_delta(old_xp: u64, new_xp: u64) -> u32 {
    level_for(new_xp).saturating_sub(level_for(old_xp))
}
