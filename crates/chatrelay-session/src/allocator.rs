//! Fallback username generation for collision recovery.

use rand::Rng;
use rand::distr::Alphanumeric;

/// Length of generated fallback usernames.
pub const FALLBACK_USERNAME_LEN: usize = 10;

/// Generates a random fallback username: ten characters drawn
/// uniformly from `[A-Za-z0-9]`.
///
/// Uses the process-wide, lazily-initialized generator behind
/// [`rand::rng`], reused across calls, rather than seeding a fresh
/// source every time.
///
/// This deliberately performs NO uniqueness check against the session
/// registry, and the router accepts whatever comes back without retry.
/// With 62^10 possibilities a second collision is vanishingly unlikely
/// but possible — a known weakness kept for wire-behavior
/// compatibility rather than silently hardened away.
pub fn fallback_username() -> String {
    let mut rng = rand::rng();
    (0..FALLBACK_USERNAME_LEN)
        .map(|_| rng.sample(Alphanumeric) as char)
        .collect()
}
