//! Identifier generation.
//!
//! Ids are a readable prefix, a millisecond timestamp and a short random
//! base-36 suffix. Project ids use a slug of the project name in place of
//! the timestamp.

use chrono::Utc;
use rand::Rng;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Random lowercase base-36 string of `len` characters.
pub fn random_suffix(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

/// `<prefix>-<unix millis>-<suffix>`.
pub fn timestamped(prefix: &str, suffix_len: usize) -> String {
    format!(
        "{}-{}-{}",
        prefix,
        Utc::now().timestamp_millis(),
        random_suffix(suffix_len)
    )
}

pub fn task_id() -> String {
    timestamped("task", 6)
}

pub fn category_id() -> String {
    timestamped("cat", 4)
}

pub fn subtask_id() -> String {
    timestamped("sub", 4)
}

/// Slug used as the readable part of a project id.
/// Lowercases, turns whitespace runs into `-` and drops anything outside `[a-z0-9-]`.
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut in_space = false;
    for c in lowered.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('-');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            out.push(c);
        }
    }
    out
}

/// `<slug>-<6 random chars>`.
pub fn project_id(name: &str) -> String {
    format!("{}-{}", slugify(name), random_suffix(6))
}
