use rand::distributions::Alphanumeric;
use rand::Rng;

/// Length of the random tail on generated identifiers, matching the
/// original snippet's `Math.random().toString(36).substr(2, 9)`.
const SUFFIX_LEN: usize = 9;

/// Generate a new identifier of the form `{prefix}_{unix_millis}_{suffix}`.
///
/// Used with prefix `"session"` for session-scoped ids and `"anon"` for
/// durable anonymous ids. The timestamp keeps ids roughly sortable; the
/// random suffix keeps two tabs opened in the same millisecond distinct.
pub fn generate_id(prefix: &str) -> String {
    format!(
        "{}_{}_{}",
        prefix,
        chrono::Utc::now().timestamp_millis(),
        random_suffix(SUFFIX_LEN)
    )
}

fn random_suffix(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .map(|b| (b as char).to_ascii_lowercase())
        .take(len)
        .collect()
}
