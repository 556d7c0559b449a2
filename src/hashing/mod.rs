//! Cache key derivation.
//!
//! spec mandates `sha256` for every content-derived cache key (embedding keys,
//! similarity-cache field keys); this module is the single place that formats
//! them, so the key shapes in §6.4 stay consistent across callers.

use sha2::{Digest, Sha256};

/// Returns the lowercase hex-encoded sha256 digest of `text`.
#[inline]
pub fn sha256_hex(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    hex_encode(&digest)
}

fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        write!(&mut out, "{byte:02x}").expect("writing to a String never fails");
    }
    out
}

/// Builds the embedding cache key: `embedding:<provider>:<sha256(text)>`.
pub fn embedding_key(provider: &str, text: &str) -> String {
    format!("embedding:{provider}:{}", sha256_hex(text))
}

/// Builds the similarity-cache bucket key: `answer:evaluation_map:<quizID>`.
pub fn similarity_bucket_key(quiz_id: &str) -> String {
    format!("answer:evaluation_map:{quiz_id}")
}

/// Builds the similarity-cache field key for a user answer: `sha256(userAnswerText)`.
pub fn similarity_field_key(user_answer: &str) -> String {
    sha256_hex(user_answer)
}

/// Builds the anonymous-result cache key: `anonymous:result:<ulid>`.
pub fn anonymous_result_key(request_id: &str) -> String {
    format!("anonymous:result:{request_id}")
}
