//! Session namespace prefixes.
//!
//! A prefix is `<namespace tag>_<random alphanumerics>`. The random part only lowers the odds
//! of two concurrent sessions sharing result slot names; it carries no security property.

use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::configuration::types::PrefixPolicy;

/// Draws `length` characters uniformly, with replacement, from `[A-Za-z0-9]`.
pub fn random_alphanumeric<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    std::iter::repeat_with(|| char::from(rng.sample(Alphanumeric)))
        .take(length)
        .collect()
}

pub fn generate_prefix(policy: &PrefixPolicy) -> String {
    generate_prefix_with(&mut rand::thread_rng(), policy)
}

pub fn generate_prefix_with<R: Rng + ?Sized>(rng: &mut R, policy: &PrefixPolicy) -> String {
    format!(
        "{}_{}",
        policy.namespace_tag,
        random_alphanumeric(rng, policy.length)
    )
}

/// Name of the input slot a retrieve for `key` lands in.
///
/// Without a prefix the slot is the bare key.
pub fn namespaced_key(prefix: Option<&str>, key: &str) -> String {
    match prefix {
        Some(prefix) => format!("{}_{}", prefix, key),
        None => key.to_string(),
    }
}
