use rand::{distributions::Alphanumeric, Rng};

const ID_SUFFIX_LEN: usize = 24;

/// Generate an `OpenAI`-style identifier such as `call_8fJ2...`.
pub fn generate_id(prefix: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_SUFFIX_LEN)
        .map(char::from)
        .collect();
    format!("{prefix}_{suffix}")
}
