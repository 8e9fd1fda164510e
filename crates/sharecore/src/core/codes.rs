//! Access code generation

use rand::Rng;

use crate::core::config;

/// Alphabet access codes are drawn from
const CODE_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Draws a random code of `len` characters from `[a-z0-9]`.
pub fn generate_code(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Draws codes until `exists` reports one as free.
///
/// Gives up after `MAX_GENERATION_ATTEMPTS` draws and returns the last one.
pub fn generate_unique_code<F>(len: usize, exists: F) -> String
where
    F: Fn(&str) -> bool,
{
    let mut code = generate_code(len);
    for _ in 1..config::codes::MAX_GENERATION_ATTEMPTS {
        if !exists(&code) {
            return code;
        }
        log::debug!("Access code collision on {}, drawing again", code);
        code = generate_code(len);
    }
    code
}

/// Returns true when `code` looks like something `generate_code` produced.
pub fn is_valid_code(code: &str) -> bool {
    !code.is_empty() && code.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
}
