use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sha2::{Digest, Sha256};

use crate::error::NamingError;

/// Prefix of every composite this tool creates, cleans or prunes.
pub const OUTPUT_PREFIX: &str = "sideby-";
pub const OUTPUT_SUFFIX: &str = ".jpg";

const HASH_CHARS: usize = 16;

/// Output filename for the ordered pair (`first`, `second`). Order matters:
/// swapping the arguments gives a different name.
pub fn generate_filename(first: &str, second: &str) -> Result<String, NamingError> {
    if first.is_empty() || second.is_empty() {
        return Err(NamingError::EmptyName);
    }
    if first.to_lowercase() == second.to_lowercase() {
        return Err(NamingError::SameName(first.to_string()));
    }

    let digest = Sha256::digest(format!("{}|{}", first, second).as_bytes());
    let encoded = URL_SAFE_NO_PAD.encode(digest);
    Ok(format!("{}{}{}", OUTPUT_PREFIX, &encoded[..HASH_CHARS], OUTPUT_SUFFIX))
}

/// True for names this tool owns in the output directory.
pub fn is_output_name(name: &str) -> bool {
    name.starts_with(OUTPUT_PREFIX) && name.ends_with(OUTPUT_SUFFIX)
}
