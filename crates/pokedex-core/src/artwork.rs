//! Artwork URL derivation from catalog entry URLs.
//!
//! List responses only carry `{ name, url }`; the artwork lives at a fixed
//! location keyed by the numeric id that ends the entry URL
//! (`https://pokeapi.co/api/v2/pokemon/132/` → `132`).

/// Extract the trailing numeric path segment of `url`, ignoring trailing slashes.
pub fn entry_id(url: &str) -> Option<u32> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|seg| !seg.is_empty() && seg.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|seg| seg.parse().ok())
}

/// Build the artwork URL for the entry at `url` by substituting its id into
/// `template` (every `{id}` occurrence). `None` if the URL carries no id.
pub fn artwork_url(url: &str, template: &str) -> Option<String> {
    entry_id(url).map(|id| template.replace("{id}", &id.to_string()))
}
