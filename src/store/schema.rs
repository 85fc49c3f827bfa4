use rust_embed::Embed;
use serde_json::{Map, Value};

#[derive(Embed)]
#[folder = "assets/seed/"]
struct SeedAssets;

/// Entries written to a fresh lexicon file, in file order.
pub fn default_lexicon() -> Vec<(String, String)> {
    SeedAssets::get("lexicon.json")
        .and_then(|file| serde_json::from_slice::<Map<String, Value>>(file.data.as_ref()).ok())
        .map(|map| {
            map.into_iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k, s.to_string())))
                .collect()
        })
        .unwrap_or_default()
}
