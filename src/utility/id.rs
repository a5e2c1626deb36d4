use once_cell::sync::Lazy;
use regex::Regex;

use crate::token::LayerKind;

// "w-p1w3" => layer prefix "w", rest "-p1w3"
static REGEX_LAYER_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[wab](-.*)$").unwrap());

// "w#w-p1w3" => "w-p1w3"
pub fn strip_layer_ref(reference: &str) -> &str {
    match reference.split_once('#') {
        Some((_, id)) => id,
        None => reference,
    }
}

// "b-p1" => "p1"
pub fn common_id(id: &str) -> &str {
    match id.split_once('-') {
        Some((_, rest)) => rest,
        None => id,
    }
}

// "b-doc1" with A => "a-doc1"
pub fn swap_layer_prefix(id: &str, layer: LayerKind) -> Option<String> {
    let captures = REGEX_LAYER_PREFIX.captures(id)?;
    Some(format!("{}{}", layer.prefix(), &captures[1]))
}
