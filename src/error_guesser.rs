use crate::token::{ErrorData, Layer, LinkedLayers};

pub static GUESSED_ERROR_TAG: &str = "diff";

// For corpora without explicit error annotation: an untagged token whose only
// source token is spelled differently gets a generic error tag.
pub fn guess_errors(layers: &mut LinkedLayers) {
    guess_layer_errors(&mut layers.a, &layers.w);
    guess_layer_errors(&mut layers.b, &layers.a);
}

fn guess_layer_errors(layer: &mut Layer, lower: &Layer) {
    for token in layer.tokens.iter_mut() {
        if token.has_errors() {
            continue;
        }

        let [link] = token.links_lower.as_slice() else {
            continue;
        };
        let Some(source) = link.token_index().and_then(|i| lower.tokens.get(i)) else {
            continue;
        };

        if source.text != token.text {
            token.errors = vec![ErrorData {
                tags: vec![GUESSED_ERROR_TAG.to_owned()],
                links: Vec::new(),
            }];
        }
    }
}
