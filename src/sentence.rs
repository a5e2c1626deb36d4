use crate::{
    diagnostics::{Anomaly, Diagnostics},
    token::Layer,
};

pub static UNKNOWN_SENTENCE_ID: &str = "unknown";

// Lower layers have no sentences of their own, they inherit them from the
// layer above. Every token ends up with a sentence id.
pub fn propagate_sentence_ids(layer: &mut Layer, higher: &Layer, diagnostics: &mut Diagnostics) {
    for token in layer.tokens.iter_mut() {
        token.sentence_id = token
            .first_higher_token()
            .and_then(|index| higher.tokens.get(index))
            .and_then(|higher_token| higher_token.sentence_id.clone());
    }

    let first_resolved = layer
        .tokens
        .iter()
        .find_map(|token| token.sentence_id.clone());

    let Some(first_resolved) = first_resolved else {
        if !layer.is_empty() {
            diagnostics.report(Anomaly::UnresolvedSentences { layer: layer.kind });
        }
        for token in layer.tokens.iter_mut() {
            token.sentence_id = Some(UNKNOWN_SENTENCE_ID.to_owned());
        }
        return;
    };

    // leading deleted or unlinked tokens
    for token in layer.tokens.iter_mut() {
        if token.sentence_id.is_some() {
            break;
        }
        token.sentence_id = Some(first_resolved.clone());
    }

    // interior gaps
    let mut previous = first_resolved;
    for token in layer.tokens.iter_mut() {
        match &token.sentence_id {
            Some(id) => previous = id.clone(),
            None => token.sentence_id = Some(previous.clone()),
        }
    }
}
