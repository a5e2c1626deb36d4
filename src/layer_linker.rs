use anyhow::Result;
use roxmltree::Node;

use crate::{
    diagnostics::{Anomaly, Diagnostics},
    edge::read_edges,
    layer_builder::{build_a_layer, build_b_layer, build_w_layer},
    sentence::propagate_sentence_ids,
    token::{Layer, LayerKind, Link, LinkedLayers},
};

#[derive(Debug, Clone, Copy)]
enum Direction {
    Lower,
    Higher,
}

// Builds the three layers of a paragraph and links them together
pub fn link_layers(
    w_para: Node,
    a_para: Node,
    b_para: Node,
    diagnostics: &mut Diagnostics,
) -> Result<LinkedLayers> {
    let edges_wa = read_edges(a_para, LayerKind::A, diagnostics);
    let edges_ab = read_edges(b_para, LayerKind::B, diagnostics);

    let mut w = build_w_layer(w_para, &edges_wa, diagnostics)?;
    let mut a = build_a_layer(a_para, &edges_wa, &edges_ab, diagnostics)?;
    let mut b = build_b_layer(b_para, &edges_ab, diagnostics)?;

    resolve_links(&mut w, &a, Direction::Higher, diagnostics);
    resolve_links(&mut a, &w, Direction::Lower, diagnostics);
    resolve_links(&mut a, &b, Direction::Higher, diagnostics);
    resolve_links(&mut b, &a, Direction::Lower, diagnostics);

    propagate_sentence_ids(&mut a, &b, diagnostics);
    propagate_sentence_ids(&mut w, &a, diagnostics);

    Ok(LinkedLayers { w, a, b })
}

// Tokens already carrying links (deletions) are left alone
fn resolve_links(layer: &mut Layer, target: &Layer, direction: Direction, diagnostics: &mut Diagnostics) {
    let kind = layer.kind;

    for token in layer.tokens.iter_mut() {
        let (ids, links) = match direction {
            Direction::Lower => (&token.link_ids_lower, &mut token.links_lower),
            Direction::Higher => (&token.link_ids_higher, &mut token.links_higher),
        };

        if !links.is_empty() {
            continue;
        }

        for id in ids {
            match target.index_of(id) {
                Some(index) => links.push(Link::Token { index }),
                None => diagnostics.report(Anomaly::DanglingLink {
                    layer: kind,
                    id: token.id.clone(),
                    target: id.clone(),
                }),
            }
        }
    }
}
