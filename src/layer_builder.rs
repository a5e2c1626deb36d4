use anyhow::{ensure, Context, Result};
use roxmltree::Node;

use crate::{
    diagnostics::{Anomaly, Diagnostics},
    edge::{read_errors, EdgeMap},
    token::{ErrorData, LayerKind, Layer, Link, Morph, Token, TokenPayload},
    utility::xml::{
        child_elements, descendant_elements, first_child_element, required_attribute, text_of,
    },
};

impl Morph {
    // <lex><lemma/><mtag/>*</lex>
    pub fn from_lex(lex: Node) -> Result<Morph> {
        let lemmas: Vec<_> = child_elements(lex, "lemma").collect();
        ensure!(
            lemmas.len() == 1,
            "lex contains {} lemma tags, expected 1",
            lemmas.len()
        );

        Ok(Morph {
            lemma: text_of(lemmas[0]),
            tags: child_elements(lex, "mtag").map(text_of).collect(),
        })
    }
}

pub fn build_w_layer(
    w_para: Node,
    edges_wa: &EdgeMap,
    diagnostics: &mut Diagnostics,
) -> Result<Layer> {
    let mut tokens = Vec::new();

    for w in descendant_elements(w_para, "w") {
        let mut token = Token::new(
            required_attribute(w, "id")?.to_owned(),
            token_text(w),
            TokenPayload::W,
        );
        link_higher(&mut token, LayerKind::W, edges_wa, diagnostics);
        tokens.push(token);
    }

    Ok(Layer::new(LayerKind::W, tokens, diagnostics))
}

pub fn build_a_layer(
    a_para: Node,
    edges_wa: &EdgeMap,
    edges_ab: &EdgeMap,
    diagnostics: &mut Diagnostics,
) -> Result<Layer> {
    let mut tokens = Vec::new();

    for w in descendant_elements(a_para, "w") {
        let id = required_attribute(w, "id")?;

        let morphs = child_elements(w, "lex")
            .map(Morph::from_lex)
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("Failed to read morphology of a-token {}", id))?;
        if morphs.is_empty() {
            diagnostics.report(Anomaly::MissingMorph {
                layer: LayerKind::A,
                id: id.to_owned(),
            });
            continue;
        }

        let mut token = Token::new(id.to_owned(), token_text(w), TokenPayload::A { morphs });
        token.errors = token_errors(w, LayerKind::A, diagnostics);
        token.link_ids_lower = edges_wa.reverse.get(id).to_vec();
        link_higher(&mut token, LayerKind::A, edges_ab, diagnostics);
        tokens.push(token);
    }

    Ok(Layer::new(LayerKind::A, tokens, diagnostics))
}

pub fn build_b_layer(
    b_para: Node,
    edges_ab: &EdgeMap,
    diagnostics: &mut Diagnostics,
) -> Result<Layer> {
    let mut tokens = Vec::new();

    for stray in child_elements(b_para, "w") {
        diagnostics.report(Anomaly::TokenOutsideSentence {
            id: stray.attribute("id").unwrap_or_default().to_owned(),
        });
    }

    for sentence in child_elements(b_para, "s") {
        let sentence_id = required_attribute(sentence, "id")?;

        for w in descendant_elements(sentence, "w") {
            let id = required_attribute(w, "id")?;

            // ambiguity is not representable on the final layer
            let lexes: Vec<_> = child_elements(w, "lex").collect();
            ensure!(
                lexes.len() == 1,
                "b-token {} contains {} lex tags, expected 1",
                id,
                lexes.len()
            );
            let morph = Morph::from_lex(lexes[0])
                .with_context(|| format!("Failed to read morphology of b-token {}", id))?;

            let mut token = Token::new(id.to_owned(), token_text(w), TokenPayload::B { morph });
            token.sentence_id = Some(sentence_id.to_owned());
            token.errors = token_errors(w, LayerKind::B, diagnostics);
            token.link_ids_lower = edges_ab.reverse.get(id).to_vec();
            tokens.push(token);
        }
    }

    Ok(Layer::new(LayerKind::B, tokens, diagnostics))
}

fn token_text(w: Node) -> String {
    first_child_element(w, "token")
        .map(text_of)
        .unwrap_or_default()
}

// A deletion takes priority over ordinary ids, which are resolved later
fn link_higher(token: &mut Token, layer: LayerKind, edges: &EdgeMap, diagnostics: &mut Diagnostics) {
    token.link_ids_higher = edges.forward.get(&token.id).to_vec();

    match edges.deletion(&token.id) {
        Some(deletion) => {
            if !token.link_ids_higher.is_empty() {
                diagnostics.report(Anomaly::LinkAndDeletion {
                    layer,
                    id: token.id.clone(),
                });
            }
            token.links_higher = vec![Link::Deletion(deletion.clone())];
        }
        None => {
            if token.link_ids_higher.is_empty() {
                diagnostics.report(Anomaly::MissingLink {
                    layer,
                    id: token.id.clone(),
                });
            }
        }
    }
}

fn token_errors(w: Node, layer: LayerKind, diagnostics: &mut Diagnostics) -> Vec<ErrorData> {
    let edges: Vec<_> = child_elements(w, "edge").collect();

    match edges.as_slice() {
        [] => Vec::new(),
        [edge] => read_errors(*edge),
        _ => {
            diagnostics.report(Anomaly::MultipleEdges {
                layer,
                id: w.attribute("id").unwrap_or_default().to_owned(),
                count: edges.len(),
            });

            let mut combined = ErrorData::default();
            for error in edges.iter().flat_map(|&edge| read_errors(edge)) {
                combined.tags.extend(error.tags);
                combined.links.extend(error.links);
            }

            if combined == ErrorData::default() {
                Vec::new()
            } else {
                vec![combined]
            }
        }
    }
}
