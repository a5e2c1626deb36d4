use std::collections::HashMap;

use roxmltree::Node;

use crate::{
    diagnostics::{Anomaly, Diagnostics},
    token::{Deletion, ErrorData, LayerKind},
    utility::{
        id::strip_layer_ref,
        xml::{child_elements, descendant_elements, first_child_element, text_of},
    },
};

// id => ids, keys kept in first insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdMultiMap {
    keys: Vec<String>,
    values: HashMap<String, Vec<String>>,
}

impl IdMultiMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend<I>(&mut self, key: &str, values: I)
    where
        I: IntoIterator<Item = String>,
    {
        if !self.values.contains_key(key) {
            self.keys.push(key.to_owned());
        }
        self.values.entry(key.to_owned()).or_default().extend(values);
    }

    pub fn get(&self, key: &str) -> &[String] {
        self.values.get(key).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.keys().map(move |k| (k, self.get(k)))
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    // for each value, record the key
    pub fn invert(&self) -> IdMultiMap {
        let mut inverted = IdMultiMap::new();
        for (key, values) in self.iter() {
            for value in values {
                inverted.extend(value, [key.to_owned()]);
            }
        }
        inverted
    }
}

// Edges stored in one layer, pointing down to the layer below it
#[derive(Debug, Clone, Default)]
pub struct EdgeMap {
    // lower id => higher ids
    pub forward: IdMultiMap,
    // higher id => lower ids
    pub reverse: IdMultiMap,
    // lower id => deletion
    pub deletions: HashMap<String, Deletion>,
}

impl EdgeMap {
    pub fn deletion(&self, lower_id: &str) -> Option<&Deletion> {
        self.deletions.get(lower_id)
    }
}

pub fn read_edges(paragraph: Node, layer: LayerKind, diagnostics: &mut Diagnostics) -> EdgeMap {
    let mut forward = IdMultiMap::new();

    for token in descendant_elements(paragraph, "w") {
        let Some(token_id) = token.attribute("id") else {
            continue;
        };

        // multi-edges are flattened into a union of simple links
        for edge in child_elements(token, "edge") {
            let to_ids: Vec<String> = std::iter::once(token_id.to_owned())
                .chain(child_elements(edge, "to").map(|to| strip_layer_ref(&text_of(to)).to_owned()))
                .collect();

            for from_id in from_ids(edge) {
                forward.extend(&from_id, to_ids.iter().cloned());
            }
        }
    }

    let reverse = forward.invert();
    let deletions = find_deletions(paragraph, layer, diagnostics);

    EdgeMap {
        forward,
        reverse,
        deletions,
    }
}

// Edges directly under <para> without any <to>
pub fn find_deletions(
    paragraph: Node,
    layer: LayerKind,
    diagnostics: &mut Diagnostics,
) -> HashMap<String, Deletion> {
    let mut deletions = HashMap::new();

    for edge in child_elements(paragraph, "edge") {
        if first_child_element(edge, "to").is_some() {
            diagnostics.report(Anomaly::UnexpectedParagraphEdge {
                layer,
                paragraph_id: paragraph.attribute("id").unwrap_or_default().to_owned(),
            });
            continue;
        }

        let errors = read_errors(edge);
        for from_id in from_ids(edge) {
            deletions.insert(
                from_id.clone(),
                Deletion {
                    from_id,
                    errors: errors.clone(),
                },
            );
        }
    }

    deletions
}

pub fn read_errors(edge: Node) -> Vec<ErrorData> {
    descendant_elements(edge, "error")
        .map(|error| ErrorData {
            tags: descendant_elements(error, "tag").map(text_of).collect(),
            links: descendant_elements(error, "link").map(text_of).collect(),
        })
        .collect()
}

fn from_ids(edge: Node) -> Vec<String> {
    child_elements(edge, "from")
        .map(|from| strip_layer_ref(&text_of(from)).to_owned())
        .collect()
}
