use std::{collections::HashMap, fmt};

use serde::Serialize;

use crate::diagnostics::{Anomaly, Diagnostics};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerKind {
    W, // tokenized transcript
    A, // first correction
    B, // final correction
}

impl LayerKind {
    pub fn prefix(self) -> char {
        match self {
            LayerKind::W => 'w',
            LayerKind::A => 'a',
            LayerKind::B => 'b',
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Morph {
    pub lemma: String,
    pub tags: Vec<String>,
}

// One <error> element
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ErrorData {
    pub tags: Vec<String>,
    pub links: Vec<String>,
}

// A lower-layer token that produced nothing in the higher layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deletion {
    pub from_id: String,
    pub errors: Vec<ErrorData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "layer")]
pub enum TokenPayload {
    W,
    // non-empty, ambiguous analyses
    A { morphs: Vec<Morph> },
    B { morph: Morph },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "type")]
pub enum Link {
    // index into the adjacent layer
    Token { index: usize },
    Deletion(Deletion),
}

impl Link {
    pub fn token_index(&self) -> Option<usize> {
        match self {
            Link::Token { index } => Some(*index),
            Link::Deletion(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub id: String,
    pub text: String,
    pub payload: TokenPayload,

    pub sentence_id: Option<String>,
    // non-empty only on the corrected side of an edit
    pub errors: Vec<ErrorData>,

    pub link_ids_lower: Vec<String>,
    pub link_ids_higher: Vec<String>,

    pub links_lower: Vec<Link>,
    pub links_higher: Vec<Link>,
}

impl Token {
    pub fn new(id: String, text: String, payload: TokenPayload) -> Self {
        Token {
            id,
            text,
            payload,
            sentence_id: None,
            errors: Vec::new(),
            link_ids_lower: Vec::new(),
            link_ids_higher: Vec::new(),
            links_lower: Vec::new(),
            links_higher: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    // The single higher token when the token links to exactly one
    pub fn sole_higher_token(&self) -> Option<usize> {
        match self.links_higher.as_slice() {
            [link] => link.token_index(),
            _ => None,
        }
    }

    pub fn first_higher_token(&self) -> Option<usize> {
        self.links_higher.first().and_then(Link::token_index)
    }

    pub fn morphs(&self) -> &[Morph] {
        match &self.payload {
            TokenPayload::W => &[],
            TokenPayload::A { morphs } => morphs,
            TokenPayload::B { morph } => std::slice::from_ref(morph),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Layer {
    pub kind: LayerKind,
    pub tokens: Vec<Token>,
    #[serde(skip)]
    id_to_index: HashMap<String, usize>,
}

impl Layer {
    pub fn new(kind: LayerKind, tokens: Vec<Token>, diagnostics: &mut Diagnostics) -> Self {
        let mut id_to_index = HashMap::with_capacity(tokens.len());
        for (i, token) in tokens.iter().enumerate() {
            if id_to_index.contains_key(&token.id) {
                diagnostics.report(Anomaly::DuplicateTokenId {
                    layer: kind,
                    id: token.id.clone(),
                });
                continue;
            }
            id_to_index.insert(token.id.clone(), i);
        }

        Layer {
            kind,
            tokens,
            id_to_index,
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.id_to_index.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<&Token> {
        self.index_of(id).map(|i| &self.tokens[i])
    }
}

// The three layers of one paragraph
#[derive(Debug, Clone, Serialize)]
pub struct LinkedLayers {
    pub w: Layer,
    pub a: Layer,
    pub b: Layer,
}
