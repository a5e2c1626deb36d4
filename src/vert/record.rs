use crate::{
    token::{ErrorData, Morph, Token},
    utility::str::{dedup_ordered, escape_xml},
};

pub static TAG_SEPARATOR: &str = "|";
// between morph candidates, distinct from TAG_SEPARATOR
pub static CANDIDATE_SEPARATOR: &str = "||";
pub static ERROR_TYPE_SEPARATOR: &str = "|";

pub static EMPTY_SLOT: &str = "-";
pub static DELETED_TEXT: &str = "[del]";
pub static DELETED_ID: &str = "[del]";

pub static DELETION_ERROR_TYPE: &str = "del";
pub static UNKNOWN_ERROR_TYPE: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    WA = 1,
    AB = 2,
}

pub fn record(text: &str, w_id: &str, a_id: &str, b_id: &str, lemma: &str, tags: &str) -> String {
    [text, w_id, a_id, b_id, lemma, tags]
        .iter()
        .map(|field| escape_xml(field))
        .collect::<Vec<_>>()
        .join("\t")
}

// W => A => B without any edit
pub fn flat_record(w: &Token, a: &Token, b: &Token) -> String {
    let (lemma, tags) = morph_fields(b.morphs());
    record(&w.text, &w.id, &a.id, &b.id, &lemma, &tags)
}

pub fn erroneous_w_record(w: &Token) -> String {
    record(&w.text, &w.id, EMPTY_SLOT, EMPTY_SLOT, EMPTY_SLOT, EMPTY_SLOT)
}

// A correction that passes unchanged to B
pub fn a_sub_record(a: &Token, b: &Token) -> String {
    let (lemma, tags) = morph_fields(b.morphs());
    record(&a.text, EMPTY_SLOT, &a.id, &b.id, &lemma, &tags)
}

pub fn erroneous_a_record(a: &Token, w: Option<&Token>) -> String {
    let (lemma, tags) = morph_fields(a.morphs());
    let w_id = w.map(|w| w.id.as_str()).unwrap_or(EMPTY_SLOT);
    record(&a.text, w_id, &a.id, EMPTY_SLOT, &lemma, &tags)
}

pub fn b_record(b: &Token) -> String {
    let (lemma, tags) = morph_fields(b.morphs());
    record(&b.text, EMPTY_SLOT, EMPTY_SLOT, &b.id, &lemma, &tags)
}

pub fn deletion_record() -> String {
    record(DELETED_TEXT, DELETED_ID, DELETED_ID, DELETED_ID, EMPTY_SLOT, EMPTY_SLOT)
}

pub fn err_start(tier: Tier, error_type: &str) -> String {
    format!(r#"<err level="{}" type="{}">"#, tier as u8, escape_xml(error_type))
}

pub fn err_end() -> String {
    "</err>".to_owned()
}

pub fn corr_start(tier: Tier, error_type: &str) -> String {
    format!(r#"<corr level="{}" type="{}">"#, tier as u8, escape_xml(error_type))
}

pub fn corr_end() -> String {
    "</corr>".to_owned()
}

// (lemmas, tags), candidates joined by CANDIDATE_SEPARATOR
pub fn morph_fields(morphs: &[Morph]) -> (String, String) {
    if morphs.is_empty() {
        return (EMPTY_SLOT.to_owned(), EMPTY_SLOT.to_owned());
    }

    let lemmas = morphs
        .iter()
        .map(|m| m.lemma.as_str())
        .collect::<Vec<_>>()
        .join(CANDIDATE_SEPARATOR);
    let tags = morphs
        .iter()
        .map(|m| m.tags.join(TAG_SEPARATOR))
        .collect::<Vec<_>>()
        .join(CANDIDATE_SEPARATOR);

    (lemmas, tags)
}

// None when no tag is present
pub fn merged_error_type<'a, I>(errors: I) -> Option<String>
where
    I: IntoIterator<Item = &'a ErrorData>,
{
    let tags = dedup_ordered(
        errors
            .into_iter()
            .flat_map(|e| e.tags.iter().map(|t| t.as_str())),
    );

    if tags.is_empty() {
        None
    } else {
        Some(tags.join(ERROR_TYPE_SEPARATOR))
    }
}
