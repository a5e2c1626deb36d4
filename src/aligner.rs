use std::fmt;

use anyhow::{bail, ensure, Context, Result};
use roxmltree::{Document, Node};

use crate::{
    diagnostics::Diagnostics,
    error_guesser::guess_errors,
    layer_linker::link_layers,
    meta_file::MetaXml,
    token::LayerKind,
    utility::{
        id::{strip_layer_ref, swap_layer_prefix},
        str::escape_xml,
        xml::{child_elements, descendant_elements, find_child_by_id, required_attribute},
    },
    vert::renderer::render_paragraph,
};

#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    // add a generic error tag where the text changed without annotation
    pub guess_errors: bool,
}

#[derive(Debug)]
pub struct VertOutput {
    pub vert: String,
    pub diagnostics: Diagnostics,
    // documents and paragraphs left out of `vert`
    pub skipped: Vec<SkippedUnit>,
}

#[derive(Debug, Default)]
pub struct BatchOutput {
    pub vert: String,
    pub diagnostics: Diagnostics,
    pub skipped: Vec<SkippedUnit>,
    pub failures: Vec<BatchFailure>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Document,
    Paragraph,
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitKind::Document => write!(f, "document"),
            UnitKind::Paragraph => write!(f, "paragraph"),
        }
    }
}

// A document or paragraph that hit a hard error. Its siblings are still converted.
#[derive(Debug)]
pub struct SkippedUnit {
    pub kind: UnitKind,
    pub id: String,
    pub error: anyhow::Error,
}

impl SkippedUnit {
    fn new(kind: UnitKind, id: &str, error: anyhow::Error) -> Self {
        tracing::error!("Skipping {} {}: {:#}", kind, id, error);
        SkippedUnit {
            kind,
            id: id.to_owned(),
            error,
        }
    }
}

#[derive(Debug)]
pub struct BatchFailure {
    // None when the document set could not even be read
    pub name: Option<String>,
    pub error: anyhow::Error,
}

// Converts every B document of one document set
pub fn xml_to_vert(meta_xml: &MetaXml, options: &ConvertOptions) -> Result<VertOutput> {
    let w_root = Document::parse(&meta_xml.w_xml).context("Failed to parse W layer")?;
    let a_root = Document::parse(&meta_xml.a_xml).context("Failed to parse A layer")?;
    let b_root = Document::parse(&meta_xml.b_xml).context("Failed to parse B layer")?;

    let mut diagnostics = Diagnostics::new();
    let mut skipped = Vec::new();
    let mut documents = Vec::new();

    for b_doc in child_elements(b_root.root_element(), "doc") {
        match document_to_vert(
            b_doc,
            w_root.root_element(),
            a_root.root_element(),
            options,
            &mut diagnostics,
            &mut skipped,
        ) {
            Ok(document) => documents.push(document),
            Err(error) => skipped.push(SkippedUnit::new(
                UnitKind::Document,
                b_doc.attribute("id").unwrap_or_default(),
                error,
            )),
        }
    }

    Ok(VertOutput {
        vert: documents.join("\n"),
        diagnostics,
        skipped,
    })
}

// A failing document set is logged and skipped
pub fn convert_batch<I>(meta_xmls: I, options: &ConvertOptions) -> BatchOutput
where
    I: IntoIterator<Item = Result<MetaXml>>,
{
    let mut output = BatchOutput::default();
    let mut verts = Vec::new();

    for meta_xml in meta_xmls {
        let (name, result) = match meta_xml {
            Ok(meta_xml) => {
                tracing::debug!("Converting {}", meta_xml.name);
                (Some(meta_xml.name.clone()), xml_to_vert(&meta_xml, options))
            }
            Err(e) => (None, Err(e)),
        };

        match result {
            Ok(converted) => {
                if !converted.vert.is_empty() {
                    verts.push(converted.vert);
                }
                output.diagnostics.extend(converted.diagnostics);
                output.skipped.extend(converted.skipped);
            }
            Err(error) => {
                tracing::error!(
                    "Skipping document set {}: {:#}",
                    name.as_deref().unwrap_or("?"),
                    error
                );
                output.failures.push(BatchFailure { name, error });
            }
        }
    }

    output.vert = verts.join("\n");
    output
}

pub fn document_to_vert(
    b_doc: Node,
    w_root: Node,
    a_root: Node,
    options: &ConvertOptions,
    diagnostics: &mut Diagnostics,
    skipped: &mut Vec<SkippedUnit>,
) -> Result<String> {
    let b_doc_id = required_attribute(b_doc, "id")?;
    let a_doc = find_lower_document(b_doc, a_root, LayerKind::A)?;
    let w_doc = find_lower_document(a_doc, w_root, LayerKind::W)?;

    // annotation pipeline did not finish the B layer
    let b_token_count = descendant_elements(b_doc, "w").count();
    let a_token_count = descendant_elements(a_doc, "w").count();
    ensure!(
        b_token_count > 0 || a_token_count == 0,
        "B document {} is empty but its A document has {} tokens",
        b_doc_id,
        a_token_count
    );

    let mut lines = vec![format!(r#"<doc id="{}">"#, escape_xml(b_doc_id))];

    for b_para in child_elements(b_doc, "para") {
        let b_para_id = required_attribute(b_para, "id")?;
        match paragraph_to_vert(b_para, a_doc, w_doc, options, diagnostics) {
            Ok(paragraph) => lines.extend(paragraph),
            Err(error) => skipped.push(SkippedUnit::new(
                UnitKind::Paragraph,
                b_para_id,
                error,
            )),
        }
    }

    lines.push("</doc>".to_owned());

    Ok(lines.join("\n"))
}

pub fn paragraph_to_vert(
    b_para: Node,
    a_doc: Node,
    w_doc: Node,
    options: &ConvertOptions,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<String>> {
    let a_para = find_lower_paragraph(b_para, a_doc)?;
    let w_para = find_lower_paragraph(a_para, w_doc)?;

    let mut layers = link_layers(w_para, a_para, b_para, diagnostics)?;
    if options.guess_errors {
        guess_errors(&mut layers);
    }

    Ok(render_paragraph(
        required_attribute(b_para, "id")?,
        &layers,
        diagnostics,
    ))
}

fn find_lower_paragraph<'a, 'input>(
    para: Node,
    lower_doc: Node<'a, 'input>,
) -> Result<Node<'a, 'input>> {
    let reference = required_attribute(para, "lowerpara.rf")?;
    let lower_para_id = strip_layer_ref(reference);

    find_child_by_id(lower_doc, "para", lower_para_id).with_context(|| {
        format!(
            "Paragraph {} referenced by {} not found",
            lower_para_id,
            para.attribute("id").unwrap_or_default()
        )
    })
}

// lowerdoc.rf if present, then the id with a swapped layer prefix, then the id itself
fn find_lower_document<'a, 'input>(
    doc: Node,
    lower_root: Node<'a, 'input>,
    lower_layer: LayerKind,
) -> Result<Node<'a, 'input>> {
    let doc_id = required_attribute(doc, "id")?;

    let mut candidates = Vec::new();
    if let Some(reference) = doc.attribute("lowerdoc.rf") {
        candidates.push(strip_layer_ref(reference).to_owned());
    }
    if let Some(swapped) = swap_layer_prefix(doc_id, lower_layer) {
        candidates.push(swapped);
    }
    candidates.push(doc_id.to_owned());

    for candidate in &candidates {
        if let Some(lower_doc) = find_child_by_id(lower_root, "doc", candidate) {
            return Ok(lower_doc);
        }
    }

    bail!(
        "No {} document found for {} (tried {})",
        lower_layer,
        doc_id,
        candidates.join(", ")
    )
}
