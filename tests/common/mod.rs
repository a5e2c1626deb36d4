#![allow(dead_code)]

use anyhow::Result;
use roxmltree::Document;

use czesl_vert::{
    aligner::{xml_to_vert, ConvertOptions, VertOutput},
    diagnostics::Diagnostics,
    layer_linker::link_layers,
    meta_file::MetaXml,
    token::LinkedLayers,
};

pub fn lex(lemma: &str, tags: &[&str]) -> String {
    let tags: String = tags.iter().map(|t| format!("<mtag>{}</mtag>", t)).collect();
    format!("<lex><lemma>{}</lemma>{}</lex>", lemma, tags)
}

fn error_elements(errors: &[&[&str]]) -> String {
    errors
        .iter()
        .map(|tags| {
            let tags: String = tags.iter().map(|t| format!("<tag>{}</tag>", t)).collect();
            format!("<error>{}</error>", tags)
        })
        .collect()
}

// from: full references such as "w#w1"
pub fn edge(from: &[&str], errors: &[&[&str]]) -> String {
    let from: String = from.iter().map(|f| format!("<from>{}</from>", f)).collect();
    format!("<edge>{}{}</edge>", from, error_elements(errors))
}

pub fn edge_to(from: &[&str], to: &[&str], errors: &[&[&str]]) -> String {
    let from: String = from.iter().map(|f| format!("<from>{}</from>", f)).collect();
    let to: String = to.iter().map(|t| format!("<to>{}</to>", t)).collect();
    format!("<edge>{}{}{}</edge>", from, to, error_elements(errors))
}

pub fn token(id: &str, text: &str, inner: &str) -> String {
    format!(r#"<w id="{}"><token>{}</token>{}</w>"#, id, text, inner)
}

pub fn sentence(id: &str, tokens: &str) -> String {
    format!(r#"<s id="{}">{}</s>"#, id, tokens)
}

// One document with one paragraph per layer
pub fn meta_xml(name: &str, w_para: &str, a_para: &str, b_para: &str) -> MetaXml {
    MetaXml {
        name: name.to_owned(),
        w_xml: format!(
            r#"<wdata><doc id="w-doc1"><para id="w-p1">{}</para></doc></wdata>"#,
            w_para
        ),
        a_xml: format!(
            r#"<ldata><doc id="a-doc1" lowerdoc.rf="w#w-doc1"><para id="a-p1" lowerpara.rf="w#w-p1">{}</para></doc></ldata>"#,
            a_para
        ),
        b_xml: format!(
            r#"<ldata><doc id="b-doc1" lowerdoc.rf="a#a-doc1"><para id="b-p1" lowerpara.rf="a#a-p1">{}</para></doc></ldata>"#,
            b_para
        ),
    }
}

pub fn convert(w_para: &str, a_para: &str, b_para: &str) -> Result<VertOutput> {
    convert_with(w_para, a_para, b_para, &ConvertOptions::default())
}

pub fn convert_with(
    w_para: &str,
    a_para: &str,
    b_para: &str,
    options: &ConvertOptions,
) -> Result<VertOutput> {
    xml_to_vert(&meta_xml("test", w_para, a_para, b_para), options)
}

pub fn link(w_para: &str, a_para: &str, b_para: &str) -> Result<(LinkedLayers, Diagnostics)> {
    let w = format!(r#"<para id="w-p1">{}</para>"#, w_para);
    let a = format!(r#"<para id="a-p1" lowerpara.rf="w#w-p1">{}</para>"#, a_para);
    let b = format!(r#"<para id="b-p1" lowerpara.rf="a#a-p1">{}</para>"#, b_para);

    let w = Document::parse(&w)?;
    let a = Document::parse(&a)?;
    let b = Document::parse(&b)?;

    let mut diagnostics = Diagnostics::new();
    let layers = link_layers(
        w.root_element(),
        a.root_element(),
        b.root_element(),
        &mut diagnostics,
    )?;

    Ok((layers, diagnostics))
}

// The vertical of the single test document: <doc>, <p>, `lines`, </p>, </doc>
pub fn document(lines: &[&str]) -> String {
    let mut all = vec![r#"<doc id="b-doc1">"#, r#"<p id="p1">"#];
    all.extend_from_slice(lines);
    all.push("</p>");
    all.push("</doc>");
    all.join("\n")
}
