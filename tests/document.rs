mod common;

use anyhow::{anyhow, Result};

use common::{convert, document, edge, lex, meta_xml, sentence, token};
use czesl_vert::{
    aligner::{convert_batch, xml_to_vert, ConvertOptions, UnitKind},
    meta_file::MetaXml,
};

fn clean_paragraphs() -> (String, String, String) {
    let w = token("w1", "run", "");
    let a = token("a1", "run", &(lex("run", &["k5"]) + &edge(&["w#w1"], &[])));
    let b = sentence(
        "b-s1",
        &token("b1", "run", &(lex("run", &["k5"]) + &edge(&["a#a1"], &[]))),
    );
    (w, a, b)
}

fn clean_document() -> String {
    document(&[r#"<s id="b-s1">"#, "run\tw1\ta1\tb1\trun\tk5", "</s>"])
}

// Paragraph `n` of each layer, `lexes` being the morphology of the B token
fn clean_paragraph(n: usize, lexes: &str) -> (String, String, String) {
    let w = format!(
        r#"<para id="w-p{n}">{}</para>"#,
        token(&format!("w{n}"), "run", "")
    );
    let a = format!(
        r#"<para id="a-p{n}" lowerpara.rf="w#w-p{n}">{}</para>"#,
        token(
            &format!("a{n}"),
            "run",
            &(lex("run", &["k5"]) + &edge(&[format!("w#w{n}").as_str()], &[])),
        )
    );
    let b = format!(
        r#"<para id="b-p{n}" lowerpara.rf="a#a-p{n}">{}</para>"#,
        sentence(
            &format!("b-s{n}"),
            &token(
                &format!("b{n}"),
                "run",
                &(lexes.to_owned() + &edge(&[format!("a#a{n}").as_str()], &[])),
            ),
        )
    );
    (w, a, b)
}

// Same content as `meta_xml`, with custom document headers
fn meta_xml_with_docs(w_doc: &str, a_doc: &str, b_doc: &str) -> MetaXml {
    let (w, a, b) = clean_paragraphs();
    MetaXml {
        name: "test".to_owned(),
        w_xml: format!(r#"<wdata>{}<para id="w-p1">{}</para></doc></wdata>"#, w_doc, w),
        a_xml: format!(
            r#"<ldata>{}<para id="a-p1" lowerpara.rf="w#w-p1">{}</para></doc></ldata>"#,
            a_doc, a
        ),
        b_xml: format!(
            r#"<ldata>{}<para id="b-p1" lowerpara.rf="a#a-p1">{}</para></doc></ldata>"#,
            b_doc, b
        ),
    }
}

#[test]
fn lower_documents_are_found_by_reference() -> Result<()> {
    let (w, a, b) = clean_paragraphs();

    let output = convert(&w, &a, &b)?;

    assert_eq!(output.vert, clean_document());
    Ok(())
}

#[test]
fn lower_documents_are_found_by_swapped_prefix() -> Result<()> {
    let meta_xml = meta_xml_with_docs(
        r#"<doc id="w-doc1">"#,
        r#"<doc id="a-doc1">"#,
        r#"<doc id="b-doc1">"#,
    );

    let output = xml_to_vert(&meta_xml, &ConvertOptions::default())?;

    assert_eq!(output.vert, clean_document());
    Ok(())
}

#[test]
fn lower_documents_are_found_by_same_id() -> Result<()> {
    let meta_xml = meta_xml_with_docs(
        r#"<doc id="doc1">"#,
        r#"<doc id="doc1">"#,
        r#"<doc id="doc1">"#,
    );

    let output = xml_to_vert(&meta_xml, &ConvertOptions::default())?;

    assert!(output.vert.starts_with(r#"<doc id="doc1">"#));
    assert!(output.vert.contains("run\tw1\ta1\tb1\trun\tk5"));
    Ok(())
}

#[test]
fn document_without_lower_document_is_skipped() -> Result<()> {
    let meta_xml = meta_xml_with_docs(
        r#"<doc id="w-doc1">"#,
        r#"<doc id="a-doc2">"#,
        r#"<doc id="b-doc1">"#,
    );

    let output = xml_to_vert(&meta_xml, &ConvertOptions::default())?;

    assert_eq!(output.vert, "");
    assert_eq!(output.skipped.len(), 1);
    assert_eq!(output.skipped[0].kind, UnitKind::Document);
    assert_eq!(output.skipped[0].id, "b-doc1");
    assert!(format!("{:#}", output.skipped[0].error).contains("No a document found for b-doc1"));
    Ok(())
}

#[test]
fn paragraph_without_lower_paragraph_is_skipped() -> Result<()> {
    let mut meta_xml = meta_xml("test", "", "", "");
    meta_xml.b_xml = r#"<ldata><doc id="b-doc1" lowerdoc.rf="a#a-doc1"><para id="b-p1" lowerpara.rf="a#a-p9"></para></doc></ldata>"#.to_owned();

    let output = xml_to_vert(&meta_xml, &ConvertOptions::default())?;

    assert_eq!(output.vert, "<doc id=\"b-doc1\">\n</doc>");
    assert_eq!(output.skipped.len(), 1);
    assert_eq!(output.skipped[0].kind, UnitKind::Paragraph);
    assert!(format!("{:#}", output.skipped[0].error)
        .contains("Paragraph a-p9 referenced by b-p1 not found"));
    Ok(())
}

#[test]
fn empty_b_document_over_tokens_is_skipped() -> Result<()> {
    let (w, a, _) = clean_paragraphs();

    let output = convert(&w, &a, "")?;

    assert_eq!(output.vert, "");
    assert_eq!(output.skipped.len(), 1);
    assert_eq!(output.skipped[0].kind, UnitKind::Document);
    assert!(format!("{:#}", output.skipped[0].error)
        .contains("B document b-doc1 is empty but its A document has 1 tokens"));
    Ok(())
}

#[test]
fn empty_b_document_does_not_drop_its_siblings() -> Result<()> {
    let (w, a, b) = clean_paragraph(1, &lex("run", &["k5"]));
    let meta_xml = MetaXml {
        name: "test".to_owned(),
        w_xml: format!(
            r#"<wdata><doc id="w-d1">{w}</doc><doc id="w-d2">{w}</doc></wdata>"#
        ),
        a_xml: format!(
            r#"<ldata><doc id="a-d1" lowerdoc.rf="w#w-d1">{a}</doc><doc id="a-d2" lowerdoc.rf="w#w-d2">{a}</doc></ldata>"#
        ),
        b_xml: format!(
            r#"<ldata><doc id="b-d1" lowerdoc.rf="a#a-d1"></doc><doc id="b-d2" lowerdoc.rf="a#a-d2">{b}</doc></ldata>"#
        ),
    };

    let output = xml_to_vert(&meta_xml, &ConvertOptions::default())?;

    assert_eq!(
        output.vert,
        [
            r#"<doc id="b-d2">"#,
            r#"<p id="p1">"#,
            r#"<s id="b-s1">"#,
            "run\tw1\ta1\tb1\trun\tk5",
            "</s>",
            "</p>",
            "</doc>",
        ]
        .join("\n")
    );
    assert_eq!(output.skipped.len(), 1);
    assert_eq!(output.skipped[0].id, "b-d1");
    Ok(())
}

#[test]
fn ambiguous_b_token_drops_only_its_paragraph() -> Result<()> {
    let (w1, a1, b1) = clean_paragraph(1, &(lex("run", &["k5"]) + &lex("run", &["k1"])));
    let (w2, a2, b2) = clean_paragraph(2, &lex("run", &["k5"]));
    let meta_xml = MetaXml {
        name: "test".to_owned(),
        w_xml: format!(r#"<wdata><doc id="w-d1">{w1}{w2}</doc></wdata>"#),
        a_xml: format!(r#"<ldata><doc id="a-d1" lowerdoc.rf="w#w-d1">{a1}{a2}</doc></ldata>"#),
        b_xml: format!(r#"<ldata><doc id="b-d1" lowerdoc.rf="a#a-d1">{b1}{b2}</doc></ldata>"#),
    };

    let output = xml_to_vert(&meta_xml, &ConvertOptions::default())?;

    assert_eq!(
        output.vert,
        [
            r#"<doc id="b-d1">"#,
            r#"<p id="p2">"#,
            r#"<s id="b-s2">"#,
            "run\tw2\ta2\tb2\trun\tk5",
            "</s>",
            "</p>",
            "</doc>",
        ]
        .join("\n")
    );
    assert_eq!(output.skipped.len(), 1);
    assert_eq!(output.skipped[0].kind, UnitKind::Paragraph);
    assert_eq!(output.skipped[0].id, "b-p1");
    assert!(format!("{:#}", output.skipped[0].error)
        .contains("b-token b1 contains 2 lex tags, expected 1"));
    Ok(())
}

#[test]
fn empty_paragraphs_are_kept() -> Result<()> {
    let output = convert("", "", "")?;

    assert_eq!(output.vert, document(&[]));
    assert!(output.diagnostics.is_empty());
    Ok(())
}

#[test]
fn malformed_xml_is_an_error() {
    let mut meta_xml = meta_xml("test", "", "", "");
    meta_xml.a_xml = "<ldata><doc>".to_owned();

    let error = xml_to_vert(&meta_xml, &ConvertOptions::default()).unwrap_err();

    assert!(error.to_string().contains("Failed to parse A layer"));
}

#[test]
fn batch_skips_failing_document_sets() {
    let (w, a, b) = clean_paragraphs();
    let good = meta_xml("good", &w, &a, &b);
    let mut broken = meta_xml("broken", &w, &a, &b);
    broken.b_xml = "<ldata>".to_owned();
    let void = meta_xml("void", &w, &a, "");

    let batch = convert_batch(
        vec![
            Ok(broken),
            Err(anyhow!("unreadable")),
            Ok(void),
            Ok(good),
        ],
        &ConvertOptions::default(),
    );

    assert_eq!(batch.vert, clean_document());
    assert_eq!(batch.failures.len(), 2);
    assert_eq!(batch.failures[0].name.as_deref(), Some("broken"));
    assert_eq!(batch.failures[1].name, None);
    assert_eq!(batch.failures[1].error.to_string(), "unreadable");
    assert_eq!(batch.skipped.len(), 1);
    assert_eq!(batch.skipped[0].kind, UnitKind::Document);
}

#[test]
fn batch_concatenates_document_sets() {
    let (w, a, b) = clean_paragraphs();

    let batch = convert_batch(
        vec![Ok(meta_xml("one", &w, &a, &b)), Ok(meta_xml("two", &w, &a, &b))],
        &ConvertOptions::default(),
    );

    assert!(batch.failures.is_empty());
    assert_eq!(batch.vert, format!("{}\n{}", clean_document(), clean_document()));
}
