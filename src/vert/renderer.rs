use crate::{
    diagnostics::{Anomaly, Diagnostics},
    sentence::UNKNOWN_SENTENCE_ID,
    token::{Deletion, Link, LinkedLayers, Token},
    utility::{id::common_id, str::escape_xml},
    vert::record::{
        a_sub_record, b_record, corr_end, corr_start, deletion_record, err_end, err_start,
        erroneous_a_record, erroneous_w_record, flat_record, merged_error_type, Tier,
        DELETION_ERROR_TYPE, UNKNOWN_ERROR_TYPE,
    },
};

// What the A => B step of an A token looks like
enum AbStep<'a> {
    Clean(&'a Token),
    Edit(Vec<&'a Token>),
    Deletion(Option<&'a Deletion>),
}

pub fn render_paragraph(
    paragraph_id: &str,
    layers: &LinkedLayers,
    diagnostics: &mut Diagnostics,
) -> Vec<String> {
    let mut renderer = ParagraphRenderer {
        layers,
        lines: Vec::new(),
        diagnostics,
    };

    renderer
        .lines
        .push(format!(r#"<p id="{}">"#, escape_xml(common_id(paragraph_id))));

    let tokens = &layers.w.tokens;
    let mut start = 0;
    while start < tokens.len() {
        let sentence_id = sentence_of(&tokens[start]);
        let end = start
            + tokens[start..]
                .iter()
                .take_while(|t| sentence_of(t) == sentence_id)
                .count();

        renderer
            .lines
            .push(format!(r#"<s id="{}">"#, escape_xml(sentence_id)));
        renderer.render_sentence(start, end);
        renderer.lines.push("</s>".to_owned());

        start = end;
    }

    renderer.lines.push("</p>".to_owned());
    renderer.lines
}

fn sentence_of(token: &Token) -> &str {
    token.sentence_id.as_deref().unwrap_or(UNKNOWN_SENTENCE_ID)
}

struct ParagraphRenderer<'a> {
    layers: &'a LinkedLayers,
    lines: Vec<String>,
    diagnostics: &'a mut Diagnostics,
}

impl<'a> ParagraphRenderer<'a> {
    fn render_sentence(&mut self, start: usize, end: usize) {
        let mut i = start;
        while i < end {
            i += self.render_token(i, end);
        }
    }

    // Returns the number of W tokens consumed
    fn render_token(&mut self, i: usize, end: usize) -> usize {
        let layers = self.layers;
        let w = &layers.w.tokens[i];

        // W => A => B without edits
        if let Some(a) = w.sole_higher_token().map(|j| &layers.a.tokens[j]) {
            if !a.has_errors() {
                if let AbStep::Clean(b) = self.ab_step(a) {
                    self.lines.push(flat_record(w, a, b));
                    return 1;
                }
            }
        }

        match w.links_higher.first() {
            // deleted in A
            Some(Link::Deletion(deletion)) => {
                let error_type = merged_error_type(&deletion.errors)
                    .unwrap_or_else(|| DELETION_ERROR_TYPE.to_owned());
                self.lines.push(err_start(Tier::WA, &error_type));
                self.lines.push(erroneous_w_record(w));
                self.lines.push(err_end());
                self.lines.push(corr_start(Tier::WA, &error_type));
                self.lines.push(deletion_record());
                self.lines.push(corr_end());
                1
            }

            // edited in A
            Some(Link::Token { index }) if layers.a.tokens[*index].has_errors() => {
                self.render_wa_edit(i, end, *index)
            }

            // edited only in B
            Some(Link::Token { index }) if w.links_higher.len() == 1 => {
                let a = &layers.a.tokens[*index];
                self.render_ab_edit(a, Some(w));
                1
            }

            _ => {
                self.diagnostics
                    .report(Anomaly::UnhandledToken { id: w.id.clone() });
                1
            }
        }
    }

    // Consecutive W tokens sharing their first A token form one erroneous span
    fn render_wa_edit(&mut self, i: usize, end: usize, a_index: usize) -> usize {
        let layers = self.layers;
        let run = &layers.w.tokens[i..end];
        let run_len = run
            .iter()
            .take_while(|w| w.first_higher_token() == Some(a_index))
            .count();
        let run = &run[..run_len];

        let mut a_indices: Vec<usize> = Vec::new();
        for w in run {
            for index in w.links_higher.iter().filter_map(Link::token_index) {
                if !a_indices.contains(&index) {
                    a_indices.push(index);
                }
            }
        }

        let error_type = merged_error_type(&layers.a.tokens[a_index].errors)
            .unwrap_or_else(|| UNKNOWN_ERROR_TYPE.to_owned());

        self.lines.push(err_start(Tier::WA, &error_type));
        for w in run {
            self.lines.push(erroneous_w_record(w));
        }
        self.lines.push(err_end());

        self.lines.push(corr_start(Tier::WA, &error_type));
        for a in a_indices.into_iter().map(|j| &layers.a.tokens[j]) {
            match self.ab_step(a) {
                AbStep::Clean(b) => self.lines.push(a_sub_record(a, b)),
                AbStep::Edit(bs) => self.push_ab_block(a, None, &bs),
                AbStep::Deletion(_) => self
                    .diagnostics
                    .report(Anomaly::SkippedCorrection { id: a.id.clone() }),
            }
        }
        self.lines.push(corr_end());

        run_len
    }

    fn render_ab_edit(&mut self, a: &'a Token, w: Option<&Token>) {
        match self.ab_step(a) {
            AbStep::Clean(b) => self.push_ab_block(a, w, &[b]),
            AbStep::Edit(bs) => self.push_ab_block(a, w, &bs),
            AbStep::Deletion(deletion) => {
                let error_type = deletion
                    .and_then(|d| merged_error_type(&d.errors))
                    .unwrap_or_else(|| DELETION_ERROR_TYPE.to_owned());
                self.lines.push(err_start(Tier::AB, &error_type));
                self.lines.push(erroneous_a_record(a, w));
                self.lines.push(err_end());
                self.lines.push(corr_start(Tier::AB, &error_type));
                self.lines.push(deletion_record());
                self.lines.push(corr_end());
            }
        }
    }

    fn push_ab_block(&mut self, a: &Token, w: Option<&Token>, bs: &[&Token]) {
        let error_type = merged_error_type(bs.iter().flat_map(|b| b.errors.iter()))
            .unwrap_or_else(|| UNKNOWN_ERROR_TYPE.to_owned());

        self.lines.push(err_start(Tier::AB, &error_type));
        self.lines.push(erroneous_a_record(a, w));
        self.lines.push(err_end());
        self.lines.push(corr_start(Tier::AB, &error_type));
        for b in bs {
            self.lines.push(b_record(b));
        }
        self.lines.push(corr_end());
    }

    fn ab_step(&self, a: &'a Token) -> AbStep<'a> {
        let layers = self.layers;

        if let Some(Link::Deletion(deletion)) = a.links_higher.first() {
            return AbStep::Deletion(Some(deletion));
        }

        let bs: Vec<&Token> = a
            .links_higher
            .iter()
            .filter_map(Link::token_index)
            .map(|j| &layers.b.tokens[j])
            .collect();

        if let [b] = bs.as_slice() {
            if !b.has_errors() {
                return AbStep::Clean(*b);
            }
        }

        if bs.is_empty() {
            AbStep::Deletion(None)
        } else {
            AbStep::Edit(bs)
        }
    }
}
