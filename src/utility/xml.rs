use anyhow::{Context, Result};
use roxmltree::Node;

pub fn child_elements<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

// Does not include `node` itself
pub fn descendant_elements<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.descendants()
        .skip(1)
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

pub fn first_child_element<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> Option<Node<'a, 'input>> {
    child_elements(node, name).next()
}

pub fn text_of(node: Node) -> String {
    node.text().map(|t| t.trim().to_owned()).unwrap_or_default()
}

pub fn required_attribute<'a>(node: Node<'a, '_>, name: &str) -> Result<&'a str> {
    node.attribute(name).with_context(|| {
        format!(
            "<{}> has no {} attribute at {}",
            node.tag_name().name(),
            name,
            node.document().text_pos_at(node.range().start)
        )
    })
}

// Direct child `<name id="...">` of `parent`
pub fn find_child_by_id<'a, 'input: 'a>(
    parent: Node<'a, 'input>,
    name: &'a str,
    id: &str,
) -> Option<Node<'a, 'input>> {
    child_elements(parent, name).find(|n| n.attribute("id") == Some(id))
}
