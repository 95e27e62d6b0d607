use roxmltree::Node;

use super::super::{structures::Genetics, types::GameString};

/// Reads an attribute off a node. Empty attributes count as absent.
pub(super) fn attr(node: Node, name: &str) -> Option<GameString> {
    node.attribute(name)
        .filter(|v| !v.is_empty())
        .map(GameString::from)
}

/// The first child element with the given tag.
pub(super) fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|c| c.has_tag_name(name))
}

/// Every child element with the given tag, in document order.
pub(super) fn children<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(move |c| c.has_tag_name(name))
}

/// The trimmed text of a node, if there is any.
pub(super) fn text(node: Node) -> Option<GameString> {
    node.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(GameString::from)
}

/// The genetic scores stored in the `genetics` child of a node.
pub(super) fn genetics(node: Node) -> Genetics {
    match child(node, "genetics") {
        Some(g) => Genetics {
            metabolism: attr(g, "metabolism"),
            quality: attr(g, "quality"),
            health: attr(g, "health"),
            fertility: attr(g, "fertility"),
            productivity: attr(g, "productivity"),
        },
        None => Genetics::default(),
    }
}

/// The last component of a path written with either separator.
pub(super) fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use roxmltree::Document;

    use super::*;

    #[test]
    fn test_basename() {
        assert_eq!(basename("$data/placeables/cowBarn.xml"), "cowBarn.xml");
        assert_eq!(basename("mods\\RL\\pigBarn.xml"), "pigBarn.xml");
        assert_eq!(basename("plain.xml"), "plain.xml");
        assert_eq!(basename("dir/"), "");
    }

    #[test]
    fn test_fields() {
        let doc = Document::parse(
            r#"<animal id="4" name="" age="12">
                <genetics metabolism="1.2" quality="0.9"/>
                <type>  barn  </type>
                <type>second</type>
            </animal>"#,
        )
        .unwrap();
        let animal = doc.root_element();
        assert_eq!(attr(animal, "id").as_deref(), Some("4"));
        assert_eq!(attr(animal, "name"), None);
        assert_eq!(attr(animal, "weight"), None);
        assert_eq!(child(animal, "type").and_then(text).as_deref(), Some("barn"));
        assert_eq!(children(animal, "type").count(), 2);
        let scores = genetics(animal);
        assert_eq!(scores.metabolism.as_deref(), Some("1.2"));
        assert_eq!(scores.health, None);
        assert_eq!(genetics(child(animal, "type").unwrap()), Genetics::default());
    }
}
