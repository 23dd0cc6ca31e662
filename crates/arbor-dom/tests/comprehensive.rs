//! End-to-end tests for the node model: building trees, moving subtrees,
//! cloning and rendering through the public API.

use arbor_dom::{path, DocType, DomConfig, DomTree, NodeId, NodeOperations, NodeType, RenderOptions};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// `<html><head/><body><p>hello</p></body></html>` under a document
fn sample_document(tree: &mut DomTree) -> (NodeId, NodeId, NodeId, NodeId) {
    let doc = tree.create_document();
    let html = tree.create_element("html");
    let head = tree.create_element("head");
    let body = tree.create_element("body");
    let p = tree.create_element("p");
    let text = tree.create_text("hello");

    tree.append_child(doc, html).unwrap();
    tree.append_child(html, head).unwrap();
    tree.append_child(html, body).unwrap();
    tree.append_child(body, p).unwrap();
    tree.append_child(p, text).unwrap();
    (doc, html, body, p)
}

#[test]
fn test_attach_remove_scenario() {
    init_tracing();
    let mut tree = DomTree::new();
    let (doc, _, body, _) = sample_document(&mut tree);

    let parent = tree.create_element("div");
    tree.append_child(body, parent).unwrap();
    let c0 = tree.create_element("span");
    tree.append_child(parent, c0).unwrap();

    let e = tree.create_element("em");
    let mut out = String::new();
    tree.node(e).unwrap().render_with(&mut out, &RenderOptions::xhtml());
    assert_eq!(out, "<em />");

    tree.insert_before(parent, e, c0).unwrap();
    let e_ref = tree.node(e).unwrap();
    let parent_path = tree.node(parent).unwrap().path();
    assert_eq!(e_ref.index(), 0);
    assert_eq!(tree.node(c0).unwrap().index(), 1);
    assert_eq!(e_ref.path(), format!("{}{}", parent_path, path::encode(0)));
    assert_eq!(e_ref.document().map(|d| d.node_id()), Some(doc));

    tree.remove(e).unwrap();
    assert!(tree.node(e).unwrap().document().is_none());
    assert!(tree.node(e).unwrap().is_disconnected());
    assert_eq!(tree.node(c0).unwrap().index(), 0);
}

#[test]
fn test_path_is_concatenated_ancestor_tokens() {
    let mut tree = DomTree::new();
    let (_, html, body, p) = sample_document(&mut tree);

    let node = tree.node(p).unwrap();
    let expected: String = [html, body, p]
        .iter()
        .map(|&id| tree.node(id).unwrap().path_token())
        .collect();
    assert_eq!(node.path(), expected);
    assert_eq!(path::split_path(&node.path()).unwrap(), vec![0, 1, 0]);
}

#[test]
fn test_moving_subtree_changes_path() {
    let mut tree = DomTree::new();
    let (_, html, body, p) = sample_document(&mut tree);
    let head = tree.node(html).unwrap().first_child().unwrap().node_id();
    let text = tree.node(p).unwrap().first_child().unwrap().node_id();

    let before = tree.node(text).unwrap().path();
    tree.append_child(head, p).unwrap();
    let after = tree.node(text).unwrap().path();

    assert_ne!(before, after);
    assert_eq!(path::split_path(&after).unwrap(), vec![0, 0, 0, 0]);
    assert!(tree.node(body).unwrap().child_nodes().is_empty());
}

#[test]
fn test_depth() {
    let mut tree = DomTree::new();
    let (doc, html, body, p) = sample_document(&mut tree);
    assert_eq!(tree.node(doc).unwrap().depth(), 0);
    assert_eq!(tree.node(html).unwrap().depth(), 1);
    assert_eq!(tree.node(body).unwrap().depth(), 2);
    assert_eq!(tree.node(p).unwrap().depth(), 3);

    tree.remove(body).unwrap();
    assert_eq!(tree.node(body).unwrap().depth(), 0);
    assert_eq!(tree.node(p).unwrap().depth(), 1);
}

#[test]
fn test_detach_disconnects_whole_subtree() {
    let mut tree = DomTree::new();
    let (doc, html, body, p) = sample_document(&mut tree);
    let text = tree.node(p).unwrap().first_child().unwrap().node_id();

    // Warm every document cache first
    for id in [html, body, p, text] {
        assert_eq!(tree.node(id).unwrap().document().map(|d| d.node_id()), Some(doc));
    }

    tree.remove(body).unwrap();
    for id in [body, p, text] {
        assert!(tree.node(id).unwrap().document().is_none(), "{id} still connected");
    }
    assert_eq!(tree.node(html).unwrap().document().map(|d| d.node_id()), Some(doc));

    // Reattach under a different document
    let other = tree.create_document();
    tree.append_child(other, body).unwrap();
    for id in [body, p, text] {
        assert_eq!(tree.node(id).unwrap().document().map(|d| d.node_id()), Some(other));
    }
}

#[test]
fn test_clone_is_detached_and_independent() {
    init_tracing();
    let mut tree = DomTree::new();
    let (_, _, body, p) = sample_document(&mut tree);
    tree.set_attribute(p, "class", "lead").unwrap();

    let copy = tree.clone_node(body).unwrap();
    let copy_ref = tree.node(copy).unwrap();
    assert!(copy_ref.parent().is_none());
    assert!(copy_ref.document().is_none());
    assert_eq!(copy_ref.render(), tree.node(body).unwrap().render());

    let copy_p = copy_ref.first_child().unwrap().node_id();
    assert_ne!(copy_p, p);
    assert_eq!(tree.node(copy_p).unwrap().parent().map(|n| n.node_id()), Some(copy));

    tree.add_class(p, "changed").unwrap();
    tree.set_inner_text(p, "bye").unwrap();
    let copy_p = tree.node(copy_p).unwrap();
    assert!(!copy_p.has_class("changed"));
    assert_eq!(copy_p.inner_text().unwrap(), "hello");
}

#[test]
fn test_render_document() {
    let mut tree = DomTree::new();
    let (doc, _, body, _) = sample_document(&mut tree);
    let doctype = tree.create_doctype("html", "", "");
    tree.insert_child(doc, 0, doctype).unwrap();
    let br = tree.create_element("br");
    tree.append_child(body, br).unwrap();

    assert_eq!(
        tree.node(doc).unwrap().render(),
        "<!DOCTYPE html><html><head></head><body><p>hello</p><br></body></html>"
    );

    tree.set_doc_type(doc, DocType::Xhtml).unwrap();
    assert_eq!(
        tree.node(body).unwrap().render(),
        "<body><p>hello</p><br /></body>"
    );
}

#[test]
fn test_render_into_appends() {
    let mut tree = DomTree::new();
    let a = tree.create_text("a");
    let b = tree.create_comment("b");
    let mut out = String::from(">");
    tree.node(a).unwrap().render_into(&mut out);
    tree.node(b).unwrap().render_into(&mut out);
    assert_eq!(out, ">a<!--b-->");
}

#[test]
fn test_config_from_json() {
    let config: DomConfig = serde_json::from_str(
        r#"{ "default_doc_type": "xhtml", "render": { "quoting": "minimal" } }"#,
    )
    .unwrap();
    assert_eq!(config.default_doc_type, DocType::Xhtml);
    assert!(!config.render.verbose_empty);

    let mut tree = DomTree::with_config(config);
    let img = tree.create_element("img");
    tree.set_attribute(img, "alt", "logo").unwrap();
    assert_eq!(tree.node(img).unwrap().render(), "<img alt=logo />");

    let defaults: DomConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(defaults, DomConfig::default());
}

#[test]
fn test_navigation_for_selector_engines() {
    let mut tree = DomTree::new();
    let ul = tree.create_element("ul");
    let mut ids = Vec::new();
    for (i, kind) in ["li", "#text", "li", "#comment", "li"].iter().enumerate() {
        let id = match *kind {
            "#text" => tree.create_text(" "),
            "#comment" => tree.create_comment("sep"),
            tag => tree.create_element(tag),
        };
        tree.append_child(ul, id).unwrap();
        assert_eq!(tree.node(id).unwrap().index(), i);
        ids.push(id);
    }

    let list = tree.node(ul).unwrap();
    assert_eq!(list.child_elements().count(), 3);
    assert_eq!(list.first_element_child().map(|n| n.node_id()), Some(ids[0]));
    assert_eq!(list.last_child().map(|n| n.node_type()), Some(NodeType::Element));
    assert_eq!(list.child(3).unwrap().node_type(), NodeType::Comment);
    assert_eq!(list.index_of(ids[4]), Some(4));
    assert_eq!(list.index_of(ul), None);

    let second = tree.node(ids[2]).unwrap();
    assert_eq!(second.previous_sibling().map(|n| n.node_id()), Some(ids[1]));
    assert_eq!(second.next_element_sibling().map(|n| n.node_id()), Some(ids[4]));
    assert_eq!(second.previous_element_sibling().map(|n| n.node_id()), Some(ids[0]));
}
