//! End-to-end tests for the editing context
//!
//! This tests:
//! - Operation round trips through a whole session log
//! - The frozen-session protocol and ending-selection validation
//! - Move semantics and parent checks
//! - Style consolidation
//! - The editor facade with undo/redo and file configuration

use scribe_dom::parse;
use scribe_editing::{
    BoundaryPoint, CommandOutput, CommandRegistry, Document, EditingConfig, EditingContext, EditingError,
    Editor, NodeId, Operation, Selection, DEFAULT_CONFIG_NAME,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

fn caret(doc: &Document) -> Selection {
    Selection::collapsed(BoundaryPoint::new(doc.root(), 0))
}

fn first(doc: &Document) -> NodeId {
    doc.first_child(doc.root()).unwrap()
}

fn undo_all(doc: &mut Document, operations: &[Operation]) {
    for operation in operations.iter().rev() {
        operation.undo(doc).unwrap();
    }
}

#[test]
fn test_append_child_example() {
    init_tracing();
    let mut doc = parse("<p>A<b>B</b></p>").unwrap();
    let p = first(&doc);
    let selection = caret(&doc);

    let mut context = EditingContext::new(&mut doc, "append", selection);
    let c = context.create_text_node("C");
    context.append_child(p, c).unwrap();
    assert_eq!(context.document().to_html(), "<p>A<b>B</b>C</p>");
    let record = context.finish();

    assert_eq!(record.operations.len(), 1);
    record.operations[0].undo(&mut doc).unwrap();
    assert_eq!(doc.to_html(), "<p>A<b>B</b></p>");
}

#[test]
fn test_split_text_example() {
    init_tracing();
    let mut doc = parse("<p>hello world</p>").unwrap();
    let p = first(&doc);
    let text = doc.first_child(p).unwrap();
    let selection = caret(&doc);

    let mut context = EditingContext::new(&mut doc, "split", selection);
    let tail = context.split_text(text, 5).unwrap();
    assert_eq!(context.document().text(text), Some("hello"));
    assert_eq!(context.document().text(tail), Some(" world"));
    assert_eq!(context.document().next_sibling(text), Some(tail));
    let record = context.finish();

    record.operations[0].undo(&mut doc).unwrap();
    assert_eq!(doc.child_count(p), 1);
    assert_eq!(doc.text(text), Some("hello world"));
}

#[test]
fn test_split_text_offset_out_of_range() {
    let mut doc = parse("<p>abc</p>").unwrap();
    let text = doc.first_child(first(&doc)).unwrap();
    let selection = caret(&doc);

    let mut context = EditingContext::new(&mut doc, "split", selection);
    assert!(matches!(
        context.split_text(text, 4),
        Err(EditingError::InvalidOffset { offset: 4, max: 3, .. })
    ));
    assert!(context.operations().is_empty());
}

#[test]
fn test_style_changes_consolidate_into_one_entry() {
    init_tracing();
    let mut doc = parse("<p style=\"margin: 0;\">x</p>").unwrap();
    let p = first(&doc);
    let selection = caret(&doc);

    let mut context = EditingContext::new(&mut doc, "style", selection);
    context.set_style(p, "color", "red").unwrap();
    let t = context.create_text_node("y");
    context.append_child(p, t).unwrap();
    context.set_style(p, "font-weight", "bold").unwrap();

    assert_eq!(context.operations().len(), 2);
    assert_eq!(context.operations()[0].name(), "setStyle");
    assert_eq!(
        context.document().get_attribute(p, "style"),
        Some("margin: 0; color: red; font-weight: bold;")
    );
    let record = context.finish();

    record.operations[0].undo(&mut doc).unwrap();
    assert_eq!(doc.get_attribute(p, "style"), Some("margin: 0;"));
}

#[test]
fn test_remove_style() {
    let mut doc = parse("<p style=\"color: red; margin: 0;\"></p>").unwrap();
    let p = first(&doc);
    let selection = caret(&doc);

    let mut context = EditingContext::new(&mut doc, "style", selection);
    context.remove_style(p, "color").unwrap();
    assert_eq!(context.document().get_attribute(p, "style"), Some("margin: 0;"));
    let record = context.finish();

    undo_all(&mut doc, &record.operations);
    assert_eq!(doc.get_attribute(p, "style"), Some("color: red; margin: 0;"));
}

#[test]
fn test_mutation_after_ending_selection_is_a_protocol_violation() {
    init_tracing();
    let mut doc = parse("<p>A</p><div></div>").unwrap();
    let root = doc.root();
    let p = first(&doc);
    let div = doc.last_child(root).unwrap();
    let a = doc.first_child(p).unwrap();
    let selection = caret(&doc);

    let mut context = EditingContext::new(&mut doc, "frozen", selection);
    context.set_ending_selection(selection).unwrap();
    assert!(context.is_frozen());

    let is_violation = |result: Result<(), EditingError>| matches!(result, Err(EditingError::ProtocolViolation { .. }));
    assert!(is_violation(context.append_child(div, a)));
    assert!(is_violation(context.insert_before(div, a, None)));
    assert!(is_violation(context.insert_after(root, div, p)));
    assert!(is_violation(context.remove_child(p, a)));
    assert!(is_violation(context.set_attribute(p, "id", "x")));
    assert!(is_violation(context.remove_attribute(p, "id")));
    assert!(is_violation(context.set_style(p, "color", "red")));
    assert!(context.split_text(a, 0).is_err());
    assert!(context.split_node(p, a).is_err());
    assert!(context.operations().is_empty());

    assert_eq!(
        context.set_ending_selection(selection),
        Err(EditingError::DuplicateFinalization("frozen".to_string()))
    );
}

#[test]
fn test_ending_selection_offsets_are_inclusive() {
    let mut doc = parse("<p>abc</p>").unwrap();
    let p = first(&doc);
    let text = doc.first_child(p).unwrap();
    let selection = caret(&doc);

    for offset in 0..=3 {
        let mut context = EditingContext::new(&mut doc, "offsets", selection);
        let point = BoundaryPoint::new(text, offset);
        assert!(context.set_ending_selection(Selection::collapsed(point)).is_ok());
    }

    let mut context = EditingContext::new(&mut doc, "offsets", selection);
    let point = BoundaryPoint::new(text, 4);
    assert!(matches!(
        context.set_ending_selection(Selection::collapsed(point)),
        Err(EditingError::InvalidOffset { offset: 4, max: 3, .. })
    ));
    assert!(!context.is_frozen());

    let mut context = EditingContext::new(&mut doc, "offsets", selection);
    let point = BoundaryPoint::new(p, 2);
    assert!(matches!(
        context.set_ending_selection(Selection::collapsed(point)),
        Err(EditingError::InvalidOffset { offset: 2, max: 1, .. })
    ));
}

#[test]
fn test_ending_selection_must_be_in_document() {
    let mut doc = parse("<p></p>").unwrap();
    let selection = caret(&doc);

    let mut context = EditingContext::new(&mut doc, "detached", selection);
    let orphan = context.create_element("b").unwrap();
    assert!(!context.in_document(orphan));
    assert!(matches!(
        context.set_ending_selection(Selection::collapsed(BoundaryPoint::new(orphan, 0))),
        Err(EditingError::NodeNotInTree { .. })
    ));
}

#[test]
fn test_move_is_logged_as_remove_then_insert() {
    let mut doc = parse("<p>A<b>B</b></p><div>X</div>").unwrap();
    let root = doc.root();
    let p = first(&doc);
    let b = doc.last_child(p).unwrap();
    let div = doc.last_child(root).unwrap();
    let x = doc.first_child(div).unwrap();
    let selection = caret(&doc);

    let mut context = EditingContext::new(&mut doc, "move", selection);
    context.insert_before(div, b, Some(x)).unwrap();
    assert_eq!(context.document().to_html(), "<p>A</p><div><b>B</b>X</div>");
    let names: Vec<_> = context.operations().iter().map(Operation::name).collect();
    assert_eq!(names, vec!["removeChild", "insertBefore"]);
    let record = context.finish();

    undo_all(&mut doc, &record.operations);
    assert_eq!(doc.to_html(), "<p>A<b>B</b></p><div>X</div>");
}

#[test]
fn test_insert_before_without_reference_appends() {
    let mut doc = parse("<p>A</p>").unwrap();
    let p = first(&doc);
    let selection = caret(&doc);

    let mut context = EditingContext::new(&mut doc, "insert", selection);
    let b = context.create_text_node("B");
    context.insert_before(p, b, None).unwrap();
    assert_eq!(context.document().to_html(), "<p>AB</p>");
    assert_eq!(context.operations()[0].name(), "appendChild");
}

#[test]
fn test_insert_after() {
    let mut doc = parse("<p>A<b></b>C</p>").unwrap();
    let p = first(&doc);
    let a = doc.first_child(p).unwrap();
    let selection = caret(&doc);

    let mut context = EditingContext::new(&mut doc, "insert", selection);
    let x = context.create_text_node("X");
    context.insert_after(p, x, a).unwrap();
    assert_eq!(context.document().to_html(), "<p>AX<b></b>C</p>");

    let last = context.document().last_child(p).unwrap();
    let y = context.create_text_node("Y");
    context.insert_after(p, y, last).unwrap();
    assert_eq!(context.document().to_html(), "<p>AX<b></b>CY</p>");
}

#[test]
fn test_parent_mismatch_is_invalid_argument() {
    let mut doc = parse("<p>A</p><div>B</div>").unwrap();
    let root = doc.root();
    let p = first(&doc);
    let div = doc.last_child(root).unwrap();
    let b = doc.first_child(div).unwrap();
    let selection = caret(&doc);

    let mut context = EditingContext::new(&mut doc, "mismatch", selection);
    let x = context.create_text_node("X");
    assert!(matches!(
        context.insert_before(p, x, Some(b)),
        Err(EditingError::InvalidArgument(_))
    ));
    match context.remove_child(p, b) {
        Err(EditingError::InvalidArgument(message)) => assert!(message.contains("<div>B</div>")),
        other => panic!("expected InvalidArgument, got {:?}", other),
    }
    let y = context.create_text_node("Y");
    assert!(matches!(
        context.replace_child(p, y, b),
        Err(EditingError::InvalidArgument(_))
    ));
    assert!(context.operations().is_empty());
}

#[test]
fn test_replace_child_moves_new_child() {
    let mut doc = parse("<p>A<b>B</b></p><i>I</i>").unwrap();
    let root = doc.root();
    let p = first(&doc);
    let b = doc.last_child(p).unwrap();
    let i = doc.last_child(root).unwrap();
    let selection = caret(&doc);

    let mut context = EditingContext::new(&mut doc, "replace", selection);
    context.replace_child(p, i, b).unwrap();
    assert_eq!(context.document().to_html(), "<p>A<i>I</i></p>");
    let record = context.finish();

    undo_all(&mut doc, &record.operations);
    assert_eq!(doc.to_html(), "<p>A<b>B</b></p><i>I</i>");
}

#[test]
fn test_attributes() {
    let mut doc = parse("<p id=\"x\"></p>").unwrap();
    let p = first(&doc);
    let selection = caret(&doc);

    let mut context = EditingContext::new(&mut doc, "attributes", selection);
    context.set_attribute(p, "title", "t").unwrap();
    context.remove_attribute(p, "id").unwrap();
    context.remove_attribute(p, "lang").unwrap();
    assert!(matches!(
        context.set_attribute(p, "bad name", "v"),
        Err(EditingError::InvalidArgument(_))
    ));
    assert!(matches!(
        context.set_attribute(p, "a=b", "v"),
        Err(EditingError::InvalidArgument(_))
    ));
    assert_eq!(context.document().to_html(), "<p title=\"t\"></p>");
    assert_eq!(context.operations().len(), 2);
    let record = context.finish();

    undo_all(&mut doc, &record.operations);
    assert_eq!(doc.to_html(), "<p id=\"x\"></p>");
}

#[test]
fn test_insert_children_before() {
    let mut doc = parse("<div><span>A<b>B</b>C</span><hr></div>").unwrap();
    let div = first(&doc);
    let span = doc.first_child(div).unwrap();
    let hr = doc.last_child(div).unwrap();
    let selection = caret(&doc);

    let mut context = EditingContext::new(&mut doc, "children", selection);
    context.insert_children_before(span, hr).unwrap();
    assert_eq!(
        context.document().to_html(),
        "<div><span></span>A<b>B</b>C<hr></div>"
    );

    let orphan = context.create_element("i").unwrap();
    assert!(context.insert_children_before(span, orphan).is_err());
}

#[test]
fn test_failed_command_keeps_partial_log() {
    let mut doc = parse("<p>A</p>").unwrap();
    let p = first(&doc);
    let a = doc.first_child(p).unwrap();
    let selection = caret(&doc);

    let mut context = EditingContext::new(&mut doc, "partial", selection);
    context.set_attribute(p, "id", "x").unwrap();
    assert!(context.split_text(a, 9).is_err());
    let record = context.finish();

    assert_eq!(record.operations.len(), 1);
    assert_eq!(record.ending_selection, None);
    undo_all(&mut doc, &record.operations);
    assert_eq!(doc.to_html(), "<p>A</p>");
}

fn bold_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry.register("bold", |context, _, _| {
        let selection = context.normalize_selection(context.starting_selection())?;
        let effective = context.set_up_effective_nodes(&selection, |doc: &Document, node: NodeId| {
            doc.is_phrasing(node)
        })?;
        let Some(&first) = effective.nodes.first() else {
            return Ok(CommandOutput::Handled(false));
        };
        let parent = context
            .document()
            .parent(first)
            .ok_or_else(|| EditingError::invalid_argument("selection has no parent"))?;
        let b = context.create_element("b")?;
        context.insert_before(parent, b, Some(first))?;
        for node in effective.nodes {
            if context.document().parent(node) == Some(parent) {
                context.append_child(b, node)?;
            }
        }
        let index = context.document().node_index(b);
        Ok(CommandOutput::Selection(Selection::new(
            parent,
            index,
            parent,
            index + 1,
            selection.direction(),
        )))
    });
    registry
}

#[test]
fn test_editor_round_trip() -> anyhow::Result<()> {
    init_tracing();
    let mut editor = Editor::from_markup("<p>hello world</p>", bold_registry(), EditingConfig::default())?;
    let p = first(editor.document());
    let text = editor.document().first_child(p).unwrap();
    let selection = Selection::new(text, 6, text, 11, Default::default());
    editor.set_selection(selection);

    editor.exec_command("bold", None, None)?;
    assert_eq!(editor.to_html(), "<p>hello <b>world</b></p>");
    assert_eq!(editor.selection(), Selection::new(p, 1, p, 2, Default::default()));
    assert_eq!(editor.undo_stack().undo_description(), Some("bold"));

    assert!(editor.undo()?);
    assert_eq!(editor.to_html(), "<p>hello world</p>");
    assert_eq!(editor.selection(), selection);
    assert_eq!(editor.document().child_count(p), 1);

    assert!(editor.redo()?);
    assert_eq!(editor.to_html(), "<p>hello <b>world</b></p>");
    Ok(())
}

#[test]
fn test_editor_undoes_partial_failed_command() -> anyhow::Result<()> {
    init_tracing();
    let mut registry = CommandRegistry::new();
    registry.register("appendThenFail", |context, _, _| {
        let root = context.document().root();
        let text = context.create_text_node("partial");
        context.append_child(root, text)?;
        Err(EditingError::invalid_argument("nothing left to do"))
    });
    let mut editor = Editor::from_markup("<p></p>", registry, EditingConfig::default())?;

    assert!(editor.exec_command("appendThenFail", None, None).is_err());
    assert_eq!(editor.to_html(), "<p></p>partial");
    assert_eq!(editor.failed_record().map(|record| record.operations.len()), Some(1));
    assert!(editor.can_undo());

    assert!(editor.undo()?);
    assert_eq!(editor.to_html(), "<p></p>");
    assert!(!editor.can_undo());
    Ok(())
}

#[test]
fn test_editor_with_config_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), r#"{ "undoLimit": 1 }"#)?;

    let mut registry = CommandRegistry::new();
    registry.register("append", |context, _, value| {
        let root = context.document().root();
        let text = context.create_text_node(value);
        context.append_child(root, text)?;
        Ok(CommandOutput::Handled(true))
    });
    let mut editor = Editor::open("", registry, dir.path())?;
    assert_eq!(editor.config().undo_limit, 1);

    editor.exec_command("append", None, Some("a"))?;
    editor.exec_command("append", None, Some("b"))?;
    assert_eq!(editor.to_html(), "ab");
    assert_eq!(editor.undo_stack().undo_levels(), 1);

    assert!(editor.undo()?);
    assert!(!editor.undo()?);
    assert_eq!(editor.to_html(), "a");
    Ok(())
}
