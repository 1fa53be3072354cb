use criterion::{black_box, criterion_group, criterion_main, Criterion};
use scribe_dom::parse;
use scribe_editing::{BoundaryPoint, EditingContext, Selection, SelectionDirection};

fn paragraphs(count: usize) -> String {
    (0..count)
        .map(|i| format!("<p id=\"p{i}\">Lorem <b>ipsum <i>dolor</i> sit</b> amet {i}</p>"))
        .collect()
}

fn normalize_text_selection(c: &mut Criterion) {
    let source = paragraphs(50);

    c.bench_function("normalize_text_selection", |b| {
        b.iter(|| {
            let mut doc = parse(&source).unwrap();
            let p = doc.first_child(doc.root()).unwrap();
            let text = doc.first_child(p).unwrap();
            let selection = Selection::new(text, 2, text, 4, SelectionDirection::AnchorIsStart);
            let mut context = EditingContext::new(&mut doc, "normalize", selection);
            black_box(context.normalize_selection(black_box(selection)).unwrap())
        })
    });
}

fn split_tree_and_undo(c: &mut Criterion) {
    let source = paragraphs(50);

    c.bench_function("split_tree_and_undo", |b| {
        b.iter(|| {
            let mut doc = parse(&source).unwrap();
            let root = doc.root();
            let p = doc.child_at(root, 25).unwrap();
            let bold = doc.child_at(p, 1).unwrap();
            let italic = doc.child_at(bold, 1).unwrap();
            let selection = Selection::collapsed(BoundaryPoint::new(root, 0));

            let mut context = EditingContext::new(&mut doc, "splitTree", selection);
            context.split_tree(p, italic).unwrap();
            let record = context.finish();
            for operation in record.operations.iter().rev() {
                operation.undo(&mut doc).unwrap();
            }
            black_box(doc)
        })
    });
}

fn consolidate_styles(c: &mut Criterion) {
    let source = paragraphs(10);
    let properties = ["color", "margin", "padding", "font-weight", "display"];

    c.bench_function("consolidate_styles", |b| {
        b.iter(|| {
            let mut doc = parse(&source).unwrap();
            let root = doc.root();
            let selection = Selection::collapsed(BoundaryPoint::new(root, 0));
            let elements: Vec<_> = doc.children(root).collect();

            let mut context = EditingContext::new(&mut doc, "style", selection);
            for element in elements {
                for property in properties {
                    context.set_style(element, property, "inherit").unwrap();
                }
            }
            black_box(context.operations().len())
        })
    });
}

criterion_group!(
    benches,
    normalize_text_selection,
    split_tree_and_undo,
    consolidate_styles
);
criterion_main!(benches);
