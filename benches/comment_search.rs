#![allow(clippy::unwrap_used)]

use criterion::{criterion_group, criterion_main, Criterion};
use commentq_dom::{Document, MarkupOptions};
use commentq_query::{CommentEngine, CommentQuery};

/// A page with nested sections, each holding a few plain and a few attributed comments
fn generated_markup(sections: usize) -> String {
    let mut markup = String::from("<!DOCTYPE html><html><body>");

    for i in 0..sections {
        markup.push_str(&format!("<section id=\"s{i}\"><!-- section {i} -->"));
        markup.push_str(&format!("<div><!-- widget name=\"w{i}\" index={i} --><p>text {i}</p>"));
        markup.push_str("<ul><li><!-- item --></li><li><!-- item selected --></li></ul>");
        markup.push_str("</div></section>");
    }

    markup.push_str("</body></html>");
    markup
}

fn comment_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("Comment Search");
    group.significance_level(0.1).sample_size(200);

    let markup = generated_markup(1000);
    let document = Document::from_markup_with(&markup, MarkupOptions::default()).unwrap();
    let engine = CommentEngine::default();
    let roots = [document.root_id()];

    group.bench_function("deep collection", |b| {
        let query = CommentQuery::all(true);
        b.iter(|| {
            let _ = engine.query(&document, &roots, &query);
        })
    });

    group.bench_function("attribute search", |b| {
        let query = CommentQuery::by_attribute("name", "w500", true);
        b.iter(|| {
            let _ = engine.query(&document, &roots, &query);
        })
    });

    group.bench_function("text search", |b| {
        let query = CommentQuery::by_text("item selected", true);
        b.iter(|| {
            let _ = engine.query(&document, &roots, &query);
        })
    });

    let sections = document.elements_by_tag_name("section");
    group.bench_function("multiple roots", |b| {
        let query = CommentQuery::all(true);
        b.iter(|| {
            let _ = engine.query(&document, &sections, &query);
        })
    });

    group.finish();
}

criterion_group!(benches, comment_search);
criterion_main!(benches);
