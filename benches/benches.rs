use criterion::{black_box, criterion_group, criterion_main, Criterion};

use nbview::render::{CodeHighlighter, MarkdownRenderer, Renderer};

const MARKDOWN: &str = "# Title\n\nSome *emphasis*, **bold**, and `code`.\n\n\
* one\n* two\n* three\n\n> a quote\n\n[link](http://example.com)\n";

const PYTHON: &str = "def fib(n):\n    # classic\n    a, b = 0, 1\n\
    for _ in range(n):\n        a, b = b, a + b\n    return a\n\nprint(fib(10))\n";

fn transformers(c: &mut Criterion) {
    c.bench_function("markdown small", |b| {
        let renderer = MarkdownRenderer::new();

        b.iter(|| {
            let mut html = String::new();
            let _ = renderer.render(black_box(MARKDOWN), &mut html);
            html
        });
    });

    c.bench_function("markdown large", |b| {
        let renderer = MarkdownRenderer::new();
        let input = MARKDOWN.repeat(1_000);

        b.iter(|| {
            let mut html = String::new();
            let _ = renderer.render(black_box(&input), &mut html);
            html
        });
    });

    c.bench_function("highlight small", |b| {
        let highlighter = CodeHighlighter::new();

        b.iter(|| {
            let mut html = String::new();
            let _ = highlighter.render(black_box(PYTHON), &mut html);
            html
        });
    });

    c.bench_function("highlight large", |b| {
        let highlighter = CodeHighlighter::new();
        let input = PYTHON.repeat(1_000);

        b.iter(|| {
            let mut html = String::new();
            let _ = highlighter.render(black_box(&input), &mut html);
            html
        });
    });
}

criterion_group!(benches, transformers);
criterion_main!(benches);
