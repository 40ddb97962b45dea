use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use mailcard::export::{render_card_body, CardOptions};
use mailcard::model::mail::MailItem;
use mailcard::parser::html::to_markdown;

fn sample_html() -> String {
    let section = r#"<h2>Update</h2>
<p>Hello <b>team</b>, see the <a href="https://example.com/report">report</a> &amp; notes.</p>
<ol><li>First &ndash; item</li><li>Second item</li></ol>
<ul><li>alpha</li><li>beta</li></ul>
<blockquote>quoted
line</blockquote><pre>let x = 1;</pre>"#;
    section.repeat(50)
}

fn sample_body() -> String {
    let mut body = String::new();
    for i in 0..200 {
        body.push_str(&format!("Line {i} of the message body\n"));
        if i % 20 == 0 {
            body.push_str("> quoted reply line\n> another one\n\n");
        }
    }
    body.push_str("\n-- \nJane Doe\nExample Corp");
    body
}

fn bench_to_markdown(c: &mut Criterion) {
    let html = sample_html();
    c.bench_function("html_to_markdown", |b| b.iter(|| to_markdown(black_box(&html))));
}

fn bench_render_card(c: &mut Criterion) {
    let body = sample_body();
    let item = MailItem {
        author: Some("Jane Doe <jane@example.com>".into()),
        recipients: vec!["John <john@example.com>".into()],
        ..MailItem::new("bench", "Benchmark")
    };
    let options = CardOptions::default();
    c.bench_function("render_card_body", |b| {
        b.iter(|| render_card_body(black_box(&body), &item, &options))
    });
}

criterion_group!(benches, bench_to_markdown, bench_render_card);
criterion_main!(benches);
