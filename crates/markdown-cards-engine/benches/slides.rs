use criterion::{Criterion, black_box, criterion_group, criterion_main};
use markdown_cards_engine::editing::{Cmd, Document, MarkupKind};
use markdown_cards_engine::slides::{render_slides, segment};
mod common;

fn bench_segment(c: &mut Criterion) {
    let mut group = c.benchmark_group("segment");
    group.sample_size(20);

    let content = common::generate_card_content(200);
    group.bench_function("200_cards", |b| {
        b.iter(|| black_box(segment(black_box(&content))));
    });

    group.finish();
}

fn bench_render_slides(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_slides");
    group.sample_size(20);

    let content = common::generate_card_content(20);
    group.bench_function("20_cards", |b| {
        b.iter(|| black_box(render_slides(black_box(&content))));
    });

    let hostile = common::generate_hostile_content(20);
    group.bench_function("20_hostile_cards", |b| {
        b.iter(|| black_box(render_slides(black_box(&hostile))));
    });

    group.finish();
}

fn bench_edit_then_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("edit_then_render");
    group.sample_size(20);

    let content = common::generate_card_content(20);
    group.bench_function("bold_at_middle", |b| {
        b.iter(|| {
            let mut doc = Document::from_text(&content);
            doc.set_caret(content.len() / 2);
            doc.apply(Cmd::InsertMarkup {
                kind: MarkupKind::Bold,
                placeholder: None,
            });
            black_box(render_slides(&doc.text()));
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_segment,
    bench_render_slides,
    bench_edit_then_render
);
criterion_main!(benches);
