use criterion::{Criterion, black_box, criterion_group, criterion_main};

use typk::config::Config;
use typk::session::segment::Segment;
use typk::session::wrap::wrap;
use typk::source::text::LOREM_TEXT;
use typk::ui::layout::{LayoutBuilder, Viewport};

fn long_text(words: usize) -> Vec<char> {
    LOREM_TEXT
        .split(' ')
        .cycle()
        .take(words)
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .collect()
}

fn bench_wrap(c: &mut Criterion) {
    let chars = long_text(2_000);

    c.bench_function("wrap (2000 words, width 40)", |b| {
        b.iter(|| wrap(black_box(&chars), black_box(40)))
    });
}

fn bench_typing_screen(c: &mut Criterion) {
    let config = Config::default();
    let mut segment = Segment::new(long_text(300));
    // Half typed, one mistake in ten, so every style class shows up.
    for i in 0..segment.len() / 2 {
        segment.type_char(|_| i % 10 != 0);
    }

    c.bench_function("typing_screen (300 words, half typed)", |b| {
        b.iter(|| {
            LayoutBuilder::new(&config, Viewport::new(120, 40))
                .typing_screen(black_box(&segment), &[])
        })
    });
}

criterion_group!(benches, bench_wrap, bench_typing_screen);
criterion_main!(benches);
