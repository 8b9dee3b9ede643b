//! Benchmarks for thread rendering performance.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use kako_renderer::markup::render_markup;
use kako_renderer::{Board, BoardCollection, Post, PostId, Renderer, SiteUri};

fn renderer() -> Renderer {
    let boards: BoardCollection = [Board::new("a").with_archive(true), Board::new("g")]
        .into_iter()
        .collect();
    Renderer::new(boards, SiteUri::new("https://archive.example"))
}

/// Generate a thread where every reply quotes the previous post.
fn generate_thread(replies: u64) -> Vec<Post> {
    (1..=replies + 1)
        .map(|num| {
            let mut comment = String::new();
            if num > 1 {
                comment.push_str(&format!(">>{}\n", num - 1));
            }
            comment.push_str(&format!(
                ">implying\npost {num} with [b]bold[/b] and [spoiler]hidden[/spoiler] text\n\
                 see >>>/g/{num} and https://example.org/{num}\n[code]a\nb[/code]"
            ));
            Post::new("a", 1, PostId::canonical(num)).with_comment(comment)
        })
        .collect()
}

fn bench_render_single(c: &mut Criterion) {
    let renderer = renderer();
    let post = Post::new("a", 1, PostId::canonical(1))
        .with_comment(">implying\n[b]hello[/b] https://example.org");

    c.bench_function("render_single_post", |b| {
        b.iter(|| renderer.pass().render(&post));
    });
}

fn bench_render_threads(c: &mut Criterion) {
    let renderer = renderer();
    let mut group = c.benchmark_group("render_thread");

    for replies in [10, 100, 500] {
        let posts = generate_thread(replies);
        let size: usize = posts.iter().filter_map(|p| p.comment.as_ref()).map(String::len).sum();

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("replies", replies), &posts, |b, posts| {
            b.iter(|| {
                let mut pass = renderer.pass();
                for post in posts {
                    pass.register(post);
                }
                for post in posts {
                    let _ = pass.render(post);
                }
            });
        });
    }

    group.finish();
}

fn bench_markup_nesting(c: &mut Criterion) {
    let mut group = c.benchmark_group("markup_nesting");

    for depth in [4, 64, 4096] {
        let input = format!("{}x{}", "[b]".repeat(depth), "[/b]".repeat(depth));
        group.bench_with_input(BenchmarkId::new("depth", depth), &input, |b, input| {
            b.iter(|| render_markup(input, false));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_render_single,
    bench_render_threads,
    bench_markup_nesting
);
criterion_main!(benches);
