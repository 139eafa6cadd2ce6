use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use delearner_core::patch::{PatchTarget, apply_patch, sanitize_snippet};
use delearner_core::store::{CodeFile, FileStore};

fn source(lines: usize) -> String {
    (0..lines).map(|i| format!("    let value_{} = {};", i, i)).collect::<Vec<_>>().join("\n")
}

fn store(files: usize, lines: usize) -> FileStore {
    let content = source(lines);
    FileStore::with_files(
        (0..files).map(|i| CodeFile::new(format!("src/file_{}.rs", i), content.clone())).collect(),
    )
    .unwrap()
}

fn bench_sanitize(c: &mut Criterion) {
    let fenced = format!("```rust\n{}\n```", source(20));

    c.bench_function("sanitize_fenced_snippet", |b| {
        b.iter(|| sanitize_snippet(black_box(&fenced)));
    });

    c.bench_function("sanitize_bare_snippet", |b| {
        let bare = source(20);
        b.iter(|| sanitize_snippet(black_box(&bare)));
    });
}

fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_patch");

    for lines in [100, 1_000, 10_000] {
        let store = store(1, lines);
        let target = PatchTarget::new("src/file_0.rs", lines / 2, "```rust\nlet a = 1;\nlet b = 2;\n```");

        group.bench_with_input(BenchmarkId::new("lines", lines), &lines, |b, _| {
            b.iter(|| apply_patch(black_box(&store), black_box(&target)).unwrap());
        });
    }

    // other files are shared, so store size should barely matter
    for files in [1, 50, 500] {
        let store = store(files, 200);
        let target = PatchTarget::new("src/file_0.rs", 100, "let patched = true;");

        group.bench_with_input(BenchmarkId::new("files", files), &files, |b, _| {
            b.iter(|| apply_patch(black_box(&store), black_box(&target)).unwrap());
        });
    }

    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    c.bench_function("store_clone_500_files", |b| {
        let store = store(500, 200);
        b.iter(|| black_box(store.clone()));
    });
}

criterion_group!(benches, bench_sanitize, bench_apply, bench_snapshot);
criterion_main!(benches);
