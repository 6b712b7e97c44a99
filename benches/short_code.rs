//! 短码生成与校验基准测试

use criterion::{Criterion, criterion_group, criterion_main};
use foodgram::utils::{SHORT_CODE_LENGTH, generate_random_code, is_valid_short_code};
use std::hint::black_box;

fn bench_generate_random_code(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/generate_random_code");

    group.bench_function("short_code", |b| {
        b.iter(|| generate_random_code(black_box(SHORT_CODE_LENGTH)));
    });

    // API 令牌长度
    group.bench_function("api_token", |b| {
        b.iter(|| generate_random_code(black_box(40)));
    });

    group.finish();
}

fn bench_is_valid_short_code(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/is_valid_short_code");

    group.bench_function("valid", |b| {
        b.iter(|| {
            assert!(is_valid_short_code(black_box("aB3dE9")));
        });
    });

    group.bench_function("invalid_length", |b| {
        b.iter(|| {
            assert!(!is_valid_short_code(black_box("aB3dE9x")));
        });
    });

    group.bench_function("invalid_chars", |b| {
        b.iter(|| {
            assert!(!is_valid_short_code(black_box("'; --x")));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_generate_random_code, bench_is_valid_short_code);
criterion_main!(benches);
