/*!
# Parser Benchmarks

Benchmarks for query decoding, coercion and hashing.

## Usage

```bash
# Run all benchmarks
cargo bench --bench parser_benchmarks

# Run a specific group
cargo bench --bench parser_benchmarks -- "Parsing"

# Quick run with fewer samples
cargo bench --bench parser_benchmarks -- --quick
```

HTML reports are generated in `target/criterion/report/index.html`.
*/

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use querycrate::{RequestCriteria, ValueKind};
use std::hint::black_box;

const SIMPLE: &str = "limit=10&page=2";
const TYPICAL: &str = "phrase=red+shoes&sort=-price,title&filter[status]=active&filter[size][in]=41,42,43&limit=20&offset=40";
const NESTED: &str = "filter[a][gte]=1&filter[a][lte]=9&filter[b][]=x&filter[b][]=y&filter[c][like]=%25foo%25&tags[]=1&tags[]=2&tags[]=3&meta[x][y][z]=deep";

fn benchmark_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("Parsing");
    for (name, query) in [("simple", SIMPLE), ("typical", TYPICAL), ("nested", NESTED)] {
        group.bench_with_input(BenchmarkId::from_parameter(name), query, |b, query| {
            b.iter(|| RequestCriteria::parse(black_box(query)));
        });
    }

    let long: String = (0..500)
        .map(|i| format!("p{i}={i}"))
        .collect::<Vec<_>>()
        .join("&");
    group.bench_function("500 params", |b| {
        b.iter(|| RequestCriteria::parse(black_box(&long)));
    });
    group.finish();
}

fn benchmark_coercion(c: &mut Criterion) {
    let criteria = RequestCriteria::parse("ids=1,2,3,4,5,6,7,8,9,10&flag=TRUE&n=12abc")
        .expect("benchmark query parses");
    let mut group = c.benchmark_group("Coercion");
    for (name, kind) in [
        ("ids", ValueKind::Array),
        ("flag", ValueKind::Boolean),
        ("n", ValueKind::Integer),
    ] {
        group.bench_function(format!("{name} as {kind}"), |b| {
            b.iter(|| criteria.coerce_query_param(black_box(name), kind));
        });
    }
    group.finish();
}

fn benchmark_hashing(c: &mut Criterion) {
    let criteria = RequestCriteria::parse(NESTED).expect("benchmark query parses");
    let mut group = c.benchmark_group("Hashing");
    group.bench_function("query_hash", |b| b.iter(|| criteria.query_hash()));
    group.bench_function("canonical_query_hash", |b| {
        b.iter(|| criteria.canonical_query_hash());
    });
    group.finish();
}

criterion_group!(
    benches,
    benchmark_parsing,
    benchmark_coercion,
    benchmark_hashing
);
criterion_main!(benches);
