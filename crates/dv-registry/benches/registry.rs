//! Benchmarks for registry construction and lookups.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use dv_registry::DocRegistry;
use dv_spec::{DocSpec, FullDocsSpec, ProductName, ProductSpec, SectionSpec};

/// Build a spec with `sections` sections per product, each holding a tree of
/// the given depth and breadth.
fn create_spec(sections: usize, depth: usize, breadth: usize) -> FullDocsSpec {
    fn create_level(depth: usize, breadth: usize) -> Vec<DocSpec> {
        (0..breadth)
            .map(|i| {
                let slug = format!("doc-{i}");
                if depth == 0 {
                    DocSpec::leaf(slug, format!("Doc {i}"))
                } else {
                    DocSpec::group(slug, format!("Doc {i}"), create_level(depth - 1, breadth))
                }
            })
            .collect()
    }

    ProductName::ALL
        .into_iter()
        .map(|product| {
            let sections = (0..sections)
                .map(|s| {
                    SectionSpec::new(
                        format!("section-{s}"),
                        format!("Section {s}"),
                        create_level(depth, breadth),
                    )
                })
                .collect();
            ProductSpec::new(product, sections)
        })
        .collect()
}

fn bench_registry_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry_build");

    for breadth in [3, 5, 8] {
        let spec = create_spec(4, 3, breadth);
        group.bench_with_input(BenchmarkId::from_parameter(breadth), &spec, |b, spec| {
            b.iter(|| DocRegistry::from_spec(spec.clone()).unwrap());
        });
    }

    group.finish();
}

fn bench_registry_lookup(c: &mut Criterion) {
    let registry = DocRegistry::from_spec(create_spec(4, 3, 5)).unwrap();

    let mut group = c.benchmark_group("registry_lookup");

    group.bench_function("get_by_path_hit", |b| {
        b.iter(|| registry.get_by_path("mirascope/section-1/doc-2/doc-3/doc-4"));
    });

    group.bench_function("get_by_route_trailing_slash", |b| {
        b.iter(|| registry.get_by_route("/docs/mirascope/section-1/doc-2/doc-3/"));
    });

    group.bench_function("get_by_path_miss", |b| {
        b.iter(|| registry.get_by_path("nonexistent/path"));
    });

    group.bench_function("docs_under", |b| {
        b.iter(|| registry.docs_under("lilypad/section-2/doc-0"));
    });

    group.bench_function("docs_in_section", |b| {
        b.iter(|| registry.docs_in_section(ProductName::Mirascope, "section-3"));
    });

    group.finish();
}

criterion_group!(benches, bench_registry_build, bench_registry_lookup);
criterion_main!(benches);
