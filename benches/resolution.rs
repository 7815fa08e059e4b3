//! Benchmarks for forest resolution and configuration selection.
//!
//! Repository graphs are generated in memory: `layers` rows of `width`
//! repositories, where every tag of a repository requires every repository of
//! the next row. Memoization keeps resolution linear in the number of
//! repositories even though the number of paths grows exponentially.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use semver::Version;

use treeconf::configuration::best_configuration;
use treeconf::forest::ForestResolver;
use treeconf::memory::MemoryBackend;
use treeconf::requirements::parse_requirements;
use treeconf::settings::Settings;
use treeconf::version::best_match;

fn repo_name(layer: usize, index: usize) -> String {
    format!("repo{}_{}", layer, index)
}

/// Creates a layered graph rooted at `root` with `tags` tags per repository.
fn create_graph(layers: usize, width: usize, tags: usize) -> MemoryBackend {
    let backend = MemoryBackend::new();
    backend.add_repo("base", "main").unwrap();
    backend.add_repo("root", "main").unwrap();

    let requirements_for = |layer: usize| -> String {
        (0..width)
            .map(|index| format!("{},1.0.0\n", repo_name(layer, index)))
            .collect()
    };

    for minor in 0..tags {
        backend
            .add_tag(
                "root",
                &format!("1.{}.0", minor),
                &[("children.txt", &requirements_for(0))],
            )
            .unwrap();
    }

    for layer in 0..layers {
        let children = if layer + 1 < layers {
            requirements_for(layer + 1)
        } else {
            String::new()
        };
        for index in 0..width {
            let repo = repo_name(layer, index);
            backend.add_repo(&repo, "main").unwrap();
            for minor in 0..tags {
                backend
                    .add_tag(
                        &repo,
                        &format!("1.{}.0", minor),
                        &[("children.txt", &children)],
                    )
                    .unwrap();
            }
        }
    }

    backend
}

fn bench_best_configuration(c: &mut Criterion) {
    let mut group = c.benchmark_group("best_configuration");

    for (layers, width) in [(2, 2), (4, 3), (6, 4)] {
        let backend = create_graph(layers, width, 5);
        let settings = Settings::new("/srv", "base", "root");

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", layers, width)),
            &backend,
            |b, backend| {
                b.iter(|| {
                    let mut resolver =
                        ForestResolver::new(backend, settings.requirements_file.as_str());
                    black_box(best_configuration(&mut resolver, &settings).unwrap())
                })
            },
        );
    }

    group.finish();
}

fn bench_best_match(c: &mut Criterion) {
    let available: Vec<Version> = (0..10)
        .flat_map(|major| (0..50).map(move |minor| Version::new(major, minor, 0)))
        .collect();
    let required = Version::new(5, 20, 0);

    c.bench_function("best_match_500_versions", |b| {
        b.iter(|| black_box(best_match(black_box(&required), available.iter())))
    });
}

fn bench_parse_requirements(c: &mut Criterion) {
    let content: String = (0..200)
        .map(|i| format!("# dependency {}\nrepo{},{}.{}.0\n", i, i, i % 7, i % 13))
        .collect();

    c.bench_function("parse_requirements_200_lines", |b| {
        b.iter(|| black_box(parse_requirements(black_box(&content))))
    });
}

criterion_group!(
    benches,
    bench_best_configuration,
    bench_best_match,
    bench_parse_requirements
);
criterion_main!(benches);
