//! Benchmarks for actionsmith core operations.
//!
//! Run with: cargo bench
//!
//! Results include 95% confidence intervals via Criterion.

use actionsmith::core::naming::filename_for;
use actionsmith::core::output::render;
use actionsmith::core::parser::parse_service;
use actionsmith::core::resolver::job_execution_order;
use actionsmith::core::service::{Destination, DestinationGroup, Service, Settings};
use actionsmith::river::River;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn service(groups: usize, destinations: usize) -> Service {
    Service {
        name: "bench-service".to_string(),
        destination_groups: (0..groups)
            .map(|g| DestinationGroup {
                name: format!("stage-{g:02}"),
                destinations: (0..destinations)
                    .map(|d| Destination::new(&format!("cluster-{g:02}-{d:02}")))
                    .collect(),
            })
            .collect(),
    }
}

fn bench_river_build(c: &mut Criterion) {
    let settings = Settings::default();
    let mut group = c.benchmark_group("river_build");
    for n in [1, 5, 20] {
        let svc = service(n, 4);
        group.bench_with_input(BenchmarkId::from_parameter(n), &svc, |b, svc| {
            b.iter(|| {
                let river = River::new(black_box(svc), &settings).unwrap();
                black_box(river);
            });
        });
    }
    group.finish();
}

fn bench_river_render(c: &mut Criterion) {
    let river = River::new(&service(5, 4), &Settings::default()).unwrap();
    c.bench_function("river_render_yaml", |b| {
        b.iter(|| {
            for wf in river.all_workflows() {
                black_box(render(black_box(wf)).unwrap());
            }
        });
    });
}

fn bench_service_parse(c: &mut Criterion) {
    let yaml = r#"
version: "1.0"
service:
  name: payments
  destination_groups:
    - name: staging
      destinations:
        - name: stage-east
          namespace: payments
    - name: production
      destinations:
        - name: prod-east
        - name: prod-west
        - name: prod-eu
settings:
  git_ref: main
"#;
    c.bench_function("service_parse", |b| {
        b.iter(|| {
            black_box(parse_service(black_box(yaml)).unwrap());
        });
    });
}

fn bench_job_order(c: &mut Criterion) {
    let river = River::new(&service(1, 50), &Settings::default()).unwrap();
    let child = &river.child_workflows()[0];
    c.bench_function("job_execution_order_51", |b| {
        b.iter(|| {
            black_box(job_execution_order(black_box(child)).unwrap());
        });
    });
}

fn bench_filename(c: &mut Criterion) {
    c.bench_function("filename_for", |b| {
        b.iter(|| {
            black_box(filename_for(black_box("Deploy: Payments / Prod (EU-West)")));
        });
    });
}

criterion_group!(
    benches,
    bench_river_build,
    bench_river_render,
    bench_service_parse,
    bench_job_order,
    bench_filename
);
criterion_main!(benches);
