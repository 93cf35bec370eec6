//! Performance benchmarks for the payroll import engine.
//!
//! Covers the map → normalize → validate path that runs for every import,
//! and the full `/imports` round trip:
//! - Field mapping of a typical 12-column sheet
//! - Prepare 100 rows
//! - Prepare 1000 rows
//! - `/imports` with 100 rows
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use payroll_import::api::{AppState, create_router};
use payroll_import::batch::InMemorySink;
use payroll_import::catalog::{ComponentCatalog, StaticComponentSource};
use payroll_import::config::ConfigLoader;
use payroll_import::mapping::{MappingOverrides, map_fields};
use payroll_import::models::RawRecord;
use payroll_import::pipeline::PayrollImporter;

use axum::{body::Body, http::Request};
use tower::ServiceExt;

const CONFIG_DIR: &str = "./config/payroll_import";

fn load_config() -> ConfigLoader {
    ConfigLoader::load(CONFIG_DIR).expect("Failed to load config")
}

/// Creates `count` rows of a regular-staff salary sheet.
fn create_rows(count: usize) -> Vec<RawRecord> {
    (0..count)
        .map(|i| {
            let basic = 4000 + (i % 50) as i64 * 10;
            let pension = 320;
            let tax = 45;
            let value = serde_json::json!({
                "工号": format!("E{:05}", i),
                "姓名": "张三",
                "身份证号": format!("110101199001{:06}", i),
                "人员身份": if i % 4 == 0 { "聘用" } else { "在编" },
                "基本工资": basic,
                "岗位工资": "1,200",
                "绩效奖金": 0,
                "应发合计": basic + 1200,
                "养老保险": pension,
                "失业保险": 0,
                "个人所得税": tax,
                "实发合计": basic + 1200 - pension - tax,
                "备注": ""
            });
            match value {
                serde_json::Value::Object(map) => map,
                _ => unreachable!(),
            }
        })
        .collect()
}

fn importer() -> PayrollImporter<StaticComponentSource, InMemorySink> {
    let config = load_config();
    PayrollImporter::new(
        StaticComponentSource::new(config.components().to_vec()),
        InMemorySink::new(),
        config.import_config().clone(),
    )
}

/// Benchmark: resolving the columns of a typical sheet.
fn bench_map_fields(c: &mut Criterion) {
    let config = load_config();
    let catalog = ComponentCatalog::new(config.components().to_vec());
    let fields: Vec<String> = create_rows(1)[0].keys().cloned().collect();

    c.bench_function("map_fields", |b| {
        b.iter(|| black_box(map_fields(black_box(&fields), &catalog)))
    });
}

/// Benchmark: prepare at increasing batch sizes.
fn bench_prepare(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let importer = importer();
    let overrides = MappingOverrides::new();

    let mut group = c.benchmark_group("prepare");
    for count in [100usize, 1000] {
        let rows = create_rows(count);
        group.throughput(Throughput::Elements(count as u64));
        if count >= 1000 {
            group.sample_size(10);
        }
        group.bench_with_input(BenchmarkId::new("rows", count), &rows, |b, rows| {
            b.to_async(&rt)
                .iter(|| async { black_box(importer.prepare(rows, &overrides).await) })
        });
    }
    group.finish();
}

/// Benchmark: `/imports` round trip with 100 rows.
fn bench_import_endpoint(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let config = load_config();
    let rows = create_rows(100);

    let mut group = c.benchmark_group("imports_endpoint");
    group.throughput(Throughput::Elements(100));

    group.bench_function("rows_100", |b| {
        b.to_async(&rt).iter(|| async {
            // Fresh state so every iteration inserts instead of conflicting.
            let state = AppState::new(
                Arc::new(StaticComponentSource::new(config.components().to_vec())),
                Arc::new(InMemorySink::new()),
                config.import_config().clone(),
            );
            let body = serde_json::json!({
                "records": &rows,
                "period_id": "2026-01",
                "overwrite_mode": false
            })
            .to_string();
            let response = create_router(state)
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/imports")
                        .header("Content-Type", "application/json")
                        .body(Body::from(body))
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_map_fields, bench_prepare, bench_import_endpoint);
criterion_main!(benches);
