//! Criterion benchmarks for ApeWatch hot paths.
//!
//! Benchmarks:
//! 1. Ranking page parse (full-size page)
//! 2. Sorted view over a store, per field

use apewatch_core::config::RankingConfig;
use apewatch_core::data::{ApeWisdomParser, RankingPageParser};
use apewatch_core::domain::build;
use apewatch_core::{PricePoint, PriceSeries, RankingEntry, SortField, SortState, TickerStore};
use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_page(rows: usize) -> String {
    let mut html = String::from("<html><body><table><tbody>");
    for i in 0..rows {
        html.push_str(&format!(
            "<tr><td class=\"td-right\">{}</td>\
             <td class=\"td-right\"><span>T{i}</span></td>\
             <td class=\"td-right\">{},{:03}</td>\
             <td><span class=\"percentage-green\">{}.5%</span></td></tr>",
            i + 1,
            i % 9 + 1,
            i % 1000,
            i % 40
        ));
    }
    html.push_str("</tbody></table></body></html>");
    html
}

fn make_store(n: usize) -> TickerStore {
    let t0 = Utc.with_ymd_and_hms(2024, 6, 3, 13, 30, 0).unwrap();
    let records = (0..n).map(|i| {
        let prices: Vec<PricePoint> = (0..160)
            .map(|j| {
                let price = 50.0 + ((i + j) as f64 * 0.1).sin() * 5.0;
                PricePoint::new(t0 + Duration::minutes(15 * j as i64), price)
            })
            .collect();
        let entry = RankingEntry::new(format!("T{i}"), format!("{}", 10_000 - i), (i % 17) as f64);
        let series = if i % 7 == 0 { None } else { PriceSeries::new(prices) };
        build(entry, series)
    });
    let mut store = TickerStore::new();
    store.replace(records);
    store
}

// ── Benchmarks ───────────────────────────────────────────────────────

fn bench_parse(c: &mut Criterion) {
    let parser = ApeWisdomParser::from_config(&RankingConfig::default()).unwrap();
    let page = make_page(100);
    c.bench_function("parse_ranking_page_100_rows", |b| {
        b.iter(|| parser.parse(black_box(&page)).unwrap())
    });
}

fn bench_sorted_view(c: &mut Criterion) {
    let store = make_store(500);
    let mut group = c.benchmark_group("sorted_view_500");
    for field in SortField::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(field), &field, |b, &field| {
            b.iter(|| store.sorted_view(black_box(SortState::new(field))).len())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_sorted_view);
criterion_main!(benches);
