use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use stockline_catalog::{
    DefaultPredicateBuilder, EvaluationContext, Filter, StockStatus, StockStatusCondition,
    StockStatusFlag,
};
use stockline_catalog::condition::CustomCondition;
use stockline_core::{ProductId, StockId};

fn index(products: u64, stocks: u32) -> Vec<StockStatus> {
    let mut rows = Vec::with_capacity((products * stocks as u64) as usize);
    for product in 1..=products {
        for stock in 1..=stocks {
            rows.push(StockStatus {
                product_id: ProductId::new(product),
                stock_id: StockId::new(stock),
                status: StockStatusFlag::from_bool((product + stock as u64) % 3 != 0),
                qty: product as f64,
            });
        }
    }
    rows
}

fn bench_build(c: &mut Criterion) {
    let condition = StockStatusCondition::new(Arc::new(DefaultPredicateBuilder::default()));
    let builder = DefaultPredicateBuilder::default();

    c.bench_function("stock_status_condition/build_and_render", |b| {
        b.iter(|| {
            let predicate = condition
                .build(black_box(&Filter::stock_status("neq", Some("1"))))
                .expect("supported operator");
            black_box(predicate.to_sql(&builder))
        })
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let condition = StockStatusCondition::new(Arc::new(DefaultPredicateBuilder::default()));
    let predicate = condition
        .build(&Filter::stock_status("eq", Some("1")))
        .expect("supported operator");
    let ctx = EvaluationContext::new(1);

    let mut group = c.benchmark_group("stock_status_condition/filter_products");
    for products in [100u64, 1_000, 10_000] {
        let rows = index(products, 3);
        group.throughput(Throughput::Elements(products));
        group.bench_with_input(BenchmarkId::from_parameter(products), &rows, |b, rows| {
            b.iter(|| {
                black_box(predicate.filter_products((1..=products).map(ProductId::new), &ctx, rows))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_evaluate);
criterion_main!(benches);
