use criterion::{Criterion, black_box, criterion_group, criterion_main};
use shapedoc::extractor::Extractor;
use shapedoc::render::render;
use std::path::Path;

const CSHARP: &str = r#"
namespace Acme.Orders;

using System;
using System.Collections.Generic;

/// <summary>An order line.</summary>
public sealed class OrderLine : Entity, IComparable<OrderLine>
{
    private static int _count;
    public string Sku { get; set; }
    public decimal Price { get; init; } = 0m;

    public OrderLine(string sku, decimal price = 1.5m) { Sku = sku; Price = price; }

    /// <summary>Compares by price.</summary>
    public int CompareTo(OrderLine other) => Price.CompareTo(other.Price);

    protected virtual IEnumerable<string> Tags(params string[] extra) { yield break; }
}
"#;

const TYPESCRIPT: &str = r#"
import { Injectable } from '@angular/core';
import type { Order } from './order';

/** Loads orders. */
export class OrderService implements Loader<Order> {
  private cache = new Map<string, Order>();
  constructor(private readonly http: HttpClient) {}
  async load(id: string, force = false): Promise<Order> {
    return this.http.get(`/orders/${id}`);
  }
}

export const total = (orders: Order[]): number => orders.length;
"#;

const PYTHON: &str = r#"
"""Order helpers."""
from dataclasses import dataclass

@dataclass
class Order:
    """An order."""
    sku: str
    qty: int = 1

    def total(self, price: float) -> float:
        return self.qty * price

def parse(raw: str, *, strict: bool = False) -> Order:
    return Order(raw)
"#;

fn repeated(source: &str, times: usize) -> String {
    source.repeat(times)
}

fn bench_languages(c: &mut Criterion) {
    let mut extractor = Extractor::new().unwrap();
    let mut group = c.benchmark_group("extract");
    for (path, source) in [
        ("OrderLine.cs", CSHARP),
        ("order.service.ts", TYPESCRIPT),
        ("orders.py", PYTHON),
    ] {
        group.bench_function(path, |b| {
            b.iter(|| {
                extractor
                    .extract(black_box(source), Path::new(path))
                    .unwrap()
            });
        });
    }
    group.finish();
}

fn bench_large_file(c: &mut Criterion) {
    let mut extractor = Extractor::new().unwrap();
    let source = repeated(CSHARP, 200);
    c.bench_function("extract_and_render_large_csharp", |b| {
        b.iter(|| {
            let record = extractor
                .extract(black_box(&source), Path::new("Large.cs"))
                .unwrap();
            render(&record).unwrap()
        });
    });
}

criterion_group!(benches, bench_languages, bench_large_file);
criterion_main!(benches);
