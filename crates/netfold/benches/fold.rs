use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use netfold::{convert, sanitize, ListTags};

const SIMPLE: &str = "<interface><name>eth0</name><mtu>1500</mtu></interface>";
const SHOW_XML: &str = include_str!("../tests/fixtures/show-xml.xml");

fn bench_sanitize(c: &mut Criterion) {
    c.bench_function("netfold_sanitize", |b| b.iter(|| sanitize(black_box(SHOW_XML))));
}

fn bench_simple(c: &mut Criterion) {
    let tags = ListTags::new();
    c.bench_function("netfold_convert_simple", |b| {
        b.iter(|| convert(black_box(SIMPLE), &tags))
    });
}

fn bench_show_xml(c: &mut Criterion) {
    let tags: ListTags = ["addresses"].into_iter().collect();
    c.bench_function("netfold_convert_show_xml", |b| {
        b.iter(|| convert(black_box(SHOW_XML), &tags))
    });
}

criterion_group!(benches, bench_sanitize, bench_simple, bench_show_xml);
criterion_main!(benches);
