use criterion::{black_box, criterion_group, criterion_main, Criterion};
use prerender_parser::parse;

fn synthetic_component(cards: usize) -> String {
    let mut source = String::from("---\nimport Card from \"./Card.astro\";\nconst title = \"Catalog\";\n---\n");
    source.push_str("<section class=\"grid gap-4\">\n  <h2>{title}</h2>\n");
    for i in 0..cards {
        source.push_str(&format!(
            "  <article class=\"card p-4\" data-index=\"{i}\"><img src=\"/img/{i}.png\" alt=\"\"><p>Item {i}</p><Card /></article>\n"
        ));
    }
    source.push_str("</section>\n<style>.card { border: 1px solid #ddd; }</style>\n");
    source
}

fn bench_parse(c: &mut Criterion) {
    let small = synthetic_component(10);
    let large = synthetic_component(500);

    c.bench_function("parse_small_component", |b| {
        b.iter(|| parse(black_box(&small)).unwrap())
    });

    c.bench_function("parse_large_component", |b| {
        b.iter(|| parse(black_box(&large)).unwrap())
    });
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
