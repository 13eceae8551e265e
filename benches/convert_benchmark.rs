//! Benchmarks for template conversion.
//!
//! Run with: cargo bench
//!
//! Synthetic templates are built in memory with lopdf and a configurable
//! number of text tabs per page.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lopdf::{dictionary, Document, Object};
use serde_json::json;

/// Creates a blank Letter-size PDF with the given number of pages.
fn create_test_pdf(page_count: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let kids: Vec<Object> = (0..page_count)
        .map(|_| {
            Object::Reference(doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => Object::Reference(pages_id),
            }))
        })
        .collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(page_count as i64),
            "MediaBox" => [0, 0, 612, 792].iter().map(|&v| Object::Integer(v)).collect::<Vec<_>>(),
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Creates a template with `documents` documents of `pages` pages, each
/// page carrying `tabs_per_page` text tabs.
fn create_template(documents: usize, pages: usize, tabs_per_page: usize) -> String {
    let pdf = STANDARD.encode(create_test_pdf(pages));
    let docs: Vec<_> = (1..=documents)
        .map(|id| json!({ "documentId": id.to_string(), "documentBase64": pdf }))
        .collect();
    let tabs: Vec<_> = (1..=documents)
        .flat_map(|doc| (1..=pages).map(move |page| (doc, page)))
        .flat_map(|(doc, page)| {
            (0..tabs_per_page).map(move |i| {
                json!({
                    "tabLabel": format!("Field {}", i),
                    "documentId": doc.to_string(),
                    "pageNumber": page.to_string(),
                    "xPosition": "72",
                    "yPosition": (72 + i * 30).to_string(),
                })
            })
        })
        .collect();

    json!({
        "documents": docs,
        "recipients": { "signers": [{ "recipientId": "1", "tabs": { "textTabs": tabs } }] }
    })
    .to_string()
}

/// Benchmark template parsing and classification.
fn bench_inspect(c: &mut Criterion) {
    let json = create_template(1, 10, 10);
    let converter = docuform::TemplateConverter::default();

    c.bench_function("inspect_100_tabs", |b| {
        b.iter(|| converter.inspect_json(black_box(&json)).unwrap());
    });
}

/// Benchmark full conversion at various sizes.
fn bench_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("conversion");

    for documents in [1, 4].iter() {
        let json = create_template(*documents, 5, 5);

        group.bench_function(format!("{}_documents_parallel", documents), |b| {
            b.iter(|| docuform::convert_json(black_box(&json)).unwrap());
        });

        group.bench_function(format!("{}_documents_sequential", documents), |b| {
            b.iter(|| {
                docuform::Docuform::new()
                    .sequential()
                    .convert_json(black_box(&json))
                    .unwrap()
            });
        });
    }

    group.finish();
}

/// Benchmark field name generation.
fn bench_field_names(c: &mut Criterion) {
    c.bench_function("field_name_generation", |b| {
        let mut namer = docuform::fields::FieldNamer::new();
        b.iter(|| namer.generate(black_box("Signature Date (mm/dd/yyyy)")));
    });
}

criterion_group!(benches, bench_inspect, bench_conversion, bench_field_names);
criterion_main!(benches);
