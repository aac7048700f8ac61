use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::{Deserialize, Serialize};
use serde_kv3::{from_str, parse, to_string, Document, Flags, Kv3Map, Value};

#[derive(Serialize, Deserialize, Clone)]
struct Emitter {
    name: String,
    rate: f64,
    looping: bool,
    material: String,
}

#[derive(Serialize, Deserialize, Clone)]
struct ParticleSystem {
    id: u32,
    bounds: Bounds,
    emitters: Vec<Emitter>,
    tags: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone)]
struct Bounds {
    min: Vec<f64>,
    max: Vec<f64>,
}

fn emitters(count: u32) -> Vec<Emitter> {
    (0..count)
        .map(|i| Emitter {
            name: format!("emitter_{}", i),
            rate: 10.5 + f64::from(i),
            looping: i % 2 == 0,
            material: format!("materials/particle/spark_{}.vmat", i),
        })
        .collect()
}

fn particle_system() -> ParticleSystem {
    ParticleSystem {
        id: 42,
        bounds: Bounds {
            min: vec![-16.0, -16.0, 0.0],
            max: vec![16.0, 16.0, 64.0],
        },
        emitters: emitters(4),
        tags: vec!["fire".to_string(), "looping".to_string()],
    }
}

fn flagged_document(count: usize) -> Document {
    let mut root = Kv3Map::new();
    for i in 0..count {
        let mut entry = Kv3Map::new();
        entry.insert(
            "model".to_string(),
            Value::resource(format!("models/props/crate_{}.vmdl", i)),
        );
        entry.insert(
            "sound".to_string(),
            Value::flagged(Value::from(format!("crate.break_{}", i)), Flags::SOUNDEVENT),
        );
        entry.insert(
            "notes".to_string(),
            Value::multiline(format!("crate {}\nspawned by the map", i)),
        );
        root.insert(format!("prop_{}", i), Value::Object(entry));
    }
    Document::new(Value::Object(root))
}

fn benchmark_serialize_struct(c: &mut Criterion) {
    let system = particle_system();

    c.bench_function("serialize_nested_struct", |b| {
        b.iter(|| to_string(black_box(&system)))
    });
}

fn benchmark_deserialize_struct(c: &mut Criterion) {
    let text = to_string(&particle_system()).unwrap();

    c.bench_function("deserialize_nested_struct", |b| {
        b.iter(|| from_str::<ParticleSystem>(black_box(&text)))
    });
}

fn benchmark_serialize_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize_array");

    for size in [10, 50, 100, 500].iter() {
        let list = emitters(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| to_string(black_box(&list)))
        });
    }
    group.finish();
}

fn benchmark_deserialize_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("deserialize_array");

    for size in [10, 50, 100, 500].iter() {
        let text = to_string(&emitters(*size)).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| from_str::<Vec<Emitter>>(black_box(text)))
        });
    }
    group.finish();
}

fn benchmark_document(c: &mut Criterion) {
    let mut group = c.benchmark_group("document");

    for size in [10, 100, 1000].iter() {
        let doc = flagged_document(*size);
        let text = doc.to_kv3_string().unwrap();

        group.bench_with_input(BenchmarkId::new("write", size), &doc, |b, doc| {
            b.iter(|| black_box(doc).to_kv3_string())
        });
        group.bench_with_input(BenchmarkId::new("parse", size), &text, |b, text| {
            b.iter(|| parse(black_box(text)))
        });
    }
    group.finish();
}

fn benchmark_primitive_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("primitive_array");

    let numbers: Vec<i32> = (0..100).collect();
    let floats: Vec<f64> = (0..100).map(|i| i as f64 * 1.5).collect();

    group.bench_function("serialize_integers", |b| {
        b.iter(|| to_string(black_box(&numbers)))
    });

    group.bench_function("serialize_floats", |b| {
        b.iter(|| to_string(black_box(&floats)))
    });

    let numbers_kv3 = to_string(&numbers).unwrap();
    let floats_kv3 = to_string(&floats).unwrap();

    group.bench_function("deserialize_integers", |b| {
        b.iter(|| from_str::<Vec<i32>>(black_box(&numbers_kv3)))
    });

    group.bench_function("deserialize_floats", |b| {
        b.iter(|| from_str::<Vec<f64>>(black_box(&floats_kv3)))
    });

    group.finish();
}

fn benchmark_comparison_with_json(c: &mut Criterion) {
    let system = particle_system();
    let mut group = c.benchmark_group("format_comparison");

    group.bench_function("kv3_serialize", |b| {
        b.iter(|| to_string(black_box(&system)))
    });

    group.bench_function("json_serialize", |b| {
        b.iter(|| serde_json::to_string(black_box(&system)))
    });

    let kv3_text = to_string(&system).unwrap();
    let json_text = serde_json::to_string(&system).unwrap();

    group.bench_function("kv3_deserialize", |b| {
        b.iter(|| from_str::<ParticleSystem>(black_box(&kv3_text)))
    });

    group.bench_function("json_deserialize", |b| {
        b.iter(|| serde_json::from_str::<ParticleSystem>(black_box(&json_text)))
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_serialize_struct,
    benchmark_deserialize_struct,
    benchmark_serialize_array,
    benchmark_deserialize_array,
    benchmark_document,
    benchmark_primitive_array,
    benchmark_comparison_with_json
);
criterion_main!(benches);
