use super::util::city_dump;
use crate::SCENARIOS;
use criterion::{black_box, criterion_group, BenchmarkId, Criterion};
use geonames_importer::dataset::RecordFormat;
use geonames_importer::tsv::reader::TsvReader;

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("TsvReader::rows");
    for num_elements in SCENARIOS {
        let buffer = city_dump(num_elements);
        group.throughput(criterion::Throughput::Elements(num_elements));
        group.bench_with_input(
            BenchmarkId::from_parameter(num_elements), &buffer,
            |b, buffer| b.iter(|| {
                let mut reader = TsvReader::from_reader(black_box(buffer.as_slice()), &RecordFormat::default());
                reader.rows().filter(Result::is_ok).count()
            }),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_parsing);
