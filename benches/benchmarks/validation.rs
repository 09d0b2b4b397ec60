use super::util::city_dump;
use crate::SCENARIOS;
use criterion::{black_box, criterion_group, BatchSize, BenchmarkId, Criterion};
use geonames_importer::dataset::{ImportSource, RecordFormat};
use geonames_importer::schema::{Admission, RowValidator};
use geonames_importer::tsv::reader::TsvReader;

fn bench_validation(c: &mut Criterion) {
    let source = ImportSource::cities("AD.zip").expect("Benchmark setup: invalid source");
    let mut group = c.benchmark_group("RowValidator::admit");
    for num_elements in SCENARIOS {
        let buffer = city_dump(num_elements);
        let rows = TsvReader::from_reader(buffer.as_slice(), &RecordFormat::default())
            .rows()
            .collect::<Result<Vec<_>, _>>()
            .expect("Benchmark setup: unable to read rows");
        group.throughput(criterion::Throughput::Elements(num_elements));
        group.bench_with_input(BenchmarkId::from_parameter(num_elements), &rows, |b, rows| {
            b.iter_batched(
                || RowValidator::new(source.schema()),
                |mut validator| {
                    rows.iter()
                        .filter(|row| matches!(validator.admit(black_box(row)), Admission::Record(_)))
                        .count()
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_validation);
