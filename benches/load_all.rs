//! This bench test loads a workspace holding many exams of several problems
//! each.

#![allow(missing_docs)]

use std::path::Path;

use criterion::{Criterion, criterion_group, criterion_main};
use hexam::{ExamName, ExamStore, Problem};
use tempfile::TempDir;

/// Writes 200 exams of 20 problems each
fn preseed_store(path: &Path) {
    let mut store = ExamStore::load_all(path).unwrap();
    for i in 0..200 {
        let name = ExamName::new(format!("Exam {i:03}")).unwrap();
        let index = store.len();
        store.create_exam(name).unwrap();
        for _ in 0..20 {
            store.add_problem(index, Problem::create_default()).unwrap();
        }
    }
}

fn load_all(c: &mut Criterion) {
    let tmp_dir = TempDir::new().unwrap();
    preseed_store(tmp_dir.path());

    c.bench_function("load all", |b| {
        b.iter(|| ExamStore::load_all(tmp_dir.path()).unwrap());
    });
}

criterion_group!(benches, load_all);
criterion_main!(benches);
