// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::hint::black_box;

use cardsketch::estimator::Estimator;
use cardsketch::estimator::EstimatorKind;
use cardsketch::hll::HyperLogLogCounter;
use cardsketch::hll::HyperLogLogPlacementCounter;
use criterion::criterion_group;
use criterion::criterion_main;
use criterion::Criterion;

fn make_keys(n: usize) -> Vec<Vec<u8>> {
    (0..n).map(|i| format!("bench-key-{i}").into_bytes()).collect()
}

fn bench_increment(c: &mut Criterion) {
    let keys = make_keys(10_000);
    let mut group = c.benchmark_group("increment");

    for (name, kind, param) in [
        ("linear", EstimatorKind::LinearProbabilistic, 1 << 20),
        ("kmv", EstimatorKind::KMinValues, 1024),
        ("hll", EstimatorKind::HyperLogLog, 14),
        ("dummy", EstimatorKind::Dummy, 0),
    ] {
        group.bench_function(name, |bencher| {
            bencher.iter(|| {
                let mut estimator = Estimator::new(kind, param).unwrap();
                for key in &keys {
                    estimator.increment(black_box(key));
                }
                estimator.count()
            })
        });
    }

    group.bench_function("hll_placement", |bencher| {
        let mut front = vec![0u8; 1 << 15];
        let mut back = vec![0u8; 1 << 15];
        bencher.iter(|| {
            let mut placed =
                HyperLogLogPlacementCounter::new(14, &mut front, &mut back).unwrap();
            for key in &keys {
                placed.increment(black_box(key));
            }
            placed.count()
        })
    });

    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let keys = make_keys(20_000);
    let (left_keys, right_keys) = keys.split_at(10_000);

    let mut left = HyperLogLogCounter::new(14);
    let mut right = HyperLogLogCounter::new(14);
    for key in left_keys {
        left.increment(key);
    }
    for key in right_keys {
        right.increment(key);
    }

    c.bench_function("merge/hll", |bencher| {
        bencher.iter(|| {
            let mut merged = left.clone();
            merged.merge_from(black_box(&right)).unwrap();
            merged.count()
        })
    });
}

criterion_group!(benches, bench_increment, bench_merge);
criterion_main!(benches);
