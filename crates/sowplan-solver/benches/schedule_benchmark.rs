// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use sowplan_model::{config::ScheduleConfig, problem::Problem};
use sowplan_solver::{builder::ScheduleModel, solver::CropScheduler};
use std::hint::black_box;
use std::time::Duration;

fn problem_with_crops(crop_count: usize) -> Problem {
    let cycles = [3u32, 4, 5, 4, 1, 2, 6, 12];
    let water = [300i64, 200, 350, 400, 50, 100, 250, 10];
    let profit = [75_000i64, 60_000, 100_000, 150_000, 5_000, 20_000, 90_000, 200_000];

    let config = ScheduleConfig::new()
        .with_crop_count(crop_count)
        .with_crop_cycle((0..crop_count).map(|i| cycles[i % cycles.len()]).collect())
        .with_water_use((0..crop_count).map(|i| water[i % water.len()]).collect())
        .with_crop_profit((0..crop_count).map(|i| profit[i % profit.len()]).collect())
        .with_off_season(1u32, [2, 3]);
    Problem::from_config(&config).expect("benchmark configuration is valid")
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_model");
    for crops in [4usize, 8, 16] {
        let problem = problem_with_crops(crops);
        group.bench_with_input(BenchmarkId::from_parameter(crops), &problem, |b, p| {
            b.iter(|| ScheduleModel::build(black_box(p)).expect("model builds"))
        });
    }
    group.finish();
}

fn bench_short_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("short_solve");
    group.sample_size(10);
    for crops in [4usize, 8] {
        let problem = problem_with_crops(crops);
        group.bench_with_input(BenchmarkId::from_parameter(crops), &problem, |b, p| {
            b.iter(|| {
                let mut scheduler = CropScheduler::builder()
                    .time_limit(Duration::from_millis(200))
                    .build();
                black_box(scheduler.solve(black_box(p)).ok())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_short_solve);
criterion_main!(benches);
