use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rootsolve::{polynomial, Bisection, NewtonRaphson, Secant, Solver};

criterion_main!(micro_benches, solver_benches);
criterion_group!(micro_benches, horner);

pub fn horner(c: &mut Criterion) {
    let mut group = c.benchmark_group("horner");
    for n in [2usize, 4, 8, 16, 32, 64] {
        let coeffs: Vec<f64> = (0..=n).map(|i| (i as f64).sin() + 1.5).collect();
        group.bench_function(BenchmarkId::from_parameter(n), |b| {
            b.iter(|| black_box(polynomial::horner(black_box(&coeffs), black_box(0.9))))
        });
    }
    group.finish();
}

criterion_group!(solver_benches, cubic_root);

pub fn cubic_root(c: &mut Criterion) {
    fn f(x: f64) -> f64 {
        x * x * x - x - 1.0
    }

    let mut group = c.benchmark_group("cubic root");
    group.bench_function("bisection", |b| {
        b.iter(|| black_box(Bisection::new(f, 1.0, 2.0).unwrap().solve()))
    });
    group.bench_function("secant", |b| {
        b.iter(|| black_box(Secant::new(f, 1.0, 2.0).solve()))
    });
    group.bench_function("newton", |b| {
        b.iter(|| {
            black_box(
                NewtonRaphson::new(f, 1.5)
                    .with_derivative(|x| 3.0 * x * x - 1.0)
                    .solve(),
            )
        })
    });
    group.finish();
}
