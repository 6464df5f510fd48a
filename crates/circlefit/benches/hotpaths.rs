use std::f64::consts::PI;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use circlefit::{
    fit_circle, fit_circle_ransac, refine_circle, Circle, RansacConfig, RefineConfig,
};

fn make_circle_points(n: usize, noise: f64, seed: u64) -> Vec<[f64; 2]> {
    let cx = 640.0f64;
    let cy = 512.0f64;
    let r = 57.0f64;
    let mut rng = StdRng::seed_from_u64(seed);

    let mut pts = Vec::with_capacity(n);
    for i in 0..n {
        let t = 2.0 * PI * (i as f64) / (n as f64);
        let x = cx + r * t.cos() + (rng.gen::<f64>() - 0.5) * 2.0 * noise;
        let y = cy + r * t.sin() + (rng.gen::<f64>() - 0.5) * 2.0 * noise;
        pts.push([x, y]);
    }
    pts
}

fn bench_kasa_fit(c: &mut Criterion) {
    let points = make_circle_points(50, 0.35, 12345);
    c.bench_function("kasa_fit_50pts", |b| {
        b.iter(|| {
            let fit = fit_circle(black_box(&points))
                .expect("deterministic fixture should always fit");
            black_box(fit)
        })
    });
}

fn bench_refine(c: &mut Criterion) {
    let points = make_circle_points(50, 0.35, 54321);
    let seed = fit_circle(&points).expect("seed fit");
    let config = RefineConfig::default();
    c.bench_function("refine_50pts", |b| {
        b.iter(|| {
            let fit = refine_circle(black_box(&points), black_box(&seed), black_box(&config))
                .expect("deterministic fixture should always refine");
            black_box(fit)
        })
    });
}

fn bench_ransac(c: &mut Criterion) {
    let mut points = make_circle_points(100, 0.35, 999);
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..25 {
        points.push([rng.gen_range(500.0..800.0), rng.gen_range(400.0..650.0)]);
    }
    let config = RansacConfig {
        max_iters: 500,
        inlier_threshold: 1.5,
        min_inliers: 50,
        seed: 42,
    };
    c.bench_function("ransac_100pts_25outliers", |b| {
        b.iter(|| {
            let fit = fit_circle_ransac(black_box(&points), black_box(&config))
                .expect("deterministic fixture should always fit");
            black_box(fit.circle)
        })
    });
}

fn bench_sample_points(c: &mut Criterion) {
    let circle = Circle {
        cx: 0.0,
        cy: 0.0,
        r: 10.0,
    };
    c.bench_function("sample_points_256", |b| {
        b.iter(|| black_box(circle.sample_points(black_box(256))))
    });
}

criterion_group!(
    hotpaths,
    bench_kasa_fit,
    bench_refine,
    bench_ransac,
    bench_sample_points
);
criterion_main!(hotpaths);
