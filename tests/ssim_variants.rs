use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ssimmap::matrix::mean2d;
use ssimmap::{conv2, ssim, Algorithm, Downsample, Kernel, Matrix, Options, Shape};

fn make_image(width: usize, height: usize, seed: usize) -> Matrix {
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let value = (((x * 13 + seed) ^ (y * 7) ^ (x * y)) % 200) + 20;
            data.push(value as f64);
        }
    }
    Matrix::new(data, width, height).unwrap()
}

fn degrade(a: &Matrix) -> Matrix {
    let width = a.width();
    let data = a
        .data()
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let noise = ((i * 7919) % 23) as f64 - 11.0;
            let shade = (i % width) as f64 * 0.5;
            (v * 0.9 + noise + shade).clamp(0.0, 255.0)
        })
        .collect();
    Matrix::new(data, width, a.height()).unwrap()
}

fn random_matrix(rng: &mut StdRng, width: usize, height: usize) -> Matrix {
    let data = (0..width * height)
        .map(|_| rng.random_range(-1.0..1.0))
        .collect();
    Matrix::new(data, width, height).unwrap()
}

fn options(algorithm: Algorithm) -> Options {
    Options {
        algorithm,
        downsample: Downsample::Off,
        ..Options::default()
    }
}

#[test]
fn identical_images_score_exactly_one_for_every_variant() {
    let a = make_image(40, 30, 0);
    for algorithm in Algorithm::ALL {
        for (k1, k2) in [(0.01, 0.03), (0.0, 0.0)] {
            let opts = Options {
                k1,
                k2,
                ..options(algorithm)
            };
            let out = ssim(&a, &a, &opts).unwrap();
            assert!(
                out.ssim_map.data().iter().all(|&v| v == 1.0),
                "{algorithm} k1={k1} k2={k2}"
            );
            assert_eq!(out.mssim, 1.0, "{algorithm} k1={k1} k2={k2}");
        }
    }
}

#[test]
fn map_sizes_follow_each_variant() {
    let a = make_image(40, 30, 0);
    let b = degrade(&a);
    let expected = [
        (Algorithm::Fast, (20, 30)),
        (Algorithm::Original, (20, 30)),
        (Algorithm::Bezkrovny, (3, 4)),
        (Algorithm::Weber, (20, 30)),
    ];
    for (algorithm, size) in expected {
        let out = ssim(&a, &b, &options(algorithm)).unwrap();
        assert_eq!(out.ssim_map.size(), size, "{algorithm}");
        assert!(out.mssim < 1.0 && out.mssim > 0.0, "{algorithm}: {}", out.mssim);
    }
}

#[test]
fn reference_and_fast_paths_agree() {
    let a = make_image(48, 36, 1);
    let b = degrade(&a);
    let reference = ssim(&a, &b, &options(Algorithm::Original)).unwrap();
    let fast = ssim(&a, &b, &options(Algorithm::Fast)).unwrap();

    assert_eq!(reference.ssim_map.size(), fast.ssim_map.size());
    assert!((reference.mssim - fast.mssim).abs() < 1e-4);
    for (x, y) in reference.ssim_map.data().iter().zip(fast.ssim_map.data()) {
        assert!((x - y).abs() < 1e-4, "{x} vs {y}");
    }
}

#[test]
fn precomputed_mean_matches_recomputed_mean() {
    let a = make_image(33, 27, 2);
    let b = degrade(&a);
    for ws in [3, 8, 11] {
        let opts = Options {
            window_size: ws,
            ..options(Algorithm::Weber)
        };
        let out = ssim(&a, &b, &opts).unwrap();
        assert!((out.mssim - mean2d(&out.ssim_map)).abs() < 1e-12);
    }
}

#[test]
fn gaussian_variants_drop_both_stabilizers_when_one_is_zero() {
    let a = make_image(40, 30, 4);
    let b = degrade(&a);
    let with = |algorithm, k1, k2| {
        let opts = Options {
            k1,
            k2,
            ..options(algorithm)
        };
        ssim(&a, &b, &opts).unwrap().mssim
    };
    for algorithm in [Algorithm::Fast, Algorithm::Original] {
        let uqi = with(algorithm, 0.0, 0.0);
        assert_eq!(with(algorithm, 0.0, 0.03), uqi, "{algorithm}");
        assert_eq!(with(algorithm, 0.01, 0.0), uqi, "{algorithm}");
        assert_ne!(with(algorithm, 0.01, 0.03), uqi, "{algorithm}");
    }
    for algorithm in [Algorithm::Bezkrovny, Algorithm::Weber] {
        let uqi = with(algorithm, 0.0, 0.0);
        assert!(with(algorithm, 0.0, 0.03) > uqi, "{algorithm}");
    }
}

#[test]
fn window_larger_than_downsampled_image_gives_empty_map() {
    let a = make_image(40, 40, 6);
    let b = degrade(&a);
    for algorithm in Algorithm::ALL {
        let opts = Options {
            algorithm,
            max_size: 4,
            downsample: Downsample::Original,
            ..Options::default()
        };
        let out = ssim(&a, &b, &opts).unwrap();
        if algorithm == Algorithm::Bezkrovny {
            assert_eq!(out.ssim_map.size(), (1, 1));
            assert!(out.mssim.is_finite());
        } else {
            assert!(out.ssim_map.is_empty(), "{algorithm}");
            assert!(out.mssim.is_nan(), "{algorithm}");
        }
    }
}

#[test]
fn more_degradation_scores_lower() {
    let a = make_image(40, 40, 3);
    let mild = a.map(|v| v + ((v as usize * 31) % 5) as f64);
    let heavy = a.map(|v| v + ((v as usize * 31) % 61) as f64);
    for algorithm in Algorithm::ALL {
        let m = ssim(&a, &mild, &options(algorithm)).unwrap().mssim;
        let h = ssim(&a, &heavy, &options(algorithm)).unwrap().mssim;
        assert!(m > h, "{algorithm}: {m} <= {h}");
    }
}

#[test]
fn box_path_matches_dense_path() {
    let mut rng = StdRng::seed_from_u64(0x55_1a);
    for (kh, kw) in [(3, 3), (5, 4), (2, 7), (9, 9)] {
        let a = random_matrix(&mut rng, 13, 11);
        let value = rng.random_range(0.1..2.0);
        let kernel = Matrix::filled(kh, kw, value).unwrap();
        for shape in [Shape::Full, Shape::Same, Shape::Valid] {
            let boxed = conv2(&a, Kernel::boxed(&kernel).unwrap(), shape).unwrap();
            let dense = conv2(&a, Kernel::Dense(&kernel), shape).unwrap();
            assert_eq!(boxed.size(), dense.size());
            for (x, y) in boxed.data().iter().zip(dense.data()) {
                let scale = x.abs().max(y.abs()).max(1.0);
                assert!((x - y).abs() <= 1e-9 * scale, "{kh}x{kw} {shape}: {x} vs {y}");
            }
        }
    }
}

#[test]
fn separable_path_matches_dense_outer_product() {
    let mut rng = StdRng::seed_from_u64(7);
    for (kh, kw) in [(3, 3), (2, 5), (4, 1)] {
        let a = random_matrix(&mut rng, 10, 9);
        let column = random_matrix(&mut rng, 1, kh);
        let row = random_matrix(&mut rng, kw, 1);
        let outer: Vec<f64> = column
            .data()
            .iter()
            .flat_map(|&c| row.data().iter().map(move |&r| c * r))
            .collect();
        let outer = Matrix::new(outer, kw, kh).unwrap();
        for shape in [Shape::Full, Shape::Same, Shape::Valid] {
            let sep = conv2(&a, Kernel::separable(&column, &row).unwrap(), shape).unwrap();
            let dense = conv2(&a, Kernel::Dense(&outer), shape).unwrap();
            assert_eq!(sep.size(), dense.size(), "{kh}x{kw} {shape}");
            for (x, y) in sep.data().iter().zip(dense.data()) {
                assert!((x - y).abs() < 1e-12, "{kh}x{kw} {shape}: {x} vs {y}");
            }
        }
    }
}
