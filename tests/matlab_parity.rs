use serde::Deserialize;
use ssimmap::{conv2, filter2, fspecial, imfilter, normpdf, padarray, Kernel, Matrix, Shape};

const CONV2_FIXTURES: &str = include_str!("data/conv2_matlab.json");

#[derive(Debug, Deserialize)]
struct MatrixJson {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl MatrixJson {
    fn to_matrix(&self) -> Matrix {
        Matrix::new(self.data.clone(), self.width, self.height).unwrap()
    }
}

#[derive(Debug, Deserialize)]
struct Conv2Case {
    name: String,
    kernel: MatrixJson,
    #[serde(default)]
    separable: Option<[MatrixJson; 2]>,
    shape: String,
    tolerance: f64,
    expected: MatrixJson,
}

#[derive(Debug, Deserialize)]
struct Conv2Fixtures {
    a: MatrixJson,
    cases: Vec<Conv2Case>,
}

fn assert_close(actual: &Matrix, expected: &Matrix, tolerance: f64, name: &str) {
    assert_eq!(actual.size(), expected.size(), "{name}: size");
    for (i, (x, y)) in actual.data().iter().zip(expected.data()).enumerate() {
        assert!(
            (x - y).abs() <= tolerance,
            "{name}: cell {i} is {x}, expected {y}"
        );
    }
}

#[test]
fn conv2_matches_matlab_fixtures() {
    let fixtures: Conv2Fixtures = serde_json::from_str(CONV2_FIXTURES).unwrap();
    let a = fixtures.a.to_matrix();
    for case in &fixtures.cases {
        let shape: Shape = case.shape.parse().unwrap();
        let kernel = case.kernel.to_matrix();
        let expected = case.expected.to_matrix();

        let dense = conv2(&a, Kernel::Dense(&kernel), shape).unwrap();
        assert_close(&dense, &expected, case.tolerance, &case.name);

        if let Some([first, second]) = &case.separable {
            let (first, second) = (first.to_matrix(), second.to_matrix());
            let sep = conv2(&a, Kernel::separable(&first, &second).unwrap(), shape).unwrap();
            assert_close(&sep, &expected, case.tolerance, &case.name);
        }
    }
}

#[test]
fn valid_shape_with_larger_kernel_is_empty() {
    let a = Matrix::ones(2, 2).unwrap();
    let k = Matrix::ones(3, 3).unwrap();
    let out = conv2(&a, Kernel::Dense(&k), Shape::Valid).unwrap();
    assert!(out.is_empty());
    assert_eq!(out.size(), (0, 0));
}

fn sample4() -> Matrix {
    Matrix::from_rows(&[
        vec![1.0, 2.0, 3.0, 4.0],
        vec![5.0, 6.0, 7.0, 8.0],
        vec![9.0, 0.0, 1.0, 2.0],
        vec![3.0, 4.0, 5.0, 6.0],
    ])
    .unwrap()
}

#[test]
fn filter2_full_and_imfilter_same() {
    let f = Matrix::from_rows(&[vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();

    let full = filter2(&f, &sample4(), Shape::Full).unwrap();
    let expected = Matrix::from_rows(&[
        vec![0.0, 1.0, 2.0, 3.0, 4.0],
        vec![1.0, 7.0, 9.0, 11.0, 8.0],
        vec![5.0, 15.0, 7.0, 9.0, 2.0],
        vec![9.0, 3.0, 5.0, 7.0, 6.0],
        vec![3.0, 4.0, 5.0, 6.0, 0.0],
    ])
    .unwrap();
    assert_eq!(full, expected);

    let same = imfilter(&sample4(), &f, Shape::Same).unwrap();
    let expected = Matrix::from_rows(&[
        vec![2.0, 3.0, 5.0, 7.0],
        vec![6.0, 7.0, 9.0, 11.0],
        vec![14.0, 15.0, 7.0, 9.0],
        vec![12.0, 3.0, 5.0, 7.0],
    ])
    .unwrap();
    assert_eq!(same, expected);
    assert_eq!(imfilter(&sample4(), &f, Shape::Valid).unwrap(), expected);
}

#[test]
fn padarray_tiles_beyond_source_size() {
    let a = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    let padded = padarray(&a, (3, 3)).unwrap();
    assert_eq!(padded.size(), (8, 8));
    let lower = [4.0, 4.0, 3.0, 3.0, 4.0, 4.0, 3.0, 3.0];
    let upper = [2.0, 2.0, 1.0, 1.0, 2.0, 2.0, 1.0, 1.0];
    for row in 0..8 {
        let expected = if row % 4 < 2 { &lower } else { &upper };
        assert_eq!(padded.row(row).unwrap(), expected, "row {row}");
    }
}

#[test]
fn padarray_wide_pad_on_narrow_source() {
    let a = Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
    let padded = padarray(&a, (0, 5)).unwrap();
    assert_eq!(padded.size(), (2, 13));
    assert_eq!(
        padded.row(0).unwrap(),
        &[2.0, 3.0, 3.0, 2.0, 1.0, 1.0, 2.0, 3.0, 3.0, 2.0, 1.0, 1.0, 2.0]
    );
    assert_eq!(
        padded.row(1).unwrap(),
        &[5.0, 6.0, 6.0, 5.0, 4.0, 4.0, 5.0, 6.0, 6.0, 5.0, 4.0, 4.0, 5.0]
    );
}

#[test]
fn normpdf_and_fspecial_samples() {
    let x = Matrix::new(vec![2.0, 1.0, 0.0, 1.0, 2.0], 5, 1).unwrap();
    let pdf = normpdf(&x, 0.0, 1.5);
    let expected = [0.10934, 0.21297, 0.26596, 0.21297, 0.10934];
    for (v, e) in pdf.data().iter().zip(expected) {
        assert!((v - e).abs() < 5e-6);
    }

    let g = fspecial(3, 1.5).unwrap();
    assert!((g.get(0, 0).unwrap() - 0.095).abs() < 5e-4);
    assert!((g.get(1, 1).unwrap() - 0.148).abs() < 5e-4);
    let g = fspecial(11, 1.5).unwrap();
    assert!((g.get(5, 5).unwrap() - 0.071).abs() < 5e-4);
    assert!(g.get(0, 0).unwrap() < 5e-4);
}

#[test]
fn skip2d_strides() {
    let m = Matrix::new((1..=9).map(f64::from).collect(), 3, 3).unwrap();
    assert_eq!(m.skip2d((1, 1, 2), (1, 1, 2)).unwrap().data(), &[5.0]);
    let s = m.skip2d((0, 2, 3), (0, 2, 3)).unwrap();
    assert_eq!(s.data(), &[1.0, 3.0, 7.0, 9.0]);
}
