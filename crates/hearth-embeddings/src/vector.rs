//! Dense-vector primitives for the similarity index.
//!
//! Rows are stored raw and normalized at query time: the query vector is
//! scaled to unit length once, then each row contributes
//! `dot(row, query) / |row|` — the cosine of the angle between them without
//! materializing a normalized copy of the matrix.

/// Dot product of two equal-length vectors.
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have equal dimensions");
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Euclidean length of `v`.
pub fn l2_norm(v: &[f32]) -> f32 {
    dot(v, v).sqrt()
}

/// Scale `v` to unit length in place.
///
/// The zero vector has no direction and is left untouched, so callers
/// never divide by zero and never see NaN.
pub fn unit_normalize(v: &mut [f32]) {
    let len = l2_norm(v);
    if len > 0.0 {
        for x in v.iter_mut() {
            *x /= len;
        }
    }
}

#[cfg(test)]
#[allow(clippy::cast_precision_loss)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn dot_hand_computed() {
        assert!(close(dot(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]), 32.0));
    }

    #[test]
    fn dot_of_empty_is_zero() {
        assert!(close(dot(&[], &[]), 0.0));
    }

    #[test]
    fn l2_norm_pythagorean() {
        assert!(close(l2_norm(&[5.0, 12.0]), 13.0));
    }

    #[test]
    fn unit_normalize_scales_components() {
        let mut v = vec![5.0, 12.0];
        unit_normalize(&mut v);
        assert!(close(v[0], 5.0 / 13.0));
        assert!(close(v[1], 12.0 / 13.0));
        assert!(close(l2_norm(&v), 1.0));
    }

    #[test]
    fn unit_normalize_leaves_zero_vector() {
        let mut v = vec![0.0; 6];
        unit_normalize(&mut v);
        assert!(v.iter().all(|x| *x == 0.0));
        assert!(v.iter().all(|x| !x.is_nan()));
    }

    #[test]
    fn opposite_unit_vectors_score_minus_one() {
        let mut a = vec![2.0, 0.0, 0.0];
        let mut b = vec![-7.0, 0.0, 0.0];
        unit_normalize(&mut a);
        unit_normalize(&mut b);
        assert!(close(dot(&a, &b), -1.0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn vectors(len: impl Into<proptest::collection::SizeRange>) -> impl Strategy<Value = Vec<f32>> {
            proptest::collection::vec(-50.0f32..50.0, len)
        }

        proptest! {
            #[test]
            fn normalize_twice_is_stable(v in vectors(1..48)) {
                let mut once = v.clone();
                unit_normalize(&mut once);
                let mut twice = once.clone();
                unit_normalize(&mut twice);
                for (a, b) in once.iter().zip(&twice) {
                    prop_assert!((a - b).abs() < 1e-4);
                }
            }

            #[test]
            fn normalized_dot_stays_in_unit_interval(
                a in vectors(2..24),
                b in vectors(2..24),
            ) {
                let len = a.len().min(b.len());
                let (mut a, mut b) = (a[..len].to_vec(), b[..len].to_vec());
                unit_normalize(&mut a);
                unit_normalize(&mut b);
                let sim = dot(&a, &b);
                prop_assert!((-1.0 - 1e-4..=1.0 + 1e-4).contains(&sim));
            }

            #[test]
            fn norm_scales_linearly(v in vectors(1..32), k in 0.1f32..10.0) {
                let scaled: Vec<f32> = v.iter().map(|x| x * k).collect();
                let expected = l2_norm(&v) * k;
                prop_assert!((l2_norm(&scaled) - expected).abs() < expected.abs() * 1e-3 + 1e-3);
            }
        }
    }
}
