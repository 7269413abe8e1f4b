//! Raw (never range-normalized) distances between instances.
use crate::data::FeatureKind;
use crate::DenseVecView;
use itertools::izip;

/// Squared Euclidean distance over feature vectors.
///
/// Nominal features contribute 0 when their codes agree and 1 otherwise.
pub fn squared_feature_distance(a: DenseVecView, b: DenseVecView, kinds: &[FeatureKind]) -> f32 {
    assert_eq!(a.len(), b.len());
    assert_eq!(a.len(), kinds.len());
    let mut sum = 0f32;
    for (&x, &y, kind) in izip!(a.iter(), b.iter(), kinds) {
        sum += match kind {
            FeatureKind::Numeric => (x - y).powi(2),
            FeatureKind::Nominal => {
                if x == y {
                    0.
                } else {
                    1.
                }
            }
        };
    }
    sum
}

/// Number of labels on which two label vectors disagree.
pub fn label_hamming(a: &[bool], b: &[bool]) -> usize {
    assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).filter(|(x, y)| x != y).count()
}

/// Fraction of labels on which two label vectors disagree.
pub fn label_hamming_fraction(a: &[bool], b: &[bool]) -> f32 {
    if a.is_empty() {
        return 0.;
    }
    label_hamming(a, b) as f32 / a.len() as f32
}

/// Label disagreement relative to the labels active in either vector.
///
/// Returns `None` when neither vector has an active label, since the ratio is undefined.
pub fn label_disagreement_ratio(a: &[bool], b: &[bool]) -> Option<f32> {
    assert_eq!(a.len(), b.len());
    let mut diff = 0usize;
    let mut active = 0usize;
    for (&x, &y) in a.iter().zip(b.iter()) {
        if x != y {
            diff += 1;
        }
        active += x as usize + y as usize;
    }
    if active == 0 {
        None
    } else {
        Some(diff as f32 / active as f32)
    }
}
