//! Small numeric and frequency helpers shared by grouping and prediction.

use std::hash::Hash;

use trendscope_core::Segment;

#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation divided by the mean.
///
/// `None` for an empty slice or a non-positive mean.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    let avg = mean(values)?;
    if avg <= 0.0 {
        return None;
    }
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt() / avg)
}

/// Rounds to the nearest integer and clamps into `[0, 100]`. NaN maps to 0.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn clamp_score(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

/// Most frequent item; on a tie the one seen first wins.
pub fn most_common<T, I>(items: I) -> Option<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut counts: Vec<(T, usize)> = Vec::new();
    for item in items {
        match counts.iter_mut().find(|(seen, _)| *seen == item) {
            Some((_, count)) => *count += 1,
            None => counts.push((item, 1)),
        }
    }

    let mut best: Option<(T, usize)> = None;
    for (item, count) in counts {
        if best.as_ref().is_none_or(|(_, best_count)| count > *best_count) {
            best = Some((item, count));
        }
    }
    best.map(|(item, _)| item)
}

/// Majority vote over segments, ignoring unknowns.
///
/// Candidates are visited in [`Segment::PREFERENCE`] order and replaced only on
/// a strictly greater count, so ties go to femme, then homme, then enfant.
pub fn majority_segment<I>(segments: I) -> Option<Segment>
where
    I: IntoIterator<Item = Option<Segment>>,
{
    let mut tally = [0_usize; 3];
    for segment in segments.into_iter().flatten() {
        if let Some(idx) = Segment::PREFERENCE.iter().position(|s| *s == segment) {
            tally[idx] += 1;
        }
    }

    let mut best: Option<(Segment, usize)> = None;
    for (segment, count) in Segment::PREFERENCE.iter().zip(tally) {
        if count == 0 {
            continue;
        }
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((*segment, count));
        }
    }
    best.map(|(segment, _)| segment)
}
