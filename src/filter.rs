//! Ways of folding several echo times into one.

/// Mean of `count` echo times that add up to `sum`, rounded half up.
pub(crate) fn rounded_mean(sum: u64, count: u8) -> u32 {
    if count == 0 {
        return 0;
    }
    let count = u64::from(count);
    u32::try_from((sum + count / 2) / count).unwrap_or(u32::MAX)
}

/// Stable ascending insertion sort. The buffers here hold at most 15 samples.
pub(crate) fn insertion_sort(samples: &mut [u32]) {
    for t in 1..samples.len() {
        let value = samples[t];
        let mut z = t;
        while z > 0 && value < samples[z - 1] {
            samples[z] = samples[z - 1];
            z -= 1;
        }
        samples[z] = value;
    }
}

/// Sort `samples` and pick the median.
///
/// Even counts average `samples[(n + 1) / 2]` and `samples[n / 2]`. Both indices are the
/// same for even `n`, so this returns the upper of the two middle samples.
pub(crate) fn median(samples: &mut [u32]) -> u32 {
    insertion_sort(samples);
    let n = samples.len();
    if n == 0 {
        return 0;
    }
    if n & 0x01 == 1 {
        return samples[n / 2];
    }
    ((u64::from(samples[(n + 1) / 2]) + u64::from(samples[n / 2])) / 2) as u32
}

/// One step of exponential smoothing.
pub(crate) fn smooth(previous: f32, alpha: f32, sample: u32) -> f32 {
    (1.0 - alpha) * previous + alpha * sample as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_ascending() {
        let mut samples = [30, 10, 50, 20, 40];
        insertion_sort(&mut samples);
        assert_eq!(samples, [10, 20, 30, 40, 50]);
    }

    #[test]
    fn sort_keeps_duplicates_and_zeros() {
        let mut samples = [7, 0, 7, 3, 0];
        insertion_sort(&mut samples);
        assert_eq!(samples, [0, 0, 3, 7, 7]);
    }

    #[test]
    fn sort_handles_trivial_slices() {
        let mut empty: [u32; 0] = [];
        insertion_sort(&mut empty);
        let mut one = [5];
        insertion_sort(&mut one);
        assert_eq!(one, [5]);
    }

    #[test]
    fn median_of_three() {
        assert_eq!(median(&mut [10, 20, 30]), 20);
        assert_eq!(median(&mut [30, 10, 20]), 20);
    }

    #[test]
    fn median_of_four_takes_index_two_twice() {
        // A textbook median would be (20 + 30) / 2 = 25.
        assert_eq!(median(&mut [10, 20, 30, 40]), 30);
        assert_eq!(median(&mut [40, 30, 20, 10]), 30);
    }

    #[test]
    fn median_of_fifteen() {
        let mut samples = [15, 1, 14, 2, 13, 3, 12, 4, 11, 5, 10, 6, 9, 7, 8];
        assert_eq!(median(&mut samples), 8);
    }

    #[test]
    fn mean_rounds_to_nearest() {
        assert_eq!(rounded_mean(55, 3), 18);
        assert_eq!(rounded_mean(5, 2), 3);
        assert_eq!(rounded_mean(300, 3), 100);
    }

    #[test]
    fn mean_keeps_every_microsecond_of_large_sums() {
        assert_eq!(rounded_mean(250_001 * 255, 255), 250_001);
        assert_eq!(rounded_mean(u64::from(u32::MAX) * 255, 255), u32::MAX);
    }

    #[test]
    fn mean_of_nothing_is_zero() {
        assert_eq!(rounded_mean(0, 0), 0);
    }

    #[test]
    fn smoothing_from_zero() {
        assert_eq!(smooth(0.0, 0.5, 100), 50.0);
        assert_eq!(smooth(50.0, 0.5, 100), 75.0);
        assert_eq!(smooth(42.0, 1.0, 100), 100.0);
    }
}
