/// Guards the interpolation against a flat segment sitting exactly on the target.
const SEGMENT_EPSILON: f64 = 1e-9;

/// Finds the fractional week at which `trajectory` first reaches `target`.
///
/// Element `i` of the trajectory is taken to describe week
/// `start_week_index + i`. The first adjacent pair with
/// `trajectory[i] <= target <= trajectory[i + 1]` is interpolated linearly.
/// Returns `None` when no segment brackets the target. The value is left
/// unrounded so charts can place markers precisely.
pub fn find_crossing(trajectory: &[f64], start_week_index: usize, target: f64) -> Option<f64> {
    trajectory
        .windows(2)
        .enumerate()
        .find(|(_, pair)| pair[0] <= target && target <= pair[1])
        .map(|(index, pair)| {
            let fraction = (target - pair[0]) / (pair[1] - pair[0] + SEGMENT_EPSILON);
            (start_week_index + index) as f64 + fraction
        })
}
