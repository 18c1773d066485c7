// Single-row label strips: group nearby labels, then push overlapping
// groups apart along the strip.

use std::ops::Range;

use super::{GroupMeta, ResolvedGroup};
use crate::config::ResolveConfig;
use crate::ir::LabeledPoint;

/// Outcome of the bounded separation loop.
#[derive(Debug, Clone)]
pub(crate) struct Separation {
    pub groups: Vec<GroupMeta>,
    pub passes: usize,
    pub residual_overlap: bool,
}

/// Groups `points` and separates the groups along the strip.
///
/// `points` must already be sorted ascending by `coordinate`; they are taken
/// in the given order. Use [`resolve_unsorted`] when that is not guaranteed.
///
/// Separation is bounded: at most `max_iteration - 1` shifting passes run,
/// and overlap left after the last pass is kept as is.
pub fn resolve<T, F>(points: &[T], config: &ResolveConfig, coordinate: F) -> Vec<ResolvedGroup<T>>
where
    T: Clone,
    F: Fn(&T) -> f32,
{
    if points.is_empty() {
        return Vec::new();
    }
    let coords: Vec<f32> = points.iter().map(&coordinate).collect();
    if coords.iter().any(|value| !value.is_finite()) {
        log::warn!("label strip has non-finite coordinates, skipping layout");
        return Vec::new();
    }
    if coords.windows(2).any(|pair| pair[1] < pair[0]) {
        log::warn!("label strip coordinates are not ascending; groups follow input order");
    }

    let threshold = config
        .threshold
        .unwrap_or(config.width + 2.0 * config.margin);
    let runs = build_groups(&coords, threshold);
    let metas: Vec<GroupMeta> = runs
        .iter()
        .enumerate()
        .map(|(id, run)| group_meta(id, &coords[run.clone()], config.width, config.margin))
        .collect();

    let separation = separate_groups(metas, config.group_margin, config.max_iteration);
    log::debug!(
        "label strip: {} points in {} groups after {} passes",
        points.len(),
        runs.len(),
        separation.passes
    );
    if separation.residual_overlap {
        log::debug!("label strip still overlaps after {} passes", separation.passes);
    }

    runs.into_iter()
        .zip(separation.groups)
        .map(|(run, meta)| ResolvedGroup {
            members: points[run].to_vec(),
            meta,
        })
        .collect()
}

/// Like [`resolve`], but sorts a copy of the input by coordinate first.
pub fn resolve_unsorted<T, F>(
    points: &[T],
    config: &ResolveConfig,
    coordinate: F,
) -> Vec<ResolvedGroup<T>>
where
    T: Clone,
    F: Fn(&T) -> f32,
{
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| coordinate(a).total_cmp(&coordinate(b)));
    resolve(&sorted, config, coordinate)
}

pub fn resolve_points(
    points: &[LabeledPoint],
    config: &ResolveConfig,
) -> Vec<ResolvedGroup<LabeledPoint>> {
    resolve(points, config, |point| point.coordinate)
}

/// Splits ascending coordinates into contiguous runs. A point stays in the
/// current run while it is within `threshold` of the run's first point.
fn build_groups(coords: &[f32], threshold: f32) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let Some(&first) = coords.first() else {
        return runs;
    };
    let mut last_ref = first;
    let mut start = 0;
    for (idx, &value) in coords.iter().enumerate().skip(1) {
        if value - last_ref <= threshold {
            continue;
        }
        runs.push(start..idx);
        start = idx;
        last_ref = value;
    }
    runs.push(start..coords.len());
    runs
}

fn group_meta(id: usize, coords: &[f32], item_width: f32, margin: f32) -> GroupMeta {
    let n = coords.len() as f32;
    let width = n * item_width + (n - 1.0) * margin;
    let mid = coords.iter().sum::<f32>() / n;
    GroupMeta {
        id,
        width,
        mid,
        start: mid - width / 2.0 + item_width / 2.0,
        end: width / 2.0 + mid,
    }
}

/// One left-to-right sweep. Returns the swept groups and whether any pair
/// overlapped.
fn shift_pass(groups: &[GroupMeta], group_margin: f32) -> (Vec<GroupMeta>, bool) {
    let mut out: Vec<GroupMeta> = Vec::with_capacity(groups.len());
    let mut intersected = false;
    for current in groups {
        let next = match out.last() {
            Some(previous) if previous.end > current.start => {
                intersected = true;
                current.shifted(previous.end - current.start + group_margin)
            }
            _ => *current,
        };
        out.push(next);
    }
    (out, intersected)
}

pub(crate) fn separate_groups(
    groups: Vec<GroupMeta>,
    group_margin: f32,
    max_iteration: usize,
) -> Separation {
    let mut groups = groups;
    let mut intersected = true;
    let mut passes = 0;
    // The counter starts at 1, so `max_iteration` allows one pass fewer.
    let mut iteration = 1;
    while intersected && iteration < max_iteration {
        iteration += 1;
        let (next, found) = shift_pass(&groups, group_margin);
        groups = next;
        intersected = found;
        passes += 1;
    }
    let residual_overlap = groups.windows(2).any(|pair| pair[0].end > pair[1].start);
    Separation {
        groups,
        passes,
        residual_overlap,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(coords: &[f32]) -> Vec<LabeledPoint> {
        coords
            .iter()
            .enumerate()
            .map(|(idx, &x)| LabeledPoint::new(format!("p{idx}"), x, x))
            .collect()
    }

    fn member_coords(group: &ResolvedGroup<LabeledPoint>) -> Vec<f32> {
        group.members.iter().map(|p| p.coordinate).collect()
    }

    #[test]
    fn empty_input_gives_no_groups() {
        assert!(resolve_points(&[], &ResolveConfig::default()).is_empty());
    }

    #[test]
    fn non_finite_input_gives_no_groups() {
        let input = points(&[0.0, f32::NAN, 30.0]);
        assert!(resolve_points(&input, &ResolveConfig::default()).is_empty());
    }

    #[test]
    fn single_point_is_unshifted() {
        let groups = resolve_points(&points(&[42.0]), &ResolveConfig::default());
        assert_eq!(groups.len(), 1);
        let meta = groups[0].meta;
        assert_eq!(meta.width, 10.0);
        assert_eq!(meta.mid, 42.0);
        assert_eq!(meta.start, 42.0);
        assert_eq!(meta.end, 47.0);
    }

    #[test]
    fn worked_example_two_groups_without_shift() {
        let groups = resolve_points(&points(&[0.0, 15.0, 40.0, 45.0]), &ResolveConfig::default());
        assert_eq!(groups.len(), 2);
        assert_eq!(member_coords(&groups[0]), vec![0.0, 15.0]);
        assert_eq!(member_coords(&groups[1]), vec![40.0, 45.0]);

        let g0 = groups[0].meta;
        assert_eq!((g0.mid, g0.width, g0.start, g0.end), (7.5, 25.0, 0.0, 20.0));
        let g1 = groups[1].meta;
        assert_eq!((g1.mid, g1.width, g1.start, g1.end), (42.5, 25.0, 35.0, 55.0));
        assert_eq!(g0.id, 0);
        assert_eq!(g1.id, 1);
    }

    #[test]
    fn threshold_anchors_to_group_start() {
        // Each step is 15 (under the default threshold of 20), but the third
        // point is 30 away from the first member of the run.
        let groups = resolve_points(&points(&[0.0, 15.0, 30.0, 45.0]), &ResolveConfig::default());
        assert_eq!(groups.len(), 2);
        assert_eq!(member_coords(&groups[0]), vec![0.0, 15.0]);
        assert_eq!(member_coords(&groups[1]), vec![30.0, 45.0]);
    }

    #[test]
    fn threshold_is_inclusive() {
        let groups = resolve_points(&points(&[0.0, 20.0, 40.1]), &ResolveConfig::default());
        assert_eq!(groups.len(), 2);
        assert_eq!(member_coords(&groups[0]), vec![0.0, 20.0]);
    }

    #[test]
    fn far_points_are_singletons_without_shift() {
        let coords = [0.0, 25.0, 60.0, 100.0];
        let groups = resolve_points(&points(&coords), &ResolveConfig::default());
        assert_eq!(groups.len(), coords.len());
        for (group, x) in groups.iter().zip(coords) {
            assert_eq!(group.members.len(), 1);
            assert_eq!(group.meta.mid, x);
        }
    }

    #[test]
    fn overlapping_group_is_pushed_to_previous_end() {
        let config = ResolveConfig {
            threshold: Some(10.0),
            group_margin: 2.0,
            ..ResolveConfig::default()
        };
        let groups = resolve_points(&points(&[0.0, 5.0, 12.0]), &config);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].meta.end, 15.0);
        let shifted = groups[1].meta;
        assert_eq!(shifted.start, 17.0);
        assert_eq!(shifted.mid, 17.0);
        assert_eq!(shifted.end, 22.0);
    }

    #[test]
    fn shift_lands_exactly_on_previous_end_plus_margin() {
        let previous = GroupMeta {
            id: 0,
            width: 65.0,
            mid: 2.5,
            start: -25.0,
            end: 35.0,
        };
        let current = GroupMeta {
            id: 1,
            width: 45.0,
            mid: 41.0,
            start: 23.5,
            end: 63.5,
        };
        for margin in [0.0, 4.0] {
            let (out, intersected) = shift_pass(&[previous, current], margin);
            assert!(intersected);
            assert_eq!(out[0], previous);
            assert_eq!(out[1].start, previous.end + margin);
            assert_eq!(out[1].mid, 41.0 + 11.5 + margin);
            assert_eq!(out[1].width, 45.0);
        }
    }

    #[test]
    fn shifts_cascade_within_one_pass() {
        let config = ResolveConfig {
            threshold: Some(1.0),
            ..ResolveConfig::default()
        };
        let groups = resolve_points(&points(&[0.0, 4.0, 8.0]), &config);
        let starts: Vec<f32> = groups.iter().map(|g| g.meta.start).collect();
        assert_eq!(starts, vec![0.0, 5.0, 10.0]);
    }

    #[test]
    fn max_iteration_one_runs_no_pass() {
        // Observed budget: the counter starts at 1, so one iteration means no
        // shifting at all and overlap remains.
        let config = ResolveConfig {
            threshold: Some(1.0),
            max_iteration: 1,
            ..ResolveConfig::default()
        };
        let groups = resolve_points(&points(&[0.0, 4.0]), &config);
        assert_eq!(groups[1].meta.start, 4.0);
        assert!(groups[0].meta.end > groups[1].meta.start);
    }

    #[test]
    fn default_budget_is_two_passes() {
        let metas = vec![
            group_meta(0, &[0.0], 10.0, 5.0),
            group_meta(1, &[4.0], 10.0, 5.0),
        ];
        // A negative group margin keeps the pair overlapping forever.
        let separation = separate_groups(metas.clone(), -1.0, 3);
        assert_eq!(separation.passes, 2);
        assert!(separation.residual_overlap);

        let separation = separate_groups(metas.clone(), 0.0, 3);
        assert_eq!(separation.passes, 2, "second pass confirms no overlap");
        assert!(!separation.residual_overlap);

        let separation = separate_groups(metas, 0.0, 0);
        assert_eq!(separation.passes, 0);
    }

    #[test]
    fn groups_partition_input() {
        let coords: Vec<f32> = (0..40).map(|i| (i * i % 37) as f32 * 3.0).collect();
        let mut sorted = coords.clone();
        sorted.sort_by(f32::total_cmp);
        let input = points(&sorted);
        let groups = resolve_points(&input, &ResolveConfig::default());
        let mut ids: Vec<String> = groups
            .iter()
            .flat_map(|g| g.members.iter().map(|p| p.id.clone()))
            .collect();
        assert_eq!(ids.len(), input.len());
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), input.len());
        for group in &groups {
            let n = group.members.len() as f32;
            assert_eq!(group.meta.width, n * 10.0 + (n - 1.0) * 5.0);
        }
    }

    #[test]
    fn resolved_mids_are_a_fixed_point() {
        let config = ResolveConfig {
            threshold: Some(10.0),
            ..ResolveConfig::default()
        };
        let first = resolve_points(&points(&[0.0, 5.0, 12.0, 60.0]), &config);
        let mids: Vec<f32> = first.iter().map(|g| g.meta.mid).collect();
        let second = resolve_points(&points(&mids), &config);
        assert_eq!(second.len(), mids.len());
        for (group, mid) in second.iter().zip(&mids) {
            assert_eq!(group.meta.mid, *mid);
        }
    }

    #[test]
    fn unsorted_input_is_sorted_first() {
        let input = points(&[45.0, 0.0, 40.0, 15.0]);
        let groups = resolve_unsorted(&input, &ResolveConfig::default(), |p| p.coordinate);
        assert_eq!(groups.len(), 2);
        assert_eq!(member_coords(&groups[0]), vec![0.0, 15.0]);
        assert_eq!(member_coords(&groups[1]), vec![40.0, 45.0]);
    }

    #[test]
    fn works_with_any_item_type() {
        let xs = [3.0f32, 8.0, 90.0];
        let groups = resolve(&xs, &ResolveConfig::default(), |x| *x);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].members, vec![3.0, 8.0]);
    }
}
