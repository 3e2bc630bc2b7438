//! Pareto dominance over five-axis score vectors.

/// `x` dominates `y`: at least as good on every axis, strictly better on one.
pub fn dominates(x: &[f64], y: &[f64]) -> bool {
    debug_assert_eq!(x.len(), y.len());
    let mut strictly_better = false;
    for (a, b) in x.iter().zip(y) {
        if a < b {
            return false;
        }
        if a > b {
            strictly_better = true;
        }
    }
    strictly_better
}

/// Indices of non-dominated points, in input order.
///
/// Identical vectors do not dominate each other, so duplicates all stay.
pub fn pareto_front(points: &[[f64; 5]]) -> Vec<usize> {
    (0..points.len())
        .filter(|&i| {
            !points
                .iter()
                .enumerate()
                .any(|(j, other)| j != i && dominates(other, &points[i]))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn strict_improvement_required() {
        let a = [0.5; 5];
        assert!(!dominates(&a, &a));
        let mut b = a;
        b[2] = 0.6;
        assert!(dominates(&b, &a));
        assert!(!dominates(&a, &b));
    }

    #[test]
    fn trade_off_is_not_domination() {
        let a = [0.9, 0.5, 0.5, 0.5, 0.5];
        let b = [0.5, 0.9, 0.5, 0.5, 0.5];
        assert!(!dominates(&a, &b));
        assert!(!dominates(&b, &a));
        assert_eq!(pareto_front(&[a, b]), vec![0, 1]);
    }

    #[test]
    fn dominated_point_dropped() {
        let strong = [0.9; 5];
        let weak = [0.6; 5];
        assert_eq!(pareto_front(&[weak, strong]), vec![1]);
    }

    #[test]
    fn empty_input() {
        assert!(pareto_front(&[]).is_empty());
    }

    fn point() -> impl Strategy<Value = [f64; 5]> {
        // Coarse grid so ties and dominations actually occur
        prop::array::uniform5((0u8..=4).prop_map(|v| f64::from(v) / 4.0))
    }

    proptest! {
        #[test]
        fn front_members_are_mutually_non_dominated(points in prop::collection::vec(point(), 0..20)) {
            let front = pareto_front(&points);
            for &i in &front {
                for &j in &front {
                    prop_assert!(!dominates(&points[i], &points[j]));
                }
            }
        }

        #[test]
        fn every_dropped_point_is_dominated_by_front(points in prop::collection::vec(point(), 1..20)) {
            let front = pareto_front(&points);
            prop_assert!(!front.is_empty());
            for k in (0..points.len()).filter(|k| !front.contains(k)) {
                prop_assert!(front.iter().any(|&f| dominates(&points[f], &points[k])));
            }
        }
    }
}
