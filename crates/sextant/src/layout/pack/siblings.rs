//! Front-chain sibling packing.
//!
//! Circles are placed one at a time tangent to two circles of the current
//! front chain (the outer boundary of the packed group). When the new circle
//! would overlap a chain member, the chain is cut at that member and the
//! placement is retried. The chain is a ring kept in two index arrays.

use super::{Disc, enclose::enclose};

/// Overlap slack accepted by [`intersects`]
const INTERSECT_EPSILON: f64 = 1e-6;

/// Packs `circles` in place around the origin and returns the radius of the
/// circle enclosing all of them. Only the radii are read; positions are
/// overwritten.
pub(super) fn pack_siblings(circles: &mut [Disc]) -> f64 {
    let n = circles.len();
    if n == 0 {
        return 0.0;
    }

    circles[0].x = 0.0;
    circles[0].y = 0.0;
    if n == 1 {
        return circles[0].r;
    }

    circles[0].x = -circles[1].r;
    circles[1].x = circles[0].r;
    circles[1].y = 0.0;
    if n == 2 {
        return circles[0].r + circles[1].r;
    }

    place(circles, 0, 1, 2);

    let mut next = vec![0; n];
    let mut prev = vec![0; n];
    let (mut a, mut b) = (0, 1);
    link(&mut next, &mut prev, 0, 1);
    link(&mut next, &mut prev, 1, 2);
    link(&mut next, &mut prev, 2, 0);

    let mut c = 3;
    'pack: while c < n {
        place(circles, b, a, c);

        // Walk both directions along the chain, always advancing the side
        // with the shorter travelled length.
        let mut j = next[b];
        let mut k = prev[a];
        let mut sj = circles[b].r;
        let mut sk = circles[a].r;
        loop {
            if sj <= sk {
                if intersects(&circles[j], &circles[c]) {
                    b = j;
                    link(&mut next, &mut prev, a, b);
                    continue 'pack;
                }
                sj += circles[j].r;
                j = next[j];
            } else {
                if intersects(&circles[k], &circles[c]) {
                    a = k;
                    link(&mut next, &mut prev, a, b);
                    continue 'pack;
                }
                sk += circles[k].r;
                k = prev[k];
            }
            if j == next[k] {
                break;
            }
        }

        link(&mut next, &mut prev, a, c);
        link(&mut next, &mut prev, c, b);
        b = c;

        // Restart from the chain pair closest to the origin.
        let mut best = score(circles, a, next[a]);
        let mut cursor = next[b];
        while cursor != b {
            let candidate = score(circles, cursor, next[cursor]);
            if candidate < best {
                a = cursor;
                best = candidate;
            }
            cursor = next[cursor];
        }
        b = next[a];
        c += 1;
    }

    let mut chain = vec![circles[b]];
    let mut cursor = next[b];
    while cursor != b {
        chain.push(circles[cursor]);
        cursor = next[cursor];
    }

    let Some(e) = enclose(&chain) else {
        return 0.0;
    };
    let mut radius = e.r;
    for circle in circles.iter_mut() {
        circle.x -= e.x;
        circle.y -= e.y;
        radius = radius.max(circle.x.hypot(circle.y) + circle.r);
    }
    radius
}

fn link(next: &mut [usize], prev: &mut [usize], from: usize, to: usize) {
    next[from] = to;
    prev[to] = from;
}

/// Places `c` tangent to both `a` and `b`.
fn place(circles: &mut [Disc], a: usize, b: usize, c: usize) {
    let (ca, cb) = (circles[a], circles[b]);
    let r = circles[c].r;
    let dx = cb.x - ca.x;
    let dy = cb.y - ca.y;
    let d2 = dx * dx + dy * dy;

    let (x, y) = if d2 > 0.0 {
        let a2 = (ca.r + r).powi(2);
        let b2 = (cb.r + r).powi(2);
        if a2 > b2 {
            let x = (d2 + b2 - a2) / (2.0 * d2);
            let y = (b2 / d2 - x * x).max(0.0).sqrt();
            (cb.x - x * dx - y * dy, cb.y - x * dy + y * dx)
        } else {
            let x = (d2 + a2 - b2) / (2.0 * d2);
            let y = (a2 / d2 - x * x).max(0.0).sqrt();
            (ca.x + x * dx - y * dy, ca.y + x * dy + y * dx)
        }
    } else {
        (ca.x + r, ca.y)
    };

    circles[c].x = x;
    circles[c].y = y;
}

fn intersects(a: &Disc, b: &Disc) -> bool {
    let dr = a.r + b.r - INTERSECT_EPSILON;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr > 0.0 && dr * dr > dx * dx + dy * dy
}

/// Squared distance from the origin to the weighted midpoint of a chain pair
fn score(circles: &[Disc], a: usize, b: usize) -> f64 {
    let (ca, cb) = (circles[a], circles[b]);
    let ab = ca.r + cb.r;
    let dx = (ca.x * cb.r + cb.x * ca.r) / ab;
    let dy = (ca.y * cb.r + cb.y * ca.r) / ab;
    dx * dx + dy * dy
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn discs(radii: &[f64]) -> Vec<Disc> {
        radii
            .iter()
            .map(|&r| Disc { x: 0.0, y: 0.0, r })
            .collect()
    }

    #[test]
    fn test_trivial_groups() {
        assert_approx_eq!(f64, pack_siblings(&mut []), 0.0);

        let mut one = discs(&[4.0]);
        assert_approx_eq!(f64, pack_siblings(&mut one), 4.0);
        assert_eq!((one[0].x, one[0].y), (0.0, 0.0));

        let mut two = discs(&[3.0, 1.0]);
        assert_approx_eq!(f64, pack_siblings(&mut two), 4.0);
        assert_approx_eq!(f64, two[1].x - two[0].x, 4.0);
    }

    #[test]
    fn test_third_circle_touches_first_two() {
        let mut circles = discs(&[2.0, 2.0, 2.0]);
        pack_siblings(&mut circles);
        for (i, j) in [(0, 1), (1, 2), (0, 2)] {
            let d = (circles[i].x - circles[j].x).hypot(circles[i].y - circles[j].y);
            assert_approx_eq!(f64, d, 4.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_result_is_centred_on_enclosure() {
        let mut circles = discs(&[5.0, 3.0, 3.0, 2.0, 1.0, 1.0]);
        let radius = pack_siblings(&mut circles);
        for circle in &circles {
            assert!(circle.x.hypot(circle.y) + circle.r <= radius + 1e-6);
        }
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn radii_strategy() -> impl Strategy<Value = Vec<f64>> {
        prop::collection::vec(0.5f64..40.0, 1..40)
    }

    fn check_packed_circles_do_not_overlap(radii: &[f64]) -> Result<(), TestCaseError> {
        let mut circles: Vec<Disc> = radii.iter().map(|&r| Disc { x: 0.0, y: 0.0, r }).collect();
        let radius = pack_siblings(&mut circles);

        for (i, a) in circles.iter().enumerate() {
            prop_assert!(a.x.hypot(a.y) + a.r <= radius + 1e-6 * radius.max(1.0));
            for b in &circles[i + 1..] {
                let gap = (a.x - b.x).hypot(a.y - b.y) - a.r - b.r;
                prop_assert!(gap > -1e-3, "{:?} overlaps {:?}", a, b);
            }
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn packed_circles_do_not_overlap(radii in radii_strategy()) {
            check_packed_circles_do_not_overlap(&radii)?;
        }
    }
}
