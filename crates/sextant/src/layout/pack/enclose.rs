//! Smallest circle enclosing a set of circles.
//!
//! Move-to-front Welzl: the enclosing circle is rebuilt from a basis of at
//! most three circles whenever a circle is found outside it, and the scan
//! restarts from the front.

use log::debug;

use super::Disc;

/// Relative slack accepted by [`encloses_weak`]
const WEAK_EPSILON: f64 = 1e-9;
/// Below this the quadratic in [`enclose_basis3`] degrades to linear
const DEGENERATE_EPSILON: f64 = 1e-6;

pub(super) fn enclose(circles: &[Disc]) -> Option<Disc> {
    let mut basis: Vec<Disc> = Vec::with_capacity(3);
    let mut current: Option<Disc> = None;

    // Each restart strictly grows the enclosing circle, so the scan ends;
    // the cap only guards against float drift.
    let max_restarts = circles.len().saturating_mul(circles.len()).saturating_add(16) * 4;
    let mut restarts = 0;

    let mut index = 0;
    while index < circles.len() {
        let candidate = circles[index];
        if current.is_some_and(|e| encloses_weak(&e, &candidate)) {
            index += 1;
            continue;
        }

        restarts += 1;
        if restarts > max_restarts {
            debug!(circles = circles.len(); "Enclosing circle did not settle, using bounding fallback");
            return Some(bounding_fallback(circles));
        }

        let Some(extended) = extend_basis(&basis, candidate) else {
            debug!(circles = circles.len(); "No enclosing basis found, using bounding fallback");
            return Some(bounding_fallback(circles));
        };
        basis = extended;
        current = Some(enclose_basis(&basis));
        index = 0;
    }

    current
}

fn extend_basis(basis: &[Disc], p: Disc) -> Option<Vec<Disc>> {
    if encloses_weak_all(&p, basis) {
        return Some(vec![p]);
    }

    for &b in basis {
        if encloses_not(&p, &b) && encloses_weak_all(&enclose_basis2(&b, &p), basis) {
            return Some(vec![b, p]);
        }
    }

    for (i, &bi) in basis.iter().enumerate() {
        for &bj in &basis[i + 1..] {
            if encloses_not(&enclose_basis2(&bi, &bj), &p)
                && encloses_not(&enclose_basis2(&bi, &p), &bj)
                && encloses_not(&enclose_basis2(&bj, &p), &bi)
                && encloses_weak_all(&enclose_basis3(&bi, &bj, &p), basis)
            {
                return Some(vec![bi, bj, p]);
            }
        }
    }

    None
}

/// `a` does not contain `b`
fn encloses_not(a: &Disc, b: &Disc) -> bool {
    let dr = a.r - b.r;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr < 0.0 || dr * dr < dx * dx + dy * dy
}

/// `a` contains `b`, up to a small relative tolerance
fn encloses_weak(a: &Disc, b: &Disc) -> bool {
    let dr = a.r - b.r + a.r.max(b.r).max(1.0) * WEAK_EPSILON;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr > 0.0 && dr * dr > dx * dx + dy * dy
}

fn encloses_weak_all(a: &Disc, basis: &[Disc]) -> bool {
    basis.iter().all(|b| encloses_weak(a, b))
}

fn enclose_basis(basis: &[Disc]) -> Disc {
    match basis {
        [a] => *a,
        [a, b] => enclose_basis2(a, b),
        [a, b, c] => enclose_basis3(a, b, c),
        _ => bounding_fallback(basis),
    }
}

fn enclose_basis2(a: &Disc, b: &Disc) -> Disc {
    let x21 = b.x - a.x;
    let y21 = b.y - a.y;
    let r21 = b.r - a.r;
    let l = (x21 * x21 + y21 * y21).sqrt();
    if l == 0.0 {
        return if a.r >= b.r { *a } else { *b };
    }
    Disc {
        x: (a.x + b.x + x21 / l * r21) / 2.0,
        y: (a.y + b.y + y21 / l * r21) / 2.0,
        r: (l + a.r + b.r) / 2.0,
    }
}

/// Circle internally tangent to all three (Apollonius)
fn enclose_basis3(a: &Disc, b: &Disc, c: &Disc) -> Disc {
    let (x1, y1, r1) = (a.x, a.y, a.r);
    let (x2, y2, r2) = (b.x, b.y, b.r);
    let (x3, y3, r3) = (c.x, c.y, c.r);

    let a2 = x1 - x2;
    let a3 = x1 - x3;
    let b2 = y1 - y2;
    let b3 = y1 - y3;
    let c2 = r2 - r1;
    let c3 = r3 - r1;
    let d1 = x1 * x1 + y1 * y1 - r1 * r1;
    let d2 = d1 - x2 * x2 - y2 * y2 + r2 * r2;
    let d3 = d1 - x3 * x3 - y3 * y3 + r3 * r3;
    let ab = a3 * b2 - a2 * b3;
    if ab == 0.0 {
        return bounding_fallback(&[*a, *b, *c]);
    }

    let xa = (b2 * d3 - b3 * d2) / (ab * 2.0) - x1;
    let xb = (b3 * c2 - b2 * c3) / ab;
    let ya = (a3 * d2 - a2 * d3) / (ab * 2.0) - y1;
    let yb = (a2 * c3 - a3 * c2) / ab;
    let qa = xb * xb + yb * yb - 1.0;
    let qb = 2.0 * (r1 + xa * xb + ya * yb);
    let qc = xa * xa + ya * ya - r1 * r1;
    let r = if qa.abs() > DEGENERATE_EPSILON {
        -(qb + (qb * qb - 4.0 * qa * qc).max(0.0).sqrt()) / (2.0 * qa)
    } else {
        -qc / qb
    };

    Disc {
        x: x1 + xa + xb * r,
        y: y1 + ya + yb * r,
        r,
    }
}

/// A valid, not necessarily minimal, enclosing circle centred on the
/// bounding box of the input.
fn bounding_fallback(circles: &[Disc]) -> Disc {
    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for c in circles {
        min_x = min_x.min(c.x - c.r);
        min_y = min_y.min(c.y - c.r);
        max_x = max_x.max(c.x + c.r);
        max_y = max_y.max(c.y + c.r);
    }
    if circles.is_empty() {
        return Disc::default();
    }

    let x = (min_x + max_x) / 2.0;
    let y = (min_y + max_y) / 2.0;
    let r = circles
        .iter()
        .map(|c| ((c.x - x).powi(2) + (c.y - y).powi(2)).sqrt() + c.r)
        .fold(0.0, f64::max);
    Disc { x, y, r }
}
