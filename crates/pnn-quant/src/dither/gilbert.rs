//! Generalized Hilbert ("gilbert") space-filling curve.
//!
//! Covers an arbitrary `width x height` rectangle, not just power-of-two
//! squares, visiting every pixel exactly once with unit steps except for
//! at most one diagonal step when both sides are odd.

/// Visiting order over a rectangle.
///
/// # Example
///
/// ```
/// use pnn_quant::GilbertCurve;
///
/// let points = GilbertCurve::new(2, 2).points();
/// assert_eq!(points, vec![(0, 0), (0, 1), (1, 1), (1, 0)]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GilbertCurve {
    width: usize,
    height: usize,
}

impl GilbertCurve {
    /// Curve over `width x height`.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Call `f(x, y)` for every pixel in curve order.
    ///
    /// A zero-area rectangle calls nothing.
    pub fn for_each<F: FnMut(usize, usize)>(&self, mut f: F) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let (w, h) = (self.width as i64, self.height as i64);
        if w >= h {
            generate2d(0, 0, w, 0, 0, h, &mut f);
        } else {
            generate2d(0, 0, 0, h, w, 0, &mut f);
        }
    }

    /// The whole visiting order, buffered.
    pub fn points(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::with_capacity(self.width * self.height);
        self.for_each(|x, y| out.push((x, y)));
        out
    }
}

/// Walk the rectangle spanned from `(x, y)` by the major axis `(ax, ay)`
/// and the minor axis `(bx, by)`.
fn generate2d<F: FnMut(usize, usize)>(
    x: i64,
    y: i64,
    ax: i64,
    ay: i64,
    bx: i64,
    by: i64,
    f: &mut F,
) {
    let w = (ax + ay).abs();
    let h = (bx + by).abs();
    let (dax, day) = (ax.signum(), ay.signum());
    let (dbx, dby) = (bx.signum(), by.signum());

    if h == 1 {
        let (mut x, mut y) = (x, y);
        for _ in 0..w {
            f(x as usize, y as usize);
            x += dax;
            y += day;
        }
        return;
    }

    if w == 1 {
        let (mut x, mut y) = (x, y);
        for _ in 0..h {
            f(x as usize, y as usize);
            x += dbx;
            y += dby;
        }
        return;
    }

    let (mut ax2, mut ay2) = (ax / 2, ay / 2);
    let (mut bx2, mut by2) = (bx / 2, by / 2);
    let w2 = (ax2 + ay2).abs();
    let h2 = (bx2 + by2).abs();

    if 2 * w > 3 * h {
        // Long and thin: split the major axis only.
        if w2 % 2 != 0 && w > 2 {
            ax2 += dax;
            ay2 += day;
        }
        generate2d(x, y, ax2, ay2, bx, by, f);
        generate2d(x + ax2, y + ay2, ax - ax2, ay - ay2, bx, by, f);
        return;
    }

    if h2 % 2 != 0 && h > 2 {
        bx2 += dbx;
        by2 += dby;
    }

    // up, across, down
    generate2d(x, y, bx2, by2, ax2, ay2, f);
    generate2d(x + bx2, y + by2, ax, ay, bx - bx2, by - by2, f);
    generate2d(
        x + (ax - dax) + (bx2 - dbx),
        y + (ay - day) + (by2 - dby),
        -bx2,
        -by2,
        -(ax - ax2),
        -(ay - ay2),
        f,
    );
}
