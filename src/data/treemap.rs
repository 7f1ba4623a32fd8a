//! Market > Sector > Industry > Ticker treemap
//!
//! Tiles are sized by market cap and coloured by year-to-date return. Parent
//! colours are the market-cap weighted mean of their leaves. Layout uses the
//! squarified algorithm (Bruls, Huizing, van Wijk 2000), which keeps tile
//! aspect ratios close to 1 while preserving the order of the children.

use std::collections::BTreeMap;

use super::selection::Constituent;
use crate::constants::treemap::ROOT_LABEL;

/// Axis-aligned rectangle in layout space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    fn is_degenerate(&self) -> bool {
        !(self.w > 0.0 && self.h > 0.0)
    }

    /// Shrink by `pad` on the sides and bottom and `top` at the top
    fn inset(&self, top: f64, pad: f64) -> Self {
        Self {
            x: self.x + pad,
            y: self.y + top,
            w: (self.w - 2.0 * pad).max(0.0),
            h: (self.h - top - pad).max(0.0),
        }
    }
}

/// Hover details carried by ticker tiles
#[derive(Debug, Clone, PartialEq)]
pub struct LeafInfo {
    pub market_cap: f64,
    pub pe_ratio: f64,
    pub ytd_return: f64,
}

#[derive(Debug, Clone)]
pub struct TreemapNode {
    pub label: String,
    /// Sum of leaf market caps
    pub value: f64,
    /// Weighted mean return; NaN when no leaf below has a return
    pub color_value: f64,
    /// Market cap of leaves that contribute to `color_value`
    color_weight: f64,
    pub children: Vec<TreemapNode>,
    pub leaf: Option<LeafInfo>,
}

impl TreemapNode {
    fn leaf(row: &Constituent) -> Self {
        let has_color = row.ytd_return.is_finite();
        Self {
            label: row.ticker.clone(),
            value: row.market_cap,
            color_value: row.ytd_return,
            color_weight: if has_color { row.market_cap } else { 0.0 },
            children: Vec::new(),
            leaf: Some(LeafInfo {
                market_cap: row.market_cap,
                pe_ratio: row.pe_ratio,
                ytd_return: row.ytd_return,
            }),
        }
    }

    fn branch(label: String, mut children: Vec<TreemapNode>) -> Self {
        children.sort_by(|a, b| {
            b.value
                .partial_cmp(&a.value)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let value = children.iter().map(|c| c.value).sum();
        let color_weight: f64 = children.iter().map(|c| c.color_weight).sum();
        let color_value = if color_weight > 0.0 {
            children
                .iter()
                .filter(|c| c.color_weight > 0.0)
                .map(|c| c.color_weight * c.color_value)
                .sum::<f64>()
                / color_weight
        } else {
            f64::NAN
        };

        Self {
            label,
            value,
            color_value,
            color_weight,
            children,
            leaf: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.leaf.is_some()
    }

    /// Build the hierarchy; rows without a positive market cap cannot be sized and are left out
    pub fn build(rows: &[Constituent]) -> Self {
        profiling::scope!("build_treemap");

        let mut sectors: BTreeMap<&str, BTreeMap<&str, Vec<TreemapNode>>> = BTreeMap::new();
        for row in rows.iter().filter(|r| r.market_cap.is_finite() && r.market_cap > 0.0) {
            sectors
                .entry(row.sector.as_str())
                .or_default()
                .entry(row.industry.as_str())
                .or_default()
                .push(TreemapNode::leaf(row));
        }

        let sector_nodes = sectors
            .into_iter()
            .map(|(sector, industries)| {
                let industry_nodes = industries
                    .into_iter()
                    .map(|(industry, leaves)| TreemapNode::branch(industry.to_string(), leaves))
                    .collect();
                TreemapNode::branch(sector.to_string(), industry_nodes)
            })
            .collect();

        TreemapNode::branch(ROOT_LABEL.to_string(), sector_nodes)
    }

    /// Colour values of all leaves (for the colour scale domain)
    pub fn leaf_color_values(&self) -> Vec<f64> {
        let mut out = Vec::new();
        self.collect_leaf_colors(&mut out);
        out
    }

    fn collect_leaf_colors(&self, out: &mut Vec<f64>) {
        if self.is_leaf() {
            out.push(self.color_value);
        }
        for child in &self.children {
            child.collect_leaf_colors(out);
        }
    }
}

/// Split `rect` into one rectangle per value, areas proportional to the values.
///
/// Output order matches input order. Non-positive values get an empty
/// rectangle at the rect origin.
pub fn squarify(values: &[f64], rect: Bounds) -> Vec<Bounds> {
    let mut out = vec![Bounds::new(rect.x, rect.y, 0.0, 0.0); values.len()];

    let positive: Vec<usize> = (0..values.len())
        .filter(|&i| values[i].is_finite() && values[i] > 0.0)
        .collect();
    let total: f64 = positive.iter().map(|&i| values[i]).sum();

    if positive.is_empty() || total <= 0.0 || rect.is_degenerate() {
        return out;
    }

    let scale = rect.area() / total;
    let areas: Vec<f64> = positive.iter().map(|&i| values[i] * scale).collect();

    let mut free = rect;
    let mut start = 0;
    while start < areas.len() {
        let short = free.w.min(free.h);

        let mut end = start + 1;
        while end < areas.len()
            && worst_ratio(&areas[start..=end], short) <= worst_ratio(&areas[start..end], short)
        {
            end += 1;
        }

        let row = &areas[start..end];
        let row_sum: f64 = row.iter().sum();

        if free.w >= free.h {
            // Column on the left edge
            let col_w = row_sum / free.h;
            let mut y = free.y;
            for (k, &a) in row.iter().enumerate() {
                let h = a / col_w;
                out[positive[start + k]] = Bounds::new(free.x, y, col_w, h);
                y += h;
            }
            free.x += col_w;
            free.w = (free.w - col_w).max(0.0);
        } else {
            // Row along the top edge
            let row_h = row_sum / free.w;
            let mut x = free.x;
            for (k, &a) in row.iter().enumerate() {
                let w = a / row_h;
                out[positive[start + k]] = Bounds::new(x, free.y, w, row_h);
                x += w;
            }
            free.y += row_h;
            free.h = (free.h - row_h).max(0.0);
        }

        start = end;
    }

    out
}

/// Worst aspect ratio of a row laid along a side of length `short`
fn worst_ratio(row: &[f64], short: f64) -> f64 {
    let sum: f64 = row.iter().sum();
    let (min, max) = row
        .iter()
        .fold((f64::INFINITY, 0.0f64), |(lo, hi), &a| (lo.min(a), hi.max(a)));
    let side2 = short * short;
    let sum2 = sum * sum;
    (side2 * max / sum2).max(sum2 / (side2 * min))
}

/// A laid-out tile
#[derive(Debug, Clone)]
pub struct TreemapTile {
    /// Labels from the root down to this node
    pub path: Vec<String>,
    pub depth: usize,
    pub bounds: Bounds,
    pub value: f64,
    pub color_value: f64,
    pub leaf: Option<LeafInfo>,
}

impl TreemapTile {
    pub fn label(&self) -> &str {
        self.path.last().map(|s| s.as_str()).unwrap_or_default()
    }
}

/// Lay out the whole tree, parents before children
pub fn layout(root: &TreemapNode, rect: Bounds, header: f64, padding: f64) -> Vec<TreemapTile> {
    profiling::scope!("layout_treemap");

    let mut tiles = Vec::new();
    let mut path = Vec::new();
    layout_node(root, rect, header, padding, 0, &mut path, &mut tiles);
    tiles
}

fn layout_node(
    node: &TreemapNode,
    rect: Bounds,
    header: f64,
    padding: f64,
    depth: usize,
    path: &mut Vec<String>,
    tiles: &mut Vec<TreemapTile>,
) {
    path.push(node.label.clone());
    tiles.push(TreemapTile {
        path: path.clone(),
        depth,
        bounds: rect,
        value: node.value,
        color_value: node.color_value,
        leaf: node.leaf.clone(),
    });

    if !node.children.is_empty() && !rect.is_degenerate() {
        // Small tiles give up their label strip before their children
        let top = header.min(rect.h / 2.0);
        let inner = rect.inset(top, padding);
        let values: Vec<f64> = node.children.iter().map(|c| c.value).collect();
        for (child, bounds) in node.children.iter().zip(squarify(&values, inner)) {
            layout_node(child, bounds, header, padding, depth + 1, path, tiles);
        }
    }

    path.pop();
}

/// Diverging colour scale with a fixed midpoint
#[derive(Debug, Clone)]
pub struct ColorScale {
    stops: &'static [[u8; 3]],
    midpoint: f64,
    half_range: f64,
}

/// ColorBrewer RdYlGn, 11 classes
const RD_YL_GN: [[u8; 3]; 11] = [
    [165, 0, 38],
    [215, 48, 39],
    [244, 109, 67],
    [253, 174, 97],
    [254, 224, 139],
    [255, 255, 191],
    [217, 239, 139],
    [166, 217, 106],
    [102, 189, 99],
    [26, 152, 80],
    [0, 104, 55],
];

/// Colour used for tiles without a return
pub const MISSING_COLOR: [u8; 3] = [128, 128, 128];

impl ColorScale {
    /// Red (losses) to green (gains), centred on `midpoint`, domain symmetric around it
    pub fn rd_yl_gn(values: &[f64], midpoint: f64) -> Self {
        let half_range = values
            .iter()
            .filter(|v| v.is_finite())
            .map(|v| (v - midpoint).abs())
            .fold(0.0f64, f64::max);

        Self {
            stops: &RD_YL_GN,
            midpoint,
            half_range: if half_range > 0.0 { half_range } else { 1.0 },
        }
    }

    /// Domain covered by the scale
    pub fn domain(&self) -> (f64, f64) {
        (self.midpoint - self.half_range, self.midpoint + self.half_range)
    }

    pub fn color_for(&self, value: f64) -> [u8; 3] {
        if !value.is_finite() {
            return MISSING_COLOR;
        }

        let t = (((value - self.midpoint) / self.half_range + 1.0) / 2.0).clamp(0.0, 1.0);
        let pos = t * (self.stops.len() - 1) as f64;
        let lo = pos.floor() as usize;
        let hi = (lo + 1).min(self.stops.len() - 1);
        let frac = pos - lo as f64;

        let mut rgb = [0u8; 3];
        for (channel, out) in rgb.iter_mut().enumerate() {
            let a = self.stops[lo][channel] as f64;
            let b = self.stops[hi][channel] as f64;
            *out = (a + (b - a) * frac).round() as u8;
        }
        rgb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::selection::constituent;

    const EPS: f64 = 1e-9;

    fn close(a: Bounds, b: Bounds) -> bool {
        (a.x - b.x).abs() < EPS
            && (a.y - b.y).abs() < EPS
            && (a.w - b.w).abs() < EPS
            && (a.h - b.h).abs() < EPS
    }

    #[test]
    fn test_squarify_reference_layout() {
        // Worked example from the squarified treemap paper
        let values = [6.0, 6.0, 4.0, 3.0, 2.0, 2.0, 1.0];
        let rects = squarify(&values, Bounds::new(0.0, 0.0, 6.0, 4.0));

        assert!(close(rects[0], Bounds::new(0.0, 0.0, 3.0, 2.0)));
        assert!(close(rects[1], Bounds::new(0.0, 2.0, 3.0, 2.0)));
        assert!((rects[2].h - 7.0 / 3.0).abs() < EPS);
        assert!((rects[3].h - 7.0 / 3.0).abs() < EPS);
        assert!((rects[2].y).abs() < EPS);
    }

    #[test]
    fn test_squarify_tiles_the_parent() {
        let values = [50.0, 20.0, 13.0, 9.0, 5.0, 2.0, 1.0];
        let rect = Bounds::new(10.0, 20.0, 300.0, 200.0);
        let rects = squarify(&values, rect);
        let total: f64 = values.iter().sum();

        let area_sum: f64 = rects.iter().map(|r| r.area()).sum();
        assert!((area_sum - rect.area()).abs() < 1e-6);

        for (r, v) in rects.iter().zip(values) {
            assert!((r.area() - rect.area() * v / total).abs() < 1e-6);
            assert!(r.x >= rect.x - EPS && r.y >= rect.y - EPS);
            assert!(r.x + r.w <= rect.x + rect.w + 1e-6);
            assert!(r.y + r.h <= rect.y + rect.h + 1e-6);
        }
    }

    #[test]
    fn test_squarify_skips_non_positive() {
        let rects = squarify(&[0.0, 4.0, f64::NAN], Bounds::new(0.0, 0.0, 2.0, 2.0));
        assert_eq!(rects[0].area(), 0.0);
        assert!((rects[1].area() - 4.0).abs() < EPS);
        assert_eq!(rects[2].area(), 0.0);
    }

    #[test]
    fn test_squarify_degenerate_rect() {
        let rects = squarify(&[1.0, 2.0], Bounds::new(0.0, 0.0, 0.0, 10.0));
        assert!(rects.iter().all(|r| r.area() == 0.0));
    }

    #[test]
    fn test_build_hierarchy() {
        let rows = vec![
            constituent("AAPL", "Tech", "Hardware", 300.0, 30.0, 10.0),
            constituent("MSFT", "Tech", "Software", 100.0, 35.0, -10.0),
            constituent("JPM", "Financials", "Banks", 50.0, 12.0, 4.0),
            constituent("ZERO", "Financials", "Banks", 0.0, 12.0, 4.0),
        ];
        let root = TreemapNode::build(&rows);

        assert_eq!(root.label, "Market");
        assert_eq!(root.value, 450.0);

        // Children by value descending
        assert_eq!(root.children[0].label, "Tech");
        assert_eq!(root.children[1].label, "Financials");

        // Weighted mean: (300 * 10 + 100 * -10) / 400
        assert!((root.children[0].color_value - 5.0).abs() < EPS);

        // Zero cap rows are dropped
        assert_eq!(root.children[1].children[0].children.len(), 1);
        assert_eq!(root.leaf_color_values().len(), 3);
    }

    #[test]
    fn test_missing_return_excluded_from_colour() {
        let rows = vec![
            constituent("AAA", "S", "I", 100.0, 1.0, 8.0),
            constituent("BBB", "S", "I", 300.0, 1.0, f64::NAN),
        ];
        let root = TreemapNode::build(&rows);
        assert_eq!(root.value, 400.0);
        assert!((root.color_value - 8.0).abs() < EPS);
    }

    #[test]
    fn test_layout_depths() {
        let rows = vec![
            constituent("AAPL", "Tech", "Hardware", 300.0, 30.0, 10.0),
            constituent("JPM", "Financials", "Banks", 50.0, 12.0, 4.0),
        ];
        let root = TreemapNode::build(&rows);
        let tiles = layout(&root, Bounds::new(0.0, 0.0, 800.0, 600.0), 16.0, 1.0);

        // root + 2 sectors + 2 industries + 2 tickers
        assert_eq!(tiles.len(), 7);
        assert_eq!(tiles[0].depth, 0);
        let leaves: Vec<&TreemapTile> = tiles.iter().filter(|t| t.leaf.is_some()).collect();
        assert_eq!(leaves.len(), 2);
        assert!(leaves.iter().all(|t| t.depth == 3));
        assert_eq!(leaves[0].path, vec!["Market", "Tech", "Hardware", "AAPL"]);
        assert_eq!(leaves[0].label(), "AAPL");
    }

    #[test]
    fn test_empty_selection_layout() {
        let root = TreemapNode::build(&[]);
        let tiles = layout(&root, Bounds::new(0.0, 0.0, 100.0, 100.0), 16.0, 1.0);
        assert_eq!(tiles.len(), 1);
        assert!(root.color_value.is_nan());
    }

    #[test]
    fn test_color_scale_midpoint() {
        let scale = ColorScale::rd_yl_gn(&[-5.0, 20.0], 0.0);
        assert_eq!(scale.domain(), (-20.0, 20.0));
        assert_eq!(scale.color_for(0.0), [255, 255, 191]);
        assert_eq!(scale.color_for(20.0), [0, 104, 55]);
        assert_eq!(scale.color_for(-20.0), [165, 0, 38]);
        assert_eq!(scale.color_for(-100.0), [165, 0, 38]);
        assert_eq!(scale.color_for(f64::NAN), MISSING_COLOR);
    }
}
