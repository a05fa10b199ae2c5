use covermap_protocol::Rect;

/// One weighted entry to lay out. `id` is opaque to the algorithm and is
/// handed back with the entry's rectangle.
#[derive(Debug, Clone, Copy)]
pub struct Weighted {
    pub id: usize,
    pub value: f64,
}

/// Squarified treemap layout (Bruls, Huizing, van Wijk).
///
/// `items` should be sorted by descending value for best aspect ratios.
/// Non-positive values are dropped. The returned rectangles tile `bounds`
/// exactly, in input order.
pub fn squarify(items: &[Weighted], bounds: &Rect) -> Vec<(usize, Rect)> {
    let items: Vec<&Weighted> = items
        .iter()
        .filter(|i| i.value > 0.0 && i.value.is_finite())
        .collect();
    if items.is_empty() || bounds.area() <= 0.0 {
        return Vec::new();
    }

    let total_value: f64 = items.iter().map(|i| i.value).sum();
    let total_area = bounds.area();
    let mut results = Vec::with_capacity(items.len());
    let mut remaining = *bounds;

    let mut row: Vec<&Weighted> = Vec::new();
    let mut row_area = 0.0;

    for item in items {
        let item_area = item.value / total_value * total_area;

        if row.is_empty() {
            row.push(item);
            row_area = item_area;
            continue;
        }

        let side = remaining.shorter_side();
        let worst_without = worst_aspect_ratio(&row, row_area, side);

        row.push(item);
        let worst_with = worst_aspect_ratio(&row, row_area + item_area, side);

        if worst_with <= worst_without {
            row_area += item_area;
        } else {
            row.pop();
            layout_row(&row, row_area, &mut remaining, &mut results);
            row.clear();
            row.push(item);
            row_area = item_area;
        }
    }

    if !row.is_empty() {
        layout_row(&row, row_area, &mut remaining, &mut results);
    }

    results
}

fn worst_aspect_ratio(row: &[&Weighted], row_area: f64, side: f64) -> f64 {
    if side <= 0.0 || row_area <= 0.0 {
        return f64::MAX;
    }

    let row_value: f64 = row.iter().map(|i| i.value).sum();
    let thickness = row_area / side;
    row.iter()
        .map(|item| {
            let length = item.value / row_value * side;
            if thickness > length {
                thickness / length
            } else {
                length / thickness
            }
        })
        .fold(0.0, f64::max)
}

/// Place `row` as a strip along the shorter side of `remaining`, then
/// shrink `remaining` past it.
fn layout_row(
    row: &[&Weighted],
    row_area: f64,
    remaining: &mut Rect,
    results: &mut Vec<(usize, Rect)>,
) {
    if remaining.area() <= 0.0 {
        return;
    }
    let row_value: f64 = row.iter().map(|i| i.value).sum();

    if remaining.w >= remaining.h {
        let strip_w = (row_area / remaining.h).min(remaining.w);
        let mut y = remaining.y;
        for item in row {
            let h = item.value / row_value * remaining.h;
            results.push((item.id, Rect::new(remaining.x, y, strip_w, h)));
            y += h;
        }
        remaining.x += strip_w;
        remaining.w -= strip_w;
    } else {
        let strip_h = (row_area / remaining.w).min(remaining.h);
        let mut x = remaining.x;
        for item in row {
            let w = item.value / row_value * remaining.w;
            results.push((item.id, Rect::new(x, remaining.y, w, strip_h)));
            x += w;
        }
        remaining.y += strip_h;
        remaining.h -= strip_h;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(values: &[f64]) -> Vec<Weighted> {
        values
            .iter()
            .enumerate()
            .map(|(id, &value)| Weighted { id, value })
            .collect()
    }

    #[test]
    fn empty_input() {
        assert!(squarify(&[], &Rect::new(0.0, 0.0, 100.0, 100.0)).is_empty());
        assert!(squarify(&items(&[1.0]), &Rect::new(0.0, 0.0, 0.0, 100.0)).is_empty());
    }

    #[test]
    fn single_item_fills_bounds() {
        let bounds = Rect::new(5.0, 5.0, 80.0, 40.0);
        let rects = squarify(&items(&[100.0]), &bounds);
        assert_eq!(rects.len(), 1);
        assert_eq!(rects[0].1, bounds);
    }

    #[test]
    fn areas_are_proportional() {
        let bounds = Rect::new(0.0, 0.0, 600.0, 400.0);
        let values = [6.0, 6.0, 4.0, 3.0, 2.0, 2.0, 1.0];
        let rects = squarify(&items(&values), &bounds);
        assert_eq!(rects.len(), values.len());

        let total: f64 = values.iter().sum();
        for (id, rect) in &rects {
            let expected = values[*id] / total * bounds.area();
            assert!((rect.area() - expected).abs() < 1e-6, "item {id}");
            assert!(bounds.contains(rect));
        }
    }

    #[test]
    fn zero_values_are_dropped() {
        let rects = squarify(&items(&[3.0, 0.0, 1.0]), &Rect::new(0.0, 0.0, 10.0, 10.0));
        let ids: Vec<usize> = rects.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![0, 2]);
    }
}
