use crate::model::TreemapNode;

/// Fills missing (or zero) sizes bottom-up: a node gets the sum of its
/// children, a childless node gets `empty_leaf_size`. Explicit non-zero
/// sizes are kept.
#[derive(Debug, Clone, Copy)]
pub struct SumSizeImputer {
    pub empty_leaf_size: f64,
}

impl SumSizeImputer {
    pub fn impute(&self, node: &mut TreemapNode) {
        let mut sum = 0.0;
        for child in &mut node.children {
            self.impute(child);
            sum += child.size_or_zero();
        }

        let missing = node.size.is_none_or(|s| s <= 0.0 || !s.is_finite());
        if missing {
            node.size = Some(if node.is_leaf() {
                self.empty_leaf_size
            } else {
                sum
            });
        }
    }
}

/// Fills missing heat bottom-up with the size-weighted mean of the
/// children's heat. Childless nodes, and nodes whose children weigh
/// nothing, get `empty_leaf_heat`. Explicit heat is kept but clamped into
/// `0.0..=1.0`.
#[derive(Debug, Clone, Copy)]
pub struct WeightedHeatImputer {
    pub empty_leaf_heat: f64,
}

impl WeightedHeatImputer {
    pub fn impute(&self, node: &mut TreemapNode) {
        let mut weighted = 0.0;
        let mut weight = 0.0;
        for child in &mut node.children {
            self.impute(child);
            let size = child.size_or_zero();
            weighted += child.heat.unwrap_or(self.empty_leaf_heat) * size;
            weight += size;
        }

        let heat = match node.heat {
            Some(h) if h.is_finite() => h,
            _ if weight > 0.0 => weighted / weight,
            _ => self.empty_leaf_heat,
        };
        node.heat = Some(heat.clamp(0.0, 1.0));
    }
}
