use serde::{Deserialize, Serialize};

/// One barcode extracted from a record's multi-valued barcode field.
///
/// `position` reflects left-to-right order among the codes that survived
/// validation; position 0 is the primary barcode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BarcodeEntry {
    pub owner_id: String,
    pub code: String,
    pub position: usize,
}

/// A correspondence between one catalog-A record and one catalog-B record,
/// justified by a shared barcode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkEdge {
    pub a_id: String,
    pub b_id: String,
    pub matched_code: String,
    pub a_position: usize,
    pub b_position: usize,
    /// `1.0` for a primary-to-primary match, decaying with barcode positions.
    pub confidence: f64,
}

impl LinkEdge {
    #[must_use]
    pub fn new(
        a_id: impl Into<String>,
        b_id: impl Into<String>,
        matched_code: impl Into<String>,
        a_position: usize,
        b_position: usize,
    ) -> Self {
        Self {
            a_id: a_id.into(),
            b_id: b_id.into(),
            matched_code: matched_code.into(),
            a_position,
            b_position,
            confidence: link_confidence(a_position, b_position),
        }
    }

    /// Returns `true` if `self` should replace `other` as the edge for the
    /// same `(a_id, b_id)` pair: smaller `a_position` wins, then the
    /// lexically smaller matched code, then the smaller `b_position`.
    #[must_use]
    pub fn preferred_over(&self, other: &LinkEdge) -> bool {
        (self.a_position, self.matched_code.as_str(), self.b_position)
            < (other.a_position, other.matched_code.as_str(), other.b_position)
    }
}

/// Confidence of a barcode match given the positions on both sides.
#[must_use]
pub fn link_confidence(a_position: usize, b_position: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let distance = (a_position + b_position) as f64;
    1.0 / (1.0 + distance)
}

/// Exported link-table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRow {
    pub a_id: String,
    pub b_id: String,
    pub matched_code: String,
    pub confidence: f64,
}

impl From<&LinkEdge> for LinkRow {
    fn from(edge: &LinkEdge) -> Self {
        Self {
            a_id: edge.a_id.clone(),
            b_id: edge.b_id.clone(),
            matched_code: edge.matched_code.clone(),
            confidence: edge.confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_to_primary_confidence_is_one() {
        assert!((link_confidence(0, 0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn confidence_decays_with_position() {
        assert!(link_confidence(0, 1) < link_confidence(0, 0));
        assert!(link_confidence(2, 1) < link_confidence(1, 1));
    }

    #[test]
    fn preferred_over_uses_position_then_code() {
        let primary = LinkEdge::new("a1", "b1", "22222222", 0, 3);
        let secondary = LinkEdge::new("a1", "b1", "11111111", 1, 0);
        assert!(primary.preferred_over(&secondary));
        assert!(!secondary.preferred_over(&primary));

        let lower_code = LinkEdge::new("a1", "b1", "11111111", 1, 0);
        let higher_code = LinkEdge::new("a1", "b1", "33333333", 1, 0);
        assert!(lower_code.preferred_over(&higher_code));
    }
}
