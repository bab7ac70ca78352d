//! Individual part instances.

use cutplan_core::{Part, PartId, Placement};

/// One physical instance of a part waiting to be packed.
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub part_id: PartId,
    pub reference: String,
    /// Instance number within the part quantity (0-based).
    pub instance: usize,
    pub width: f64,
    pub height: f64,
}

impl Piece {
    /// Unpadded area.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Footprint once `spacing` is added to both dimensions.
    pub fn padded(&self, spacing: f64) -> (f64, f64) {
        (self.width + spacing, self.height + spacing)
    }

    /// Recovers the piece a placement was made for, in its original orientation.
    pub fn from_placement(placement: &Placement) -> Self {
        let (width, height) = placement.original_size();
        Self {
            part_id: placement.part_id,
            reference: placement.reference.clone(),
            instance: placement.instance,
            width,
            height,
        }
    }
}

/// Expands every part into `quantity` pieces, keeping part order.
pub fn expand_pieces<'a>(parts: impl IntoIterator<Item = &'a Part>) -> Vec<Piece> {
    parts
        .into_iter()
        .flat_map(|part| {
            (0..part.quantity()).map(move |instance| Piece {
                part_id: part.id(),
                reference: part.reference().to_string(),
                instance,
                width: part.width(),
                height: part.height(),
            })
        })
        .collect()
}

/// Total unpadded area of `pieces`.
pub fn total_area(pieces: &[Piece]) -> f64 {
    pieces.iter().map(Piece::area).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutplan_core::{PartList, PartSpec};

    #[test]
    fn test_expand_keeps_order_and_instances() {
        let mut parts = PartList::new();
        parts.add(PartSpec::new("A", 100.0, 50.0).with_quantity(2)).unwrap();
        parts.add(PartSpec::new("B", 30.0, 20.0)).unwrap();

        let pieces = expand_pieces(parts.iter());
        let labels: Vec<_> = pieces
            .iter()
            .map(|p| (p.reference.as_str(), p.instance))
            .collect();
        assert_eq!(labels, vec![("A", 0), ("A", 1), ("B", 0)]);
        assert_eq!(total_area(&pieces), 10_600.0);
        assert_eq!(pieces[0].padded(10.0), (110.0, 60.0));
    }

    #[test]
    fn test_from_rotated_placement() {
        let placement = Placement::new(PartId(4), "C", 2, 0.0, 0.0, 50.0, 100.0, true);
        let piece = Piece::from_placement(&placement);
        assert_eq!((piece.width, piece.height), (100.0, 50.0));
        assert_eq!(piece.instance, 2);
    }
}
