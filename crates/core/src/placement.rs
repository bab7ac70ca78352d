//! Placement of a single part instance on a sheet.

use crate::geometry::Rect;
use crate::part::PartId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where one part instance ended up on a sheet.
///
/// `x`/`y` is the top-left corner of the part itself. `width`/`height` are
/// the dimensions the part occupies on the sheet after rotation, without
/// spacing. The optional `spacing` box is the padded rectangle reserved for
/// the part.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placement {
    /// Part this placement belongs to.
    pub part_id: PartId,
    /// Reference code of the part.
    pub reference: String,
    /// Instance number within the part quantity (0-based).
    pub instance: usize,
    /// Left edge of the part.
    pub x: f64,
    /// Top edge of the part.
    pub y: f64,
    /// Whether the part was turned by 90 degrees.
    pub rotated: bool,
    /// Occupied width on the sheet.
    pub width: f64,
    /// Occupied height on the sheet.
    pub height: f64,
    /// Reserved spacing box.
    pub spacing: Option<Rect>,
}

impl Placement {
    /// Creates a placement without a spacing box.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        part_id: PartId,
        reference: impl Into<String>,
        instance: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        rotated: bool,
    ) -> Self {
        Self {
            part_id,
            reference: reference.into(),
            instance,
            x,
            y,
            rotated,
            width,
            height,
            spacing: None,
        }
    }

    /// Attaches a spacing box.
    pub fn with_spacing(mut self, spacing: Rect) -> Self {
        self.spacing = Some(spacing);
        self
    }

    /// The rectangle covered by the part itself.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// The reserved rectangle: the spacing box, or the part itself if absent.
    pub fn footprint(&self) -> Rect {
        self.spacing.unwrap_or_else(|| self.rect())
    }

    /// Area covered by the part.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Width and height of the part before rotation.
    pub fn original_size(&self) -> (f64, f64) {
        if self.rotated {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }

    /// Returns true if the spacing box (when present) contains the part.
    pub fn is_consistent(&self) -> bool {
        match self.spacing {
            Some(spacing) => spacing.contains(&self.rect()),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_footprint_prefers_spacing_box() {
        let p = Placement::new(PartId(0), "A", 0, 15.0, 15.0, 600.0, 400.0, false);
        assert_eq!(p.footprint(), p.rect());

        let p = p.with_spacing(Rect::new(10.0, 10.0, 610.0, 410.0));
        assert_eq!(p.footprint(), Rect::new(10.0, 10.0, 610.0, 410.0));
        assert!(p.is_consistent());
    }

    #[test]
    fn test_inconsistent_spacing_box() {
        let p = Placement::new(PartId(0), "A", 0, 15.0, 15.0, 600.0, 400.0, false)
            .with_spacing(Rect::new(20.0, 10.0, 610.0, 410.0));
        assert!(!p.is_consistent());
    }

    #[test]
    fn test_original_size_undoes_rotation() {
        let p = Placement::new(PartId(3), "B", 1, 0.0, 0.0, 400.0, 600.0, true);
        assert_eq!(p.original_size(), (600.0, 400.0));
        assert_eq!(p.area(), 240_000.0);
    }
}
