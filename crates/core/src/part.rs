//! Parts, the part registry and grouping keys.

use crate::{Error, Result};
use std::fmt;
use std::hash::{Hash, Hasher};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable arena index of a part, handed out by [`PartList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PartId(pub u32);

impl PartId {
    /// Returns the raw index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Description of a part before it is registered.
///
/// ```rust
/// use cutplan_core::PartSpec;
///
/// let spec = PartSpec::new("P-001", 600.0, 400.0)
///     .with_name("Side panel")
///     .with_material("MDF", 18.0)
///     .with_quantity(4);
/// assert_eq!(spec.quantity, 4);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PartSpec {
    /// Reference code printed on the label.
    #[cfg_attr(feature = "serde", serde(rename = "ref"))]
    pub reference: String,
    /// Display name.
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    /// Material name.
    #[cfg_attr(feature = "serde", serde(default = "default_material"))]
    pub material: String,
    /// Material thickness.
    #[cfg_attr(feature = "serde", serde(default))]
    pub thickness: f64,
    /// Width of the part.
    pub width: f64,
    /// Height of the part.
    pub height: f64,
    /// Number of identical pieces required.
    #[cfg_attr(feature = "serde", serde(default = "default_quantity"))]
    pub quantity: usize,
}

#[cfg(feature = "serde")]
fn default_material() -> String {
    "default".to_string()
}

#[cfg(feature = "serde")]
fn default_quantity() -> usize {
    1
}

impl PartSpec {
    /// Creates a spec with a single piece of the default material.
    pub fn new(reference: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            reference: reference.into(),
            name: String::new(),
            material: "default".to_string(),
            thickness: 0.0,
            width,
            height,
            quantity: 1,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets material and thickness.
    pub fn with_material(mut self, material: impl Into<String>, thickness: f64) -> Self {
        self.material = material.into();
        self.thickness = thickness;
        self
    }

    /// Sets the required quantity.
    pub fn with_quantity(mut self, quantity: usize) -> Self {
        self.quantity = quantity;
        self
    }

    /// Validates dimensions, thickness, quantity and material.
    pub fn validate(&self) -> Result<()> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(Error::InvalidPart(format!(
                "{}: width must be positive, got {}",
                self.reference, self.width
            )));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(Error::InvalidPart(format!(
                "{}: height must be positive, got {}",
                self.reference, self.height
            )));
        }
        if !(self.thickness.is_finite() && self.thickness >= 0.0) {
            return Err(Error::InvalidPart(format!(
                "{}: thickness must be non-negative, got {}",
                self.reference, self.thickness
            )));
        }
        if self.quantity == 0 {
            return Err(Error::InvalidPart(format!(
                "{}: quantity must be at least 1",
                self.reference
            )));
        }
        if self.material.trim().is_empty() {
            return Err(Error::InvalidPart(format!(
                "{}: material must not be empty",
                self.reference
            )));
        }
        Ok(())
    }
}

/// A validated, immutable part.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Part {
    id: PartId,
    reference: String,
    name: String,
    material: String,
    thickness: f64,
    width: f64,
    height: f64,
    quantity: usize,
}

impl Part {
    /// Creates a part from a spec, rejecting invalid input.
    pub fn new(id: PartId, spec: PartSpec) -> Result<Self> {
        spec.validate()?;
        Ok(Self {
            id,
            reference: spec.reference,
            name: spec.name,
            material: spec.material,
            thickness: spec.thickness,
            width: spec.width,
            height: spec.height,
            quantity: spec.quantity,
        })
    }

    /// Part id.
    pub fn id(&self) -> PartId {
        self.id
    }

    /// Reference code.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Material name.
    pub fn material(&self) -> &str {
        &self.material
    }

    /// Material thickness.
    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    /// Width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Height.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Required quantity.
    pub fn quantity(&self) -> usize {
        self.quantity
    }

    /// Area of a single piece.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Area of all pieces of this part.
    pub fn total_area(&self) -> f64 {
        self.area() * self.quantity as f64
    }

    /// The (material, thickness) key this part is packed under.
    pub fn group_key(&self) -> GroupKey {
        GroupKey::new(self.material.clone(), self.thickness)
    }
}

/// Ordered registry of parts that assigns arena ids.
#[derive(Debug, Clone, Default)]
pub struct PartList {
    parts: Vec<Part>,
    next_id: u32,
}

impl PartList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and registers a part, returning its id.
    pub fn add(&mut self, spec: PartSpec) -> Result<PartId> {
        let id = PartId(self.next_id);
        let part = Part::new(id, spec)?;
        self.next_id += 1;
        self.parts.push(part);
        Ok(id)
    }

    /// Registers every spec, stopping at the first invalid one.
    pub fn extend(&mut self, specs: impl IntoIterator<Item = PartSpec>) -> Result<Vec<PartId>> {
        specs.into_iter().map(|spec| self.add(spec)).collect()
    }

    /// Removes a part. Ids are never reused.
    pub fn remove(&mut self, id: PartId) -> Option<Part> {
        let pos = self.parts.iter().position(|p| p.id == id)?;
        Some(self.parts.remove(pos))
    }

    /// Looks up a part by id.
    pub fn get(&self, id: PartId) -> Option<&Part> {
        self.parts.iter().find(|p| p.id == id)
    }

    /// Iterates parts in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter()
    }

    /// Parts as a slice.
    pub fn as_slice(&self) -> &[Part] {
        &self.parts
    }

    /// Number of registered parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Returns true if no parts are registered.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Total number of pieces across all parts.
    pub fn total_quantity(&self) -> usize {
        self.parts.iter().map(|p| p.quantity).sum()
    }

    /// Removes every part. The id counter keeps counting.
    pub fn clear(&mut self) {
        self.parts.clear();
    }
}

/// Material and thickness pair; parts with different keys never share a sheet.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GroupKey {
    /// Material name.
    pub material: String,
    /// Material thickness.
    pub thickness: f64,
}

impl GroupKey {
    /// Creates a key.
    pub fn new(material: impl Into<String>, thickness: f64) -> Self {
        Self {
            material: material.into(),
            thickness: thickness + 0.0,
        }
    }

    /// Bit pattern used for equality and hashing; `-0.0` collapses to `0.0`.
    fn thickness_bits(&self) -> u64 {
        (self.thickness + 0.0).to_bits()
    }
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.material == other.material && self.thickness_bits() == other.thickness_bits()
    }
}

impl Eq for GroupKey {}

impl Hash for GroupKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.material.hash(state);
        self.thickness_bits().hash(state);
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}mm", self.material, self.thickness)
    }
}
