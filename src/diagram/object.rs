//! Diagram objects and the validated object set

use crate::error::LayoutError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifier of a placeable object
pub type ObjectId = usize;

/// Id reserved for the link placeholder that fills the gap between linked objects
pub const LINK_ID: ObjectId = 0;

/// Rectangular footprint of an object, in grid cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Footprint {
    pub rows: usize,
    pub columns: usize,
}

impl Footprint {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self { rows, columns }
    }

    /// Footprint derived from the number of outgoing links.
    ///
    /// An object without links gets a preliminary size of 1, otherwise two cells
    /// per link. The row count is `ceil(sqrt(preliminary / 2))` and the object is
    /// twice as wide as it is tall, so the final size usually exceeds the
    /// preliminary one.
    pub fn from_link_count(links: usize) -> Self {
        let preliminary = if links == 0 { 1 } else { links * 2 };
        let rows = ceil_sqrt_of_half(preliminary);
        Self {
            rows,
            columns: 2 * rows,
        }
    }

    /// Number of cells covered
    pub fn size(&self) -> usize {
        self.rows * self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }
}

/// Smallest `r` such that `r * r >= n / 2`, computed without floats
pub(crate) fn ceil_sqrt_of_half(n: usize) -> usize {
    let mut r = 0;
    while 2 * r * r < n {
        r += 1;
    }
    r
}

/// A placeable object: a named rectangle that may link to other objects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramObject {
    id: ObjectId,
    name: String,
    linked_to: Vec<String>,
    footprint: Footprint,
}

impl DiagramObject {
    /// Create an object whose footprint follows from its link count
    pub fn new<S, I>(name: S, linked_to: I, id: ObjectId) -> Self
    where
        S: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let linked_to: Vec<String> = linked_to.into_iter().map(Into::into).collect();
        let footprint = Footprint::from_link_count(linked_to.len());
        Self {
            id,
            name: name.into(),
            linked_to,
            footprint,
        }
    }

    /// The link placeholder object (id 0, no links)
    pub fn link_placeholder() -> Self {
        Self::new("Link", Vec::<String>::new(), LINK_ID)
    }

    /// Replace the derived footprint with an explicit one
    pub fn with_footprint(mut self, footprint: Footprint) -> Self {
        self.footprint = footprint;
        self
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of the objects this one links to, in declaration order
    pub fn linked_to(&self) -> &[String] {
        &self.linked_to
    }

    pub fn footprint(&self) -> Footprint {
        self.footprint
    }

    pub fn size(&self) -> usize {
        self.footprint.size()
    }

    pub fn rows(&self) -> usize {
        self.footprint.rows
    }

    pub fn columns(&self) -> usize {
        self.footprint.columns
    }

    pub fn is_link_placeholder(&self) -> bool {
        self.id == LINK_ID
    }
}

/// A resolved link between two objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectLink {
    pub from: ObjectId,
    pub to: ObjectId,
}

/// The full, validated set of objects for one layout run.
///
/// Construction checks id and name uniqueness, the presence of the link
/// placeholder and that every link names a known object, so rule generation
/// never meets an unresolved reference.
#[derive(Debug, Clone)]
pub struct ObjectSet {
    objects: Vec<DiagramObject>,
    by_id: HashMap<ObjectId, usize>,
    by_name: HashMap<String, usize>,
    links: Vec<ObjectLink>,
}

impl ObjectSet {
    pub fn new(objects: Vec<DiagramObject>) -> Result<Self, LayoutError> {
        let mut by_id = HashMap::with_capacity(objects.len());
        let mut by_name = HashMap::with_capacity(objects.len());

        for (index, object) in objects.iter().enumerate() {
            if object.footprint.is_empty() {
                return Err(LayoutError::EmptyFootprint {
                    name: object.name.clone(),
                    rows: object.rows(),
                    columns: object.columns(),
                });
            }
            if let Some(&existing) = by_id.get(&object.id) {
                let first: &DiagramObject = &objects[existing];
                return Err(LayoutError::DuplicateId {
                    id: object.id,
                    first: first.name.clone(),
                    second: object.name.clone(),
                });
            }
            if by_name.contains_key(&object.name) {
                return Err(LayoutError::DuplicateName {
                    name: object.name.clone(),
                });
            }
            by_id.insert(object.id, index);
            by_name.insert(object.name.clone(), index);
        }

        let placeholder = by_id
            .get(&LINK_ID)
            .map(|&index| &objects[index])
            .ok_or(LayoutError::MissingLinkObject)?;
        if !placeholder.linked_to.is_empty() {
            return Err(LayoutError::LinkedPlaceholder {
                name: placeholder.name.clone(),
            });
        }

        let mut links = Vec::new();
        for object in &objects {
            for target in &object.linked_to {
                let &index = by_name.get(target).ok_or_else(|| LayoutError::UnknownLink {
                    from: object.name.clone(),
                    target: target.clone(),
                })?;
                links.push(ObjectLink {
                    from: object.id,
                    to: objects[index].id,
                });
            }
        }

        Ok(Self {
            objects,
            by_id,
            by_name,
            links,
        })
    }

    /// All objects in input order
    pub fn objects(&self) -> &[DiagramObject] {
        &self.objects
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiagramObject> {
        self.objects.iter()
    }

    /// Objects subject to the size and coherence rules (everything but the placeholder)
    pub fn placeable(&self) -> impl Iterator<Item = &DiagramObject> {
        self.objects.iter().filter(|object| !object.is_link_placeholder())
    }

    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.objects.iter().map(|object| object.id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, id: ObjectId) -> Option<&DiagramObject> {
        self.by_id.get(&id).map(|&index| &self.objects[index])
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&DiagramObject> {
        self.by_name.get(name).map(|&index| &self.objects[index])
    }

    /// Resolve a link target of `from`, failing on unknown names
    pub fn resolve_link(&self, from: &DiagramObject, target: &str) -> Result<&DiagramObject, LayoutError> {
        self.find_by_name(target).ok_or_else(|| LayoutError::UnknownLink {
            from: from.name.clone(),
            target: target.to_string(),
        })
    }

    /// Every link in declaration order
    pub fn links(&self) -> &[ObjectLink] {
        &self.links
    }

    /// Total number of cells the objects require
    pub fn total_size(&self) -> usize {
        self.objects.iter().map(DiagramObject::size).sum()
    }
}
