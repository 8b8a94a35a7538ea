//! File I/O for object definitions

use super::object::{DiagramObject, Footprint, ObjectId};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk form of an object; the footprint is derived when omitted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectDescriptor {
    pub id: ObjectId,
    pub name: String,
    #[serde(default)]
    pub linked_to: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footprint: Option<Footprint>,
}

impl From<ObjectDescriptor> for DiagramObject {
    fn from(descriptor: ObjectDescriptor) -> Self {
        let object = DiagramObject::new(descriptor.name, descriptor.linked_to, descriptor.id);
        match descriptor.footprint {
            Some(footprint) => object.with_footprint(footprint),
            None => object,
        }
    }
}

impl From<&DiagramObject> for ObjectDescriptor {
    fn from(object: &DiagramObject) -> Self {
        let derived = Footprint::from_link_count(object.linked_to().len());
        Self {
            id: object.id(),
            name: object.name().to_string(),
            linked_to: object.linked_to().to_vec(),
            footprint: (object.footprint() != derived).then_some(object.footprint()),
        }
    }
}

/// Load object definitions from a YAML file
pub fn load_objects_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<DiagramObject>> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read objects file: {}", path.as_ref().display()))?;

    parse_objects_from_str(&content)
        .with_context(|| format!("Failed to parse objects from file: {}", path.as_ref().display()))
}

/// Parse object definitions from a YAML list
pub fn parse_objects_from_str(content: &str) -> Result<Vec<DiagramObject>> {
    let descriptors: Vec<ObjectDescriptor> =
        serde_yaml::from_str(content).context("Objects must be a YAML list of {id, name, linked_to}")?;

    if descriptors.is_empty() {
        anyhow::bail!("Objects file contains no objects");
    }

    Ok(descriptors.into_iter().map(DiagramObject::from).collect())
}

/// Save object definitions as YAML
pub fn save_objects_to_file<P: AsRef<Path>>(objects: &[DiagramObject], path: P) -> Result<()> {
    let descriptors: Vec<ObjectDescriptor> = objects.iter().map(ObjectDescriptor::from).collect();
    let content = serde_yaml::to_string(&descriptors).context("Failed to serialize objects")?;

    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write objects file: {}", path.as_ref().display()))?;

    Ok(())
}

/// The Salesforce sample: Link, Account -> Contact, Contact, User -> Account
pub fn salesforce_objects() -> Vec<DiagramObject> {
    vec![
        DiagramObject::link_placeholder(),
        DiagramObject::new("Account", ["Contact"], 1),
        DiagramObject::new("Contact", Vec::<String>::new(), 2),
        DiagramObject::new("User", ["Account"], 3),
    ]
}

/// Create example object files
pub fn create_example_objects<P: AsRef<Path>>(dir: P) -> Result<()> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    save_objects_to_file(&salesforce_objects(), dir.join("salesforce.yaml"))?;

    let pair = vec![
        DiagramObject::link_placeholder(),
        DiagramObject::new("Order", ["Invoice"], 1),
        DiagramObject::new("Invoice", Vec::<String>::new(), 2),
    ];
    save_objects_to_file(&pair, dir.join("order_invoice.yaml"))?;

    let standalone = vec![
        DiagramObject::link_placeholder(),
        DiagramObject::new("Report", Vec::<String>::new(), 1).with_footprint(Footprint::new(2, 2)),
    ];
    save_objects_to_file(&standalone, dir.join("standalone.yaml"))?;

    Ok(())
}
