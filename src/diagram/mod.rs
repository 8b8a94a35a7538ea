//! Diagram objects, grid sizing and layouts

pub mod grid;
pub mod io;
pub mod object;
pub mod stencil;

pub use grid::{GridSize, LayoutGrid};
pub use io::{create_example_objects, load_objects_from_file, salesforce_objects, save_objects_to_file};
pub use object::{DiagramObject, Footprint, ObjectId, ObjectLink, ObjectSet, LINK_ID};
pub use stencil::Stencil;
