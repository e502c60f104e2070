// File-system helpers used by the conversion commands:
// - Picker: interactive path selection behind a capability trait
// - Walk: folder enumeration with a path predicate
// - Ext: extension replacement and output format lookup
// - Size: human-readable file sizes

pub mod ext;
pub mod picker;
pub mod size;
pub mod walk;

pub use ext::*;
pub use picker::*;
pub use size::*;
pub use walk::*;
