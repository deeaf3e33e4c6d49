pub mod todo;

pub use todo::{
    ListMarker, Metadata, MetadataEntry, TodoId, TodoItem, TodoMap, TodoMarker,
};
