pub mod collection;
pub mod type_gate;
pub mod typed_collection;
