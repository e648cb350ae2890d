//! # Keyed Collections
//!
//! Ordered key/value containers with convenience operations, and a
//! type-constrained variant that checks every value before it is stored.
//!
//! ## Features
//!
//! - **[`Collection<V>`]** – insertion-ordered mapping from [`Key`] (integer or string) to `V`,
//!   usable as a list (`push`, keys `0..n`) or as a dictionary (`set`/`get` by name)
//! - **[`TypedCollection<V, G>`]** – a `Collection` guarded by a [`TypeGate`]; rejected values
//!   never reach the collection
//! - **[`LooseEq`]** – loose equality used by `uniques`, `remove` and `contains_loose`
//! - **`serde` support** (default feature) – lists encode as JSON arrays, everything else as
//!   JSON objects
//!
//! ## Quick Examples
//!
//! ### Using Collection
//!
//! ```rust
//! use keyed_collections::Collection;
//!
//! let mut scores: Collection<u32> = [("ana", 7), ("bo", 3), ("cy", 7)].into_iter().collect();
//!
//! scores.set("dee", 9);
//! assert_eq!(scores.get("bo").unwrap(), &3);
//! assert_eq!(scores.uniques().count(), 3);
//!
//! let low = scores.remove_if(|score| *score < 5);
//! assert!(low.has("bo"));
//! assert_eq!(scores.count(), 3);
//!
//! assert_eq!(
//!     serde_json::to_string(&scores).unwrap(),
//!     r#"{"ana":7,"cy":7,"dee":9}"#
//! );
//! ```
//!
//! ### Using TypedCollection
//!
//! ```rust
//! use keyed_collections::{InstanceOf, Object, TypedCollection};
//!
//! struct Widget {
//!     name: &'static str,
//! }
//!
//! let mut widgets = TypedCollection::new(InstanceOf::<Widget>::new());
//! widgets.set("knob", Object::new(Widget { name: "knob" })).unwrap();
//!
//! // Anything else is turned away without touching the collection.
//! assert!(widgets.set("rock", Object::new(42_u8)).is_err());
//! assert_eq!(widgets.count(), 1);
//!
//! let knob = widgets.get("knob").unwrap().downcast_ref::<Widget>().unwrap();
//! assert_eq!(knob.name, "knob");
//! ```
//!
//! ## Threading
//!
//! Collections are plain single-threaded values. No operation is atomic across a
//! check-then-act sequence (`get_or_create`, typed `set`), so share them behind a
//! `Mutex` when several threads need write access.
//!
//! [`Collection<V>`]: generic::collection::Collection
//! [`TypedCollection<V, G>`]: generic::typed_collection::TypedCollection

pub mod equality;
pub mod error;
pub mod generic;
pub mod key;
#[cfg(feature = "serde")]
mod serialization;

pub use equality::LooseEq;
pub use error::{CollectionError, Result};
#[cfg(feature = "serde")]
pub use generic::type_gate::JsonKind;
pub use generic::{
    collection::Collection,
    type_gate::{InstanceOf, Object, Predicate, TypeGate},
    typed_collection::TypedCollection,
};
pub use key::Key;
