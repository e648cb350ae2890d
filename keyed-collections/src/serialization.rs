//! `serde` support.
//!
//! A collection whose keys are exactly `0..n` in order is encoded as a
//! sequence; any other collection is encoded as a map with stringified keys.
//! Decoding accepts both shapes. Map keys that spell a canonical integer are
//! decoded as [`Key::Int`], the same conversion `Key::from(&str)` applies, so
//! `decode(encode(c)) == c` holds for collections built through the public API.

use std::{fmt, marker::PhantomData};

use serde::{
    de::{self, MapAccess, SeqAccess, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::{
    generic::{collection::Collection, typed_collection::TypedCollection},
    key::Key,
};

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Key::Int(int) => serializer.serialize_i64(*int),
            Key::Str(text) => serializer.serialize_str(text),
        }
    }
}

struct KeyVisitor;

impl<'de> Visitor<'de> for KeyVisitor {
    type Value = Key;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer or a string key")
    }

    fn visit_i64<E: de::Error>(self, int: i64) -> Result<Key, E> {
        Ok(Key::Int(int))
    }

    fn visit_u64<E: de::Error>(self, int: u64) -> Result<Key, E> {
        i64::try_from(int)
            .map(Key::Int)
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(int), &self))
    }

    fn visit_str<E: de::Error>(self, text: &str) -> Result<Key, E> {
        Ok(Key::from_canonical(text))
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(KeyVisitor)
    }
}

impl<V: Serialize> Serialize for Collection<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_list() {
            serializer.collect_seq(self.values())
        } else {
            serializer.collect_map(self.iter())
        }
    }
}

struct CollectionVisitor<V> {
    _marker: PhantomData<fn() -> V>,
}

impl<'de, V: Deserialize<'de>> Visitor<'de> for CollectionVisitor<V> {
    type Value = Collection<V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a sequence or a map")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut collection = Collection::with_capacity(seq.size_hint().unwrap_or(0));
        let mut index = 0_i64;
        while let Some(value) = seq.next_element()? {
            collection.set(index, value);
            index += 1;
        }
        Ok(collection)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut collection = Collection::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<Key, V>()? {
            collection.set(key, value);
        }
        Ok(collection)
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Collection<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CollectionVisitor {
            _marker: PhantomData,
        })
    }
}

/// Encodes like the inner collection. Decode into a [`Collection`] and wrap it
/// with [`TypedCollection::from_collection`].
impl<V: Serialize, G> Serialize for TypedCollection<V, G> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (**self).serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::{json, Value};

    use super::*;
    use crate::{error::CollectionError, generic::type_gate::JsonKind};

    #[test]
    fn test_json_serialize() {
        let collection: Collection<i32> = [("a", 1)].into_iter().collect();
        assert_eq!(serde_json::to_string(&collection).unwrap(), r#"{"a":1}"#);

        let collection: Collection<i32> = [("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(serde_json::to_value(&collection).unwrap(), json!({"a": 1, "b": 2}));
    }

    #[test]
    fn test_lists_encode_as_arrays() {
        let list = Collection::from_values(["x", "y"]);
        assert_eq!(serde_json::to_string(&list).unwrap(), r#"["x","y"]"#);
        assert_eq!(serde_json::to_string(&Collection::<u8>::new()).unwrap(), "[]");

        let mut sparse = Collection::from_values([1, 2, 3]);
        sparse.remove(&2);
        assert_eq!(serde_json::to_string(&sparse).unwrap(), r#"{"0":1,"2":3}"#);
    }

    #[test]
    fn test_decode_normalises_canonical_integer_keys() {
        let collection: Collection<Value> =
            serde_json::from_str(r#"{"0": "zero", "07": "seven", "x": [1, 2]}"#).unwrap();
        let keys: Vec<Key> = collection.keys().cloned().collect();
        assert_eq!(keys, vec![Key::Int(0), Key::from("07"), Key::from("x")]);
        assert_eq!(collection.get("x").unwrap(), &json!([1, 2]));
    }

    #[test]
    fn test_integer_string_keys_round_trip() {
        let mut collection = Collection::new();
        collection.set("5", 1);
        collection.set("a", 2);
        let encoded = serde_json::to_string(&collection).unwrap();
        assert_eq!(encoded, r#"{"5":1,"a":2}"#);
        let decoded: Collection<i32> = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.keys().collect::<Vec<_>>(), collection.keys().collect::<Vec<_>>());
        assert_eq!(decoded, collection);
        assert!(decoded.has(5) && decoded.has("5"));

        let listed: Collection<i32> = [("0", 10), ("1", 20)].into_iter().collect();
        assert!(listed.is_list());
        assert_eq!(serde_json::to_string(&listed).unwrap(), "[10,20]");
        let decoded: Collection<i32> = serde_json::from_str("[10,20]").unwrap();
        assert_eq!(decoded.get("0").unwrap(), &10);
        assert_eq!(decoded, listed);
    }

    #[test]
    fn test_decode_rejects_scalars() {
        assert!(serde_json::from_str::<Collection<i32>>("3").is_err());
        assert!(serde_json::from_str::<Collection<i32>>(r#"{"a": "b"}"#).is_err());
    }

    #[test]
    fn test_key_encoding() {
        assert_eq!(serde_json::to_string(&Key::Int(-2)).unwrap(), "-2");
        assert_eq!(serde_json::to_string(&Key::from("k")).unwrap(), r#""k""#);
        assert_eq!(serde_json::from_str::<Key>("5").unwrap(), Key::Int(5));
        assert_eq!(serde_json::from_str::<Key>(r#""5""#).unwrap(), Key::Int(5));
        assert!(serde_json::from_str::<Key>("18446744073709551615").is_err());
    }

    #[test]
    fn test_typed_collection_round_trip() {
        let mut typed = TypedCollection::new(JsonKind::Number);
        typed.set("a", json!(1)).unwrap();
        typed.set("b", json!(2.5)).unwrap();
        let encoded = serde_json::to_string(&typed).unwrap();
        assert_eq!(encoded, r#"{"a":1,"b":2.5}"#);

        let decoded: Collection<Value> = serde_json::from_str(&encoded).unwrap();
        let typed_again = TypedCollection::from_collection(JsonKind::Number, decoded).unwrap();
        assert_eq!(typed_again, typed);

        let decoded: Collection<Value> = serde_json::from_str(r#"{"a": "1"}"#).unwrap();
        assert_eq!(
            TypedCollection::from_collection(JsonKind::Number, decoded).unwrap_err(),
            CollectionError::InvalidValueType {
                expected: "number".to_string(),
                found: "string".to_string(),
            }
        );
    }

    fn arb_key() -> impl Strategy<Value = Key> {
        prop_oneof![
            (-50..50_i64).prop_map(Key::Int),
            "[a-z_]{1,6}".prop_map(Key::from),
            "-?[0-9]{1,3}".prop_map(Key::from),
        ]
    }

    proptest! {
        #[test]
        fn test_json_round_trip(pairs in prop::collection::vec((arb_key(), any::<i32>()), 0..16)) {
            let collection: Collection<i32> = pairs.into_iter().collect();
            let encoded = serde_json::to_string(&collection).unwrap();
            let decoded: Collection<i32> = serde_json::from_str(&encoded).unwrap();
            prop_assert_eq!(decoded.keys().collect::<Vec<_>>(), collection.keys().collect::<Vec<_>>());
            prop_assert_eq!(decoded, collection);
        }

        #[test]
        fn test_list_round_trip(values in prop::collection::vec(any::<bool>(), 0..16)) {
            let collection = Collection::from_values(values.clone());
            let encoded = serde_json::to_value(&collection).unwrap();
            prop_assert_eq!(&encoded, &json!(values));
            prop_assert_eq!(serde_json::from_value::<Collection<bool>>(encoded).unwrap(), collection);
        }
    }
}
