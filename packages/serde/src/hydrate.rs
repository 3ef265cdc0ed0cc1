//! Hydration of serde data into typed records.
//!
//! [`to_value`](crate::to_value) only knows JSON shapes, so objects always
//! become mappings. Hydration walks the data alongside a declared
//! [`TypeDescriptor`] and builds records wherever one is declared, writing
//! every property through its setter.

use std::collections::BTreeMap;

use metaprop_reflect::{
    AccessorKind, Record, ReflectError, TypeDescriptor, TypeRegistry, Value, ValueKind,
};
use serde::Serialize;

use crate::convert::{decode_bytes, json_to_value};
use crate::Error;

/// Serialize `data` and hydrate it as an instance of the record type
/// `type_name`.
///
/// Object keys are matched to properties relaxedly, so a Rust field
/// `sku_code` fills a property declared as `skuCode`.
///
/// # Example
///
/// ```rust
/// use metaprop_reflect::{RecordType, TypeDescriptor, TypeRegistry, Value};
/// use metaprop_serde::to_record;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Item {
///     sku_code: String,
///     quantity: u32,
/// }
///
/// let registry = TypeRegistry::new();
/// registry
///     .register(
///         RecordType::builder("Item")
///             .field("skuCode", TypeDescriptor::String)
///             .field("quantity", TypeDescriptor::Integer)
///             .build(),
///     )
///     .unwrap();
///
/// let item = Item { sku_code: "A-1".into(), quantity: 2 };
/// let record = to_record(&item, "Item", &registry).unwrap();
/// assert_eq!(record.field("skuCode"), Some(&Value::from("A-1")));
/// ```
pub fn to_record<T: Serialize>(
    data: &T,
    type_name: &str,
    registry: &TypeRegistry,
) -> Result<Record, Error> {
    let json = serde_json::to_value(data).map_err(|e| Error::encode(e.to_string()))?;
    match json {
        serde_json::Value::Object(object) => hydrate_record(object, type_name, registry, ""),
        other => Err(Error::Mismatch {
            path: String::new(),
            expected: TypeDescriptor::record(type_name),
            found: json_kind(&other),
        }),
    }
}

/// Serialize `data` and hydrate it as a value of the declared type.
pub fn to_typed_value<T: Serialize>(
    data: &T,
    ty: &TypeDescriptor,
    registry: &TypeRegistry,
) -> Result<Value, Error> {
    let json = serde_json::to_value(data).map_err(|e| Error::encode(e.to_string()))?;
    hydrate(json, ty, registry)
}

/// Hydrate parsed JSON as a value of the declared type.
pub fn hydrate(
    json: serde_json::Value,
    ty: &TypeDescriptor,
    registry: &TypeRegistry,
) -> Result<Value, Error> {
    hydrate_at(json, ty, registry, "")
}

fn hydrate_at(
    json: serde_json::Value,
    ty: &TypeDescriptor,
    registry: &TypeRegistry,
    path: &str,
) -> Result<Value, Error> {
    let mismatch = |found: ValueKind| Error::Mismatch {
        path: path.to_string(),
        expected: ty.clone(),
        found,
    };

    match (ty, json) {
        (_, serde_json::Value::Null) => Ok(Value::Null),
        (TypeDescriptor::Unknown, json) => Ok(json_to_value(json)),
        (TypeDescriptor::Record(name), serde_json::Value::Object(object)) => {
            hydrate_record(object, name, registry, path).map(Value::Record)
        }
        (TypeDescriptor::List(element), serde_json::Value::Array(items)) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| hydrate_at(item, element, registry, &format!("{}[{}]", path, i)))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        (TypeDescriptor::Map(element), serde_json::Value::Object(object)) => object
            .into_iter()
            .map(|(key, item)| {
                let value = hydrate_at(item, element, registry, &join(path, &key))?;
                Ok((key, value))
            })
            .collect::<Result<BTreeMap<_, _>, Error>>()
            .map(Value::Map),
        (TypeDescriptor::Bytes, serde_json::Value::String(text)) => {
            decode_bytes(&text).map(Value::Bytes)
        }
        (TypeDescriptor::Float, json @ serde_json::Value::Number(_)) => {
            match json_to_value(json) {
                Value::Integer(i) => Ok(Value::Float(i as f64)),
                other => Ok(other),
            }
        }
        (declared, json) => {
            let value = json_to_value(json);
            let matches = matches!(
                (declared, &value),
                (TypeDescriptor::Bool, Value::Bool(_))
                    | (TypeDescriptor::Integer, Value::Integer(_))
                    | (TypeDescriptor::String, Value::String(_))
            );
            if matches {
                Ok(value)
            } else {
                Err(mismatch(value.kind()))
            }
        }
    }
}

fn hydrate_record(
    object: serde_json::Map<String, serde_json::Value>,
    type_name: &str,
    registry: &TypeRegistry,
    path: &str,
) -> Result<Record, Error> {
    let metadata = registry.require(type_name)?;
    let mut record = Record::new(metadata.clone());

    for (key, json) in object {
        let property_path = join(path, &key);
        let property = metadata
            .find_property(&key, true)
            .filter(|name| metadata.has_setter(name))
            .ok_or_else(|| Error::Property {
                path: property_path.clone(),
                source: ReflectError::NoSuchProperty {
                    type_name: type_name.to_string(),
                    property: key.clone(),
                    accessor: AccessorKind::Setter,
                },
            })?;
        let declared = metadata
            .setter_type(&property)
            .map_err(|source| Error::Property {
                path: property_path.clone(),
                source,
            })?;
        let value = hydrate_at(json, &declared, registry, &property_path)?;
        metadata
            .set_invoker(&property)
            .map_err(|source| Error::Property {
                path: property_path.clone(),
                source,
            })?
            .invoke(&mut record, value)
            .map_err(|source| Error::Invoke {
                path: property_path,
                source,
            })?;
    }
    Ok(record)
}

fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", path, name)
    }
}

fn json_kind(json: &serde_json::Value) -> ValueKind {
    match json {
        serde_json::Value::Null => ValueKind::Null,
        serde_json::Value::Bool(_) => ValueKind::Bool,
        serde_json::Value::Number(n) if n.is_i64() => ValueKind::Integer,
        serde_json::Value::Number(_) => ValueKind::Float,
        serde_json::Value::String(_) => ValueKind::String,
        serde_json::Value::Array(_) => ValueKind::Array,
        serde_json::Value::Object(_) => ValueKind::Map,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metaprop_reflect::{InvokeError, RecordType};
    use std::sync::Arc;

    #[derive(Serialize)]
    struct Item {
        sku_code: String,
        quantity: u32,
    }

    #[derive(Serialize)]
    struct Order {
        order_items: Vec<Item>,
        tags: BTreeMap<String, String>,
        total: u32,
    }

    fn registry() -> TypeRegistry {
        let registry = TypeRegistry::new();
        registry
            .register(
                RecordType::builder("Order")
                    .field("orderItems", TypeDescriptor::list(TypeDescriptor::record("Item")))
                    .field("tags", TypeDescriptor::map(TypeDescriptor::String))
                    .field("total", TypeDescriptor::Float)
                    .build(),
            )
            .unwrap();
        registry
            .register(
                RecordType::builder("Item")
                    .field("skuCode", TypeDescriptor::String)
                    .field("quantity", TypeDescriptor::Integer)
                    .build(),
            )
            .unwrap();
        registry
    }

    #[test]
    fn nested_records_are_hydrated() {
        let registry = registry();
        let order = Order {
            order_items: vec![Item {
                sku_code: "A-1".to_string(),
                quantity: 2,
            }],
            tags: [("gift".to_string(), "yes".to_string())].into(),
            total: 12,
        };

        let record = to_record(&order, "Order", &registry).unwrap();
        // integers widen into declared floats
        assert_eq!(record.field("total"), Some(&Value::Float(12.0)));

        let items = record.field("orderItems").and_then(Value::as_array).unwrap();
        let item = items[0].as_record().unwrap();
        assert_eq!(item.type_name(), "Item");
        assert_eq!(item.field("skuCode"), Some(&Value::from("A-1")));
        assert_eq!(item.field("quantity"), Some(&Value::from(2)));

        let tags = record.field("tags").and_then(Value::as_map).unwrap();
        assert_eq!(tags.get("gift"), Some(&Value::from("yes")));
    }

    #[test]
    fn unknown_keys_are_rejected_with_their_path() {
        let registry = registry();
        let json = serde_json::json!({"orderItems": [{"skuCode": "A", "colour": "red"}]});

        match hydrate(json, &TypeDescriptor::record("Order"), &registry) {
            Err(Error::Property { path, source }) => {
                assert_eq!(path, "orderItems[0].colour");
                assert!(matches!(source, ReflectError::NoSuchProperty { .. }));
            }
            other => panic!("expected a property error, got {:?}", other),
        }
    }

    #[test]
    fn mismatched_scalars_are_rejected() {
        let registry = registry();
        let json = serde_json::json!({"orderItems": [{"quantity": "two"}]});

        match hydrate(json, &TypeDescriptor::record("Order"), &registry) {
            Err(Error::Mismatch {
                path,
                expected,
                found,
            }) => {
                assert_eq!(path, "orderItems[0].quantity");
                assert_eq!(expected, TypeDescriptor::Integer);
                assert_eq!(found, ValueKind::String);
            }
            other => panic!("expected a mismatch, got {:?}", other),
        }
    }

    #[test]
    fn top_level_must_be_an_object() {
        let registry = registry();
        assert!(matches!(
            to_record(&42, "Order", &registry),
            Err(Error::Mismatch { .. })
        ));
        assert!(matches!(
            to_record(&serde_json::json!({}), "Invoice", &registry),
            Err(Error::Reflect(ReflectError::UnknownType { .. }))
        ));
    }

    #[test]
    fn nulls_and_unknown_types_pass_through() {
        let registry = registry();
        assert_eq!(
            hydrate(serde_json::Value::Null, &TypeDescriptor::Integer, &registry).unwrap(),
            Value::Null
        );
        assert_eq!(
            to_typed_value(&vec![1, 2], &TypeDescriptor::Unknown, &registry).unwrap(),
            Value::from(vec![1, 2])
        );
        assert_eq!(
            hydrate(serde_json::json!("AQID"), &TypeDescriptor::Bytes, &registry).unwrap(),
            Value::Bytes(vec![1, 2, 3])
        );
    }

    #[test]
    fn failing_setters_surface_as_invoke_errors() {
        let registry = TypeRegistry::new();
        let ty: Arc<dyn metaprop_reflect::TypeMetadata> = RecordType::builder("Account")
            .accessor(
                "balance",
                TypeDescriptor::Integer,
                |record| Ok(record.field("balance").cloned().unwrap_or_default()),
                |_, _| Err(InvokeError::new("balance is managed by the ledger")),
            )
            .build();
        registry.register(ty).unwrap();

        match to_record(&serde_json::json!({"balance": 5}), "Account", &registry) {
            Err(Error::Invoke { path, source }) => {
                assert_eq!(path, "balance");
                assert_eq!(source.message(), "balance is managed by the ledger");
            }
            other => panic!("expected an invoke error, got {:?}", other),
        }
    }
}
