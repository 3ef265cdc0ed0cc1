//! Indexed element access shared by the record and mapping wrappers.

use metaprop_reflect::{PathSegment, Value};

use super::Lookup;
use crate::{Error, Result};

/// Borrow the element at `index` of a resolved collection, for reads.
///
/// An absent (`Null`) collection has no elements.
pub(crate) fn element<'a>(
    segment: &PathSegment,
    collection: &'a Value,
    index: usize,
) -> Result<&'a Value> {
    match collection {
        Value::Array(items) => items
            .get(index)
            .ok_or_else(|| out_of_range(segment, index, items.len())),
        Value::Null => Err(out_of_range(segment, index, 0)),
        other => Err(not_a_sequence(segment, other)),
    }
}

/// Mutably borrow the element at `index`, for navigating through it.
///
/// A `Null` element is absent. For writes, the slot one past the end is
/// absent rather than out of range, so that it can be materialized by
/// appending.
pub(crate) fn element_mut<'a>(
    segment: &PathSegment,
    collection: &'a mut Value,
    index: usize,
    lookup: Lookup,
) -> Result<Option<&'a mut Value>> {
    match collection {
        Value::Array(items) => {
            let len = items.len();
            match items.get_mut(index) {
                Some(element) if element.is_null() => Ok(None),
                Some(element) => Ok(Some(element)),
                None if lookup == Lookup::Write && index == len => Ok(None),
                None => Err(out_of_range(segment, index, len)),
            }
        }
        Value::Null => match lookup {
            Lookup::Read => Err(out_of_range(segment, index, 0)),
            Lookup::Write => Ok(None),
        },
        other => Err(not_a_sequence(segment, other)),
    }
}

/// Store `value` at `index`, appending when `index` equals the length.
pub(crate) fn set_element(
    segment: &PathSegment,
    collection: &mut Value,
    index: usize,
    value: Value,
) -> Result<()> {
    let items = match collection {
        Value::Array(items) => items,
        other => return Err(not_a_sequence(segment, other)),
    };
    let len = items.len();
    if index < len {
        items[index] = value;
    } else if index == len {
        items.push(value);
    } else {
        return Err(out_of_range(segment, index, len));
    }
    Ok(())
}

fn out_of_range(segment: &PathSegment, index: usize, len: usize) -> Error {
    Error::IndexOutOfRange {
        property: segment.name().to_string(),
        index,
        len,
    }
}

fn not_a_sequence(segment: &PathSegment, found: &Value) -> Error {
    Error::NotASequence {
        property: segment.name().to_string(),
        found: found.kind(),
    }
}
