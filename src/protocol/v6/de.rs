//! Field-level deserializers for service records
//!
//! Each helper consumes exactly one JSON value and leaves the stream on the
//! token after it. Nothing here ever fails on a value that is merely
//! unexpected in content (unknown code, odd date, missing array wrapper);
//! only broken structure is an error.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};

use super::date::{parse_json_date, parse_json_utc_date};
use super::types::{Attributes, TypeCode};

fn resolve<T: TypeCode>(id: i64) -> T {
    match T::try_from_id(id) {
        Some(value) => value,
        None => {
            tracing::warn!(id, field = T::ID_FIELD, "unknown type code");
            T::UNKNOWN
        }
    }
}

fn integral(v: f64) -> Option<i64> {
    (v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64).then_some(v as i64)
}

/// Integer id that may also arrive as `20.0` or `"20"`
///
/// Anything else (`null`, a fraction, a non-numeric string, a nested
/// value) reads as `None`.
struct LooseId(Option<i64>);

struct LooseIdVisitor;

impl<'de> Visitor<'de> for LooseIdVisitor {
    type Value = LooseId;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("an integer id")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<LooseId, E> {
        Ok(LooseId(Some(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<LooseId, E> {
        Ok(LooseId(i64::try_from(v).ok()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<LooseId, E> {
        Ok(LooseId(integral(v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<LooseId, E> {
        Ok(LooseId(v.trim().parse().ok()))
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<LooseId, E> {
        Ok(LooseId(None))
    }

    fn visit_unit<E: de::Error>(self) -> Result<LooseId, E> {
        Ok(LooseId(None))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<LooseId, A::Error>
    where
        A: SeqAccess<'de>,
    {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(LooseId(None))
    }

    fn visit_map<A>(self, mut map: A) -> Result<LooseId, A::Error>
    where
        A: MapAccess<'de>,
    {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(LooseId(None))
    }
}

impl<'de> Deserialize<'de> for LooseId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_any(LooseIdVisitor)
    }
}

/// Visitor for integer-coded enumerations
///
/// Accepts a bare number, scaled by [`TypeCode::BARE_SCALE`] before lookup,
/// or an object carrying [`TypeCode::ID_FIELD`]. Other members of the
/// object are skipped. `null` yields [`TypeCode::UNKNOWN`]. Integral
/// floats and numeric strings are read as integers; any other odd id is
/// logged and yields [`TypeCode::UNKNOWN`].
pub struct TypeCodeVisitor<T>(std::marker::PhantomData<T>);

impl<T> TypeCodeVisitor<T> {
    pub fn new() -> Self {
        TypeCodeVisitor(std::marker::PhantomData)
    }
}

impl<T> Default for TypeCodeVisitor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'de, T: TypeCode> Visitor<'de> for TypeCodeVisitor<T> {
    type Value = T;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "an integer or an object with {}", T::ID_FIELD)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<T, E> {
        Ok(resolve(v / T::BARE_SCALE))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<T, E> {
        let v = i64::try_from(v).map_err(|_| E::custom(format!("type code out of range: {v}")))?;
        self.visit_i64(v)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<T, E> {
        match integral(v) {
            Some(v) => self.visit_i64(v),
            None => {
                tracing::warn!(value = v, field = T::ID_FIELD, "type code is not an integer");
                Ok(T::UNKNOWN)
            }
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<T, E> {
        match v.trim().parse::<i64>() {
            Ok(v) => self.visit_i64(v),
            Err(_) => {
                tracing::warn!(value = v, field = T::ID_FIELD, "type code is not an integer");
                Ok(T::UNKNOWN)
            }
        }
    }

    fn visit_unit<E: de::Error>(self) -> Result<T, E> {
        Ok(T::UNKNOWN)
    }

    fn visit_map<A>(self, mut map: A) -> Result<T, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut value = T::UNKNOWN;
        while let Some(name) = map.next_key::<String>()? {
            if name == T::ID_FIELD {
                if let LooseId(Some(id)) = map.next_value()? {
                    value = resolve(id);
                }
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(value)
    }
}

struct LenientListVisitor<T>(std::marker::PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for LenientListVisitor<T> {
    type Value = Vec<T>;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("an array")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Vec<T>, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut list = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<Option<T>>()? {
            match item {
                Some(item) => list.push(item),
                None => tracing::debug!("skipping null list element"),
            }
        }
        Ok(list)
    }

    fn visit_map<A>(self, mut map: A) -> Result<Vec<T>, A::Error>
    where
        A: MapAccess<'de>,
    {
        tracing::debug!("expected an array, skipping an object");
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(Vec::new())
    }

    fn visit_unit<E: de::Error>(self) -> Result<Vec<T>, E> {
        Ok(Vec::new())
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Vec<T>, E> {
        Ok(Vec::new())
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Vec<T>, E> {
        Ok(Vec::new())
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Vec<T>, E> {
        Ok(Vec::new())
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Vec<T>, E> {
        Ok(Vec::new())
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<Vec<T>, E> {
        Ok(Vec::new())
    }
}

/// A list that tolerates a missing array wrapper
///
/// Anything but an array (including `null`) is skipped whole and decodes
/// to an empty list. `null` elements are dropped; the rest keep stream
/// order.
pub fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: de::Deserializer<'de>,
    T: Deserialize<'de>,
{
    deserializer.deserialize_any(LenientListVisitor(std::marker::PhantomData))
}

#[derive(Deserialize)]
struct RawAttribute {
    #[serde(rename = "AttributeTypeID", default = "default_attribute_id")]
    id: i64,
    #[serde(rename = "IsOn", default)]
    is_on: bool,
}

fn default_attribute_id() -> i64 {
    1
}

/// `[{"AttributeTypeID": 1, "IsOn": true}, ...]` into a set
///
/// Only attributes that resolve and are switched on end up in the set.
/// Unknown ids are dropped: the service adds new attributes over time.
pub fn attributes<'de, D>(deserializer: D) -> Result<Attributes, D::Error>
where
    D: de::Deserializer<'de>,
{
    let raw: Vec<Option<RawAttribute>> = lenient_list(deserializer)?;

    let mut set = Attributes::empty();
    for attr in raw.into_iter().flatten() {
        match Attributes::from_id(attr.id) {
            Some(flag) if attr.is_on => set |= flag,
            Some(_) => {}
            None => tracing::debug!(id = attr.id, "dropping unknown attribute"),
        }
    }
    Ok(set)
}

/// Text of a date member; any non-string token is an anomaly
struct DateTextVisitor;

impl DateTextVisitor {
    fn not_text<E>(kind: &str) -> Result<Option<String>, E> {
        tracing::warn!(kind, "date is not a string");
        Ok(None)
    }
}

impl<'de> Visitor<'de> for DateTextVisitor {
    type Value = Option<String>;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("a date string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Option<String>, E> {
        Ok(Some(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Option<String>, E> {
        Ok(Some(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Option<String>, E> {
        Ok(None)
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Option<String>, E> {
        Self::not_text("bool")
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Option<String>, E> {
        Self::not_text("number")
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Option<String>, E> {
        Self::not_text("number")
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Option<String>, E> {
        Self::not_text("number")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Option<String>, A::Error>
    where
        A: SeqAccess<'de>,
    {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Self::not_text("array")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Option<String>, A::Error>
    where
        A: MapAccess<'de>,
    {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Self::not_text("object")
    }
}

/// Date field with the embedded zone offset applied
pub fn json_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: de::Deserializer<'de>,
{
    let text = deserializer.deserialize_any(DateTextVisitor)?;
    Ok(text.as_deref().and_then(parse_json_date))
}

/// Date field read as UTC, ignoring any embedded zone offset
pub fn json_utc_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: de::Deserializer<'de>,
{
    let text = deserializer.deserialize_any(DateTextVisitor)?;
    Ok(text.as_deref().and_then(parse_json_utc_date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::v6::types::{ContainerType, GeocacheType, MemberType};

    #[derive(Debug, Deserialize)]
    struct Holder {
        #[serde(rename = "Attributes", default, deserialize_with = "attributes")]
        attributes: Attributes,
        #[serde(rename = "Ids", default, deserialize_with = "lenient_list")]
        ids: Vec<u32>,
        #[serde(rename = "Date", default, deserialize_with = "json_date")]
        date: Option<DateTime<Utc>>,
        #[serde(rename = "UtcDate", default, deserialize_with = "json_utc_date")]
        utc_date: Option<DateTime<Utc>>,
    }

    #[test]
    fn test_member_type_bare_number_is_scaled() {
        let bare: MemberType = serde_json::from_str("20").unwrap();
        let object: MemberType = serde_json::from_str(r#"{"MemberTypeId":2}"#).unwrap();
        assert_eq!(bare, MemberType::Charter);
        assert_eq!(bare, object);

        let object: MemberType =
            serde_json::from_str(r#"{"MemberTypeName":"Premium","MemberTypeId":3,"Extra":[1,{"a":2}]}"#)
                .unwrap();
        assert_eq!(object, MemberType::Premium);
    }

    #[test]
    fn test_type_code_object_and_null() {
        let ty: Option<GeocacheType> =
            serde_json::from_str(r#"{"GeocacheTypeId":3,"GeocacheTypeName":"Multi-cache"}"#).unwrap();
        assert_eq!(ty, Some(GeocacheType::Multi));

        let ty: Option<GeocacheType> = serde_json::from_str("null").unwrap();
        assert_eq!(ty, None);

        let container: ContainerType = serde_json::from_str("null").unwrap();
        assert_eq!(container, ContainerType::NotChosen);
    }

    #[test]
    fn test_type_code_unknown_is_sentinel() {
        let ty: GeocacheType = serde_json::from_str(r#"{"GeocacheTypeId":123456}"#).unwrap();
        assert_eq!(ty, GeocacheType::Unknown);

        let container: ContainerType = serde_json::from_str(r#"{"ContainerTypeId":99}"#).unwrap();
        assert_eq!(container, ContainerType::NotChosen);

        let member: MemberType = serde_json::from_str("990").unwrap();
        assert_eq!(member, MemberType::Guest);
    }

    #[test]
    fn test_attributes_drop_unknown_and_off() {
        let holder: Holder = serde_json::from_str(
            r#"{"Attributes":[{"AttributeTypeID":1,"IsOn":true},{"AttributeTypeID":9999,"IsOn":true}]}"#,
        )
        .unwrap();
        assert_eq!(holder.attributes, Attributes::DOGS);

        let holder: Holder = serde_json::from_str(
            r#"{"Attributes":[{"AttributeTypeID":8,"IsOn":false},{"IsOn":true,"AttributeTypeID":24,"Name":"x"},null]}"#,
        )
        .unwrap();
        assert_eq!(holder.attributes, Attributes::WHEELCHAIR_ACCESSIBLE);
    }

    #[test]
    fn test_lenient_list_skips_non_array() {
        for json in [
            r#"{"Ids":{"a":[1,2],"b":{"c":null}}}"#,
            r#"{"Ids":null}"#,
            r#"{"Ids":"1,2,3"}"#,
            r#"{"Ids":7}"#,
            r#"{}"#,
        ] {
            let holder: Holder = serde_json::from_str(json).unwrap();
            assert!(holder.ids.is_empty(), "{json}");
        }

        let holder: Holder = serde_json::from_str(r#"{"Ids":[5,3,9,1]}"#).unwrap();
        assert_eq!(holder.ids, vec![5, 3, 9, 1]);
    }

    #[test]
    fn test_dates_bad_text_is_none() {
        let holder: Holder = serde_json::from_str(
            r#"{"Date":"/Date(1318763400000+0100)/","UtcDate":"/Date(1318763400000+0100)/"}"#,
        )
        .unwrap();
        assert_eq!(holder.date.unwrap().timestamp_millis(), 1318763400000 + 3600000);
        assert_eq!(holder.utc_date.unwrap().timestamp_millis(), 1318763400000);

        let holder: Holder = serde_json::from_str(r#"{"Date":"yesterday","UtcDate":null}"#).unwrap();
        assert_eq!(holder.date, None);
        assert_eq!(holder.utc_date, None);
    }

    #[test]
    fn test_type_code_float_and_string_ids() {
        let bare: MemberType = serde_json::from_str("20.0").unwrap();
        assert_eq!(bare, MemberType::Charter);
        let bare: MemberType = serde_json::from_str(r#""30""#).unwrap();
        assert_eq!(bare, MemberType::Premium);

        let ty: GeocacheType = serde_json::from_str(r#"{"GeocacheTypeId":"3"}"#).unwrap();
        assert_eq!(ty, GeocacheType::Multi);
        let ty: GeocacheType = serde_json::from_str(r#"{"GeocacheTypeId":137.0}"#).unwrap();
        assert_eq!(ty, GeocacheType::Earthcache);

        let ty: GeocacheType = serde_json::from_str(r#"{"GeocacheTypeId":2.5}"#).unwrap();
        assert_eq!(ty, GeocacheType::Unknown);
        let ty: GeocacheType =
            serde_json::from_str(r#"{"GeocacheTypeId":{"Nested":[1]},"GeocacheTypeName":"x"}"#).unwrap();
        assert_eq!(ty, GeocacheType::Unknown);
        let container: ContainerType = serde_json::from_str(r#""micro""#).unwrap();
        assert_eq!(container, ContainerType::NotChosen);
    }

    #[test]
    fn test_lenient_list_drops_null_elements() {
        let holder: Holder = serde_json::from_str(r#"{"Ids":[null,4,null,2]}"#).unwrap();
        assert_eq!(holder.ids, vec![4, 2]);
    }

    #[test]
    fn test_non_string_dates_are_none() {
        for json in [
            r#"{"Date":1318763400000,"UtcDate":true}"#,
            r#"{"Date":{"Ticks":1},"UtcDate":[1,2]}"#,
            r#"{"Date":-1.5,"UtcDate":null}"#,
        ] {
            let holder: Holder = serde_json::from_str(json).unwrap();
            assert_eq!(holder.date, None, "{json}");
            assert_eq!(holder.utc_date, None, "{json}");
        }
    }

    #[test]
    fn test_broken_structure_is_error() {
        assert!(serde_json::from_str::<Holder>(r#"{"Ids":[1,2}"#).is_err());
        assert!(serde_json::from_str::<MemberType>(r#"{"MemberTypeId":2"#).is_err());
    }
}
