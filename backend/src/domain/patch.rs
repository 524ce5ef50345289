//! Partial-update merge engine.
//!
//! Patch payloads model each field explicitly so that "not sent" is never
//! confused with "sent as zero or empty":
//!
//! - plain fields use `Option<T>`: `None` leaves the target alone;
//! - nullable fields use [`Nullable<T>`], which adds an explicit `null` that
//!   clears the target.
//!
//! Nested sub-records implement [`ApplyPatch`] and are merged only when their
//! enclosing wrapper is present. Nothing here validates; callers check
//! invariants before or after merging.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Tri-state field: absent, explicit `null`, or a value.
///
/// Deserialise with `#[serde(default)]` so a missing key becomes
/// [`Nullable::Absent`] while a literal `null` becomes [`Nullable::Null`].
///
/// # Examples
/// ```
/// use appliedto::domain::Nullable;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Patch {
///     #[serde(default)]
///     note: Nullable<String>,
/// }
///
/// let absent: Patch = serde_json::from_str("{}").unwrap();
/// let cleared: Patch = serde_json::from_str(r#"{"note":null}"#).unwrap();
/// assert_eq!(absent.note, Nullable::Absent);
/// assert_eq!(cleared.note, Nullable::Null);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Nullable<T> {
    /// The key was not supplied.
    #[default]
    Absent,
    /// The key was supplied as `null`.
    Null,
    /// The key was supplied with a value.
    Present(T),
}

impl<T> From<Option<T>> for Nullable<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Self::Present)
    }
}

impl<'de, T> Deserialize<'de> for Nullable<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Self::from)
    }
}

impl<T> Serialize for Nullable<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Absent | Self::Null => serializer.serialize_none(),
            Self::Present(value) => serializer.serialize_some(value),
        }
    }
}

/// Merge a patch payload into a sub-record.
pub trait ApplyPatch<P> {
    /// Apply every present field of `patch` to `self`.
    fn apply_patch(&mut self, patch: P);
}

/// Overwrite `target` only when `incoming` is present.
pub fn patch<T>(target: &mut T, incoming: Option<T>) {
    if let Some(value) = incoming {
        *target = value;
    }
}

/// Overwrite or clear a nullable `target`; absence leaves it untouched.
pub fn patch_nullable<T>(target: &mut Option<T>, incoming: Nullable<T>) {
    match incoming {
        Nullable::Absent => {}
        Nullable::Null => *target = None,
        Nullable::Present(value) => *target = Some(value),
    }
}

/// Recurse into a required sub-record when its patch is present.
pub fn patch_nested<T, P>(target: &mut T, incoming: Option<P>)
where
    T: ApplyPatch<P>,
{
    if let Some(patch) = incoming {
        target.apply_patch(patch);
    }
}

/// Recurse into an optional sub-record.
///
/// `null` clears it. A present patch on an empty target starts from
/// `T::default()`.
pub fn patch_nested_nullable<T, P>(target: &mut Option<T>, incoming: Nullable<P>)
where
    T: ApplyPatch<P> + Default,
{
    match incoming {
        Nullable::Absent => {}
        Nullable::Null => *target = None,
        Nullable::Present(patch) => target.get_or_insert_with(T::default).apply_patch(patch),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Range {
        from: i64,
        to: i64,
    }

    #[derive(Debug, Default, Deserialize)]
    struct RangePatch {
        from: Option<i64>,
        to: Option<i64>,
    }

    impl ApplyPatch<RangePatch> for Range {
        fn apply_patch(&mut self, patch: RangePatch) {
            super::patch(&mut self.from, patch.from);
            super::patch(&mut self.to, patch.to);
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Record {
        name: String,
        note: Option<String>,
        range: Option<Range>,
    }

    #[derive(Debug, Default, Deserialize)]
    struct RecordPatch {
        name: Option<String>,
        #[serde(default)]
        note: Nullable<String>,
        #[serde(default)]
        range: Nullable<RangePatch>,
    }

    fn apply(record: &mut Record, patch: RecordPatch) {
        super::patch(&mut record.name, patch.name);
        patch_nullable(&mut record.note, patch.note);
        patch_nested_nullable(&mut record.range, patch.range);
    }

    fn record() -> Record {
        Record {
            name: "Alice".to_owned(),
            note: Some("keep".to_owned()),
            range: Some(Range { from: 1, to: 2 }),
        }
    }

    fn parse(value: serde_json::Value) -> RecordPatch {
        serde_json::from_value(value).expect("valid patch json")
    }

    #[rstest]
    fn empty_patch_leaves_record_unchanged() {
        let mut target = record();
        apply(&mut target, parse(json!({})));
        assert_eq!(target, record());
    }

    #[rstest]
    fn present_plain_field_overwrites_only_that_field() {
        let mut target = record();
        apply(&mut target, parse(json!({ "name": "Bob" })));
        assert_eq!(target.name, "Bob");
        assert_eq!(target.note.as_deref(), Some("keep"));
        assert_eq!(target.range, Some(Range { from: 1, to: 2 }));
    }

    #[rstest]
    #[case(json!({ "note": null }), None)]
    #[case(json!({ "note": "" }), Some(""))]
    #[case(json!({ "note": "changed" }), Some("changed"))]
    fn nullable_field_distinguishes_null_from_empty(
        #[case] body: serde_json::Value,
        #[case] expected: Option<&str>,
    ) {
        let mut target = record();
        apply(&mut target, parse(body));
        assert_eq!(target.note.as_deref(), expected);
    }

    #[rstest]
    fn nested_patch_updates_only_supplied_fields() {
        let mut target = record();
        apply(&mut target, parse(json!({ "range": { "to": 9 } })));
        assert_eq!(target.range, Some(Range { from: 1, to: 9 }));
    }

    #[rstest]
    fn nested_null_clears_sub_record() {
        let mut target = record();
        apply(&mut target, parse(json!({ "range": null })));
        assert_eq!(target.range, None);
    }

    #[rstest]
    fn nested_patch_on_missing_sub_record_starts_from_default() {
        let mut target = Record {
            range: None,
            ..record()
        };
        apply(&mut target, parse(json!({ "range": { "from": 5 } })));
        assert_eq!(target.range, Some(Range { from: 5, to: 0 }));
    }

    #[rstest]
    fn zero_value_is_present_not_absent() {
        let mut target = Range { from: 3, to: 4 };
        target.apply_patch(RangePatch {
            from: Some(0),
            to: None,
        });
        assert_eq!(target, Range { from: 0, to: 4 });
    }

    #[rstest]
    fn nullable_serialises_absent_and_null_as_null() {
        let values = [
            Nullable::Absent,
            Nullable::Null,
            Nullable::Present("x".to_owned()),
        ]
        .map(|value| serde_json::to_value(value).expect("serialise"));
        assert_eq!(values, [json!(null), json!(null), json!("x")]);
    }
}
