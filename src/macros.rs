/// Builds a [`Value`](crate::Value) tree from a JSON-like literal.
///
/// Object keys are string literals and keep the order they are written in.
/// A value prefixed with flag names (`RESOURCE: "a.vmdl"`) becomes a flagged
/// value; wrap it in parentheses when it appears inside an array or object.
/// Any other expression goes through `Value::from`.
///
/// # Examples
///
/// ```rust
/// use serde_kv3::{kv3, Flags, Value};
///
/// let value = kv3!({
///     "name": "crate",
///     "size": [64, 64, 32],
///     "model": (RESOURCE: "models/crate.vmdl"),
///     "hidden": false
/// });
///
/// let map = value.as_object().unwrap();
/// assert_eq!(map.get("name"), Some(&Value::from("crate")));
/// assert_eq!(map.get("model").map(Value::flags), Some(Flags::RESOURCE));
/// ```
#[macro_export]
macro_rules! kv3 {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ($($flag:ident)|+ : $value:tt) => {
        $crate::Value::flagged(
            $crate::kv3!($value),
            $crate::Flags::empty() $(| $crate::Flags::$flag)+,
        )
    };

    ([]) => {
        $crate::Value::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::kv3!($elem)),*])
    };

    ({}) => {
        $crate::Value::Object($crate::Kv3Map::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::Kv3Map::new();
        $(
            object.insert($key.to_string(), $crate::kv3!($value));
        )*
        $crate::Value::Object(object)
    }};

    (( $($inner:tt)+ )) => {
        $crate::kv3!($($inner)+)
    };

    ($other:expr) => {
        $crate::Value::from($other)
    };
}

#[cfg(test)]
mod tests {
    use crate::{Flags, Kv3Map, Value};

    #[test]
    fn test_kv3_macro_primitives() {
        assert_eq!(kv3!(null), Value::Null);
        assert_eq!(kv3!(true), Value::Bool(true));
        assert_eq!(kv3!(42), Value::Int(42));
        assert_eq!(kv3!(3.5), Value::Float(3.5));
        assert_eq!(kv3!("hello"), Value::String("hello".to_string()));
    }

    #[test]
    fn test_kv3_macro_flags() {
        let value = kv3!(RESOURCE_NAME | RESOURCE: "a.vmdl");
        assert_eq!(value.flags(), Flags::RESOURCE | Flags::RESOURCE_NAME);
        assert_eq!(value.unflagged(), &Value::from("a.vmdl"));
    }

    #[test]
    fn test_kv3_macro_objects() {
        assert_eq!(kv3!({}), Value::Object(Kv3Map::new()));

        let obj = kv3!({
            "name": "Alice",
            "tags": ["a", (PANORAMA: "b")]
        });
        let map = obj.as_object().unwrap();
        assert_eq!(map.len(), 2);
        let tags = map.get("tags").and_then(Value::as_array).unwrap();
        assert_eq!(tags[1].flags(), Flags::PANORAMA);
    }
}
