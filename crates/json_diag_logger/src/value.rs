//! Loosely typed call arguments and their depth-bounded, cycle-safe textual rendering.

use std::{cell::RefCell, fmt, rc::Rc};

use rustc_hash::FxHashSet;

/// Recursion bound used when rendering messages and call arguments.
pub const DEFAULT_RENDER_DEPTH: usize = 20;

const CIRCULAR: &str = "[Circular]";
const ARRAY_PLACEHOLDER: &str = "[Array]";
const OBJECT_PLACEHOLDER: &str = "[Object]";

/// An arbitrary value passed to a logging call.
///
/// Arrays and objects are shared, interior-mutable nodes: cloning a [`LogValue`] clones the
/// handle, not the contents. This allows building self-referential graphs, which [`render`]
/// handles by substituting a `[Circular]` marker.
///
/// ```
/// use json_diag_logger::{render, LogValue};
///
/// let list = LogValue::array([1, 2]);
/// list.push(list.clone());
/// assert_eq!(render(&list, 20), "[ 1, 2, [Circular] ]");
/// ```
#[derive(Clone, Default)]
pub enum LogValue {
    /// An absent value.
    #[default]
    Undefined,

    /// An explicit null.
    Null,

    /// A boolean.
    Bool(bool),

    /// A number.
    Number(serde_json::Number),

    /// A string.
    String(String),

    /// An ordered list of values.
    Array(Rc<RefCell<Vec<Self>>>),

    /// An ordered list of key-value pairs.
    Object(Rc<RefCell<Vec<(String, Self)>>>),
}

impl LogValue {
    /// Creates an array value from the given items.
    pub fn array<T: Into<Self>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::Array(Rc::new(RefCell::new(
            items.into_iter().map(Into::into).collect(),
        )))
    }

    /// Creates an object value from the given key-value pairs, keeping their order.
    pub fn object<K: Into<String>, V: Into<Self>>(
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        Self::Object(Rc::new(RefCell::new(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )))
    }

    /// Appends a value to an array. Returns `false` if `self` is not an array.
    pub fn push(&self, value: impl Into<Self>) -> bool {
        match self {
            Self::Array(items) => {
                items.borrow_mut().push(value.into());
                true
            }
            _ => false,
        }
    }

    /// Sets a key on an object, replacing an existing entry with the same key.
    /// Returns `false` if `self` is not an object.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Self>) -> bool {
        match self {
            Self::Object(entries) => {
                let key = key.into();
                let value = value.into();
                let mut entries = entries.borrow_mut();
                match entries.iter_mut().find(|(existing, _)| *existing == key) {
                    Some((_, slot)) => *slot = value,
                    None => entries.push((key, value)),
                }
                true
            }
            _ => false,
        }
    }

    /// Returns the string contents if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

// A derived `Debug` would recurse forever on cyclic graphs.
impl fmt::Debug for LogValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self, DEFAULT_RENDER_DEPTH))
    }
}

impl From<&str> for LogValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for LogValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&String> for LogValue {
    fn from(value: &String) -> Self {
        Self::String(value.clone())
    }
}

impl From<bool> for LogValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for LogValue {
                fn from(value: $ty) -> Self {
                    Self::Number(serde_json::Number::from(value))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Non-finite numbers have no JSON representation and become [`LogValue::Null`].
impl From<f64> for LogValue {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value).map_or(Self::Null, Self::Number)
    }
}

impl From<f32> for LogValue {
    fn from(value: f32) -> Self {
        Self::from(f64::from(value))
    }
}

impl<T: Into<Self>> From<Option<T>> for LogValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Undefined, Into::into)
    }
}

impl<T: Into<Self>> From<Vec<T>> for LogValue {
    fn from(value: Vec<T>) -> Self {
        Self::array(value)
    }
}

impl From<serde_json::Value> for LogValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::array(items),
            Value::Object(map) => Self::object(map),
        }
    }
}

/// Renders a value as single-line text.
///
/// Strings are quoted and escaped, arrays render as `[ a, b ]` and objects as `{ key: value }`.
/// Containers nested deeper than `depth` render as `[Array]` or `[Object]`, and a container that
/// is reached again while it is still being rendered renders as `[Circular]`.
#[must_use]
pub fn render(value: &LogValue, depth: usize) -> String {
    let mut renderer = Renderer {
        max_depth: depth,
        ancestors: FxHashSet::default(),
        out: String::new(),
    };
    renderer.value(value, 0);
    renderer.out
}

struct Renderer {
    max_depth: usize,
    /// Identities of the containers on the current path.
    ancestors: FxHashSet<*const ()>,
    out: String,
}

impl Renderer {
    fn value(&mut self, value: &LogValue, level: usize) {
        match value {
            LogValue::Undefined => self.out.push_str("undefined"),
            LogValue::Null => self.out.push_str("null"),
            LogValue::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
            LogValue::Number(n) => self.out.push_str(&n.to_string()),
            LogValue::String(s) => quote_into(s, &mut self.out),
            LogValue::Array(items) => {
                let id = Rc::as_ptr(items).cast::<()>();
                if !self.enter(id, level, ARRAY_PLACEHOLDER) {
                    return;
                }
                let items = items.borrow();
                if items.is_empty() {
                    self.out.push_str("[]");
                } else {
                    self.out.push_str("[ ");
                    for (index, item) in items.iter().enumerate() {
                        if index > 0 {
                            self.out.push_str(", ");
                        }
                        self.value(item, level + 1);
                    }
                    self.out.push_str(" ]");
                }
                self.ancestors.remove(&id);
            }
            LogValue::Object(entries) => {
                let id = Rc::as_ptr(entries).cast::<()>();
                if !self.enter(id, level, OBJECT_PLACEHOLDER) {
                    return;
                }
                let entries = entries.borrow();
                if entries.is_empty() {
                    self.out.push_str("{}");
                } else {
                    self.out.push_str("{ ");
                    for (index, (key, item)) in entries.iter().enumerate() {
                        if index > 0 {
                            self.out.push_str(", ");
                        }
                        if is_identifier(key) {
                            self.out.push_str(key);
                        } else {
                            quote_into(key, &mut self.out);
                        }
                        self.out.push_str(": ");
                        self.value(item, level + 1);
                    }
                    self.out.push_str(" }");
                }
                self.ancestors.remove(&id);
            }
        }
    }

    /// Marks a container as being rendered, or writes the marker that replaces it.
    fn enter(&mut self, id: *const (), level: usize, placeholder: &str) -> bool {
        if self.ancestors.contains(&id) {
            self.out.push_str(CIRCULAR);
            false
        } else if level > self.max_depth {
            self.out.push_str(placeholder);
            false
        } else {
            self.ancestors.insert(id);
            true
        }
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Quotes a string, preferring single quotes and switching to double quotes or backticks when
/// that avoids escaping.
fn quote_into(s: &str, out: &mut String) {
    let quote = if !s.contains('\'') {
        '\''
    } else if !s.contains('"') {
        '"'
    } else if !s.contains('`') && !s.contains("${") {
        '`'
    } else {
        '\''
    };

    out.push(quote);
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\u{b}' => out.push_str("\\v"),
            '\\' => out.push_str("\\\\"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => out.push_str(&format!("\\x{:02X}", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push(quote);
}
