use std::{fmt, rc::Rc, ops::Deref, hash::{Hash, Hasher}, borrow::Borrow, cmp::Ordering};

/// Shared, immutable string used for control ids, class names and texts.
///
/// Cloning never copies the underlying bytes.
#[derive(Clone, Debug)]
pub enum CheapString {
    String(Rc<str>),
    Static(&'static str),
}

impl Hash for CheapString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.deref().hash(state);
    }
}

impl PartialEq for CheapString {
    fn eq(&self, other: &Self) -> bool {
        self.deref() == other.deref()
    }
}

impl PartialEq<str> for CheapString {
    fn eq(&self, other: &str) -> bool {
        self.deref() == other
    }
}

impl PartialEq<&str> for CheapString {
    fn eq(&self, other: &&str) -> bool {
        self.deref() == *other
    }
}

impl Eq for CheapString {}

impl PartialOrd for CheapString {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CheapString {
    fn cmp(&self, other: &Self) -> Ordering {
        self.deref().cmp(other.deref())
    }
}

impl Deref for CheapString {
    type Target = str;

    fn deref(&self) -> &str {
        match self {
            Self::String(s) => s,
            Self::Static(s) => s,
        }
    }
}

impl Borrow<str> for CheapString {
    fn borrow(&self) -> &str {
        self.deref()
    }
}

impl AsRef<str> for CheapString {
    fn as_ref(&self) -> &str {
        self.deref()
    }
}

impl Default for CheapString {
    fn default() -> Self {
        Self::Static("")
    }
}

impl CheapString {
    /// Copies a borrowed string into a new shared buffer
    pub fn copy(text: &str) -> Self {
        Self::String(text.into())
    }
}

impl From<String> for CheapString {
    fn from(string: String) -> Self {
        Self::String(string.into())
    }
}

impl From<&String> for CheapString {
    fn from(string: &String) -> Self {
        Self::copy(string)
    }
}

impl From<&'static str> for CheapString {
    fn from(string: &'static str) -> Self {
        Self::Static(string)
    }
}

impl From<CheapString> for String {
    fn from(string: CheapString) -> Self {
        string.deref().into()
    }
}

impl fmt::Display for CheapString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.deref())
    }
}
