//! Processed element variants

pub mod node;
pub mod relation;
pub mod way;

pub use node::*;
pub use relation::*;
pub use way::*;

pub mod common {
    use std::borrow::Borrow;
    use std::fmt;
    use std::hash::{Hash, Hasher};
    use std::ops::Deref;
    use std::sync::Arc;

    use itertools::Itertools;
    use rustc_hash::{FxHashMap, FxHashSet};

    use crate::error::ExtractError;
    use crate::osm::model::PrimitiveBlock;

    /// A cheaply clonable, interned tag string.
    ///
    /// Large extracts reuse a small vocabulary of keys and values
    /// across millions of primitives; interning keeps one allocation
    /// per distinct string for the lifetime of a decode pass.
    #[derive(Clone, Debug, Eq, PartialOrd, Ord)]
    pub struct TagString(Arc<str>);

    impl TagString {
        pub const NAME: &'static str = "name";
        pub const REF: &'static str = "ref";
        pub const TYPE: &'static str = "type";
        pub const MULTIPOLYGON: &'static str = "multipolygon";
        pub const NAME_LANG_PREFIX: &'static str = "name:";
        pub const ROLE_INNER: &'static str = "inner";
        pub const ROLE_OUTER: &'static str = "outer";

        /// Recovers the string at index `k` of the block's string table.
        pub fn recover(
            k: usize,
            block: &PrimitiveBlock,
            interner: &mut Interner,
        ) -> Result<TagString, ExtractError> {
            let raw = block
                .stringtable
                .s
                .get(k)
                .ok_or_else(|| prost::DecodeError::new("string table index out of range"))?;

            Ok(interner.intern(&String::from_utf8_lossy(raw)))
        }

        /// As [`TagString::recover`], lower-casing the result. Tag keys
        /// are matched case-insensitively throughout.
        pub fn recover_key(
            k: usize,
            block: &PrimitiveBlock,
            interner: &mut Interner,
        ) -> Result<TagString, ExtractError> {
            let key = TagString::recover(k, block, interner)?;
            if key.chars().any(char::is_uppercase) {
                return Ok(interner.intern(&key.to_lowercase()));
            }

            Ok(key)
        }
    }

    impl PartialEq for TagString {
        fn eq(&self, other: &Self) -> bool {
            self.0 == other.0
        }
    }

    impl Hash for TagString {
        fn hash<H: Hasher>(&self, state: &mut H) {
            // Matches the `Borrow<str>` contract for map lookup by &str.
            self.0.hash(state);
        }
    }

    impl Deref for TagString {
        type Target = str;

        fn deref(&self) -> &Self::Target {
            &self.0
        }
    }

    impl Borrow<str> for TagString {
        fn borrow(&self) -> &str {
            &self.0
        }
    }

    impl fmt::Display for TagString {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl From<&str> for TagString {
        fn from(s: &str) -> Self {
            TagString(Arc::from(s))
        }
    }

    impl From<String> for TagString {
        fn from(s: String) -> Self {
            TagString(Arc::from(s.as_str()))
        }
    }

    /// Per-pass string interner, deduplicating tag vocabulary.
    #[derive(Default)]
    pub struct Interner(FxHashSet<Arc<str>>);

    impl Interner {
        pub fn intern(&mut self, s: &str) -> TagString {
            match self.0.get(s) {
                Some(existing) => TagString(Arc::clone(existing)),
                None => {
                    let entry: Arc<str> = Arc::from(s);
                    self.0.insert(Arc::clone(&entry));
                    TagString(entry)
                }
            }
        }

        pub fn len(&self) -> usize {
            self.0.len()
        }

        pub fn is_empty(&self) -> bool {
            self.0.is_empty()
        }
    }

    /// Tag mapping with lower-cased keys. Last writer wins on
    /// duplicate keys during decode.
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct Tags(FxHashMap<TagString, TagString>);

    pub trait Taggable {
        fn indices(&self) -> impl Iterator<Item = (&u32, &u32)>;

        fn tags(
            &self,
            block: &PrimitiveBlock,
            interner: &mut Interner,
        ) -> Result<Tags, ExtractError> {
            Tags::from_block(self.indices(), block, interner)
        }
    }

    impl Tags {
        /// Takes an iterator of indices within the string table of the
        /// associated block, and recovers the strings at the specified
        /// indexes, to generate an associative map of tag keys and values.
        ///
        /// The iterator must yield in the order of (KeyIndex, ValueIndex).
        /// This is most often implemented under the Taggable trait.
        pub fn from_block<'a>(
            iter: impl Iterator<Item = (&'a u32, &'a u32)>,
            block: &PrimitiveBlock,
            interner: &mut Interner,
        ) -> Result<Self, ExtractError> {
            let mut tags = FxHashMap::default();
            for (&k, &v) in iter {
                let key = TagString::recover_key(k as usize, block, interner)?;
                let value = TagString::recover(v as usize, block, interner)?;
                tags.insert(key, value);
            }

            Ok(Tags(tags))
        }

        pub fn get(&self, key: &str) -> Option<&str> {
            self.0.get(key).map(|v| v.deref())
        }

        pub fn has(&self, key: &str) -> bool {
            self.0.contains_key(key)
        }

        /// Whether the tag `key` is present with exactly `value`.
        pub fn is(&self, key: &str, value: &str) -> bool {
            self.get(key).is_some_and(|v| v == value)
        }

        /// A name-like value for the primitive, if one exists.
        pub fn assumed_name(&self) -> Option<&str> {
            self.get(TagString::NAME).or_else(|| self.get(TagString::REF))
        }

        /// Language-tagged name alternatives, as `(language, value)`.
        pub fn alternative_names(&self) -> impl Iterator<Item = (&str, &str)> {
            self.0.iter().filter_map(|(key, value)| {
                key.strip_prefix(TagString::NAME_LANG_PREFIX)
                    .filter(|lang| !lang.is_empty())
                    .map(|lang| (lang, value.deref()))
            })
        }

        /// Key-sorted iteration, for deterministic downstream output.
        pub fn iter_sorted(&self) -> impl Iterator<Item = (&str, &str)> {
            self.0
                .iter()
                .map(|(k, v)| (k.deref(), v.deref()))
                .sorted_by_key(|(k, _)| *k)
        }

        pub fn len(&self) -> usize {
            self.0.len()
        }

        pub fn is_empty(&self) -> bool {
            self.0.is_empty()
        }
    }

    impl<'a> FromIterator<(&'a str, &'a str)> for Tags {
        fn from_iter<T: IntoIterator<Item = (&'a str, &'a str)>>(iter: T) -> Self {
            Tags(
                iter.into_iter()
                    .map(|(k, v)| {
                        (
                            TagString::from(k.to_lowercase()),
                            TagString::from(v),
                        )
                    })
                    .collect(),
            )
        }
    }
}
