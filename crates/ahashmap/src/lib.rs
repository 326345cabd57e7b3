pub use std::collections::hash_map;
pub use std::collections::hash_set;

pub type AHashMap<K, V> = std::collections::HashMap<K, V, ahash::RandomState>;
pub type AHashSet<T> = std::collections::HashSet<T, ahash::RandomState>;
