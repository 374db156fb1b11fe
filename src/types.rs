use indexmap::IndexMap;
use fxhash::{FxHashMap, FxBuildHasher};

pub type StringHashMap<T> = FxHashMap::<String, T>;
pub type StringIndexMap<T> = IndexMap::<String, T, FxBuildHasher>;
