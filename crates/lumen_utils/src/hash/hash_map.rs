//! [`HashMap`] with [`FixedHashState`] as the default hasher.

use super::FixedHashState;

pub use hashbrown::hash_map::{Entry, Iter, IterMut, Keys, Values};

/// A `hashbrown` map hashed with [`FixedHashState`].
///
/// ```
/// use lumen_utils::hash::HashMap;
///
/// let mut map: HashMap<&str, u32> = HashMap::default();
/// map.insert("Count", 5);
/// assert_eq!(map.get("Count"), Some(&5));
/// ```
pub type HashMap<K, V, S = FixedHashState> = hashbrown::HashMap<K, V, S>;
