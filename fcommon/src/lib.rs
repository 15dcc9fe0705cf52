//! Shared utilities and strongly-typed common values for workspace crates.
//!
//! ```rust
//! use fcommon::{OrderedRegistry, SessionId, UserId};
//!
//! let session = SessionId::from("session-1");
//! let user = UserId::new("user-1");
//! let mut registry = OrderedRegistry::new();
//! registry.insert("first".to_string(), 1_u32);
//! registry.insert("second".to_string(), 2_u32);
//!
//! assert_eq!(session.as_str(), "session-1");
//! assert_eq!(user.to_string(), "user-1");
//! assert_eq!(registry.keys().collect::<Vec<_>>(), vec!["first", "second"]);
//! ```

pub mod future {
    //! Shared async future aliases.
    //!
    //! ```rust
    //! use fcommon::BoxFuture;
    //!
    //! fn str_len<'a>(value: &'a str) -> BoxFuture<'a, usize> {
    //!     Box::pin(async move { value.len() })
    //! }
    //!
    //! let _future = str_len("hello");
    //! ```

    use std::future::Future;
    use std::pin::Pin;

    pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
}

pub mod context {
    //! Actor identifier newtypes shared by requests, logs, and auth contexts.
    //!
    //! ```rust
    //! use fcommon::{SessionId, UserId};
    //!
    //! let session = SessionId::new("session-42");
    //! let user = UserId::from("user-42");
    //!
    //! assert_eq!(session.to_string(), "session-42");
    //! assert_eq!(user.as_str(), "user-42");
    //! ```

    use std::fmt::{Display, Formatter};

    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct SessionId(String);

    impl SessionId {
        pub fn new(value: impl Into<String>) -> Self {
            Self(value.into())
        }

        pub fn as_str(&self) -> &str {
            self.0.as_str()
        }
    }

    impl Display for SessionId {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl From<String> for SessionId {
        fn from(value: String) -> Self {
            Self(value)
        }
    }

    impl From<&str> for SessionId {
        fn from(value: &str) -> Self {
            Self(value.to_string())
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct UserId(String);

    impl UserId {
        pub fn new(value: impl Into<String>) -> Self {
            Self(value.into())
        }

        pub fn as_str(&self) -> &str {
            self.0.as_str()
        }
    }

    impl Display for UserId {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl From<String> for UserId {
        fn from(value: String) -> Self {
            Self(value)
        }
    }

    impl From<&str> for UserId {
        fn from(value: &str) -> Self {
            Self(value.to_string())
        }
    }
}

pub mod registry {
    //! Insertion-ordered registry map used where lookup order is observable.
    //!
    //! ```rust
    //! use fcommon::OrderedRegistry;
    //!
    //! let mut registry = OrderedRegistry::new();
    //! registry.insert("alpha".to_string(), 1_u32);
    //! registry.insert("beta".to_string(), 2_u32);
    //!
    //! assert_eq!(registry.get("alpha"), Some(&1));
    //! assert_eq!(registry.values().copied().collect::<Vec<_>>(), vec![1, 2]);
    //! ```

    use std::borrow::Borrow;

    #[derive(Debug, Clone)]
    pub struct OrderedRegistry<K, V> {
        items: Vec<(K, V)>,
    }

    impl<K, V> Default for OrderedRegistry<K, V> {
        fn default() -> Self {
            Self { items: Vec::new() }
        }
    }

    impl<K, V> OrderedRegistry<K, V>
    where
        K: Eq,
    {
        pub fn new() -> Self {
            Self::default()
        }

        /// Inserts or replaces `key`. A replaced entry keeps its original position.
        pub fn insert(&mut self, key: K, value: V) -> Option<V> {
            match self.items.iter_mut().find(|(existing, _)| *existing == key) {
                Some((_, slot)) => Some(std::mem::replace(slot, value)),
                None => {
                    self.items.push((key, value));
                    None
                }
            }
        }

        pub fn get<Q>(&self, key: &Q) -> Option<&V>
        where
            K: Borrow<Q>,
            Q: Eq + ?Sized,
        {
            self.items
                .iter()
                .find(|(existing, _)| existing.borrow() == key)
                .map(|(_, value)| value)
        }

        pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
        where
            K: Borrow<Q>,
            Q: Eq + ?Sized,
        {
            self.items
                .iter_mut()
                .find(|(existing, _)| existing.borrow() == key)
                .map(|(_, value)| value)
        }

        pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
        where
            K: Borrow<Q>,
            Q: Eq + ?Sized,
        {
            let index = self
                .items
                .iter()
                .position(|(existing, _)| existing.borrow() == key)?;
            Some(self.items.remove(index).1)
        }

        pub fn contains_key<Q>(&self, key: &Q) -> bool
        where
            K: Borrow<Q>,
            Q: Eq + ?Sized,
        {
            self.get(key).is_some()
        }

        pub fn keys(&self) -> impl Iterator<Item = &K> {
            self.items.iter().map(|(key, _)| key)
        }

        pub fn values(&self) -> impl Iterator<Item = &V> {
            self.items.iter().map(|(_, value)| value)
        }

        pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
            self.items.iter_mut().map(|(_, value)| value)
        }

        pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
            self.items.iter().map(|(key, value)| (key, value))
        }

        pub fn drain(&mut self) -> impl Iterator<Item = (K, V)> + '_ {
            self.items.drain(..)
        }

        pub fn len(&self) -> usize {
            self.items.len()
        }

        pub fn is_empty(&self) -> bool {
            self.items.is_empty()
        }
    }
}

pub mod time {
    //! Millisecond helpers for response metadata and log entries.

    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    pub fn duration_ms(duration: Duration) -> u64 {
        u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
    }

    pub fn unix_millis(value: SystemTime) -> u64 {
        value
            .duration_since(UNIX_EPOCH)
            .map(duration_ms)
            .unwrap_or_default()
    }
}

pub use context::{SessionId, UserId};
pub use future::BoxFuture;
pub use registry::OrderedRegistry;
pub use time::{duration_ms, unix_millis};
