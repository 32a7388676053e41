//! Package implement a red-black ordered key store.
//!
//! Quoting from [Wikipedia][wiki-rbt]:
//!
//! > A red–black tree is a self-balancing binary search tree data structure
//! > noted for fast storage and retrieval of ordered information. The nodes
//! > in a red-black tree hold an extra "color" bit, often drawn as red and
//! > black, which help ensure that the tree is always approximately
//! > balanced.
//!
//! [RbTree] keeps its height within `2 * log2(n+1)` under any sequence of
//! insert and delete, which makes insert, delete and search worst case
//! O(log n).
//!
//! Simple ordered key store for single threaded use case
//! -----------------------------------------------------
//!
//! - Each entry in RbTree instance correspond to a Key.
//! - Duplicate keys are retained, one entry per insert.
//! - Insert, delete and search via insert(), delete(), search() api.
//! - Full table scan, to iterate over all keys in sort order.
//! - Range scan, to iterate between a ``low`` and ``high``.
//! - Reverse iteration.
//! - Uses an arena of nodes and a shared sentinel, no unsafe code.
//! - No Durability guarantee.
//! - Not thread safe.
//!
//! Constructing a new [RbTree] instance and basic operations:
//!
//! ```
//! use rbidx::RbTree;
//!
//! let mut index: RbTree<u64> = RbTree::new();
//! assert_eq!(index.len(), 0);
//! assert_eq!(index.is_empty(), true);
//!
//! for key in [50, 20, 70, 10, 30].iter() {
//!     index.insert(*key);
//! }
//! assert_eq!(index.len(), 5);
//! assert_eq!(index.contains(&20), true);
//!
//! assert_eq!(index.delete(&20), true);
//! assert_eq!(index.delete(&20), false);
//!
//! let keys: Vec<u64> = index.iter().copied().collect();
//! assert_eq!(keys, vec![10, 30, 50, 70]);
//!
//! index.validate().unwrap();
//! ```
//!
//! [wiki-rbt]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree

use std::{error, fmt, result};

// Short form to compose Error values.
//
// Here are few possible ways:
//
// ```ignore
// use crate::Error;
// err_at!(KeyNotFound, msg: format!("missing key"));
// ```
//
// ```ignore
// use crate::Error;
// err_at!(InvariantViolation, some_result());
// ```
//
// ```ignore
// use crate::Error;
// err_at!(InvariantViolation, some_result(), format!("validate failed"));
// ```
//
macro_rules! err_at {
    ($v:ident, msg: $($arg:expr),+) => {{
        let prefix = format!("{}:{}", file!(), line!());
        Err(Error::$v(prefix, format!($($arg),+)))
    }};
    ($v:ident, $e:expr) => {{
        match $e {
            Ok(val) => Ok(val),
            Err(err) => {
                let prefix = format!("{}:{}", file!(), line!());
                Err(Error::$v(prefix, format!("{}", err)))
            }
        }
    }};
    ($v:ident, $e:expr, $($arg:expr),+) => {{
        match $e {
            Ok(val) => Ok(val),
            Err(err) => {
                let prefix = format!("{}:{}", file!(), line!());
                let msg = format!($($arg),+);
                Err(Error::$v(prefix, format!("{} {}", err, msg)))
            }
        }
    }};
}

mod iter;
mod node;
mod rbtree;
mod stats;

pub use iter::{Iter, Range, Reverse};
pub use rbtree::RbTree;
pub use stats::Stats;

/// Error variants that are returned by this package's API.
///
/// Each variant carries a prefix, typically identifying the
/// error location.
pub enum Error {
    KeyNotFound(String, String),
    InvariantViolation(String, String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        use Error::*;

        match self {
            KeyNotFound(p, msg) => write!(f, "{} KeyNotFound: {}", p, msg),
            InvariantViolation(p, msg) => write!(f, "{} InvariantViolation: {}", p, msg),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        write!(f, "{}", self)
    }
}

impl error::Error for Error {}

/// Type alias for Result return type, used by this package.
pub type Result<T> = result::Result<T, Error>;
