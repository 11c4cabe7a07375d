//! Stack growth for the recursive stages.
//!
//! The parser and the IR generator recurse once per nesting level of the
//! source. Wrapping each recursive entry in [`ensure_sufficient_stack`]
//! lets pathological inputs (thousands of nested parentheses or blocks)
//! run on a heap-allocated stack segment instead of overflowing.
//!
//! On `wasm32` the guard is a plain call.

/// Grow when less than this much stack is left.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated segment.
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first moving to a fresh stack segment if the current one is
/// nearly exhausted.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::ensure_sufficient_stack;

    enum Nested {
        Leaf,
        Wrap(Box<Nested>),
    }

    fn build(depth: usize) -> Nested {
        let mut node = Nested::Leaf;
        for _ in 0..depth {
            node = Nested::Wrap(Box::new(node));
        }
        node
    }

    fn depth(node: &Nested) -> usize {
        ensure_sufficient_stack(|| match node {
            Nested::Leaf => 0,
            Nested::Wrap(inner) => depth(inner) + 1,
        })
    }

    // Drop glue for a deep Box chain recurses without a guard.
    fn teardown(mut node: Nested) {
        while let Nested::Wrap(inner) = node {
            node = *inner;
        }
    }

    #[test]
    fn test_passes_result_through() {
        let value: Result<u8, String> = ensure_sufficient_stack(|| Ok(7));
        assert_eq!(value, Ok(7));
    }

    #[test]
    fn test_deep_tree_walk() {
        let tree = build(200_000);
        assert_eq!(depth(&tree), 200_000);
        teardown(tree);
    }
}
