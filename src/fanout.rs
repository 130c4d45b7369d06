//! Order-preserving fan-out of independent model calls.

/// Map `f` over `items` on the rayon pool when `parallel` is set. Output
/// order always matches input order. Any error aborts the map.
#[cfg(feature = "parallel")]
pub(crate) fn try_map<T, U, E, F>(items: &[T], parallel: bool, f: F) -> Result<Vec<U>, E>
where
    T: Sync,
    U: Send,
    E: Send,
    F: Fn(&T) -> Result<U, E> + Sync + Send,
{
    use rayon::prelude::*;

    if parallel {
        return items.par_iter().map(&f).collect();
    }
    items.iter().map(f).collect()
}

/// Map `f` over `items` in order, stopping at the first error.
#[cfg(not(feature = "parallel"))]
pub(crate) fn try_map<T, U, E, F>(items: &[T], parallel: bool, f: F) -> Result<Vec<U>, E>
where
    T: Sync,
    U: Send,
    E: Send,
    F: Fn(&T) -> Result<U, E> + Sync + Send,
{
    if parallel {
        tracing::debug!("`parallel` feature is disabled, running model calls sequentially");
    }
    items.iter().map(f).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_order() {
        let items: Vec<usize> = (0..64).collect();
        for parallel in [false, true] {
            let doubled: Result<Vec<usize>, ()> = try_map(&items, parallel, |x| Ok(x * 2));
            assert_eq!(doubled.unwrap(), items.iter().map(|x| x * 2).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_propagates_error() {
        let items = vec![1, 2, 3];
        let result: Result<Vec<i32>, String> = try_map(&items, false, |x| {
            if *x == 2 {
                Err(format!("bad {x}"))
            } else {
                Ok(*x)
            }
        });
        assert_eq!(result.unwrap_err(), "bad 2");
    }
}
