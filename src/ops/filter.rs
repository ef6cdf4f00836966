use crate::{
  observer::{observer_proxy_impl, Observer},
  prelude::*,
};

/// Emit only those items from an Observable that pass a predicate test
///
/// ```
/// use rxlite::prelude::*;
///
/// let mut coll = vec![];
/// observable::from_iter(0..10)
///   .filter(|v| *v % 2 == 0)
///   .subscribe(|v| coll.push(v));
///
/// // only even numbers received.
/// assert_eq!(coll, vec![0, 2, 4, 6, 8]);
/// ```
#[derive(Clone)]
pub struct FilterOp<S, F> {
  source: S,
  filter: F,
}

impl<S, F> FilterOp<S, F> {
  #[inline]
  pub(crate) fn new(source: S, filter: F) -> Self { FilterOp { source, filter } }
}

impl<Item, Err, O, S, F> Observable<Item, Err, O> for FilterOp<S, F>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, FilterObserver<O, F>>,
  F: FnMut(&Item) -> bool,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let filter = self.filter;
    self.source.actual_subscribe(FilterObserver { observer, filter })
  }
}

impl<Item, Err, S, F> ObservableExt<Item, Err> for FilterOp<S, F>
where
  S: ObservableExt<Item, Err>,
  F: FnMut(&Item) -> bool,
{
}

pub struct FilterObserver<O, F> {
  observer: O,
  filter: F,
}

impl<Item, Err, O, F> Observer<Item, Err> for FilterObserver<O, F>
where
  O: Observer<Item, Err>,
  F: FnMut(&Item) -> bool,
{
  fn next(&mut self, value: Item) {
    if (self.filter)(&value) {
      self.observer.next(value)
    }
  }

  observer_proxy_impl!(Err, observer);
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use bencher::Bencher;

  #[test]
  fn pass_filter() {
    let mut completed = false;
    let mut values = vec![];
    observable::from_iter(0..10)
      .filter(|v| v % 3 == 0)
      .subscribe_complete(|v| values.push(v), || completed = true);
    assert_eq!(values, vec![0, 3, 6, 9]);
    assert!(completed);
  }

  #[test]
  fn error_passes_through() {
    let mut error = None;
    observable::throw("boom")
      .filter(|v: &i32| *v > 0)
      .subscribe_err(|_| {}, |e| error = Some(e));
    assert_eq!(error, Some("boom"));
  }

  #[test]
  fn bench() { do_bench(); }

  benchmark_group!(do_bench, bench_filter);

  fn bench_filter(b: &mut Bencher) { b.iter(pass_filter); }
}
