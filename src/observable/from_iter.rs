use crate::prelude::*;
use std::{
  convert::Infallible,
  iter::{Once, Repeat, Take},
};

/// Creates an observable that produces values from an iterator.
///
/// Completes when all elements have been emitted. Never emits an error.
/// Emission stops early once the observer is finished, so an infinite
/// iterator is fine behind `take`.
///
/// # Examples
///
/// ```
/// use rxlite::prelude::*;
///
/// let mut out = vec![];
/// observable::from_iter(0..10).subscribe(|v| out.push(v));
/// assert_eq!(out.len(), 10);
///
/// let mut firsts = vec![];
/// observable::from_iter(0..).take(3).subscribe(|v| firsts.push(v));
/// assert_eq!(firsts, vec![0, 1, 2]);
/// ```
pub fn from_iter<Iter>(iter: Iter) -> ObservableIter<Iter>
where
  Iter: IntoIterator,
{
  ObservableIter(iter)
}

#[derive(Clone)]
pub struct ObservableIter<Iter>(Iter);

impl<O, Iter> Observable<Iter::Item, Infallible, O> for ObservableIter<Iter>
where
  Iter: IntoIterator,
  O: Observer<Iter::Item, Infallible>,
{
  type Unsub = ();

  fn actual_subscribe(self, mut observer: O) -> Self::Unsub {
    for v in self.0 {
      if observer.is_finished() {
        return;
      }
      observer.next(v);
    }
    if !observer.is_finished() {
      observer.complete();
    }
  }
}

impl<Iter> ObservableExt<Iter::Item, Infallible> for ObservableIter<Iter> where
  Iter: IntoIterator
{
}

/// Creates an observable that emits one value and completes.
///
/// ```
/// use rxlite::prelude::*;
///
/// let mut out = vec![];
/// observable::of(123).subscribe(|v| out.push(v));
/// assert_eq!(out, vec![123]);
/// ```
#[inline]
pub fn of<Item>(v: Item) -> ObservableIter<Once<Item>> {
  from_iter(std::iter::once(v))
}

/// Creates an observable producing same value repeated N times.
///
/// Completes immediately after emitting N values. Never emits an error.
///
/// ```
/// use rxlite::prelude::*;
///
/// let mut out = vec![];
/// observable::repeat(123, 3).subscribe(|v| out.push(v));
/// assert_eq!(out, vec![123, 123, 123]);
/// ```
pub fn repeat<Item>(v: Item, n: usize) -> ObservableIter<Take<Repeat<Item>>>
where
  Item: Clone,
{
  from_iter(std::iter::repeat(v).take(n))
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use bencher::Bencher;

  #[test]
  fn from_range() {
    let mut hit_count = 0;
    let mut completed = false;
    observable::from_iter(0..100)
      .subscribe_complete(|_| hit_count += 1, || completed = true);

    assert_eq!(hit_count, 100);
    assert!(completed);
  }

  #[test]
  fn from_vec() {
    let mut hit_count = 0;
    let mut completed = false;
    observable::from_iter(vec![0; 100])
      .subscribe_complete(|_| hit_count += 1, || completed = true);

    assert_eq!(hit_count, 100);
    assert!(completed);
  }

  #[test]
  fn empty_iterator_only_completes() {
    let mut hit_count = 0;
    let mut completed = false;
    observable::from_iter(Vec::<i32>::new())
      .subscribe_complete(|_| hit_count += 1, || completed = true);
    assert_eq!(hit_count, 0);
    assert!(completed);
  }

  #[test]
  fn repeat_three_times() {
    let mut hit_count = 0;
    let mut completed = false;
    observable::repeat(123, 3).subscribe_complete(
      |v| {
        hit_count += 1;
        assert_eq!(123, v);
      },
      || completed = true,
    );
    assert_eq!(3, hit_count);
    assert!(completed);
  }

  #[test]
  fn repeat_zero_times() {
    let mut hit_count = 0;
    let mut completed = false;
    observable::repeat(123, 0)
      .subscribe_complete(|_| hit_count += 1, || completed = true);
    assert_eq!(0, hit_count);
    assert!(completed);
  }

  #[test]
  fn stops_pulling_once_finished() {
    let mut pulled = 0;
    let iter = (0..).inspect(|_| pulled += 1);
    let mut out = vec![];
    observable::from_iter(iter).take(2).subscribe(|v| out.push(v));
    assert_eq!(out, vec![0, 1]);
    assert!(pulled <= 3);
  }

  #[test]
  fn bench() { do_bench(); }

  benchmark_group!(do_bench, bench_from_iter);

  fn bench_from_iter(b: &mut Bencher) { b.iter(from_range); }
}
