use crate::{observer::Observer, prelude::*};

/// Emits only the first `count` values emitted by the source Observable.
///
/// If the source emits fewer than `count` values then all of its values are
/// emitted. The operator completes right after delivering the `count`-th
/// value, regardless of whether the source completes.
///
/// ```
/// use rxlite::prelude::*;
///
/// let mut out = vec![];
/// observable::from_iter(0..).take(5).subscribe(|v| out.push(v));
/// assert_eq!(out, vec![0, 1, 2, 3, 4]);
/// ```
#[derive(Clone)]
pub struct TakeOp<S> {
  source: S,
  count: usize,
}

impl<S> TakeOp<S> {
  #[inline]
  pub(crate) fn new(source: S, count: usize) -> Self { TakeOp { source, count } }
}

impl<Item, Err, O, S> Observable<Item, Err, O> for TakeOp<S>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, TakeObserver<O>>,
{
  type Unsub = Option<S::Unsub>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    if self.count == 0 {
      observer.complete();
      return None;
    }
    let observer =
      TakeObserver { observer: Some(observer), count: self.count, hits: 0 };
    Some(self.source.actual_subscribe(observer))
  }
}

impl<Item, Err, S> ObservableExt<Item, Err> for TakeOp<S> where
  S: ObservableExt<Item, Err>
{
}

pub struct TakeObserver<O> {
  observer: Option<O>,
  count: usize,
  hits: usize,
}

impl<Item, Err, O> Observer<Item, Err> for TakeObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if let Some(observer) = self.observer.as_mut() {
      self.hits += 1;
      observer.next(value);
      if self.hits >= self.count {
        if let Some(observer) = self.observer.take() {
          observer.complete();
        }
      }
    }
  }

  fn error(self, err: Err) {
    if let Some(observer) = self.observer {
      observer.error(err);
    }
  }

  fn complete(self) {
    if let Some(observer) = self.observer {
      observer.complete();
    }
  }

  fn is_finished(&self) -> bool {
    self.observer.as_ref().map_or(true, |o| o.is_finished())
  }
}
