use crate::{
  observer::{observer_proxy_impl, Observer},
  prelude::*,
  type_hint::TypeHint,
};

/// Creates a new stream which calls a closure on each element and uses
/// its return as the value.
///
/// ```
/// use rxlite::prelude::*;
///
/// let mut out = vec![];
/// observable::from_iter(1..4)
///   .map(|v| v * 10)
///   .subscribe(|v| out.push(v));
/// assert_eq!(out, vec![10, 20, 30]);
/// ```
pub struct MapOp<S, M, Item> {
  source: S,
  func: M,
  _hint: TypeHint<Item>,
}

impl<S, M, Item> MapOp<S, M, Item> {
  #[inline]
  pub(crate) fn new(source: S, func: M) -> Self {
    MapOp { source, func, _hint: TypeHint::new() }
  }
}

impl<S: Clone, M: Clone, Item> Clone for MapOp<S, M, Item> {
  fn clone(&self) -> Self {
    MapOp {
      source: self.source.clone(),
      func: self.func.clone(),
      _hint: TypeHint::new(),
    }
  }
}

impl<Item, B, Err, O, S, M> Observable<B, Err, O> for MapOp<S, M, Item>
where
  O: Observer<B, Err>,
  S: Observable<Item, Err, MapObserver<O, M>>,
  M: FnMut(Item) -> B,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let map = self.func;
    self.source.actual_subscribe(MapObserver { observer, map })
  }
}

impl<Item, B, Err, S, M> ObservableExt<B, Err> for MapOp<S, M, Item>
where
  S: ObservableExt<Item, Err>,
  M: FnMut(Item) -> B,
{
}

pub struct MapObserver<O, M> {
  observer: O,
  map: M,
}

impl<Item, B, Err, O, M> Observer<Item, Err> for MapObserver<O, M>
where
  O: Observer<B, Err>,
  M: FnMut(Item) -> B,
{
  #[inline]
  fn next(&mut self, value: Item) { self.observer.next((self.map)(value)) }

  observer_proxy_impl!(Err, observer);
}
