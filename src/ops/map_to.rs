use crate::{
  observer::{observer_proxy_impl, Observer},
  prelude::*,
  type_hint::TypeHint,
};

/// Maps every value of the source to a clone of one fixed value.
pub struct MapToOp<S, B, Item> {
  source: S,
  value: B,
  _hint: TypeHint<Item>,
}

impl<S, B, Item> MapToOp<S, B, Item> {
  #[inline]
  pub(crate) fn new(source: S, value: B) -> Self {
    MapToOp { source, value, _hint: TypeHint::new() }
  }
}

impl<S: Clone, B: Clone, Item> Clone for MapToOp<S, B, Item> {
  fn clone(&self) -> Self {
    MapToOp {
      source: self.source.clone(),
      value: self.value.clone(),
      _hint: TypeHint::new(),
    }
  }
}

impl<Item, B, Err, O, S> Observable<B, Err, O> for MapToOp<S, B, Item>
where
  O: Observer<B, Err>,
  S: Observable<Item, Err, MapToObserver<O, B>>,
  B: Clone,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self
      .source
      .actual_subscribe(MapToObserver { observer, value: self.value })
  }
}

impl<Item, B, Err, S> ObservableExt<B, Err> for MapToOp<S, B, Item>
where
  S: ObservableExt<Item, Err>,
  B: Clone,
{
}

pub struct MapToObserver<O, B> {
  observer: O,
  value: B,
}

impl<Item, B, Err, O> Observer<Item, Err> for MapToObserver<O, B>
where
  O: Observer<B, Err>,
  B: Clone,
{
  #[inline]
  fn next(&mut self, _: Item) { self.observer.next(self.value.clone()) }

  observer_proxy_impl!(Err, observer);
}

#[cfg(test)]
mod test {
  use crate::prelude::*;

  #[test]
  fn primitive_type() {
    let mut i = 0;
    observable::from_iter(100..101).map_to(5).subscribe(|v| i += v);
    assert_eq!(i, 5);
  }

  #[test]
  fn map_types_mixed() {
    let mut i = 0;
    observable::from_iter(vec!['a', 'b', 'c'])
      .map_to(1)
      .subscribe(|v| i += v);
    assert_eq!(i, 3);
  }
}
