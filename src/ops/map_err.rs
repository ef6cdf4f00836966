use crate::{observer::Observer, prelude::*, type_hint::TypeHint};

/// Converts the error of the source with `func`. Values and completion pass
/// through unchanged.
pub struct MapErrOp<S, F, Err> {
  source: S,
  func: F,
  _hint: TypeHint<Err>,
}

impl<S, F, Err> MapErrOp<S, F, Err> {
  #[inline]
  pub(crate) fn new(source: S, func: F) -> Self {
    MapErrOp { source, func, _hint: TypeHint::new() }
  }
}

impl<S: Clone, F: Clone, Err> Clone for MapErrOp<S, F, Err> {
  fn clone(&self) -> Self {
    MapErrOp {
      source: self.source.clone(),
      func: self.func.clone(),
      _hint: TypeHint::new(),
    }
  }
}

impl<Item, Err, OutErr, O, S, F> Observable<Item, OutErr, O>
  for MapErrOp<S, F, Err>
where
  O: Observer<Item, OutErr>,
  S: Observable<Item, Err, MapErrObserver<O, F>>,
  F: FnOnce(Err) -> OutErr,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let func = self.func;
    self.source.actual_subscribe(MapErrObserver { observer, func })
  }
}

impl<Item, Err, OutErr, S, F> ObservableExt<Item, OutErr> for MapErrOp<S, F, Err>
where
  S: ObservableExt<Item, Err>,
  F: FnOnce(Err) -> OutErr,
{
}

pub struct MapErrObserver<O, F> {
  observer: O,
  func: F,
}

impl<O, F, Item, Err, OutErr> Observer<Item, Err> for MapErrObserver<O, F>
where
  O: Observer<Item, OutErr>,
  F: FnOnce(Err) -> OutErr,
{
  #[inline]
  fn next(&mut self, value: Item) { self.observer.next(value); }

  fn error(self, err: Err) {
    let out_err = (self.func)(err);
    self.observer.error(out_err);
  }

  #[inline]
  fn complete(self) { self.observer.complete(); }

  #[inline]
  fn is_finished(&self) -> bool { self.observer.is_finished() }
}
