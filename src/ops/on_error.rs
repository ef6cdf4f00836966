use crate::{
  observer::{complete_proxy_impl, is_finished_proxy_impl, Observer},
  prelude::*,
};

/// Calls `func` with a reference to the error when the source fails, then
/// forwards the error.
#[derive(Clone)]
pub struct OnErrorOp<S, F> {
  source: S,
  func: F,
}

impl<S, F> OnErrorOp<S, F> {
  #[inline]
  pub(crate) fn new(source: S, func: F) -> Self { OnErrorOp { source, func } }
}

impl<Item, Err, O, S, F> Observable<Item, Err, O> for OnErrorOp<S, F>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, OnErrorObserver<O, F>>,
  F: FnOnce(&Err),
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let func = self.func;
    self.source.actual_subscribe(OnErrorObserver { observer, func })
  }
}

impl<Item, Err, S, F> ObservableExt<Item, Err> for OnErrorOp<S, F>
where
  S: ObservableExt<Item, Err>,
  F: FnOnce(&Err),
{
}

pub struct OnErrorObserver<O, F> {
  observer: O,
  func: F,
}

impl<Item, Err, O, F> Observer<Item, Err> for OnErrorObserver<O, F>
where
  O: Observer<Item, Err>,
  F: FnOnce(&Err),
{
  #[inline]
  fn next(&mut self, value: Item) { self.observer.next(value); }

  fn error(self, err: Err) {
    (self.func)(&err);
    self.observer.error(err);
  }

  complete_proxy_impl!(observer);
  is_finished_proxy_impl!(observer);
}
