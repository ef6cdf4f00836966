use crate::{
  observer::{Emitter, EmitterObserver, Observer},
  prelude::*,
};

/// Creates an observable from a producer function.
///
/// The function runs once per subscription with an [`Emitter`] wrapping that
/// subscription's observer, and returns the subscription tearing down
/// whatever it started. Notifications after the first `error` or `complete`
/// are dropped.
///
/// ```
/// use rxlite::prelude::*;
///
/// let mut out = vec![];
/// observable::create(|emitter: &mut dyn Emitter<i32, ()>| {
///   emitter.next(1);
///   emitter.next(2);
///   emitter.complete();
///   emitter.next(3);
/// })
/// .subscribe(|v| out.push(v));
/// assert_eq!(out, vec![1, 2]);
/// ```
pub fn create<F, Item, Err, U>(subscribe: F) -> ObservableCreate<F>
where
  F: FnOnce(&mut dyn Emitter<Item, Err>) -> U,
  U: SubscriptionLike + 'static,
{
  ObservableCreate(subscribe)
}

#[derive(Clone)]
pub struct ObservableCreate<F>(F);

impl<F, Item, Err, O, U> Observable<Item, Err, O> for ObservableCreate<F>
where
  O: Observer<Item, Err>,
  F: FnOnce(&mut dyn Emitter<Item, Err>) -> U,
  U: SubscriptionLike + 'static,
{
  type Unsub = U;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let mut emitter = EmitterObserver(Some(observer));
    (self.0)(&mut emitter)
  }
}

impl<F, Item, Err, U> ObservableExt<Item, Err> for ObservableCreate<F>
where
  F: FnOnce(&mut dyn Emitter<Item, Err>) -> U,
  U: SubscriptionLike + 'static,
{
}
