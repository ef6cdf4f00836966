use crate::{observer::Observer, prelude::*, subscription::LocalSubscription};

/// Emits every value of the source, then, once it completed, every value of
/// `other`. `other` is only subscribed after the source completed.
#[derive(Clone)]
pub struct ConcatWithOp<S1, S2> {
  source: S1,
  other: S2,
}

impl<S1, S2> ConcatWithOp<S1, S2> {
  #[inline]
  pub(crate) fn new(source: S1, other: S2) -> Self {
    ConcatWithOp { source, other }
  }
}

impl<Item, Err, O, S1, S2> Observable<Item, Err, O> for ConcatWithOp<S1, S2>
where
  O: Observer<Item, Err>,
  S1: Observable<Item, Err, ConcatObserver<O, S2>>,
  S2: Observable<Item, Err, O>,
{
  type Unsub = LocalSubscription;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let subscription = LocalSubscription::default();
    let observer = ConcatObserver {
      observer,
      other: self.other,
      subscription: subscription.clone(),
    };
    subscription.add(self.source.actual_subscribe(observer));
    subscription
  }
}

impl<Item, Err, S1, S2> ObservableExt<Item, Err> for ConcatWithOp<S1, S2>
where
  S1: ObservableExt<Item, Err>,
  S2: ObservableExt<Item, Err>,
{
}

pub struct ConcatObserver<O, S2> {
  observer: O,
  other: S2,
  subscription: LocalSubscription,
}

impl<Item, Err, O, S2> Observer<Item, Err> for ConcatObserver<O, S2>
where
  O: Observer<Item, Err>,
  S2: Observable<Item, Err, O>,
{
  #[inline]
  fn next(&mut self, value: Item) { self.observer.next(value) }

  #[inline]
  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) {
    if self.subscription.is_closed() || self.observer.is_finished() {
      return;
    }
    let unsub = self.other.actual_subscribe(self.observer);
    self.subscription.add(unsub);
  }

  #[inline]
  fn is_finished(&self) -> bool { self.observer.is_finished() }
}
