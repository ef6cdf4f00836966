use crate::{
  observer::Observer,
  ops::multi_source::{
    subscribe_sources, GroupComplete, SourceObserver, SourceState,
  },
  prelude::*,
  rc::MutRc,
  subscription::LocalSubscription,
};

/// Emits the values of every source as they arrive.
///
/// Completes once every source completed; the first error from any source
/// is forwarded and tears all sources down.
///
/// ```
/// use rxlite::prelude::*;
///
/// let mut out = vec![];
/// observable::from_iter(0..2)
///   .merge_with(observable::from_iter(10..12))
///   .subscribe(|v| out.push(v));
/// assert_eq!(out, vec![0, 1, 10, 11]);
/// ```
#[derive(Clone)]
pub struct MergeOp<S, SO> {
  source: S,
  others: Vec<SO>,
}

impl<S, SO> MergeOp<S, SO> {
  #[inline]
  pub(crate) fn new(source: S, others: Vec<SO>) -> Self {
    MergeOp { source, others }
  }
}

impl<Item, Err, O, S, SO> Observable<Item, Err, O> for MergeOp<S, SO>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, SourceObserver<MergeState<O>>>,
  SO: Observable<Item, Err, SourceObserver<MergeState<O>>>,
{
  type Unsub = LocalSubscription;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let group = LocalSubscription::default();
    let state = MutRc::own(MergeState {
      observer: Some(observer),
      group: group.clone(),
      completed: GroupComplete::new(self.others.len() + 1),
    });
    subscribe_sources::<Item, Err, _, _, _>(
      &state,
      &group,
      self.source,
      self.others,
    );
    group
  }
}

impl<Item, Err, S, SO> ObservableExt<Item, Err> for MergeOp<S, SO>
where
  S: ObservableExt<Item, Err>,
  SO: ObservableExt<Item, Err>,
{
}

pub struct MergeState<O> {
  observer: Option<O>,
  group: LocalSubscription,
  completed: GroupComplete,
}

impl<Item, Err, O> SourceState<Item, Err> for MergeState<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, _: usize, value: Item) {
    if let Some(observer) = self.observer.as_mut() {
      observer.next(value);
    }
  }

  fn error(&mut self, _: usize, err: Err) {
    if let Some(observer) = self.observer.take() {
      observer.error(err);
      self.group.unsubscribe();
    }
  }

  fn complete(&mut self, _: usize) {
    if self.completed.complete_one() {
      if let Some(observer) = self.observer.take() {
        observer.complete();
        self.group.unsubscribe();
      }
    }
  }

  fn is_finished(&self) -> bool {
    self.observer.as_ref().map_or(true, |o| o.is_finished())
  }
}
