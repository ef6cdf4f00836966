use crate::{
  observer::Observer,
  ops::multi_source::{state_finished, SourceObserver, SourceState, ValueCache},
  prelude::*,
  rc::MutRc,
  subscription::LocalSubscription,
};
use log::trace;

/// Combines every value of the pacing source with the latest value of each
/// sampled source.
///
/// The sampled sources never trigger an emission, and pacing values that
/// arrive before every sampled source emitted are dropped. Completion comes
/// from the pacing source only; an error from any source is forwarded.
///
/// ```
/// use rxlite::prelude::*;
///
/// let mut out = vec![];
/// observable::from_iter(1..4)
///   .with_latest_from(observable::of("x"))
///   .subscribe(|v| out.push(v));
/// assert_eq!(out, vec![(1, "x"), (2, "x"), (3, "x")]);
/// ```
#[derive(Clone)]
pub struct WithLatestFromOp<S, SO> {
  source: S,
  others: Vec<SO>,
}

impl<S, SO> WithLatestFromOp<S, SO> {
  #[inline]
  pub(crate) fn new(source: S, others: Vec<SO>) -> Self {
    WithLatestFromOp { source, others }
  }
}

impl<Item, Err, O, S, SO> Observable<Vec<Item>, Err, O>
  for WithLatestFromOp<S, SO>
where
  O: Observer<Vec<Item>, Err>,
  S: Observable<Item, Err, SourceObserver<WithLatestFromState<O, Item>>>,
  SO: Observable<Item, Err, SourceObserver<WithLatestFromState<O, Item>>>,
  Item: Clone,
{
  type Unsub = LocalSubscription;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let group = LocalSubscription::default();
    let state = MutRc::own(WithLatestFromState {
      observer: Some(observer),
      group: group.clone(),
      cache: ValueCache::new(self.others.len()),
    });
    // Sampled sources first, so values they produce while being subscribed
    // are cached before the pacing source starts.
    for (idx, other) in self.others.into_iter().enumerate() {
      if state_finished::<Item, Err, _>(&state) {
        return group;
      }
      let observer = SourceObserver::new(idx + 1, state.clone());
      group.add(other.actual_subscribe(observer));
    }
    if !state_finished::<Item, Err, _>(&state) {
      let observer = SourceObserver::new(0, state);
      group.add(self.source.actual_subscribe(observer));
    }
    group
  }
}

impl<Item, Err, S, SO> ObservableExt<Vec<Item>, Err>
  for WithLatestFromOp<S, SO>
where
  S: ObservableExt<Item, Err>,
  SO: ObservableExt<Item, Err>,
  Item: Clone,
{
}

pub struct WithLatestFromState<O, Item> {
  observer: Option<O>,
  group: LocalSubscription,
  cache: ValueCache<Item>,
}

impl<Item, Err, O> SourceState<Item, Err> for WithLatestFromState<O, Item>
where
  O: Observer<Vec<Item>, Err>,
  Item: Clone,
{
  fn next(&mut self, index: usize, value: Item) {
    if index > 0 {
      self.cache.set(index - 1, value);
      return;
    }
    let Some(observer) = self.observer.as_mut() else {
      return;
    };
    if self.cache.is_ready() {
      let mut values = vec![value];
      values.extend(self.cache.snapshot());
      observer.next(values);
    } else {
      trace!("pacing value dropped, sampled sources not ready");
    }
  }

  fn error(&mut self, _: usize, err: Err) {
    if let Some(observer) = self.observer.take() {
      observer.error(err);
      self.group.unsubscribe();
    }
  }

  fn complete(&mut self, index: usize) {
    if index > 0 {
      trace!("sampled source {index} completed");
      return;
    }
    if let Some(observer) = self.observer.take() {
      observer.complete();
      self.group.unsubscribe();
    }
  }

  fn is_finished(&self) -> bool {
    self.observer.as_ref().map_or(true, |o| o.is_finished())
  }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use futures::{channel::mpsc, executor::LocalPool};
  use std::{cell::RefCell, rc::Rc};

  #[test]
  fn sampled_source_never_emits() {
    let mut values = vec![];
    let mut completed = false;
    observable::from_iter(1..4)
      .with_latest_from(observable::empty())
      .subscribe_complete(
        |v: (i32, &str)| values.push(v),
        || completed = true,
      );
    assert!(values.is_empty());
    assert!(completed);
  }

  #[test]
  fn pacing_drives_emission() {
    let (pacing_tx, pacing_rx) = mpsc::unbounded();
    let (sampled_tx, sampled_rx) = mpsc::unbounded();
    let mut pool = LocalPool::new();
    let out = Rc::new(RefCell::new(vec![]));
    let completed = Rc::new(RefCell::new(false));

    let c_out = out.clone();
    let c_completed = completed.clone();
    let _subscription = observable::from_stream(pacing_rx, pool.spawner())
      .with_latest_from(observable::from_stream(sampled_rx, pool.spawner()))
      .subscribe_complete(
        move |v| c_out.borrow_mut().push(v),
        move || *c_completed.borrow_mut() = true,
      );

    pacing_tx.unbounded_send(0).unwrap();
    pool.run_until_stalled();
    sampled_tx.unbounded_send('a').unwrap();
    pool.run_until_stalled();
    sampled_tx.unbounded_send('b').unwrap();
    pool.run_until_stalled();
    assert!(out.borrow().is_empty());

    pacing_tx.unbounded_send(1).unwrap();
    pool.run_until_stalled();
    drop(sampled_tx);
    pool.run_until_stalled();
    pacing_tx.unbounded_send(2).unwrap();
    pool.run_until_stalled();
    assert!(!*completed.borrow());

    drop(pacing_tx);
    pool.run_until_stalled();
    assert_eq!(*out.borrow(), vec![(1, 'b'), (2, 'b')]);
    assert!(*completed.borrow());
  }

  #[test]
  fn sampled_error_is_forwarded() {
    let mut error = None;
    observable::of(1)
      .map_err(|e| match e {})
      .with_latest_from(observable::throw("sampled"))
      .subscribe_err(|_: (i32, i32)| {}, |e| error = Some(e));
    assert_eq!(error, Some("sampled"));
  }

  #[test]
  fn sample_many() {
    let mut out = vec![];
    observable::from_iter(0..2)
      .with_latest_from_all(vec![observable::of(10), observable::of(20)])
      .subscribe(|v| out.push(v));
    assert_eq!(out, vec![vec![0, 10, 20], vec![1, 10, 20]]);
  }
}
