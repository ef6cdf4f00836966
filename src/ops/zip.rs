use crate::{
  observer::Observer,
  ops::multi_source::{subscribe_sources, SourceObserver, SourceState, ZipBuffer},
  prelude::*,
  rc::MutRc,
  subscription::LocalSubscription,
};
use log::trace;

/// Pairs the k-th value of every source, in order.
///
/// Completes as soon as any source is exhausted, that is it completed and
/// every value it produced was paired, because no further pair can be built.
/// Any error is forwarded immediately.
///
/// ```
/// use rxlite::prelude::*;
///
/// let mut out = vec![];
/// observable::from_iter([1, 2, 3])
///   .zip_with(observable::from_iter(["a", "b"]))
///   .subscribe(|v| out.push(v));
/// assert_eq!(out, vec![(1, "a"), (2, "b")]);
/// ```
#[derive(Clone)]
pub struct ZipOp<S, SO> {
  source: S,
  others: Vec<SO>,
}

impl<S, SO> ZipOp<S, SO> {
  #[inline]
  pub(crate) fn new(source: S, others: Vec<SO>) -> Self {
    ZipOp { source, others }
  }
}

impl<Item, Err, O, S, SO> Observable<Vec<Item>, Err, O> for ZipOp<S, SO>
where
  O: Observer<Vec<Item>, Err>,
  S: Observable<Item, Err, SourceObserver<ZipState<O, Item>>>,
  SO: Observable<Item, Err, SourceObserver<ZipState<O, Item>>>,
{
  type Unsub = LocalSubscription;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let group = LocalSubscription::default();
    let state = MutRc::own(ZipState {
      observer: Some(observer),
      group: group.clone(),
      buffer: ZipBuffer::new(self.others.len() + 1),
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

impl<Item, Err, S, SO> ObservableExt<Vec<Item>, Err> for ZipOp<S, SO>
where
  S: ObservableExt<Item, Err>,
  SO: ObservableExt<Item, Err>,
{
}

pub struct ZipState<O, Item> {
  observer: Option<O>,
  group: LocalSubscription,
  buffer: ZipBuffer<Item>,
}

impl<O, Item> ZipState<O, Item> {
  fn finish<Err>(&mut self)
  where
    O: Observer<Vec<Item>, Err>,
  {
    if let Some(observer) = self.observer.take() {
      trace!("zip source exhausted, {} slot(s) dropped", self.buffer.pending());
      observer.complete();
      self.group.unsubscribe();
    }
  }
}

impl<Item, Err, O> SourceState<Item, Err> for ZipState<O, Item>
where
  O: Observer<Vec<Item>, Err>,
{
  fn next(&mut self, index: usize, value: Item) {
    if self.observer.is_none() {
      return;
    }
    let Some(values) = self.buffer.push(index, value) else {
      return;
    };
    if let Some(observer) = self.observer.as_mut() {
      observer.next(values);
    }
    if self.buffer.any_exhausted() {
      self.finish::<Err>();
    }
  }

  fn error(&mut self, _: usize, err: Err) {
    if let Some(observer) = self.observer.take() {
      observer.error(err);
      self.group.unsubscribe();
    }
  }

  fn complete(&mut self, index: usize) {
    if self.buffer.mark_completed(index) {
      self.finish::<Err>();
    }
  }

  fn is_finished(&self) -> bool {
    self.observer.as_ref().map_or(true, |o| o.is_finished())
  }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use bencher::Bencher;
  use futures::{channel::mpsc, executor::LocalPool};
  use std::{cell::RefCell, rc::Rc};

  #[test]
  fn smoke() {
    let mut pairs = vec![];
    let mut completed = false;
    observable::from_iter(0..10)
      .zip_with(observable::from_iter(0..10).map(|v| v * 2))
      .subscribe_complete(|v| pairs.push(v), || completed = true);
    assert_eq!(pairs.len(), 10);
    assert!(pairs.iter().all(|(a, b)| a * 2 == *b));
    assert!(completed);
  }

  #[test]
  fn shorter_second_source() {
    let mut pairs = vec![];
    let mut completed = 0;
    observable::from_iter([1, 2, 3])
      .zip_with(observable::from_iter(["a", "b"]))
      .subscribe_complete(|v| pairs.push(v), || completed += 1);
    assert_eq!(pairs, vec![(1, "a"), (2, "b")]);
    assert_eq!(completed, 1);
  }

  #[test]
  fn drains_buffer_before_completing() {
    let (a_tx, a_rx) = mpsc::unbounded();
    let (b_tx, b_rx) = mpsc::unbounded();
    let mut pool = LocalPool::new();
    let pairs = Rc::new(RefCell::new(vec![]));
    let completed = Rc::new(RefCell::new(false));

    let c_pairs = pairs.clone();
    let c_completed = completed.clone();
    let _subscription = observable::from_stream(a_rx, pool.spawner())
      .zip_with(observable::from_stream(b_rx, pool.spawner()))
      .subscribe_complete(
        move |v| c_pairs.borrow_mut().push(v),
        move || *c_completed.borrow_mut() = true,
      );

    a_tx.unbounded_send(1).unwrap();
    a_tx.unbounded_send(2).unwrap();
    drop(a_tx);
    pool.run_until_stalled();
    assert!(!*completed.borrow());

    b_tx.unbounded_send('x').unwrap();
    pool.run_until_stalled();
    assert!(!*completed.borrow());

    b_tx.unbounded_send('y').unwrap();
    pool.run_until_stalled();
    assert_eq!(*pairs.borrow(), vec![(1, 'x'), (2, 'y')]);
    assert!(*completed.borrow());
  }

  #[test]
  fn three_sources() {
    let mut out = vec![];
    let mut completed = false;
    observable::from_iter(0..3)
      .zip_with_all(vec![
        observable::from_iter(10..20),
        observable::from_iter(20..22),
      ])
      .subscribe_complete(|v| out.push(v), || completed = true);
    assert_eq!(out, vec![vec![0, 10, 20], vec![1, 11, 21]]);
    assert!(completed);
  }

  #[test]
  fn empty_source_completes_immediately() {
    let mut produced = 0;
    let mut completed = false;
    observable::empty()
      .zip_with(observable::from_iter(0..5).tap(|_| produced += 1))
      .subscribe_complete(|_: (i32, i32)| {}, || completed = true);
    assert!(completed);
    assert_eq!(produced, 0);
  }

  #[test]
  fn bench() { do_bench(); }

  benchmark_group!(do_bench, bench_zip);

  fn bench_zip(b: &mut Bencher) { b.iter(smoke); }
}
