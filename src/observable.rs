//! The `Observable` trait, the operator methods of `ObservableExt` and the
//! source factories.
use crate::{
  observer::{ignore_complete, ignore_error, Observer, ObserverAll},
  ops::{
    catch_error::{CatchFn, CatchOp, Recover},
    combine_latest::CombineLatestOp,
    concat_with::ConcatWithOp,
    filter::FilterOp,
    map::MapOp,
    map_err::MapErrOp,
    map_to::MapToOp,
    merge::MergeOp,
    multi_source::{into_pair, CombineItem, Paired, TaggedA, TaggedB},
    on_complete::OnCompleteOp,
    on_error::OnErrorOp,
    retry::{RetryPolicy, RetryWith},
    skip::SkipOp,
    start_with::StartWithOp,
    take::TakeOp,
    take_last::TakeLastOp,
    tap::TapOp,
    try_map::TryMapOp,
    with_latest_from::WithLatestFromOp,
    zip::ZipOp,
  },
  subscriber::Subscriber,
  subscription::{SubscriptionLike, SubscriptionWrapper, ZipSubscription},
};

mod create;
pub use create::*;
mod from_iter;
pub use from_iter::*;
mod trivial;
pub use trivial::*;
mod from_stream;
pub use from_stream::*;
#[cfg(feature = "timer")]
mod interval;
#[cfg(feature = "timer")]
pub use interval::*;

/// A lazily started, cancelable sequence of values.
///
/// Nothing happens until `actual_subscribe` is called. Every call starts an
/// independent execution that delivers to `observer` and returns the handle
/// tearing that execution down. The observable is consumed; clone it to
/// subscribe again.
pub trait Observable<Item, Err, O>
where
  O: Observer<Item, Err>,
{
  /// A type implementing [`SubscriptionLike`]
  type Unsub: SubscriptionLike + 'static;

  fn actual_subscribe(self, observer: O) -> Self::Unsub;
}

/// The subscription a top-level `subscribe_*` call returns: the consumer's
/// observer slot plus the teardown of the execution feeding it.
pub type SubscribedTo<S, Item, Err, O> = SubscriptionWrapper<
  ZipSubscription<
    Subscriber<O>,
    <S as Observable<Item, Err, Subscriber<O>>>::Unsub,
  >,
>;

/// The next-only observer `subscribe` builds.
pub type NextObserver<N, Err> = ObserverAll<N, fn(Err), fn()>;

/// The next/error observer `subscribe_err` builds.
pub type NextErrObserver<N, E> = ObserverAll<N, E, fn()>;

/// The next/complete observer `subscribe_complete` builds.
pub type NextCompleteObserver<N, C, Err> = ObserverAll<N, fn(Err), C>;

pub trait ObservableExt<Item, Err>: Sized {
  /// Invokes an execution of an Observable and registers an `Observer` for
  /// the notifications it will emit.
  fn subscribe_with<O>(self, observer: O) -> SubscribedTo<Self, Item, Err, O>
  where
    O: Observer<Item, Err>,
    Self: Observable<Item, Err, Subscriber<O>>,
  {
    let subscriber = Subscriber::new(observer);
    let unsub = self.actual_subscribe(subscriber.clone());
    SubscriptionWrapper(ZipSubscription::new(subscriber, unsub))
  }

  /// Subscribes with a `next` handler only. Errors and completion are
  /// ignored.
  fn subscribe<N>(
    self,
    next: N,
  ) -> SubscribedTo<Self, Item, Err, NextObserver<N, Err>>
  where
    N: FnMut(Item),
    Self: Observable<Item, Err, Subscriber<NextObserver<N, Err>>>,
  {
    let observer = ObserverAll::new(
      next,
      ignore_error::<Err> as fn(Err),
      ignore_complete as fn(),
    );
    self.subscribe_with(observer)
  }

  /// Subscribes with `next` and `error` handlers, completion is ignored.
  fn subscribe_err<N, E>(
    self,
    next: N,
    error: E,
  ) -> SubscribedTo<Self, Item, Err, NextErrObserver<N, E>>
  where
    N: FnMut(Item),
    E: FnOnce(Err),
    Self: Observable<Item, Err, Subscriber<NextErrObserver<N, E>>>,
  {
    let observer = ObserverAll::new(next, error, ignore_complete as fn());
    self.subscribe_with(observer)
  }

  /// Subscribes with `next` and `complete` handlers, errors are ignored.
  fn subscribe_complete<N, C>(
    self,
    next: N,
    complete: C,
  ) -> SubscribedTo<Self, Item, Err, NextCompleteObserver<N, C, Err>>
  where
    N: FnMut(Item),
    C: FnOnce(),
    Self:
      Observable<Item, Err, Subscriber<NextCompleteObserver<N, C, Err>>>,
  {
    let observer =
      ObserverAll::new(next, ignore_error::<Err> as fn(Err), complete);
    self.subscribe_with(observer)
  }

  /// Subscribes with a handler for every kind of notification.
  ///
  /// * `error`: A handler for a terminal event resulting from an error.
  /// * `complete`: A handler for a terminal event resulting from successful
  /// completion.
  fn subscribe_all<N, E, C>(
    self,
    next: N,
    error: E,
    complete: C,
  ) -> SubscribedTo<Self, Item, Err, ObserverAll<N, E, C>>
  where
    N: FnMut(Item),
    E: FnOnce(Err),
    C: FnOnce(),
    Self: Observable<Item, Err, Subscriber<ObserverAll<N, E, C>>>,
  {
    self.subscribe_with(ObserverAll::new(next, error, complete))
  }

  /// Applies an operator function to this observable.
  ///
  /// ```
  /// use rxlite::prelude::*;
  ///
  /// let mut out = vec![];
  /// observable::of(21)
  ///   .pipe(|s| s.map(|v| v * 2))
  ///   .subscribe(|v| out.push(v));
  /// assert_eq!(out, vec![42]);
  /// ```
  #[inline]
  fn pipe<R, F>(self, op: F) -> R
  where
    F: FnOnce(Self) -> R,
  {
    op(self)
  }

  /// Creates a new stream which calls a closure on each element and uses
  /// its return as the value.
  #[inline]
  fn map<B, F>(self, f: F) -> MapOp<Self, F, Item>
  where
    F: FnMut(Item) -> B,
  {
    MapOp::new(self, f)
  }

  /// Maps every value to a clone of `value`.
  #[inline]
  fn map_to<B>(self, value: B) -> MapToOp<Self, B, Item>
  where
    B: Clone,
  {
    MapToOp::new(self, value)
  }

  /// Like `map`, but `f` may fail. A returned `Err` terminates the stream
  /// with that error.
  #[inline]
  fn try_map<B, F>(self, f: F) -> TryMapOp<Self, F, Item>
  where
    F: FnMut(Item) -> Result<B, Err>,
  {
    TryMapOp::new(self, f)
  }

  /// Converts the error of the stream.
  #[inline]
  fn map_err<B, F>(self, f: F) -> MapErrOp<Self, F, Err>
  where
    F: FnOnce(Err) -> B,
  {
    MapErrOp::new(self, f)
  }

  /// Invokes `f` with a reference to every value before forwarding it.
  #[inline]
  fn tap<F>(self, f: F) -> TapOp<Self, F>
  where
    F: FnMut(&Item),
  {
    TapOp::new(self, f)
  }

  /// Forwards only the values for which `filter` returns `true`.
  #[inline]
  fn filter<F>(self, filter: F) -> FilterOp<Self, F>
  where
    F: FnMut(&Item) -> bool,
  {
    FilterOp::new(self, filter)
  }

  /// Emits only the first `count` values, then completes.
  ///
  /// `take(0)` completes as soon as it is subscribed, without subscribing
  /// the source.
  #[inline]
  fn take(self, count: usize) -> TakeOp<Self> { TakeOp::new(self, count) }

  /// Emits only the first value, then completes.
  #[inline]
  fn first(self) -> TakeOp<Self> { self.take(1) }

  /// Ignores the first `count` values.
  #[inline]
  fn skip(self, count: usize) -> SkipOp<Self> { SkipOp::new(self, count) }

  /// Emits only the last `count` values, once the source completes.
  #[inline]
  fn take_last(self, count: usize) -> TakeLastOp<Self> {
    TakeLastOp::new(self, count)
  }

  /// Emits only the last value, once the source completes.
  #[inline]
  fn last(self) -> TakeLastOp<Self> { self.take_last(1) }

  /// Emits `values` at subscription time, before anything the source
  /// emits.
  #[inline]
  fn start_with(self, values: Vec<Item>) -> StartWithOp<Self, Item> {
    StartWithOp::new(self, values)
  }

  /// Emits everything from this observable, then everything from `other`
  /// once this one completed.
  #[inline]
  fn concat_with<S>(self, other: S) -> ConcatWithOp<Self, S>
  where
    S: ObservableExt<Item, Err>,
  {
    ConcatWithOp::new(self, other)
  }

  /// Invokes `f` when the source completes.
  #[inline]
  fn on_complete<F>(self, f: F) -> OnCompleteOp<Self, F>
  where
    F: FnOnce(),
  {
    OnCompleteOp::new(self, f)
  }

  /// Invokes `f` with a reference to the error when the source fails, then
  /// forwards the error.
  #[inline]
  fn on_error<F>(self, f: F) -> OnErrorOp<Self, F>
  where
    F: FnOnce(&Err),
  {
    OnErrorOp::new(self, f)
  }

  /// Emits the values of this observable and `other` as they arrive.
  /// Completes once both completed, fails on the first error.
  #[inline]
  fn merge_with<S>(self, other: S) -> MergeOp<Self, S>
  where
    S: ObservableExt<Item, Err>,
  {
    MergeOp::new(self, vec![other])
  }

  /// `merge_with` over any number of other sources.
  #[inline]
  fn merge_with_all<S>(self, others: Vec<S>) -> MergeOp<Self, S>
  where
    S: ObservableExt<Item, Err>,
  {
    MergeOp::new(self, others)
  }

  /// Emits the latest value of both sources every time either emits, once
  /// both have emitted at least once.
  fn combine_latest_with<B, S>(
    self,
    other: S,
  ) -> Paired<
    CombineLatestOp<TaggedA<Self, Item, B>, TaggedB<S, Item, B>>,
    Item,
    B,
  >
  where
    S: ObservableExt<B, Err>,
    Item: Clone,
    B: Clone,
  {
    let source = MapOp::new(self, CombineItem::ItemA as fn(Item) -> _);
    let other = MapOp::new(other, CombineItem::ItemB as fn(B) -> _);
    let combined = CombineLatestOp::new(source, vec![other]);
    MapOp::new(combined, into_pair as fn(_) -> _)
  }

  /// `combine_latest_with` over any number of other sources; emits one
  /// value per source, in source order.
  #[inline]
  fn combine_latest_with_all<S>(
    self,
    others: Vec<S>,
  ) -> CombineLatestOp<Self, S>
  where
    S: ObservableExt<Item, Err>,
    Item: Clone,
  {
    CombineLatestOp::new(self, others)
  }

  /// Pairs every value of this observable with the latest value of `other`.
  /// Values arriving before `other` emitted anything are dropped.
  fn with_latest_from<B, S>(
    self,
    other: S,
  ) -> Paired<
    WithLatestFromOp<TaggedA<Self, Item, B>, TaggedB<S, Item, B>>,
    Item,
    B,
  >
  where
    S: ObservableExt<B, Err>,
    Item: Clone,
    B: Clone,
  {
    let source = MapOp::new(self, CombineItem::ItemA as fn(Item) -> _);
    let other = MapOp::new(other, CombineItem::ItemB as fn(B) -> _);
    let combined = WithLatestFromOp::new(source, vec![other]);
    MapOp::new(combined, into_pair as fn(_) -> _)
  }

  /// `with_latest_from` sampling any number of other sources; emits the
  /// pacing value followed by the latest value of each sampled source.
  #[inline]
  fn with_latest_from_all<S>(
    self,
    others: Vec<S>,
  ) -> WithLatestFromOp<Self, S>
  where
    S: ObservableExt<Item, Err>,
    Item: Clone,
  {
    WithLatestFromOp::new(self, others)
  }

  /// Pairs the k-th value of this observable with the k-th value of
  /// `other`. Completes as soon as one side can not provide more pairs.
  fn zip_with<B, S>(
    self,
    other: S,
  ) -> Paired<ZipOp<TaggedA<Self, Item, B>, TaggedB<S, Item, B>>, Item, B>
  where
    S: ObservableExt<B, Err>,
  {
    let source = MapOp::new(self, CombineItem::ItemA as fn(Item) -> _);
    let other = MapOp::new(other, CombineItem::ItemB as fn(B) -> _);
    MapOp::new(ZipOp::new(source, vec![other]), into_pair as fn(_) -> _)
  }

  /// `zip_with` over any number of other sources.
  #[inline]
  fn zip_with_all<S>(self, others: Vec<S>) -> ZipOp<Self, S>
  where
    S: ObservableExt<Item, Err>,
  {
    ZipOp::new(self, others)
  }

  /// Recovers from errors. `selector` receives the error and the number of
  /// retries performed so far, and decides to subscribe this observable
  /// again (`Recover::Retry`) or to continue with another observable
  /// (`Recover::Switch`).
  #[inline]
  fn catch_error<R, F>(self, selector: F) -> CatchOp<Self, CatchFn<F>>
  where
    Self: Clone,
    F: FnMut(Err, usize) -> Recover<R>,
  {
    CatchOp::new(self, CatchFn(selector))
  }

  /// Subscribes this observable again after an error, as long as `policy`
  /// allows. Once it refuses, the error is forwarded.
  ///
  /// `policy` is either a retry count or a [`RetryConfig`].
  ///
  /// [`RetryConfig`]: crate::ops::retry::RetryConfig
  #[inline]
  fn retry<P>(self, policy: P) -> CatchOp<Self, RetryWith<P>>
  where
    Self: Clone,
    P: RetryPolicy<Err>,
  {
    CatchOp::new(self, RetryWith(policy))
  }
}

/// Left-folds a source through operator functions.
///
/// ```
/// use rxlite::{pipe, prelude::*};
///
/// let mut out = vec![];
/// pipe!(
///   observable::from_iter(1..=5),
///   |s| s.filter(|v| v % 2 == 1),
///   |s| s.map(|v| v * 10),
/// )
/// .subscribe(|v| out.push(v));
/// assert_eq!(out, vec![10, 30, 50]);
/// ```
#[macro_export]
macro_rules! pipe {
  ($source: expr $(, $op: expr)* $(,)?) => {{
    let source = $source;
    $(let source = $crate::observable::apply_op(source, $op);)*
    source
  }};
}

#[doc(hidden)]
#[inline]
pub fn apply_op<S, R, F>(source: S, op: F) -> R
where
  F: FnOnce(S) -> R,
{
  op(source)
}
