//! Error recovery: resubscribing a failed source, or continuing with another
//! observable, as decided by a policy at the time the error arrives.
//!
//! ```
//! use rxlite::prelude::*;
//!
//! let mut values = vec![];
//! let mut completed = false;
//! observable::from_iter(1..=3)
//!   .map_err(|e| match e {})
//!   .concat_with(observable::throw("failed"))
//!   .catch_error(|_err, retries| {
//!     if retries < 2 {
//!       Recover::Retry
//!     } else {
//!       Recover::Switch(observable::empty())
//!     }
//!   })
//!   .subscribe_complete(|v| values.push(v), || completed = true);
//!
//! assert_eq!(values, vec![1, 2, 3, 1, 2, 3, 1, 2, 3]);
//! assert!(completed);
//! ```
use crate::{
  observer::Observer,
  prelude::*,
  rc::{MutRc, RcDerefMut},
  subscription::SerialSubscription,
};
use log::debug;
use std::{cell::Cell, rc::Rc};

/// What to do about an error.
pub enum Recover<R> {
  /// Subscribe the failed source again, with the same downstream.
  Retry,
  /// Continue with the given observable, with the same downstream.
  Switch(R),
}

/// Decides how a `CatchOp` reacts to the errors of its source.
pub trait CatchPolicy<Item, Err> {
  /// The observable taking over when the policy stops retrying.
  type Fallback;

  /// Called with every error of the source and the number of retries
  /// already performed.
  fn handle(&mut self, err: Err, retries: usize) -> Recover<Self::Fallback>;

  /// Whether a value from the source resets the retry count.
  fn reset_on_success(&self) -> bool { false }
}

/// A `CatchPolicy` backed by a selector closure.
#[derive(Clone)]
pub struct CatchFn<F>(pub(crate) F);

impl<Item, Err, R, F> CatchPolicy<Item, Err> for CatchFn<F>
where
  F: FnMut(Err, usize) -> Recover<R>,
{
  type Fallback = R;

  #[inline]
  fn handle(&mut self, err: Err, retries: usize) -> Recover<R> {
    (self.0)(err, retries)
  }
}

/// The recovery state of one subscription of a `CatchOp`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatchState {
  /// An attempt of the source is subscribed.
  Active,
  /// The source failed and is about to be subscribed again. Only lasts
  /// until the failed attempt returns from `actual_subscribe`.
  Retrying,
  /// No more recovery: the stream completed, the policy gave up, or the
  /// subscription was unsubscribed.
  Terminated,
}

#[derive(Clone)]
pub struct CatchOp<S, P> {
  source: S,
  policy: P,
}

impl<S, P> CatchOp<S, P> {
  #[inline]
  pub(crate) fn new(source: S, policy: P) -> Self { CatchOp { source, policy } }
}

impl<Item, Err, O, S, P> Observable<Item, Err, O> for CatchOp<S, P>
where
  O: Observer<Item, Err>,
  S: Clone + Observable<Item, Err, CatchObserver<S, P, O>>,
  P: CatchPolicy<Item, Err>,
  P::Fallback: Observable<Item, Err, O>,
{
  type Unsub = CatchSubscription;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let serial = SerialSubscription::default();
    let state = Rc::new(Cell::new(CatchState::Active));
    let observer = CatchObserver {
      source: self.source,
      policy: self.policy,
      observer,
      retries: 0,
      serial: serial.clone(),
      state: state.clone(),
      trampoline: MutRc::own(Trampoline::default()),
      resubscribe: subscribe_attempt::<Item, Err, S, P, O>,
    };
    subscribe_attempt::<Item, Err, S, P, O>(observer);
    CatchSubscription { serial, state }
  }
}

impl<Item, Err, S, P> ObservableExt<Item, Err> for CatchOp<S, P>
where
  S: ObservableExt<Item, Err>,
  P: CatchPolicy<Item, Err>,
{
}

pub struct CatchObserver<S, P, O> {
  source: S,
  policy: P,
  observer: O,
  retries: usize,
  serial: SerialSubscription,
  state: Rc<Cell<CatchState>>,
  trampoline: MutRc<Trampoline<CatchObserver<S, P, O>>>,
  // Set where `S` is known to accept this observer, which this type's own
  // `Observer` impl can not require.
  resubscribe: fn(CatchObserver<S, P, O>),
}

/// Attempts of one subscription, run one after another. An attempt that
/// fails while it is being subscribed is parked and subscribed once the
/// current `actual_subscribe` returned.
struct Trampoline<T> {
  running: bool,
  pending: Option<T>,
}

impl<T> Default for Trampoline<T> {
  fn default() -> Self { Trampoline { running: false, pending: None } }
}

fn subscribe_attempt<Item, Err, S, P, O>(observer: CatchObserver<S, P, O>)
where
  O: Observer<Item, Err>,
  S: Clone + Observable<Item, Err, CatchObserver<S, P, O>>,
  P: CatchPolicy<Item, Err>,
  P::Fallback: Observable<Item, Err, O>,
{
  let trampoline = observer.trampoline.clone();
  {
    let mut trampoline = trampoline.rc_deref_mut();
    if trampoline.running {
      trampoline.pending = Some(observer);
      return;
    }
    trampoline.running = true;
  }

  let mut attempt = Some(observer);
  while let Some(observer) = attempt.take() {
    let serial = observer.serial.clone();
    let state = observer.state.clone();
    if serial.is_closed() {
      break;
    }
    state.set(CatchState::Active);
    let source = observer.source.clone();
    let mut unsub = source.actual_subscribe(observer);
    if state.get() == CatchState::Terminated {
      // Finished while subscribing; a fallback may already own `serial`.
      unsub.unsubscribe();
    } else {
      serial.replace(unsub);
    }
    attempt = trampoline.rc_deref_mut().pending.take();
  }
  trampoline.rc_deref_mut().running = false;
}

impl<Item, Err, S, P, O> Observer<Item, Err> for CatchObserver<S, P, O>
where
  O: Observer<Item, Err>,
  P: CatchPolicy<Item, Err>,
  P::Fallback: Observable<Item, Err, O>,
{
  fn next(&mut self, value: Item) {
    if self.policy.reset_on_success() {
      self.retries = 0;
    }
    self.observer.next(value);
  }

  fn error(mut self, err: Err) {
    if self.serial.is_closed() {
      return;
    }
    match self.policy.handle(err, self.retries) {
      Recover::Retry => {
        self.retries += 1;
        debug!("source failed, retry {}", self.retries);
        self.state.set(CatchState::Retrying);
        let resubscribe = self.resubscribe;
        resubscribe(self);
      }
      Recover::Switch(fallback) => {
        debug!("source failed after {} retries, switching", self.retries);
        self.state.set(CatchState::Terminated);
        let serial = self.serial;
        serial.replace(fallback.actual_subscribe(self.observer));
      }
    }
  }

  fn complete(self) {
    self.state.set(CatchState::Terminated);
    self.observer.complete();
  }

  fn is_finished(&self) -> bool {
    self.serial.is_closed() || self.observer.is_finished()
  }
}

/// The subscription of a `CatchOp`: tears down the current attempt (or the
/// fallback) and stops further retries.
pub struct CatchSubscription {
  serial: SerialSubscription,
  state: Rc<Cell<CatchState>>,
}

impl CatchSubscription {
  #[inline]
  pub fn state(&self) -> CatchState { self.state.get() }
}

impl SubscriptionLike for CatchSubscription {
  fn unsubscribe(&mut self) {
    self.state.set(CatchState::Terminated);
    self.serial.unsubscribe();
  }

  #[inline]
  fn is_closed(&self) -> bool { self.serial.is_closed() }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::ops::retry::RetryWith;
  use futures::executor::LocalPool;
  use std::cell::RefCell;

  fn fails_on_third(emitter: &mut dyn Emitter<i32, &'static str>) {
    emitter.next(1);
    emitter.next(2);
    emitter.error("third");
  }

  #[test]
  fn replays_then_switches_to_empty() {
    let mut values = vec![];
    let mut errors = 0;
    let mut completed = 0;
    observable::create(fails_on_third)
      .catch_error(|_, retries| {
        if retries < 2 {
          Recover::Retry
        } else {
          Recover::Switch(observable::empty())
        }
      })
      .subscribe_all(
        |v| values.push(v),
        |_| errors += 1,
        || completed += 1,
      );
    assert_eq!(values, vec![1, 2, 1, 2, 1, 2]);
    assert_eq!(errors, 0);
    assert_eq!(completed, 1);
  }

  #[test]
  fn switch_to_other_source() {
    let mut values = vec![];
    observable::create(fails_on_third)
      .catch_error(|err, _| {
        Recover::Switch(observable::of(err.len() as i32).map_err(|e| match e {}))
      })
      .subscribe(|v| values.push(v));
    assert_eq!(values, vec![1, 2, 5]);
  }

  #[test]
  fn retry_count_then_error() {
    let mut values = vec![];
    let mut error = None;
    observable::create(fails_on_third)
      .retry(1)
      .subscribe_err(|v| values.push(v), |e| error = Some(e));
    assert_eq!(values, vec![1, 2, 1, 2]);
    assert_eq!(error, Some("third"));
  }

  #[test]
  fn synchronous_retries_keep_the_stack_flat() {
    let mut error = None;
    observable::throw("always")
      .retry(100_000)
      .subscribe_err(|_: ()| {}, |e| error = Some(e));
    assert_eq!(error, Some("always"));
  }

  #[test]
  fn asynchronous_retries() {
    let mut pool = LocalPool::new();
    let values = Rc::new(RefCell::new(vec![]));
    let error = Rc::new(Cell::new(None));

    let items = futures::stream::iter(vec![Ok(1), Err("boom")]);
    let c_values = values.clone();
    let c_error = error.clone();
    let subscription = observable::from_stream_result(items, pool.spawner())
      .retry(2)
      .subscribe_err(
        move |v| c_values.borrow_mut().push(v),
        move |e| c_error.set(Some(e)),
      );
    assert!(values.borrow().is_empty());

    pool.run();
    assert_eq!(*values.borrow(), vec![1, 1, 1]);
    assert_eq!(error.get(), Some("boom"));
    drop(subscription);
  }

  #[test]
  fn state_transitions() {
    let mut pool = LocalPool::new();
    let items = futures::stream::iter(vec![1, 2]);
    let source = observable::from_stream(items, pool.spawner())
      .map_err(|e| match e {});
    let subscription = CatchOp::new(
      source,
      CatchFn(|_: (), _| Recover::<observable::ObservableEmpty<i32, ()>>::Retry),
    )
    .actual_subscribe(ObserverAll::new(|_: i32| {}, |_: ()| {}, || {}));
    assert_eq!(subscription.state(), CatchState::Active);

    pool.run();
    assert_eq!(subscription.state(), CatchState::Terminated);
  }

  #[test]
  fn retrying_until_failed_attempt_returns() {
    let state = Rc::new(Cell::new(CatchState::Active));
    let seen = Rc::new(RefCell::new(vec![]));
    let c_state = state.clone();
    let c_seen = seen.clone();
    let source =
      observable::create(move |emitter: &mut dyn Emitter<i32, &'static str>| {
        c_seen.borrow_mut().push(c_state.get());
        emitter.error("fail");
        c_seen.borrow_mut().push(c_state.get());
      });
    let error = Rc::new(Cell::new(None));
    let c_error = error.clone();
    let observer = CatchObserver {
      source,
      policy: RetryWith(1usize),
      observer: ObserverAll::new(
        |_: i32| {},
        move |e: &'static str| c_error.set(Some(e)),
        || {},
      ),
      retries: 0,
      serial: SerialSubscription::default(),
      state: state.clone(),
      trampoline: MutRc::own(Trampoline::default()),
      resubscribe: subscribe_attempt::<i32, &'static str, _, _, _>,
    };
    subscribe_attempt::<i32, &'static str, _, _, _>(observer);

    use CatchState::*;
    assert_eq!(*seen.borrow(), vec![Active, Retrying, Active, Terminated]);
    assert_eq!(state.get(), Terminated);
    assert_eq!(error.get(), Some("fail"));
  }

  #[test]
  fn unsubscribe_stops_retrying() {
    let mut pool = LocalPool::new();
    let attempts = Rc::new(Cell::new(0));
    let handle: Rc<RefCell<Option<Box<dyn SubscriptionLike>>>> =
      Rc::new(RefCell::new(None));

    let items = futures::stream::iter(vec![Ok(1), Err("late")]);
    let c_attempts = attempts.clone();
    let c_handle = handle.clone();
    let subscription = observable::from_stream_result(items, pool.spawner())
      .retry(RetryConfig::new())
      .subscribe(move |_| {
        c_attempts.set(c_attempts.get() + 1);
        if let Some(handle) = c_handle.borrow_mut().as_mut() {
          handle.unsubscribe();
        }
      });
    handle.borrow_mut().replace(Box::new(subscription.into_inner()));

    pool.run();
    assert_eq!(attempts.get(), 1);
  }
}
