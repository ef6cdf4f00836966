//! Observer trait and the helpers operators use to build observers.
//!
//! The Observer trait defines the consumer of data in the reactive pattern.
//! It provides three methods: next (for values), error (for errors), and
//! complete (for stream completion).

/// Observer trait: The consumer of data in reactive programming
///
/// An Observer receives values, errors, and completion notifications from
/// an Observable.
pub trait Observer<Item, Err> {
  /// Receive the next value from the observable
  fn next(&mut self, value: Item);

  /// Handle an error from the observable
  ///
  /// This consumes the observer, as no more values can be emitted after an
  /// error
  fn error(self, err: Err);

  /// Handle completion of the observable
  ///
  /// This consumes the observer, as no more values can be emitted after
  /// completion
  fn complete(self);

  /// Returns `true` once the observer will not accept more values.
  ///
  /// Synchronous sources (like `from_iter`) poll this to stop emitting early,
  /// e.g. after a downstream `take` completed or the consumer unsubscribed.
  fn is_finished(&self) -> bool;
}

/// A trait for emitting items to an Observer via mutable reference.
///
/// Unlike `Observer`, which consumes `self` for `error` and `complete`,
/// `Emitter` takes `&mut self` for all methods so `create` can hand the
/// producer a `&mut dyn Emitter` without leaking the concrete observer type
/// into the observable's signature. Calls after a terminal notification are
/// ignored.
pub trait Emitter<Item, Err> {
  fn next(&mut self, value: Item);
  fn error(&mut self, err: Err);
  fn complete(&mut self);
  fn is_finished(&self) -> bool;
}

/// Generates `error` forwarding to the named field of the observer.
macro_rules! error_proxy_impl {
  ($err: ty, $field: ident) => {
    #[inline]
    fn error(self, err: $err) { self.$field.error(err) }
  };
}

/// Generates `complete` forwarding to the named field of the observer.
macro_rules! complete_proxy_impl {
  ($field: ident) => {
    #[inline]
    fn complete(self) { self.$field.complete() }
  };
}

/// Generates `is_finished` forwarding to the named field of the observer.
macro_rules! is_finished_proxy_impl {
  ($field: ident) => {
    #[inline]
    fn is_finished(&self) -> bool { self.$field.is_finished() }
  };
}

/// The default-forwarding part of a decorating observer: everything except
/// `next` passes through to the downstream observer unchanged.
macro_rules! observer_proxy_impl {
  ($err: ty, $field: ident) => {
    $crate::observer::error_proxy_impl!($err, $field);
    $crate::observer::complete_proxy_impl!($field);
    $crate::observer::is_finished_proxy_impl!($field);
  };
}

pub(crate) use complete_proxy_impl;
pub(crate) use error_proxy_impl;
pub(crate) use is_finished_proxy_impl;
pub(crate) use observer_proxy_impl;

/// An observer assembled from three closures.
#[derive(Clone)]
pub struct ObserverAll<N, E, C> {
  next: N,
  error: E,
  complete: C,
}

impl<N, E, C> ObserverAll<N, E, C> {
  #[inline(always)]
  pub fn new(next: N, error: E, complete: C) -> Self {
    ObserverAll { next, error, complete }
  }
}

impl<Item, Err, N, E, C> Observer<Item, Err> for ObserverAll<N, E, C>
where
  N: FnMut(Item),
  E: FnOnce(Err),
  C: FnOnce(),
{
  #[inline(always)]
  fn next(&mut self, value: Item) { (self.next)(value); }
  #[inline(always)]
  fn error(self, err: Err) { (self.error)(err); }
  #[inline(always)]
  fn complete(self) { (self.complete)(); }
  #[inline(always)]
  fn is_finished(&self) -> bool { false }
}

pub(crate) fn ignore_error<Err>(_: Err) {}

pub(crate) fn ignore_complete() {}

/// Adapts an owned observer to the `Emitter` facade. The observer is dropped
/// at the first terminal notification.
pub(crate) struct EmitterObserver<O>(pub(crate) Option<O>);

impl<O, Item, Err> Emitter<Item, Err> for EmitterObserver<O>
where
  O: Observer<Item, Err>,
{
  #[inline]
  fn next(&mut self, value: Item) {
    if let Some(observer) = &mut self.0 {
      observer.next(value);
    }
  }

  #[inline]
  fn error(&mut self, err: Err) {
    if let Some(observer) = self.0.take() {
      observer.error(err);
    }
  }

  #[inline]
  fn complete(&mut self) {
    if let Some(observer) = self.0.take() {
      observer.complete();
    }
  }

  #[inline]
  fn is_finished(&self) -> bool {
    self.0.as_ref().map_or(true, |o| o.is_finished())
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use std::cell::RefCell;

  #[test]
  fn observer_all_calls_closures() {
    let log = RefCell::new(vec![]);
    let mut observer = ObserverAll::new(
      |v: i32| log.borrow_mut().push(format!("next {v}")),
      |e: &str| log.borrow_mut().push(format!("error {e}")),
      || log.borrow_mut().push("complete".to_owned()),
    );
    observer.next(1);
    observer.next(2);
    Observer::<i32, &str>::complete(observer);
    assert_eq!(*log.borrow(), vec!["next 1", "next 2", "complete"]);
  }

  #[test]
  fn emitter_ignores_calls_after_terminal() {
    let values = RefCell::new(vec![]);
    let errors = RefCell::new(0);
    let mut emitter = EmitterObserver(Some(ObserverAll::new(
      |v: i32| values.borrow_mut().push(v),
      |_: ()| *errors.borrow_mut() += 1,
      || {},
    )));
    emitter.next(1);
    emitter.error(());
    emitter.next(2);
    emitter.error(());
    assert!(Emitter::<i32, ()>::is_finished(&emitter));
    assert_eq!(*values.borrow(), vec![1]);
    assert_eq!(*errors.borrow(), 1);
  }
}
