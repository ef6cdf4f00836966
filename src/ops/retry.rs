//! Retry policies for `ObservableExt::retry`.
//!
//! ```
//! use rxlite::prelude::*;
//! use std::{cell::Cell, rc::Rc};
//!
//! let attempts = Rc::new(Cell::new(0));
//! let c_attempts = attempts.clone();
//! let source = observable::create(move |emitter: &mut dyn Emitter<i32, &str>| {
//!   let n = c_attempts.get() + 1;
//!   c_attempts.set(n);
//!   if n < 3 {
//!     emitter.error("error");
//!   } else {
//!     emitter.next(1);
//!     emitter.complete();
//!   }
//! });
//!
//! let mut values = vec![];
//! source.retry(3).subscribe(|v| values.push(v));
//! assert_eq!(values, vec![1]);
//! assert_eq!(attempts.get(), 3);
//! ```
use crate::{
  observable::{throw, ObservableThrow},
  ops::catch_error::{CatchPolicy, Recover},
};

/// Policy for determining whether to retry an error.
///
/// Implemented for `usize` (a maximum retry count) and [`RetryConfig`].
/// Custom policies can look at the error:
///
/// ```
/// use rxlite::ops::retry::RetryPolicy;
///
/// #[derive(Clone)]
/// struct ServerErrors;
///
/// impl RetryPolicy<u16> for ServerErrors {
///   fn should_retry(&self, status: &u16, attempt: usize) -> bool {
///     attempt < 3 && (500..600).contains(status)
///   }
/// }
/// ```
pub trait RetryPolicy<Err> {
  /// Whether to subscribe the source again after `err`.
  ///
  /// `attempt` is the number of retries already performed, 0 for the first
  /// error.
  fn should_retry(&self, err: &Err, attempt: usize) -> bool;

  /// Whether to reset the retry count when a value is successfully emitted.
  fn reset_on_success(&self) -> bool { false }
}

impl<Err> RetryPolicy<Err> for usize {
  #[inline]
  fn should_retry(&self, _err: &Err, attempt: usize) -> bool { attempt < *self }
}

/// A configuration struct for retry.
///
/// ```
/// use rxlite::ops::retry::RetryConfig;
///
/// let config = RetryConfig::new().count(5).reset_on_success();
/// ```
#[derive(Clone, Debug, Default)]
pub struct RetryConfig {
  count: Option<usize>,
  reset_on_success: bool,
}

impl RetryConfig {
  /// Retries forever, the count is never reset.
  pub fn new() -> Self { Self::default() }

  /// Sets the maximum number of retry attempts.
  ///
  /// `count(3)` allows for 3 retries, at most 4 subscriptions in total.
  pub fn count(mut self, count: usize) -> Self {
    self.count = Some(count);
    self
  }

  /// Resets the retry count whenever the source emits a value, so only
  /// consecutive failures count towards the limit.
  pub fn reset_on_success(mut self) -> Self {
    self.reset_on_success = true;
    self
  }
}

impl<Err> RetryPolicy<Err> for RetryConfig {
  fn should_retry(&self, _err: &Err, attempt: usize) -> bool {
    self.count.map_or(true, |count| attempt < count)
  }

  #[inline]
  fn reset_on_success(&self) -> bool { self.reset_on_success }
}

/// Adapts a [`RetryPolicy`] to a catch policy that re-raises the error once
/// the policy refuses to retry.
#[derive(Clone)]
pub struct RetryWith<P>(pub(crate) P);

impl<Item, Err, P> CatchPolicy<Item, Err> for RetryWith<P>
where
  P: RetryPolicy<Err>,
{
  type Fallback = ObservableThrow<Item, Err>;

  fn handle(&mut self, err: Err, retries: usize) -> Recover<Self::Fallback> {
    if self.0.should_retry(&err, retries) {
      Recover::Retry
    } else {
      Recover::Switch(throw(err))
    }
  }

  #[inline]
  fn reset_on_success(&self) -> bool { self.0.reset_on_success() }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::{cell::Cell, rc::Rc};

  fn flaky(
    failures: Rc<Cell<usize>>,
  ) -> impl FnOnce(&mut dyn Emitter<i32, &'static str>) + Clone {
    move |emitter| {
      emitter.next(1);
      if failures.get() > 0 {
        failures.set(failures.get() - 1);
        emitter.error("flaky");
      } else {
        emitter.complete();
      }
    }
  }

  #[test]
  fn count_policy() {
    let failures = Rc::new(Cell::new(2));
    let mut values = vec![];
    let mut completed = false;
    observable::create(flaky(failures))
      .retry(2)
      .subscribe_complete(|v| values.push(v), || completed = true);
    assert_eq!(values, vec![1, 1, 1]);
    assert!(completed);
  }

  #[test]
  fn exhausted_policy_reraises() {
    let failures = Rc::new(Cell::new(5));
    let mut values = vec![];
    let mut error = None;
    observable::create(flaky(failures.clone()))
      .retry(RetryConfig::new().count(1))
      .subscribe_err(|v| values.push(v), |e| error = Some(e));
    assert_eq!(values, vec![1, 1]);
    assert_eq!(error, Some("flaky"));
    assert_eq!(failures.get(), 3);
  }

  #[test]
  fn reset_on_success() {
    // Every attempt emits before failing, so with the count reset the limit
    // of one retry is never reached.
    let failures = Rc::new(Cell::new(4));
    let mut values = vec![];
    let mut completed = false;
    observable::create(flaky(failures))
      .retry(RetryConfig::new().count(1).reset_on_success())
      .subscribe_complete(|v| values.push(v), || completed = true);
    assert_eq!(values, vec![1; 5]);
    assert!(completed);
  }

  #[test]
  fn unlimited() {
    let failures = Rc::new(Cell::new(50));
    let mut hits = 0;
    observable::create(flaky(failures))
      .retry(RetryConfig::new())
      .subscribe(|_| hits += 1);
    assert_eq!(hits, 51);
  }
}
