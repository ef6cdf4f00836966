use crate::rc::{MutRc, RcDeref, RcDerefMut};
use log::trace;
use smallvec::SmallVec;
use std::{
  any::Any,
  fmt::{Debug, Formatter},
};

/// Subscription returns from `Observable.actual_subscribe(Observer)` to allow
/// unsubscribing.
pub trait SubscriptionLike {
  /// This allows deregistering a stream before it has finished receiving all
  /// events (i.e. before `complete` is called). Calling it more than once has
  /// no additional effect.
  fn unsubscribe(&mut self);

  fn is_closed(&self) -> bool;
}

impl Debug for Box<dyn SubscriptionLike> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Box<dyn SubscriptionLike>")
      .field("is_closed", &self.is_closed())
      .finish()
  }
}

/// Synchronous sources finish their work inside `actual_subscribe`, there is
/// nothing left to tear down.
impl SubscriptionLike for () {
  #[inline]
  fn unsubscribe(&mut self) {}

  #[inline]
  fn is_closed(&self) -> bool { true }
}

impl<T: SubscriptionLike> SubscriptionLike for Option<T> {
  #[inline]
  fn unsubscribe(&mut self) {
    if let Some(s) = self {
      s.unsubscribe()
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.as_ref().map_or(true, |s| s.is_closed()) }
}

impl<T: ?Sized> SubscriptionLike for Box<T>
where
  T: SubscriptionLike,
{
  #[inline]
  fn unsubscribe(&mut self) {
    let s = &mut **self;
    s.unsubscribe()
  }

  #[inline]
  fn is_closed(&self) -> bool {
    let s = &**self;
    s.is_closed()
  }
}

/// A group of subscriptions torn down together.
///
/// Clones share the same group. Unsubscribing the group unsubscribes every
/// child exactly once; a child added after the group was closed is
/// unsubscribed immediately.
#[derive(Clone, Debug, Default)]
pub struct LocalSubscription(MutRc<Inner>);

impl LocalSubscription {
  pub fn add<S: SubscriptionLike + 'static>(&self, mut subscription: S) {
    if self.is_same(&subscription) {
      return;
    }
    let closed = self.0.rc_deref().closed;
    if closed {
      subscription.unsubscribe();
    } else {
      let mut inner = self.0.rc_deref_mut();
      inner.teardown.retain(|v| !v.is_closed());
      inner.teardown.push(Box::new(subscription));
    }
  }

  /// Number of live children currently held by the group.
  pub fn teardown_size(&self) -> usize { self.0.rc_deref().teardown.len() }

  fn is_same(&self, other: &dyn Any) -> bool {
    if let Some(other) = other.downcast_ref::<Self>() {
      self.0.ptr_eq(&other.0)
    } else {
      false
    }
  }
}

impl SubscriptionLike for LocalSubscription {
  fn unsubscribe(&mut self) {
    let teardown = {
      let mut inner = self.0.rc_deref_mut();
      if inner.closed {
        return;
      }
      inner.closed = true;
      std::mem::take(&mut inner.teardown)
    };
    trace!("tearing down {} subscription(s)", teardown.len());
    for mut v in teardown {
      v.unsubscribe();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.rc_deref().closed }
}

#[derive(Default)]
struct Inner {
  closed: bool,
  teardown: SmallVec<[Box<dyn SubscriptionLike>; 1]>,
}

impl Debug for Inner {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Inner")
      .field("closed", &self.closed)
      .field("teardown_count", &self.teardown.len())
      .finish()
  }
}

/// Holds the subscription of the current attempt of an operator that
/// subscribes one source after another. Replacing the held subscription
/// unsubscribes the previous one.
#[derive(Clone, Default)]
pub struct SerialSubscription(MutRc<SerialInner>);

#[derive(Default)]
struct SerialInner {
  closed: bool,
  current: Option<Box<dyn SubscriptionLike>>,
}

impl SerialSubscription {
  pub fn replace<S: SubscriptionLike + 'static>(&self, subscription: S) {
    let mut subscription: Box<dyn SubscriptionLike> = Box::new(subscription);
    let mut inner = self.0.rc_deref_mut();
    if inner.closed {
      drop(inner);
      subscription.unsubscribe();
      return;
    }
    let previous = inner.current.replace(subscription);
    drop(inner);
    if let Some(mut previous) = previous {
      previous.unsubscribe();
    }
  }
}

impl SubscriptionLike for SerialSubscription {
  fn unsubscribe(&mut self) {
    let current = {
      let mut inner = self.0.rc_deref_mut();
      if inner.closed {
        return;
      }
      inner.closed = true;
      inner.current.take()
    };
    if let Some(mut current) = current {
      current.unsubscribe();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.rc_deref().closed }
}

/// Two subscriptions released together, in order.
pub struct ZipSubscription<A, B> {
  a: A,
  b: B,
}

impl<A, B> ZipSubscription<A, B> {
  pub fn new(a: A, b: B) -> Self { ZipSubscription { a, b } }
}

impl<A, B> SubscriptionLike for ZipSubscription<A, B>
where
  A: SubscriptionLike,
  B: SubscriptionLike,
{
  fn unsubscribe(&mut self) {
    self.a.unsubscribe();
    self.b.unsubscribe();
  }

  fn is_closed(&self) -> bool { self.a.is_closed() && self.b.is_closed() }
}

/// Wrapper around a subscription which provides the
/// `unsubscribe_when_dropped()` method.
pub struct SubscriptionWrapper<T: SubscriptionLike>(pub(crate) T);

impl<T: SubscriptionLike> SubscriptionWrapper<T> {
  /// Activates "RAII" behavior for this subscription. That means
  /// `unsubscribe()` will be called automatically as soon as the returned
  /// value goes out of scope.
  ///
  /// **Attention:** If you don't assign the return value to a variable,
  /// `unsubscribe()` is called immediately, which is probably not what you
  /// want!
  pub fn unsubscribe_when_dropped(self) -> SubscriptionGuard<T> {
    SubscriptionGuard(self.0)
  }

  /// Consumes this wrapper and returns the underlying subscription.
  pub fn into_inner(self) -> T { self.0 }
}

impl<T: SubscriptionLike> SubscriptionLike for SubscriptionWrapper<T> {
  #[inline]
  fn is_closed(&self) -> bool { self.0.is_closed() }
  #[inline]
  fn unsubscribe(&mut self) { self.0.unsubscribe() }
}

/// An RAII implementation of a "scoped subscribed" of a subscription.
/// When this structure is dropped (falls out of scope), the subscription will
/// be unsubscribed.
///
/// If you want to drop it immediately, wrap it in its own scope
#[must_use]
pub struct SubscriptionGuard<T: SubscriptionLike>(pub(crate) T);

impl<T: SubscriptionLike> SubscriptionGuard<T> {
  /// Wraps an existing subscription with a guard to enable RAII behavior for
  /// it.
  pub fn new(subscription: T) -> SubscriptionGuard<T> {
    SubscriptionGuard(subscription)
  }
}

impl<T: SubscriptionLike> Drop for SubscriptionGuard<T> {
  #[inline]
  fn drop(&mut self) { self.0.unsubscribe() }
}
