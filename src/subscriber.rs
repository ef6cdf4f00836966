use crate::{
  observer::Observer,
  subscription::SubscriptionLike,
};
use std::{
  cell::{Cell, RefCell},
  rc::Rc,
};

/// The shared slot holding a consumer's observer.
///
/// A top-level `subscribe` hands one clone of the `Subscriber` to the
/// observable and keeps another as part of the returned subscription.
/// Unsubscribing closes the slot: nothing reaches the observer afterwards,
/// even when `unsubscribe` is called from inside the observer's own `next`.
pub struct Subscriber<O>(Rc<SubscriberInner<O>>);

struct SubscriberInner<O> {
  closed: Cell<bool>,
  observer: RefCell<Option<O>>,
}

impl<O> Subscriber<O> {
  pub fn new(observer: O) -> Self {
    Subscriber(Rc::new(SubscriberInner {
      closed: Cell::new(false),
      observer: RefCell::new(Some(observer)),
    }))
  }

  fn take_observer(&self) -> Option<O> {
    self.0.closed.set(true);
    self.0.observer.borrow_mut().take()
  }
}

impl<O> Clone for Subscriber<O> {
  #[inline]
  fn clone(&self) -> Self { Subscriber(self.0.clone()) }
}

impl<Item, Err, O> Observer<Item, Err> for Subscriber<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if self.0.closed.get() {
      return;
    }
    if let Some(observer) = self.0.observer.borrow_mut().as_mut() {
      observer.next(value);
    }
  }

  fn error(self, err: Err) {
    if self.0.closed.get() {
      return;
    }
    if let Some(observer) = self.take_observer() {
      observer.error(err);
    }
  }

  fn complete(self) {
    if self.0.closed.get() {
      return;
    }
    if let Some(observer) = self.take_observer() {
      observer.complete();
    }
  }

  fn is_finished(&self) -> bool {
    if self.0.closed.get() {
      return true;
    }
    match self.0.observer.try_borrow() {
      Ok(observer) => observer.as_ref().map_or(true, |o| o.is_finished()),
      // Borrowed by a `next` further up the stack, so still live.
      Err(_) => false,
    }
  }
}

impl<O> SubscriptionLike for Subscriber<O> {
  fn unsubscribe(&mut self) {
    self.0.closed.set(true);
    // Inside the observer's own callback the slot is borrowed; the closed
    // flag already blocks delivery and the observer is released with the
    // last clone.
    let observer = self
      .0
      .observer
      .try_borrow_mut()
      .ok()
      .and_then(|mut slot| slot.take());
    drop(observer);
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.closed.get() }
}
