use crate::{prelude::*, type_hint::TypeHint};

/// Creates an observable that emits no items, just terminates with an error.
///
/// The item type is decided by how the observable is used.
///
/// # Arguments
///
/// * `e` - An error to emit and terminate with
#[inline]
pub fn throw<Item, Err>(e: Err) -> ObservableThrow<Item, Err> {
  ObservableThrow { err: e, _hint: TypeHint::new() }
}

pub struct ObservableThrow<Item, Err> {
  err: Err,
  _hint: TypeHint<Item>,
}

impl<Item, Err: Clone> Clone for ObservableThrow<Item, Err> {
  fn clone(&self) -> Self { throw(self.err.clone()) }
}

impl<Item, Err, O> Observable<Item, Err, O> for ObservableThrow<Item, Err>
where
  O: Observer<Item, Err>,
{
  type Unsub = ();

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    observer.error(self.err)
  }
}

impl<Item, Err> ObservableExt<Item, Err> for ObservableThrow<Item, Err> {}

/// Creates an observable that produces no values.
///
/// Completes immediately. Never emits an error.
///
/// # Examples
/// ```
/// use rxlite::prelude::*;
///
/// let mut completed = false;
/// observable::empty()
///   .subscribe_all(|_: i32| {}, |_: ()| {}, || completed = true);
/// assert!(completed);
/// ```
#[inline]
pub fn empty<Item, Err>() -> ObservableEmpty<Item, Err> {
  ObservableEmpty(TypeHint::new())
}

pub struct ObservableEmpty<Item, Err>(TypeHint<(Item, Err)>);

impl<Item, Err> Clone for ObservableEmpty<Item, Err> {
  #[inline]
  fn clone(&self) -> Self { empty() }
}

impl<Item, Err, O> Observable<Item, Err, O> for ObservableEmpty<Item, Err>
where
  O: Observer<Item, Err>,
{
  type Unsub = ();

  #[inline]
  fn actual_subscribe(self, observer: O) -> Self::Unsub { observer.complete() }
}

impl<Item, Err> ObservableExt<Item, Err> for ObservableEmpty<Item, Err> {}

/// Creates an observable that never emits anything.
///
/// Neither emits a value, nor completes, nor emits an error.
#[inline]
pub fn never<Item, Err>() -> ObservableNever<Item, Err> {
  ObservableNever(TypeHint::new())
}

pub struct ObservableNever<Item, Err>(TypeHint<(Item, Err)>);

impl<Item, Err> Clone for ObservableNever<Item, Err> {
  #[inline]
  fn clone(&self) -> Self { never() }
}

impl<Item, Err, O> Observable<Item, Err, O> for ObservableNever<Item, Err>
where
  O: Observer<Item, Err>,
{
  type Unsub = ();

  #[inline]
  fn actual_subscribe(self, _: O) -> Self::Unsub {}
}

impl<Item, Err> ObservableExt<Item, Err> for ObservableNever<Item, Err> {}
