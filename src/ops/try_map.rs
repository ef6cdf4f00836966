use crate::{observer::Observer, prelude::*, type_hint::TypeHint};

/// Maps every value with a fallible closure. The first `Err` it returns
/// terminates the stream with that error and later values are dropped.
///
/// ```
/// use rxlite::prelude::*;
///
/// let mut out = vec![];
/// let mut failure = None;
/// observable::from_iter(["1", "2", "x", "4"])
///   .map_err(|e| match e {})
///   .try_map(|v: &str| v.parse::<i32>().map_err(|e| e.to_string()))
///   .subscribe_err(|v| out.push(v), |e| failure = Some(e));
/// assert_eq!(out, vec![1, 2]);
/// assert!(failure.is_some());
/// ```
pub struct TryMapOp<S, F, Item> {
  source: S,
  func: F,
  _hint: TypeHint<Item>,
}

impl<S, F, Item> TryMapOp<S, F, Item> {
  #[inline]
  pub(crate) fn new(source: S, func: F) -> Self {
    TryMapOp { source, func, _hint: TypeHint::new() }
  }
}

impl<S: Clone, F: Clone, Item> Clone for TryMapOp<S, F, Item> {
  fn clone(&self) -> Self {
    TryMapOp {
      source: self.source.clone(),
      func: self.func.clone(),
      _hint: TypeHint::new(),
    }
  }
}

impl<Item, B, Err, O, S, F> Observable<B, Err, O> for TryMapOp<S, F, Item>
where
  O: Observer<B, Err>,
  S: Observable<Item, Err, TryMapObserver<O, F>>,
  F: FnMut(Item) -> Result<B, Err>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self.source.actual_subscribe(TryMapObserver {
      observer: Some(observer),
      func: self.func,
    })
  }
}

impl<Item, B, Err, S, F> ObservableExt<B, Err> for TryMapOp<S, F, Item>
where
  S: ObservableExt<Item, Err>,
  F: FnMut(Item) -> Result<B, Err>,
{
}

pub struct TryMapObserver<O, F> {
  observer: Option<O>,
  func: F,
}

impl<Item, B, Err, O, F> Observer<Item, Err> for TryMapObserver<O, F>
where
  O: Observer<B, Err>,
  F: FnMut(Item) -> Result<B, Err>,
{
  fn next(&mut self, value: Item) {
    if self.observer.is_none() {
      return;
    }
    match (self.func)(value) {
      Ok(v) => {
        if let Some(observer) = self.observer.as_mut() {
          observer.next(v);
        }
      }
      Err(err) => {
        if let Some(observer) = self.observer.take() {
          observer.error(err);
        }
      }
    }
  }

  fn error(self, err: Err) {
    if let Some(observer) = self.observer {
      observer.error(err);
    }
  }

  fn complete(self) {
    if let Some(observer) = self.observer {
      observer.complete();
    }
  }

  fn is_finished(&self) -> bool {
    self.observer.as_ref().map_or(true, |o| o.is_finished())
  }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;

  #[test]
  fn failure_terminates_stream() {
    let mut values = vec![];
    let mut errors = vec![];
    let mut completed = false;
    observable::from_iter(0..10)
      .map_err(|e| match e {})
      .try_map(|v| if v < 3 { Ok(v * 2) } else { Err(format!("{v} too big")) })
      .subscribe_all(
        |v| values.push(v),
        |e| errors.push(e),
        || completed = true,
      );
    assert_eq!(values, vec![0, 2, 4]);
    assert_eq!(errors, vec!["3 too big".to_owned()]);
    assert!(!completed);
  }

  #[test]
  fn stops_synchronous_source_after_failure() {
    let mut produced = 0;
    observable::from_iter(0..100)
      .tap(|_| produced += 1)
      .map_err(|e| match e {})
      .try_map(|v| if v == 1 { Err(()) } else { Ok(v) })
      .subscribe(|_| {});
    assert_eq!(produced, 2);
  }
}
