use crate::{observer::Observer, prelude::*};

/// Emits the given values as soon as it is subscribed, then everything the
/// source emits.
///
/// ```
/// use rxlite::prelude::*;
///
/// let mut out = vec![];
/// observable::from_iter(3..5)
///   .start_with(vec![1, 2])
///   .subscribe(|v| out.push(v));
/// assert_eq!(out, vec![1, 2, 3, 4]);
/// ```
#[derive(Clone)]
pub struct StartWithOp<S, Item> {
  source: S,
  values: Vec<Item>,
}

impl<S, Item> StartWithOp<S, Item> {
  #[inline]
  pub(crate) fn new(source: S, values: Vec<Item>) -> Self {
    StartWithOp { source, values }
  }
}

impl<Item, Err, O, S> Observable<Item, Err, O> for StartWithOp<S, Item>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, O>,
{
  type Unsub = Option<S::Unsub>;

  fn actual_subscribe(self, mut observer: O) -> Self::Unsub {
    for value in self.values {
      if observer.is_finished() {
        break;
      }
      observer.next(value);
    }
    if observer.is_finished() {
      None
    } else {
      Some(self.source.actual_subscribe(observer))
    }
  }
}

impl<Item, Err, S> ObservableExt<Item, Err> for StartWithOp<S, Item> where
  S: ObservableExt<Item, Err>
{
}
