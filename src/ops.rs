pub mod catch_error;
pub mod combine_latest;
pub mod concat_with;
pub mod filter;
pub mod map;
pub mod map_err;
pub mod map_to;
pub mod merge;
pub mod multi_source;
pub mod on_complete;
pub mod on_error;
pub mod retry;
pub mod skip;
pub mod start_with;
pub mod take;
pub mod take_last;
pub mod tap;
pub mod try_map;
pub mod with_latest_from;
pub mod zip;

use take::TakeOp;
use take_last::TakeLastOp;

/// `first` is `take(1)`.
pub type FirstOp<Source> = TakeOp<Source>;

/// `last` is `take_last(1)`.
pub type LastOp<Source> = TakeLastOp<Source>;

#[cfg(test)]
mod test {
  use crate::prelude::*;

  #[test]
  fn first_and_last() {
    let mut first = vec![];
    let mut last = vec![];
    observable::from_iter(1..=4).first().subscribe(|v| first.push(v));
    observable::from_iter(1..=4).last().subscribe(|v| last.push(v));
    assert_eq!(first, vec![1]);
    assert_eq!(last, vec![4]);
  }

  #[test]
  fn first_and_last_of_empty() {
    let mut hits = 0;
    let mut completed = 0;
    observable::from_iter(std::iter::empty::<i32>())
      .first()
      .subscribe_complete(|_| hits += 1, || completed += 1);
    observable::from_iter(std::iter::empty::<i32>())
      .last()
      .subscribe_complete(|_| hits += 1, || completed += 1);
    assert_eq!(hits, 0);
    assert_eq!(completed, 2);
  }
}
