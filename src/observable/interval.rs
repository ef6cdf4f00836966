use super::from_stream::{spawn_stream, StreamSubscription};
use crate::prelude::*;
use futures::{stream, task::LocalSpawn, FutureExt, StreamExt};
use std::{convert::Infallible, time::Duration};

/// Creates an observable which emits `0, 1, 2, ...`, one value every
/// `period`, starting one `period` after subscribing. It never completes.
///
/// ```no_run
/// use futures::executor::LocalPool;
/// use rxlite::prelude::*;
/// use std::time::Duration;
///
/// let mut pool = LocalPool::new();
/// observable::interval(Duration::from_millis(10), pool.spawner())
///   .take(3)
///   .subscribe(|v| println!("tick {v}"));
/// pool.run();
/// ```
pub fn interval<SD>(period: Duration, spawner: SD) -> IntervalObservable<SD> {
  IntervalObservable { period, spawner }
}

#[derive(Clone)]
pub struct IntervalObservable<SD> {
  period: Duration,
  spawner: SD,
}

impl<O, SD> Observable<usize, Infallible, O> for IntervalObservable<SD>
where
  O: Observer<usize, Infallible> + 'static,
  SD: LocalSpawn,
{
  type Unsub = StreamSubscription;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let ticks = futures_time::stream::interval(self.period.into())
      .enumerate()
      .map(|(seq, _)| seq);
    spawn_stream(ticks, observer, &self.spawner)
  }
}

impl<SD> ObservableExt<usize, Infallible> for IntervalObservable<SD> {}

/// Creates an observable which emits `value` once `delay` elapsed after
/// subscribing, then completes.
pub fn timer<Item, SD>(
  value: Item,
  delay: Duration,
  spawner: SD,
) -> TimerObservable<Item, SD> {
  TimerObservable { value, delay, spawner }
}

#[derive(Clone)]
pub struct TimerObservable<Item, SD> {
  value: Item,
  delay: Duration,
  spawner: SD,
}

impl<Item, O, SD> Observable<Item, Infallible, O> for TimerObservable<Item, SD>
where
  Item: 'static,
  O: Observer<Item, Infallible> + 'static,
  SD: LocalSpawn,
{
  type Unsub = StreamSubscription;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let Self { value, delay, spawner } = self;
    let fire = futures_time::task::sleep(delay.into()).map(move |_| value);
    spawn_stream(stream::once(fire), observer, &spawner)
  }
}

impl<Item, SD> ObservableExt<Item, Infallible> for TimerObservable<Item, SD> {}
