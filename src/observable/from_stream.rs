use crate::prelude::*;
use futures::{
  future::{abortable, AbortHandle},
  ready,
  task::{LocalSpawn, LocalSpawnExt},
  Future, FutureExt, Stream,
};
use log::warn;
use pin_project_lite::pin_project;
use std::{
  cell::Cell,
  convert::Infallible,
  pin::Pin,
  rc::Rc,
  task::{Context, Poll},
};

/// Returns an `Observable` that emits all the items returned from the source
/// `Stream`.
///
/// Every subscription polls the stream on a task spawned with `spawner`.
///
/// ```rust
/// use rxlite::prelude::*;
/// use futures::executor::LocalPool;
/// use std::{cell::RefCell, rc::Rc};
///
/// let stream = futures::stream::unfold(1, |state| async move {
///   if state < 4 {
///     Some((state, state + 1))
///   } else {
///     None
///   }
/// });
///
/// let mut pool = LocalPool::new();
/// let values = Rc::new(RefCell::new(vec![]));
/// let c_values = values.clone();
/// observable::from_stream(stream, pool.spawner())
///   .subscribe(move |x| c_values.borrow_mut().push(x));
///
/// pool.run();
/// assert_eq!(*values.borrow(), vec![1, 2, 3]);
/// ```
///
/// # Remarks
/// If you want convert a `Stream` that can fail use [`from_stream_result`]
/// instead.
pub fn from_stream<S, SD>(stream: S, spawner: SD) -> StreamObservable<S, SD>
where
  S: Stream,
{
  StreamObservable { stream, spawner }
}

#[derive(Clone)]
pub struct StreamObservable<S, SD> {
  stream: S,
  spawner: SD,
}

impl<O, S, SD> Observable<S::Item, Infallible, O> for StreamObservable<S, SD>
where
  S: Stream + 'static,
  O: Observer<S::Item, Infallible> + 'static,
  SD: LocalSpawn,
{
  type Unsub = StreamSubscription;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    spawn_stream(self.stream, observer, &self.spawner)
  }
}

impl<S, SD> ObservableExt<S::Item, Infallible> for StreamObservable<S, SD> where
  S: Stream
{
}

/// Converts a `Stream` of `Result`s into an `Observable`. `Ok` values are
/// emitted, the first `Err` terminates the observable with that error.
pub fn from_stream_result<S, SD>(
  stream: S,
  spawner: SD,
) -> StreamResultObservable<S, SD>
where
  S: Stream,
{
  StreamResultObservable(from_stream(stream, spawner))
}

#[derive(Clone)]
pub struct StreamResultObservable<S, SD>(StreamObservable<S, SD>);

impl<Item, Err, O, S, SD> Observable<Item, Err, O>
  for StreamResultObservable<S, SD>
where
  S: Stream<Item = Result<Item, Err>> + 'static,
  O: Observer<Item, Err> + 'static,
  SD: LocalSpawn,
{
  type Unsub = StreamSubscription;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self.0.actual_subscribe(ResultObserver(Some(observer)))
  }
}

impl<Item, Err, S, SD> ObservableExt<Item, Err>
  for StreamResultObservable<S, SD>
where
  S: Stream<Item = Result<Item, Err>>,
{
}

pub struct ResultObserver<O>(Option<O>);

impl<Item, Err, O> Observer<Result<Item, Err>, Infallible> for ResultObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Result<Item, Err>) {
    match value {
      Ok(v) => {
        if let Some(observer) = self.0.as_mut() {
          observer.next(v);
        }
      }
      Err(err) => {
        if let Some(observer) = self.0.take() {
          observer.error(err);
        }
      }
    }
  }

  fn error(self, err: Infallible) { match err {} }

  fn complete(self) {
    if let Some(observer) = self.0 {
      observer.complete();
    }
  }

  fn is_finished(&self) -> bool {
    self.0.as_ref().map_or(true, |o| o.is_finished())
  }
}

/// Spawns a task forwarding `stream` to `observer`.
pub(crate) fn spawn_stream<S, O, SD>(
  stream: S,
  observer: O,
  spawner: &SD,
) -> StreamSubscription
where
  S: Stream + 'static,
  O: Observer<S::Item, Infallible> + 'static,
  SD: LocalSpawn,
{
  let done = Rc::new(Cell::new(false));
  let forward = StreamForward {
    stream,
    observer: Some(observer),
    done: done.clone(),
  };
  let (task, handle) = abortable(forward);
  if let Err(err) = spawner.spawn_local(task.map(|_| ())) {
    warn!("failed to spawn stream task: {}", err);
    done.set(true);
  }
  StreamSubscription { handle, done }
}

/// Cancels the task polling a stream.
pub struct StreamSubscription {
  handle: AbortHandle,
  done: Rc<Cell<bool>>,
}

impl SubscriptionLike for StreamSubscription {
  fn unsubscribe(&mut self) {
    self.done.set(true);
    self.handle.abort();
  }

  #[inline]
  fn is_closed(&self) -> bool { self.done.get() }
}

pin_project! {
  struct StreamForward<S, O> {
    #[pin]
    stream: S,
    observer: Option<O>,
    done: Rc<Cell<bool>>,
  }
}

impl<S, O> Future for StreamForward<S, O>
where
  S: Stream,
  O: Observer<S::Item, Infallible>,
{
  type Output = ();

  fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
    loop {
      let this = self.as_mut().project();
      if this.observer.as_ref().map_or(true, |o| o.is_finished()) {
        this.observer.take();
        this.done.set(true);
        return Poll::Ready(());
      }
      match ready!(this.stream.poll_next(cx)) {
        Some(value) => {
          if let Some(observer) = this.observer.as_mut() {
            observer.next(value);
          }
        }
        None => {
          this.done.set(true);
          if let Some(observer) = this.observer.take() {
            observer.complete();
          }
          return Poll::Ready(());
        }
      }
    }
  }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use futures::{channel::mpsc, executor::LocalPool};
  use std::{cell::RefCell, rc::Rc};

  #[test]
  fn from_empty_stream() {
    let empty = futures::stream::empty::<String>();
    let mut pool = LocalPool::new();

    let count = Rc::new(RefCell::new(0));
    let completed = Rc::new(RefCell::new(false));
    let c_count = count.clone();
    let c_completed = completed.clone();
    observable::from_stream(empty, pool.spawner()).subscribe_complete(
      move |_| *c_count.borrow_mut() += 1,
      move || *c_completed.borrow_mut() = true,
    );

    pool.run();
    assert_eq!(*count.borrow(), 0);
    assert!(*completed.borrow());
  }

  #[test]
  fn channel_values_arrive_when_polled() {
    let (tx, rx) = mpsc::unbounded();
    let mut pool = LocalPool::new();
    let values = Rc::new(RefCell::new(vec![]));

    let c_values = values.clone();
    let subscription = observable::from_stream(rx, pool.spawner())
      .subscribe(move |v| c_values.borrow_mut().push(v));

    tx.unbounded_send(1).unwrap();
    tx.unbounded_send(2).unwrap();
    assert!(values.borrow().is_empty());
    pool.run_until_stalled();
    assert_eq!(*values.borrow(), vec![1, 2]);
    assert!(!subscription.is_closed());

    drop(tx);
    pool.run_until_stalled();
    assert!(subscription.is_closed());
  }

  #[test]
  fn unsubscribe_cancels_the_task() {
    let (tx, rx) = mpsc::unbounded();
    let mut pool = LocalPool::new();
    let values = Rc::new(RefCell::new(vec![]));

    let c_values = values.clone();
    let mut subscription = observable::from_stream(rx, pool.spawner())
      .subscribe(move |v| c_values.borrow_mut().push(v));
    tx.unbounded_send(1).unwrap();
    pool.run_until_stalled();

    subscription.unsubscribe();
    tx.unbounded_send(2).unwrap();
    pool.run_until_stalled();
    assert_eq!(*values.borrow(), vec![1]);
    assert!(subscription.is_closed());
  }

  #[test]
  fn result_stream_stops_at_first_error() {
    let items = futures::stream::iter(vec![Ok(1), Ok(2), Err("bad"), Ok(3)]);
    let mut pool = LocalPool::new();
    let values = Rc::new(RefCell::new(vec![]));
    let error = Rc::new(RefCell::new(None));

    let c_values = values.clone();
    let c_error = error.clone();
    observable::from_stream_result(items, pool.spawner()).subscribe_err(
      move |v| c_values.borrow_mut().push(v),
      move |e| *c_error.borrow_mut() = Some(e),
    );

    pool.run();
    assert_eq!(*values.borrow(), vec![1, 2]);
    assert_eq!(*error.borrow(), Some("bad"));
  }
}
