//! Prints a few timed streams to stdout.
//!
//! Run with `RUST_LOG=rxlite=trace cargo run --example stream_printer` to see
//! the subscription bookkeeping as well.
use futures::executor::LocalPool;
use rxlite::prelude::*;
use std::time::Duration;

fn main() {
  pretty_env_logger::init();
  let mut pool = LocalPool::new();
  let spawner = pool.spawner();

  let ticks = observable::interval(Duration::from_millis(100), spawner.clone())
    .map(|tick| format!("tick {tick}"))
    .take(5);
  let alarm = observable::timer(
    "alarm".to_owned(),
    Duration::from_millis(250),
    spawner.clone(),
  );

  ticks
    .merge_with(alarm)
    .start_with(vec!["start".to_owned()])
    .subscribe_complete(|line| println!("{line}"), || println!("done"));

  let letters = observable::from_iter(vec!['a', 'b', 'c']);
  observable::interval(Duration::from_millis(50), spawner)
    .zip_with(letters)
    .subscribe_complete(
      |(idx, letter)| println!("{idx}: {letter}"),
      || println!("zip done"),
    );

  pool.run();
}
