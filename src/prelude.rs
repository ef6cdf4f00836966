pub use crate::{
  observable::{self, Observable, ObservableExt},
  observer::{Emitter, Observer, ObserverAll},
  ops::{
    catch_error::{CatchPolicy, CatchState, Recover},
    multi_source::CombineItem,
    retry::{RetryConfig, RetryPolicy},
  },
  subscription::{
    LocalSubscription, SubscriptionGuard, SubscriptionLike,
    SubscriptionWrapper,
  },
};
