use std::panic::AssertUnwindSafe;

use actor::{Actor, SupervisionStrategy};
use actor_ref::ActorRef;
use futures::FutureExt;
use mailbox::{bounded_mailbox, MailboxReceiver};

pub mod actor;
pub mod actor_ref;
pub mod handler;
pub mod mailbox;

pub const DEFAULT_MAILBOX_CAPACITY: usize = 32;

/// Creates and runs an actor. If the actor panics, it is either restared, resumed
/// or stoped acording to the behavior specified by `Actor::on_fail()`.
pub fn run<A, F>(actor_factory: F) -> ActorRef<A>
where
    A: Actor,
    F: 'static + Send + Fn() -> A,
{
    run_with_capacity(DEFAULT_MAILBOX_CAPACITY, actor_factory)
}

/// Same as [`run`], with a mailbox holding up to `capacity` pending messages.
/// Senders wait while the mailbox is full.
pub fn run_with_capacity<A, F>(capacity: usize, actor_factory: F) -> ActorRef<A>
where
    A: Actor,
    F: 'static + Send + Fn() -> A,
{
    let (tx, mut rx) = bounded_mailbox(capacity);
    let actor_ref = ActorRef::new(tx);
    let myself = actor_ref.downgrade();
    let mut actor = actor_factory();
    actor.started(myself.clone());

    // run actor
    tokio::spawn(async move {
        while let Some(mut message) = rx.recv().await {
            // handle message
            let result = AssertUnwindSafe(message.handle(&mut actor))
                .catch_unwind()
                .await;
            // handler paniced?
            if let Err(why) = result {
                log::error!("actor paniced: {:?}", why);
                match actor.on_fail(why) {
                    SupervisionStrategy::Restart => {
                        actor = actor_factory();
                        actor.started(myself.clone());
                    }
                    SupervisionStrategy::Resume => {}
                    SupervisionStrategy::Stop => {
                        break;
                    }
                };
            }
        }
        log::debug!("actor stopped");
    });

    actor_ref
}

#[cfg(test)]
mod tests {
    use std::any::Any;

    use async_trait::async_trait;

    use super::*;
    use crate::{
        actor_ref::WeakActorRef,
        handler::{Handler, Message},
    };

    struct Increment(i64);

    impl Message for Increment {
        type Response = ();
    }

    struct GetValue;

    impl Message for GetValue {
        type Response = i64;
    }

    struct Explode;

    impl Message for Explode {
        type Response = ();
    }

    /// Asks the actor to send `Increment` to itself from a spawned task.
    struct IncrementLater(i64);

    impl Message for IncrementLater {
        type Response = ();
    }

    struct Counter {
        count: i64,
        strategy: SupervisionStrategy,
        myself: Option<WeakActorRef<Counter>>,
    }

    impl Actor for Counter {
        fn started(&mut self, myself: WeakActorRef<Self>) {
            self.myself = Some(myself);
        }

        fn on_fail(&mut self, _: Box<dyn Any + Send>) -> SupervisionStrategy {
            self.strategy.clone()
        }
    }

    #[async_trait]
    impl Handler<Increment> for Counter {
        async fn handle(&mut self, message: Increment) {
            self.count += message.0;
        }
    }

    #[async_trait]
    impl Handler<GetValue> for Counter {
        async fn handle(&mut self, _: GetValue) -> i64 {
            self.count
        }
    }

    #[async_trait]
    impl Handler<Explode> for Counter {
        async fn handle(&mut self, _: Explode) {
            panic!("boom");
        }
    }

    #[async_trait]
    impl Handler<IncrementLater> for Counter {
        async fn handle(&mut self, message: IncrementLater) {
            let myself = self.myself.clone().and_then(|weak| weak.upgrade());
            if let Some(myself) = myself {
                tokio::spawn(async move {
                    let _ = myself.tell(Increment(message.0)).await;
                })
                .await
                .ok();
            }
        }
    }

    fn counter(strategy: SupervisionStrategy) -> Counter {
        Counter {
            count: 0,
            strategy,
            myself: None,
        }
    }

    #[tokio::test]
    async fn messages_are_handled_in_order() {
        let actor_ref = run(|| counter(SupervisionStrategy::Restart));
        actor_ref.tell(Increment(1)).await.unwrap();
        actor_ref.tell(Increment(5)).await.unwrap();
        actor_ref.tell(Increment(-2)).await.unwrap();
        assert_eq!(actor_ref.ask(GetValue).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn resume_keeps_state_after_panic() {
        let actor_ref = run(|| counter(SupervisionStrategy::Resume));
        actor_ref.tell(Increment(3)).await.unwrap();
        assert!(actor_ref.ask(Explode).await.is_err());
        assert_eq!(actor_ref.ask(GetValue).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn restart_resets_state_after_panic() {
        let actor_ref = run(|| counter(SupervisionStrategy::Restart));
        actor_ref.tell(Increment(3)).await.unwrap();
        assert!(actor_ref.ask(Explode).await.is_err());
        assert_eq!(actor_ref.ask(GetValue).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn actor_can_message_itself() {
        let actor_ref = run(|| counter(SupervisionStrategy::Restart));
        actor_ref.ask(IncrementLater(7)).await.unwrap();
        assert_eq!(actor_ref.ask(GetValue).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn weak_reference_does_not_keep_actor_alive() {
        let actor_ref = run(|| counter(SupervisionStrategy::Stop));
        let weak = actor_ref.downgrade();
        assert!(weak.upgrade().is_some());
        drop(actor_ref);
        assert!(weak.upgrade().is_none());
    }
}
