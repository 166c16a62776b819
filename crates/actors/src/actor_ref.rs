use tokio::sync::oneshot;

use crate::{
    actor::{Actor, ActorError},
    handler::{ActorMessage, Handler, Message},
    mailbox::{BoundedMailbox, Mailbox, WeakMailbox},
};

pub type ActorResult<A, T> = Result<T, ActorError<A, BoundedMailbox<A>>>;

pub struct ActorRef<A: Actor> {
    sender: BoundedMailbox<A>,
}

impl<A: Actor> Clone for ActorRef<A> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<A: Actor> ActorRef<A> {
    pub(crate) fn new(sender: BoundedMailbox<A>) -> Self {
        Self { sender }
    }

    /// A reference that does not keep the actor alive.
    pub fn downgrade(&self) -> WeakActorRef<A> {
        WeakActorRef {
            sender: self.sender.downgrade(),
        }
    }

    pub async fn tell<M>(&self, msg: M) -> ActorResult<A, ()>
    where
        M: Message,
        A: Handler<M>,
    {
        let message = ActorMessage::<M, A>::new(msg, None);
        self.sender
            .send(message)
            .await
            .map_err(|why| ActorError::<A, BoundedMailbox<A>>::SendError(why))
    }

    pub async fn ask<M>(&self, msg: M) -> ActorResult<A, M::Response>
    where
        M: Message,
        A: Handler<M>,
    {
        let (response_tx, response_rx) = oneshot::channel();
        let message = ActorMessage::<M, A>::new(msg, Some(response_tx));
        self.sender
            .send(message)
            .await
            .map_err(|why| ActorError::<A, BoundedMailbox<A>>::SendError(why))?;
        response_rx
            .await
            .map_err(|why| ActorError::ReceiveAnswerError(why))
    }
}

/// Weak counterpart of [`ActorRef`]. Once every strong reference is gone the
/// actor stops and [`WeakActorRef::upgrade`] returns `None`.
pub struct WeakActorRef<A: Actor> {
    sender: WeakMailbox<A>,
}

impl<A: Actor> WeakActorRef<A> {
    pub fn upgrade(&self) -> Option<ActorRef<A>> {
        self.sender.upgrade().map(ActorRef::new)
    }
}

impl<A: Actor> Clone for WeakActorRef<A> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}
