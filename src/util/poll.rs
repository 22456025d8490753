use std::{
    future::Future,
    pin::pin,
    task::{Context, Poll},
    thread,
    time::Duration,
};

use futures::task::noop_waker_ref;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Drives `future` to completion on the calling thread.
///
/// The waker is a no-op, so progress relies on the ambient tokio runtime
/// doing the I/O on its worker threads while this thread re-polls.
pub fn poll_until_ready<Fut>(future: Fut) -> Fut::Output
where
    Fut: Future,
{
    let mut future = pin!(future);
    let mut context = Context::from_waker(noop_waker_ref());

    loop {
        if let Poll::Ready(output) = future.as_mut().poll(&mut context) {
            return output;
        }
        thread::sleep(POLL_INTERVAL);
    }
}
