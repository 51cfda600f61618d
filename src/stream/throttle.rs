//! Stream throttling utilities

use futures::{Stream, ready};
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior, interval};

/// Extension trait to add throttling to any Stream
pub trait ThrottleExt: Stream {
    /// Throttle the stream to emit at most once per interval
    ///
    /// Uses "latest-wins" semantics: if several items arrive during an
    /// interval, only the latest is emitted. The throttled stream ends only
    /// when the inner stream ends, after flushing the last pending item.
    fn throttle(self, duration: Duration) -> Throttle<Self>
    where
        Self: Sized,
    {
        Throttle::new(self, duration)
    }
}

impl<T: Stream> ThrottleExt for T {}

pin_project! {
    /// A stream combinator that throttles emission rate
    pub struct Throttle<S: Stream> {
        #[pin]
        stream: S,
        period: Duration,
        interval: Option<Interval>,
        pending: Option<S::Item>,
        finished: bool,
    }
}

impl<S: Stream> Throttle<S> {
    /// Create a new throttled stream
    pub fn new(stream: S, period: Duration) -> Self {
        Self { stream, period, interval: None, pending: None, finished: false }
    }
}

impl<S: Stream> Stream for Throttle<S> {
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        // Drain everything available, keeping only the latest
        while !*this.finished {
            match this.stream.as_mut().poll_next(cx) {
                Poll::Ready(Some(item)) => *this.pending = Some(item),
                Poll::Ready(None) => *this.finished = true,
                Poll::Pending => break,
            }
        }

        if this.pending.is_none() {
            return if *this.finished { Poll::Ready(None) } else { Poll::Pending };
        }

        let period = *this.period;
        let ticker = this.interval.get_or_insert_with(|| {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker
        });
        ready!(ticker.poll_tick(cx));
        Poll::Ready(this.pending.take())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use tokio::sync::mpsc;
    use tokio::time::{Instant, sleep};
    use tokio_stream::wrappers::ReceiverStream;

    #[tokio::test(start_paused = true)]
    async fn latest_item_wins_within_an_interval() {
        let (tx, rx) = mpsc::channel(16);
        let mut throttled = ReceiverStream::new(rx).throttle(Duration::from_millis(100));

        tx.send(1).await.unwrap();
        assert_eq!(throttled.next().await, Some(1));

        for i in 2..=5 {
            tx.send(i).await.unwrap();
        }
        let start = Instant::now();
        assert_eq!(throttled.next().await, Some(5));
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn idle_source_does_not_end_the_stream() {
        let (tx, rx) = mpsc::channel(16);
        let mut throttled = ReceiverStream::new(rx).throttle(Duration::from_millis(50));

        tokio::spawn(async move {
            sleep(Duration::from_millis(500)).await;
            tx.send(7).await.unwrap();
        });

        assert_eq!(throttled.next().await, Some(7));
        assert_eq!(throttled.next().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn pending_item_is_flushed_when_source_ends() {
        let items = futures::stream::iter(vec![1, 2, 3]);
        let collected: Vec<i32> = items.throttle(Duration::from_millis(10)).collect().await;
        assert_eq!(collected, vec![3]);
    }

    #[tokio::test(start_paused = true)]
    async fn emission_rate_is_bounded() {
        let (tx, rx) = mpsc::channel(1024);
        let throttled = ReceiverStream::new(rx).throttle(Duration::from_millis(100));

        tokio::spawn(async move {
            for i in 0..100 {
                if tx.send(i).await.is_err() {
                    break;
                }
                sleep(Duration::from_millis(10)).await;
            }
        });

        let start = Instant::now();
        let collected: Vec<i32> = throttled.collect().await;
        let elapsed = start.elapsed();
        assert_eq!(collected.last(), Some(&99));
        assert!(collected.len() as u128 <= elapsed.as_millis() / 100 + 2, "{} items in {elapsed:?}", collected.len());
        assert!(collected.windows(2).all(|w| w[0] < w[1]));
    }
}
